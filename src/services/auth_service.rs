use sqlx::PgPool;

use crate::auth::{password, product_key::ProductKeyGate, TokenIssuer};
use crate::config::SecurityConfig;
use crate::database::models::{User, UserProfile, UserType};
use crate::error::ApiError;

pub struct SignupParams {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password: String,
    pub product_key: Option<String>,
}

/// Account registration, credential checks, token issuance, and profile
/// lookup against the users table.
#[derive(Clone)]
pub struct AuthService {
    pool: PgPool,
    tokens: TokenIssuer,
    product_keys: ProductKeyGate,
}

impl AuthService {
    pub fn new(pool: PgPool, security: &SecurityConfig) -> Self {
        Self {
            pool,
            tokens: TokenIssuer::new(security),
            product_keys: ProductKeyGate::new(security.product_key_secret.clone()),
        }
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    /// Register an account and return a bearer token for it. Non-buyer
    /// signups must present a product key matching their email and role.
    pub async fn signup(&self, params: SignupParams, user_type: UserType) -> Result<String, ApiError> {
        if user_type != UserType::Buyer {
            let key = params
                .product_key
                .as_deref()
                .ok_or_else(|| ApiError::unauthorized("Product key required for this role"))?;
            if !self.product_keys.verify(&params.email, user_type, key) {
                return Err(ApiError::unauthorized("Invalid product key"));
            }
        }

        if self.user_by_email(&params.email).await?.is_some() {
            return Err(ApiError::conflict("A user with this email already exists"));
        }

        let hashed_password = password::hash(&params.password)?;

        let user: User = sqlx::query_as(
            "INSERT INTO \"users\" (\"name\", \"email\", \"phone\", \"password\", \"user_type\") \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(&params.name)
        .bind(&params.email)
        .bind(&params.phone)
        .bind(&hashed_password)
        .bind(user_type)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(user_id = user.id, "registered {} account", user_type.as_str());
        self.tokens.issue(&user.name, user.id)
    }

    /// Authenticate by email and password. Unknown email and wrong password
    /// are deliberately indistinguishable to the caller.
    pub async fn signin(&self, email: &str, password_input: &str) -> Result<String, ApiError> {
        let user = self
            .user_by_email(email)
            .await?
            .ok_or(ApiError::InvalidCredentials)?;

        if !password::verify(password_input, &user.password)? {
            return Err(ApiError::InvalidCredentials);
        }

        self.tokens.issue(&user.name, user.id)
    }

    /// Public profile for the authenticated user.
    pub async fn me(&self, id: i64) -> Result<UserProfile, ApiError> {
        let user = self
            .user_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))?;
        Ok(UserProfile::from(user))
    }

    /// Out-of-band invite code for a prospective realtor or admin.
    pub fn generate_product_key(
        &self,
        email: &str,
        user_type: UserType,
    ) -> Result<String, ApiError> {
        Ok(self.product_keys.generate(email, user_type)?)
    }

    /// Gate an operation on the caller's stored role.
    pub async fn require_user_type(&self, id: i64, required: UserType) -> Result<User, ApiError> {
        let user = self
            .user_by_id(id)
            .await?
            .ok_or_else(|| ApiError::unauthorized("Unknown user"))?;
        if user.user_type != required {
            return Err(ApiError::forbidden(format!(
                "Requires {} privileges",
                required.as_str()
            )));
        }
        Ok(user)
    }

    pub async fn user_by_id(&self, id: i64) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM \"users\" WHERE \"id\" = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM \"users\" WHERE \"email\" = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::pool;

    // The product-key gate runs before any query, so these tests pass with a
    // lazy pool pointing at nothing.
    fn service() -> AuthService {
        let security = SecurityConfig {
            jwt_secret: "test-jwt-secret".to_string(),
            token_expiry_secs: 3600,
            product_key_secret: "test-invite-secret".to_string(),
        };
        let db = pool::connect("postgres://127.0.0.1:1/unreachable").unwrap();
        AuthService::new(db, &security)
    }

    fn realtor_params(product_key: Option<&str>) -> SignupParams {
        SignupParams {
            name: "Damola".to_string(),
            phone: "08001234567".to_string(),
            email: "damola@example.com".to_string(),
            password: "secret-pass".to_string(),
            product_key: product_key.map(String::from),
        }
    }

    #[tokio::test]
    async fn realtor_signup_without_product_key_is_unauthorized() {
        let auth = service();
        let err = auth
            .signup(realtor_params(None), UserType::Realtor)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 401);
    }

    #[tokio::test]
    async fn malformed_product_key_is_unauthorized_not_a_server_error() {
        let auth = service();
        let err = auth
            .signup(realtor_params(Some("not-a-bcrypt-hash")), UserType::Realtor)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 401);
        assert_eq!(err.message(), "Invalid product key");
    }
}
