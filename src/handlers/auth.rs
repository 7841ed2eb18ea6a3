use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::database::models::{UserProfile, UserType};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::auth_service::SignupParams;
use crate::AppState;

use super::validate;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password: String,
    pub product_key: Option<String>,
}

impl SignupRequest {
    fn validate(&self) -> Result<(), crate::error::ApiError> {
        validate::collect(vec![
            ("name", validate::non_empty(&self.name, "Name")),
            ("phone", validate::phone(&self.phone)),
            ("email", validate::email(&self.email)),
            ("password", validate::password(&self.password)),
        ])
    }

    fn into_params(self) -> SignupParams {
        SignupParams {
            name: self.name,
            phone: self.phone,
            email: self.email,
            password: self.password,
            product_key: self.product_key,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateProductKeyRequest {
    pub email: String,
    pub user_type: UserType,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductKeyResponse {
    pub product_key: String,
}

/// POST /auth/signup/:user_type - register an account and receive a token
pub async fn signup(
    State(state): State<AppState>,
    Path(user_type): Path<UserType>,
    Json(request): Json<SignupRequest>,
) -> ApiResult<TokenResponse> {
    request.validate()?;
    let token = state.auth.signup(request.into_params(), user_type).await?;
    Ok(ApiResponse::created(TokenResponse { token }))
}

/// POST /auth/signin - authenticate and receive a token
pub async fn signin(
    State(state): State<AppState>,
    Json(request): Json<SigninRequest>,
) -> ApiResult<TokenResponse> {
    validate::collect(vec![("email", validate::email(&request.email))])?;
    let token = state.auth.signin(&request.email, &request.password).await?;
    Ok(ApiResponse::success(TokenResponse { token }))
}

/// GET /api/auth/me - public profile of the authenticated user
pub async fn me(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<UserProfile> {
    let profile = state.auth.me(auth_user.id).await?;
    Ok(ApiResponse::success(profile))
}

/// POST /api/auth/key - generate a product key for a prospective realtor.
/// Admin callers only.
pub async fn product_key(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(request): Json<GenerateProductKeyRequest>,
) -> ApiResult<ProductKeyResponse> {
    state
        .auth
        .require_user_type(auth_user.id, UserType::Admin)
        .await?;
    validate::collect(vec![("email", validate::email(&request.email))])?;

    let product_key = state
        .auth
        .generate_product_key(&request.email, request.user_type)?;
    Ok(ApiResponse::created(ProductKeyResponse { product_key }))
}
