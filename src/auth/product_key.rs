use bcrypt::BcryptError;

use crate::database::models::UserType;

use super::password::HASH_COST;

/// Shared-secret invite gate: a prospective realtor (or admin) must present
/// a key previously generated for their exact email and role. Keys are
/// bcrypt hashes of `email-userType-secret`; verification re-derives the
/// payload and runs it against the presented hash, which is deterministic
/// for any given key. A key that is not a well-formed bcrypt hash counts
/// as a mismatch, not a server error.
#[derive(Clone)]
pub struct ProductKeyGate {
    secret: String,
}

impl ProductKeyGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self { secret: secret.into() }
    }

    fn payload(&self, email: &str, user_type: UserType) -> String {
        format!("{}-{}-{}", email, user_type.as_str(), self.secret)
    }

    pub fn generate(&self, email: &str, user_type: UserType) -> Result<String, BcryptError> {
        bcrypt::hash(self.payload(email, user_type), HASH_COST)
    }

    pub fn verify(&self, email: &str, user_type: UserType, key: &str) -> bool {
        bcrypt::verify(self.payload(email, user_type), key).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_key_verifies_for_same_email_and_role() {
        let gate = ProductKeyGate::new("invite-secret");
        let key = gate.generate("damola@example.com", UserType::Realtor).unwrap();
        assert!(gate.verify("damola@example.com", UserType::Realtor, &key));
    }

    #[test]
    fn key_is_bound_to_email_role_and_secret() {
        let gate = ProductKeyGate::new("invite-secret");
        let key = gate.generate("damola@example.com", UserType::Realtor).unwrap();

        assert!(!gate.verify("other@example.com", UserType::Realtor, &key));
        assert!(!gate.verify("damola@example.com", UserType::Admin, &key));

        let other_gate = ProductKeyGate::new("different-secret");
        assert!(!other_gate.verify("damola@example.com", UserType::Realtor, &key));
    }

    #[test]
    fn malformed_key_is_a_mismatch_not_an_error() {
        let gate = ProductKeyGate::new("invite-secret");
        assert!(!gate.verify("damola@example.com", UserType::Realtor, "not-a-bcrypt-hash"));
    }
}
