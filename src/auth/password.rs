use bcrypt::BcryptError;

/// bcrypt work factor, matching the original service.
pub const HASH_COST: u32 = 10;

pub fn hash(password: &str) -> Result<String, BcryptError> {
    bcrypt::hash(password, HASH_COST)
}

pub fn verify(password: &str, hashed: &str) -> Result<bool, BcryptError> {
    bcrypt::verify(password, hashed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_and_is_salted() {
        let hashed = hash("hunter22").unwrap();
        assert_ne!(hashed, "hunter22");
        assert!(verify("hunter22", &hashed).unwrap());
        // Same input, fresh salt
        assert_ne!(hash("hunter22").unwrap(), hashed);
    }

    #[test]
    fn wrong_password_fails_verification() {
        let hashed = hash("hunter22").unwrap();
        assert!(!verify("hunter23", &hashed).unwrap());
    }
}
