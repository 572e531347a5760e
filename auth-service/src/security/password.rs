/// Password hashing and verification using bcrypt
use crate::error::Result;

/// Work factor for newly stored hashes. Existing hashes verify at whatever
/// cost they were created with.
const BCRYPT_COST: u32 = 10;

/// Hash a password with a randomized salt.
pub fn hash_password(password: &str) -> Result<String> {
    Ok(bcrypt::hash(password, BCRYPT_COST)?)
}

/// Compare a password against a stored hash. bcrypt's comparison is
/// constant-time with respect to the candidate password.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    Ok(bcrypt::verify(password, hash)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(verify_password("correct horse battery staple", &hash).unwrap());
    }

    #[test]
    fn wrong_password_fails_verification() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(!verify_password("Tr0ub4dor&3", &hash).unwrap());
    }

    #[test]
    fn same_password_hashes_differently() {
        // Randomized salt per hash.
        let a = hash_password("hunter22").unwrap();
        let b = hash_password("hunter22").unwrap();
        assert_ne!(a, b);
    }
}
