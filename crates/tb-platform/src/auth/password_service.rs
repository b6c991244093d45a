//! Password Hashing Service
//!
//! Argon2id hashing with per-call random salts, stored as PHC strings.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use tracing::warn;

use crate::shared::error::{PlatformError, Result};

/// Argon2id parameters.
#[derive(Debug, Clone)]
pub struct Argon2Config {
    /// Memory cost in KiB (default: 65536 = 64 MiB)
    pub memory_cost: u32,
    /// Time cost / iterations (default: 3)
    pub time_cost: u32,
    /// Parallelism (default: 4)
    pub parallelism: u32,
    /// Output hash length in bytes (default: 32)
    pub output_len: usize,
}

impl Default for Argon2Config {
    fn default() -> Self {
        Self {
            memory_cost: 65536,
            time_cost: 3,
            parallelism: 4,
            output_len: 32,
        }
    }
}

impl Argon2Config {
    /// Low-memory config for tests and dev seeding (faster, less secure).
    pub fn testing() -> Self {
        Self {
            memory_cost: 4096,
            time_cost: 1,
            parallelism: 1,
            output_len: 32,
        }
    }

    fn to_params(&self) -> Params {
        Params::new(
            self.memory_cost,
            self.time_cost,
            self.parallelism,
            Some(self.output_len),
        )
        .expect("invalid Argon2 params")
    }
}

/// One-way password hashing and verification.
pub struct PasswordService {
    argon2: Argon2<'static>,
}

impl PasswordService {
    pub fn new(config: Argon2Config) -> Self {
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, config.to_params());
        Self { argon2 }
    }

    /// Hash a password with a freshly generated salt.
    ///
    /// Two calls with the same input produce different digests; both verify.
    pub fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PlatformError::internal(format!("failed to hash password: {}", e)))?;

        Ok(hash.to_string())
    }

    /// Verify a password against a stored digest.
    ///
    /// Any problem with the stored digest (corruption, unknown format)
    /// counts as a verification failure rather than an error, so a broken
    /// record can never abort a login request.
    pub fn verify_password(&self, password: &str, hash: &str) -> bool {
        let parsed = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("stored password hash is malformed: {}", e);
                return false;
            }
        };

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => true,
            Err(argon2::password_hash::Error::Password) => false,
            Err(e) => {
                warn!("password verification error: {}", e);
                false
            }
        }
    }
}

impl Default for PasswordService {
    fn default() -> Self {
        Self::new(Argon2Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> PasswordService {
        PasswordService::new(Argon2Config::testing())
    }

    #[test]
    fn test_hash_and_verify() {
        let service = service();
        let hash = service.hash_password("p1").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(service.verify_password("p1", &hash));
        assert!(!service.verify_password("p2", &hash));
    }

    #[test]
    fn test_hash_uniqueness() {
        let service = service();
        let hash1 = service.hash_password("samepassword").unwrap();
        let hash2 = service.hash_password("samepassword").unwrap();

        // Random salts make digests differ while both still verify.
        assert_ne!(hash1, hash2);
        assert!(service.verify_password("samepassword", &hash1));
        assert!(service.verify_password("samepassword", &hash2));
    }

    #[test]
    fn test_malformed_digest_fails_verification() {
        let service = service();
        assert!(!service.verify_password("anything", "not-a-phc-string"));
        assert!(!service.verify_password("anything", ""));
        assert!(!service.verify_password("anything", "$argon2id$corrupted"));
    }

    #[test]
    fn test_long_input() {
        let service = service();
        let long = "x".repeat(120);
        let hash = service.hash_password(&long).unwrap();
        assert!(service.verify_password(&long, &hash));
    }
}
