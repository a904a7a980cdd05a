use bcrypt::{hash, verify, DEFAULT_COST};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Failed to hash password")]
    HashingFailed,
}

/// Salted one-way password hashing backed by bcrypt
#[derive(Debug, Clone, Copy)]
pub struct CredentialStore {
    cost: u32,
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

impl CredentialStore {
    pub const MIN_COST: u32 = 4;
    pub const MAX_COST: u32 = 31;

    /// Create a store with the given bcrypt work factor (clamped to bcrypt's valid range)
    pub fn new(cost: u32) -> Self {
        Self {
            cost: cost.clamp(Self::MIN_COST, Self::MAX_COST),
        }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a password using bcrypt
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        hash(password, self.cost).map_err(|_| PasswordError::HashingFailed)
    }

    /// Verify a password against its hash. A malformed hash counts as a mismatch.
    pub fn verify(&self, password: &str, password_hash: &str) -> bool {
        verify(password, password_hash).unwrap_or(false)
    }
}
