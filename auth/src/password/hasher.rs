use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::Error as PhcError;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use super::errors::PasswordError;

/// One-way password hashing with a single tunable work factor.
///
/// The work factor plays the role of a bcrypt cost: memory use doubles with
/// every step (`2^cost` KiB), which roughly doubles hashing time as well.
/// Digests are PHC strings carrying algorithm, parameters and salt, so a
/// digest produced under an older cost keeps verifying after the cost changes.
#[derive(Debug, Clone)]
pub struct CredentialHasher {
    cost: u32,
    params: Params,
}

impl CredentialHasher {
    /// Baseline work factor (16 MiB per hash).
    pub const DEFAULT_COST: u32 = 14;
    pub const MIN_COST: u32 = 3;
    pub const MAX_COST: u32 = 24;

    const ITERATIONS: u32 = 2;
    const PARALLELISM: u32 = 1;

    /// Create a hasher with the baseline work factor.
    pub fn new() -> Self {
        Self {
            cost: Self::DEFAULT_COST,
            params: Self::params_for(Self::DEFAULT_COST).unwrap_or_default(),
        }
    }

    /// Create a hasher with an explicit work factor.
    ///
    /// # Errors
    /// * `InvalidCost` - `cost` outside `MIN_COST..=MAX_COST`
    pub fn with_cost(cost: u32) -> Result<Self, PasswordError> {
        if !(Self::MIN_COST..=Self::MAX_COST).contains(&cost) {
            return Err(PasswordError::InvalidCost {
                cost,
                min: Self::MIN_COST,
                max: Self::MAX_COST,
            });
        }

        Ok(Self {
            cost,
            params: Self::params_for(cost)?,
        })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    fn params_for(cost: u32) -> Result<Params, PasswordError> {
        Params::new(1 << cost, Self::ITERATIONS, Self::PARALLELISM, None)
            .map_err(|e| PasswordError::HashingFailed(format!("Invalid parameters: {}", e)))
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a plaintext password with a fresh random salt.
    ///
    /// # Returns
    /// PHC string format digest
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored digest.
    ///
    /// Parameters are read back from the digest itself. The final comparison
    /// of hash outputs is constant-time.
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `VerificationFailed` - Digest is not a valid PHC string or could not be recomputed
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|e| {
            PasswordError::VerificationFailed(format!("Invalid password hash: {}", e))
        })?;

        match self.argon2().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(PhcError::Password) => Ok(false),
            Err(e) => Err(PasswordError::VerificationFailed(e.to_string())),
        }
    }
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self::new()
    }
}
