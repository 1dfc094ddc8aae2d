//! Credential and session-token primitives for the bookstore backend.
//!
//! - [`CredentialHasher`]: salted, cost-tunable password hashing (Argon2id)
//! - [`SessionTokenCodec`]: HS256-signed bearer tokens carrying account claims
//!
//! Neither type touches storage. The service crate owns accounts and decides
//! what goes into the claims; this crate only hashes, signs and verifies.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::CredentialHasher;
//!
//! let hasher = CredentialHasher::with_cost(8).unwrap();
//! let digest = hasher.hash("correct horse").unwrap();
//! assert!(hasher.verify("correct horse", &digest).unwrap());
//! assert!(!hasher.verify("battery staple", &digest).unwrap());
//! ```
//!
//! ## Session Tokens
//! ```
//! use auth::SessionTokenCodec;
//!
//! let codec = SessionTokenCodec::new(b"secret_key_at_least_32_bytes_long!");
//! let claims = codec.claims_for("42", "reader@example.com", "user");
//! let token = codec.issue(&claims).unwrap();
//! let decoded = codec.validate(&token).unwrap();
//! assert_eq!(decoded.email, "reader@example.com");
//! ```

pub mod jwt;
pub mod password;

pub use jwt::SessionClaims;
pub use jwt::SessionTokenCodec;
pub use jwt::TokenError;
pub use password::CredentialHasher;
pub use password::PasswordError;
