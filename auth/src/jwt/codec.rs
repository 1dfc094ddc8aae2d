use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::SessionClaims;
use super::errors::TokenError;

/// Signs and validates session tokens.
///
/// Uses HS256 (HMAC with SHA-256) with a symmetric secret. Tokens are signed,
/// not encrypted: anyone holding one can read its claims.
pub struct SessionTokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    ttl: Duration,
}

impl SessionTokenCodec {
    pub const DEFAULT_TTL_HOURS: i64 = 72;

    /// Create a codec with the default 72 hour validity window.
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Load it from configuration, never from code
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            ttl: Duration::hours(Self::DEFAULT_TTL_HOURS),
        }
    }

    /// Replace the validity window.
    pub fn with_ttl_hours(mut self, hours: i64) -> Self {
        self.ttl = Duration::hours(hours);
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Claims for a session starting now.
    pub fn claims_for(
        &self,
        subject: impl ToString,
        email: impl Into<String>,
        role: impl Into<String>,
    ) -> SessionClaims {
        SessionClaims::new(subject, email, role, Utc::now(), self.ttl)
    }

    /// Sign claims into a compact token.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(&self, claims: &SessionClaims) -> Result<String, TokenError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Validate a token against the wall clock.
    pub fn validate(&self, token: &str) -> Result<SessionClaims, TokenError> {
        self.validate_at(token, Utc::now())
    }

    /// Validate a token as of `now`.
    ///
    /// # Errors
    /// * `Malformed` - Not a JWT, wrong algorithm, or claims do not decode
    /// * `InvalidSignature` - Signature does not match the secret
    /// * `MissingClaim` - A registered claim is absent
    /// * `Expired` - `now` is at or past the `exp` claim
    pub fn validate_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<SessionClaims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        // Expiry is checked below against the supplied clock, with no leeway.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let token_data =
            decode::<SessionClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                    ErrorKind::MissingRequiredClaim(claim) => {
                        TokenError::MissingClaim(claim.clone())
                    }
                    _ => TokenError::Malformed(e.to_string()),
                }
            })?;

        if token_data.claims.is_expired(now.timestamp()) {
            return Err(TokenError::Expired);
        }

        Ok(token_data.claims)
    }
}
