use std::fmt;
use std::str::FromStr;

use auth::SessionClaims;
use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::account::errors::AccountError;
use crate::account::errors::AccountIdError;
use crate::account::errors::EmailError;
use crate::account::errors::RoleError;
use crate::account::errors::SignUpPolicyError;

/// Account aggregate entity.
///
/// `password_hash` is an opaque PHC digest. It never leaves the domain and
/// outbound adapters; HTTP response types do not carry it.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: AccountId,
    pub email: EmailAddress,
    pub password_hash: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Account unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId(pub Uuid);

impl AccountId {
    /// Generate a new random account ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an account ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, AccountIdError> {
        Uuid::parse_str(s)
            .map(AccountId)
            .map_err(|e| AccountIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser. Stored and compared
/// exactly as given, without case folding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Account role. New accounts are always `User`; `Admin` is granted out of band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(RoleError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimum lengths enforced on sign-up, counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignUpPolicy {
    pub min_password_length: usize,
    pub min_name_length: usize,
}

impl SignUpPolicy {
    pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 8;
    pub const DEFAULT_MIN_NAME_LENGTH: usize = 4;

    /// Check password and name lengths of a sign-up command.
    ///
    /// # Errors
    /// * `PasswordTooShort` - Password shorter than `min_password_length`
    /// * `NameTooShort` - Name shorter than `min_name_length`
    pub fn check(&self, command: &SignUpCommand) -> Result<(), SignUpPolicyError> {
        let password_length = command.password.chars().count();
        if password_length < self.min_password_length {
            return Err(SignUpPolicyError::PasswordTooShort {
                min: self.min_password_length,
                actual: password_length,
            });
        }

        let name_length = command.name.trim().chars().count();
        if name_length < self.min_name_length {
            return Err(SignUpPolicyError::NameTooShort {
                min: self.min_name_length,
                actual: name_length,
            });
        }

        Ok(())
    }
}

impl Default for SignUpPolicy {
    fn default() -> Self {
        Self {
            min_password_length: Self::DEFAULT_MIN_PASSWORD_LENGTH,
            min_name_length: Self::DEFAULT_MIN_NAME_LENGTH,
        }
    }
}

/// Command to register a new account
#[derive(Debug)]
pub struct SignUpCommand {
    pub email: EmailAddress,
    pub password: String,
    pub name: String,
}

impl SignUpCommand {
    /// Construct a new sign-up command.
    ///
    /// # Arguments
    /// * `email` - Validated email address
    /// * `password` - Plain text password (will be hashed by service)
    /// * `name` - Display name
    pub fn new(email: EmailAddress, password: String, name: String) -> Self {
        Self {
            email,
            password,
            name,
        }
    }
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub account_id: AccountId,
    pub role: Role,
    pub name: String,
}

/// Identity extracted from a validated session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedAccount {
    pub account_id: AccountId,
    pub email: String,
    pub role: Role,
}

impl AuthenticatedAccount {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl TryFrom<SessionClaims> for AuthenticatedAccount {
    type Error = AccountError;

    fn try_from(claims: SessionClaims) -> Result<Self, Self::Error> {
        Ok(Self {
            account_id: AccountId::from_string(&claims.sub)?,
            role: claims.role.parse()?,
            email: claims.email,
        })
    }
}
