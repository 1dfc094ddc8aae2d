use async_trait::async_trait;

use crate::account::errors::AccountError;
use crate::account::models::Account;
use crate::account::models::AuthenticatedAccount;
use crate::account::models::Session;
use crate::account::models::SignUpCommand;

/// Port for sign-up, login and token authentication.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new account with role `user`.
    ///
    /// # Arguments
    /// * `command` - Validated email plus raw password and display name
    ///
    /// # Returns
    /// Created account entity
    ///
    /// # Errors
    /// * `Policy` - Password or name shorter than the configured minimum
    /// * `DuplicateEmail` - Email is already registered
    /// * `Credential` - Password hashing failed
    /// * `DatabaseError` - Database operation failed
    async fn sign_up(&self, command: SignUpCommand) -> Result<Account, AccountError>;

    /// Verify credentials and issue a session token.
    ///
    /// # Arguments
    /// * `email` - Email as typed by the client (not validated)
    /// * `password` - Plaintext password
    ///
    /// # Returns
    /// Session with signed token, role and display name
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password (indistinguishable)
    /// * `Token` - Token signing failed
    /// * `DatabaseError` - Database operation failed
    async fn login(&self, email: &str, password: &str) -> Result<Session, AccountError>;

    /// Validate a bearer token and extract the caller's identity.
    ///
    /// # Errors
    /// * `Unauthorized` - Token is malformed, tampered, expired or carries bad claims
    async fn authenticate(&self, token: &str) -> Result<AuthenticatedAccount, AccountError>;
}

/// Persistence operations for account aggregate.
#[async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// Persist new account to storage.
    ///
    /// # Errors
    /// * `DuplicateEmail` - Email uniqueness constraint violated
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, account: Account) -> Result<Account, AccountError>;

    /// Retrieve account by exact email match.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AccountError>;
}
