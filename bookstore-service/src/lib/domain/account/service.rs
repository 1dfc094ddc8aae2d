use std::sync::Arc;

use async_trait::async_trait;
use auth::CredentialHasher;
use auth::PasswordError;
use auth::SessionTokenCodec;
use chrono::Utc;

use crate::account::errors::AccountError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::AuthenticatedAccount;
use crate::account::models::Role;
use crate::account::models::Session;
use crate::account::models::SignUpCommand;
use crate::account::models::SignUpPolicy;
use crate::account::ports::AccountRepository;
use crate::account::ports::AuthServicePort;

/// Verified against when the email is unknown, so both login failure paths
/// pay for one hash computation.
const DUMMY_PASSWORD: &str = "dummy-password-for-unknown-accounts";

/// Domain service implementation for sign-up, login and token checks.
pub struct AuthService<AR>
where
    AR: AccountRepository,
{
    repository: Arc<AR>,
    hasher: Arc<CredentialHasher>,
    token_codec: Arc<SessionTokenCodec>,
    policy: SignUpPolicy,
    dummy_hash: String,
}

impl<AR> AuthService<AR>
where
    AR: AccountRepository,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Account persistence implementation
    /// * `hasher` - Password hasher with the configured work factor
    /// * `token_codec` - Session token signer, shared with the HTTP layer
    /// * `policy` - Sign-up length policy
    ///
    /// Computes the dummy digest up front, so this blocks for one hash.
    pub fn new(
        repository: Arc<AR>,
        hasher: CredentialHasher,
        token_codec: Arc<SessionTokenCodec>,
        policy: SignUpPolicy,
    ) -> Self {
        // An empty digest only fails verification, which is the outcome wanted here.
        let dummy_hash = hasher.hash(DUMMY_PASSWORD).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Dummy password digest could not be computed");
            String::new()
        });

        Self {
            repository,
            hasher: Arc::new(hasher),
            token_codec,
            policy,
            dummy_hash,
        }
    }

    async fn hash_password(&self, password: String) -> Result<String, AccountError> {
        let hasher = Arc::clone(&self.hasher);

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AccountError::Unknown(format!("Hashing task failed: {}", e)))?
            .map_err(|e| AccountError::Credential(e.to_string()))
    }

    async fn verify_password(
        &self,
        password: String,
        hash: String,
    ) -> Result<Result<bool, PasswordError>, AccountError> {
        let hasher = Arc::clone(&self.hasher);

        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AccountError::Unknown(format!("Verification task failed: {}", e)))
    }
}

#[async_trait]
impl<AR> AuthServicePort for AuthService<AR>
where
    AR: AccountRepository,
{
    async fn sign_up(&self, command: SignUpCommand) -> Result<Account, AccountError> {
        self.policy.check(&command)?;

        let password_hash = self.hash_password(command.password).await?;

        let account = Account {
            id: AccountId::new(),
            email: command.email,
            password_hash,
            name: command.name.trim().to_string(),
            role: Role::User,
            created_at: Utc::now(),
        };

        match self.repository.create(account).await {
            Ok(account) => {
                tracing::info!(account_id = %account.id, "Account created");
                Ok(account)
            }
            Err(AccountError::DuplicateEmail) => {
                tracing::warn!("Sign-up rejected: email already registered");
                Err(AccountError::DuplicateEmail)
            }
            Err(e) => {
                tracing::error!(error = %e, "Sign-up failed: account store error");
                Err(e)
            }
        }
    }

    async fn login(&self, email: &str, password: &str) -> Result<Session, AccountError> {
        let account = self.repository.find_by_email(email).await?;

        let stored_hash = match &account {
            Some(account) => account.password_hash.clone(),
            None => self.dummy_hash.clone(),
        };

        let verified = self
            .verify_password(password.to_string(), stored_hash)
            .await?;

        let account = match (account, verified) {
            (Some(account), Ok(true)) => account,
            (Some(account), Err(e)) => {
                tracing::error!(
                    account_id = %account.id,
                    error = %e,
                    "Stored password digest could not be verified"
                );
                return Err(AccountError::Credential(e.to_string()));
            }
            _ => {
                tracing::debug!("Login rejected");
                return Err(AccountError::InvalidCredentials);
            }
        };

        let claims = self.token_codec.claims_for(
            account.id,
            account.email.as_str(),
            account.role.as_str(),
        );
        let token = self
            .token_codec
            .issue(&claims)
            .map_err(|e| AccountError::Token(e.to_string()))?;

        tracing::info!(account_id = %account.id, role = %account.role, "Login succeeded");

        Ok(Session {
            token,
            account_id: account.id,
            role: account.role,
            name: account.name,
        })
    }

    async fn authenticate(&self, token: &str) -> Result<AuthenticatedAccount, AccountError> {
        let claims = self.token_codec.validate(token).map_err(|e| {
            tracing::warn!(error = %e, "Session token rejected");
            AccountError::Unauthorized
        })?;

        AuthenticatedAccount::try_from(claims).map_err(|e| {
            tracing::warn!(error = %e, "Session token carries invalid claims");
            AccountError::Unauthorized
        })
    }
}
