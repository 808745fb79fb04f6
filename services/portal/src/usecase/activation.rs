use guidebook_domain::phone::PhoneNumber;

use crate::domain::repository::ActivationCodeRepository;
use crate::domain::types::{ActivationCode, NewUser, Redemption};
use crate::error::PortalError;
use crate::password::hash_password;

// ── validate ──────────────────────────────────────────────────────────────────

pub struct ValidateActivationCodeUseCase<C>
where
    C: ActivationCodeRepository,
{
    pub codes: C,
}

impl<C> ValidateActivationCodeUseCase<C>
where
    C: ActivationCodeRepository,
{
    /// Checks the code without consuming it. Unknown and spent codes are
    /// indistinguishable to the caller.
    pub async fn execute(&self, code: &str) -> Result<ActivationCode, PortalError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(PortalError::MissingField("activation_code"));
        }
        self.codes
            .find_unused(code)
            .await?
            .ok_or(PortalError::InvalidActivationCode)
    }
}

// ── register ──────────────────────────────────────────────────────────────────

pub struct RegisterAccountInput {
    /// Code carried by the pending-activation token.
    pub code: String,
    pub phone: String,
    pub username: String,
    pub password: String,
}

pub struct RegisterAccountUseCase<C>
where
    C: ActivationCodeRepository,
{
    pub codes: C,
}

impl<C> RegisterAccountUseCase<C>
where
    C: ActivationCodeRepository,
{
    pub async fn execute(&self, input: RegisterAccountInput) -> Result<Redemption, PortalError> {
        // 1. Validate the form before touching the database
        let phone = PhoneNumber::parse(&input.phone).map_err(|_| PortalError::InvalidPhone)?;
        let username = input.username.trim();
        if username.is_empty() {
            return Err(PortalError::MissingField("username"));
        }
        if input.password.is_empty() {
            return Err(PortalError::MissingField("password"));
        }

        // 2. Consume the code and create or upgrade the account atomically
        let user = NewUser {
            phone: phone.as_str().to_owned(),
            username: username.to_owned(),
            password_hash: hash_password(&input.password)?,
        };
        let redemption = self.codes.redeem(&input.code, &user).await?;

        match redemption {
            Redemption::Created { user_id } => {
                tracing::info!(user_id, code = %input.code, "registered paid account");
            }
            Redemption::Upgraded { user_id } => {
                tracing::info!(user_id, code = %input.code, "upgraded existing account to paid");
            }
        }
        Ok(redemption)
    }
}
