use guidebook_domain::phone::PhoneNumber;

use crate::domain::repository::UserRepository;
use crate::domain::types::User;
use crate::error::PortalError;
use crate::password::verify_password;

pub struct LoginInput {
    pub phone: String,
    pub password: String,
}

pub struct LoginUseCase<U>
where
    U: UserRepository,
{
    pub users: U,
}

impl<U> LoginUseCase<U>
where
    U: UserRepository,
{
    pub async fn execute(&self, input: LoginInput) -> Result<User, PortalError> {
        let phone =
            PhoneNumber::parse(&input.phone).map_err(|_| PortalError::InvalidCredentials)?;

        let user = self
            .users
            .find_by_phone(phone.as_str())
            .await?
            .ok_or(PortalError::InvalidCredentials)?;

        if !verify_password(&input.password, &user.password_hash) {
            return Err(PortalError::InvalidCredentials);
        }

        self.users.touch_last_login(user.id).await?;
        Ok(user)
    }
}

/// Loads the account behind a session; used by the route guards.
pub struct CurrentUserUseCase<U>
where
    U: UserRepository,
{
    pub users: U,
}

impl<U> CurrentUserUseCase<U>
where
    U: UserRepository,
{
    pub async fn execute(&self, user_id: i32) -> Result<User, PortalError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(PortalError::UserNotFound)
    }
}
