use guidebook_domain::pagination::{Page, PageRequest};

use crate::domain::repository::{GuideRepository, UserRepository};
use crate::domain::types::{DashboardStats, User};
use crate::error::PortalError;

pub struct ListMembersUseCase<U>
where
    U: UserRepository,
{
    pub users: U,
}

impl<U> ListMembersUseCase<U>
where
    U: UserRepository,
{
    pub async fn execute(&self, page: PageRequest) -> Result<Page<User>, PortalError> {
        self.users.list_members(page.clamped()).await
    }
}

pub struct TogglePaidUseCase<U>
where
    U: UserRepository,
{
    pub users: U,
}

impl<U> TogglePaidUseCase<U>
where
    U: UserRepository,
{
    /// Flip `is_paid` and return the new value.
    pub async fn execute(&self, user_id: i32) -> Result<bool, PortalError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(PortalError::UserNotFound)?;
        let is_paid = !user.is_paid;
        if !self.users.set_paid(user_id, is_paid).await? {
            return Err(PortalError::UserNotFound);
        }
        tracing::info!(user_id, is_paid, "changed membership");
        Ok(is_paid)
    }
}

pub struct DashboardUseCase<U, G>
where
    U: UserRepository,
    G: GuideRepository,
{
    pub users: U,
    pub guides: G,
}

impl<U, G> DashboardUseCase<U, G>
where
    U: UserRepository,
    G: GuideRepository,
{
    pub async fn execute(&self) -> Result<DashboardStats, PortalError> {
        Ok(DashboardStats {
            user_count: self.users.count_members().await?,
            guide_count: self.guides.count().await?,
        })
    }
}
