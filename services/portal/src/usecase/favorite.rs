use serde::Serialize;

use crate::domain::port::MediaStorage;
use crate::domain::repository::{FavoriteRepository, GuideRepository};
use crate::domain::types::{FavoriteAction, Guide, User};
use crate::error::PortalError;
use crate::usecase::guide::sign_cover;

pub struct ToggleFavoriteUseCase<G, F>
where
    G: GuideRepository,
    F: FavoriteRepository,
{
    pub guides: G,
    pub favorites: F,
}

impl<G, F> ToggleFavoriteUseCase<G, F>
where
    G: GuideRepository,
    F: FavoriteRepository,
{
    pub async fn execute(&self, user_id: i32, guide_id: i32) -> Result<FavoriteAction, PortalError> {
        if self.guides.find_by_id(guide_id).await?.is_none() {
            return Err(PortalError::GuideNotFound);
        }
        self.favorites.toggle(user_id, guide_id).await
    }
}

#[derive(Debug, Serialize)]
pub struct Profile {
    pub user: User,
    pub favorites: Vec<Guide>,
}

pub struct ProfileUseCase<F, S>
where
    F: FavoriteRepository,
    S: MediaStorage,
{
    pub favorites: F,
    pub storage: S,
    pub signed_url_ttl: u64,
}

impl<F, S> ProfileUseCase<F, S>
where
    F: FavoriteRepository,
    S: MediaStorage,
{
    pub async fn execute(&self, user: User) -> Result<Profile, PortalError> {
        let favorites = self
            .favorites
            .find_favorites(user.id)
            .await?
            .into_iter()
            .map(|g| sign_cover(&self.storage, self.signed_url_ttl, g))
            .collect();
        Ok(Profile { user, favorites })
    }
}
