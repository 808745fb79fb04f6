#![allow(async_fn_in_trait)]

use guidebook_domain::feedback::FeedbackStatus;
use guidebook_domain::pagination::{Page, PageRequest};

use crate::domain::types::{
    ActivationCode, Category, FavoriteAction, Feedback, Guide, GuideDraft, GuideFilter,
    NewCategory, NewFeedback, NewUser, Redemption, Tag, User,
};
use crate::error::PortalError;

pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, PortalError>;

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, PortalError>;

    /// Set `last_login` to now.
    async fn touch_last_login(&self, id: i32) -> Result<(), PortalError>;

    /// Non-admin users, id descending.
    async fn list_members(&self, page: PageRequest) -> Result<Page<User>, PortalError>;

    async fn count_members(&self) -> Result<u64, PortalError>;

    /// Returns `false` if no such user.
    async fn set_paid(&self, id: i32, is_paid: bool) -> Result<bool, PortalError>;

    /// Insert an account directly (admin CLI). Duplicate phone yields
    /// `PhoneAlreadyRegistered`.
    async fn insert(
        &self,
        user: &NewUser,
        is_paid: bool,
        is_admin: bool,
    ) -> Result<User, PortalError>;

    /// Grant admin and paid flags. Returns `false` if no such phone.
    async fn promote_admin(&self, phone: &str) -> Result<bool, PortalError>;
}

pub trait ActivationCodeRepository: Send + Sync {
    /// Find a code that exists AND is unused.
    async fn find_unused(&self, code: &str) -> Result<Option<ActivationCode>, PortalError>;

    /// Atomically consume `code` and create or upgrade the account for
    /// `user.phone`, in one transaction.
    ///
    /// A code that is missing or already consumed yields
    /// `InvalidActivationCode`; a concurrent insert of the same phone yields
    /// `PhoneAlreadyRegistered`. Either way nothing is committed.
    async fn redeem(&self, code: &str, user: &NewUser) -> Result<Redemption, PortalError>;

    /// Insert the candidates that do not collide with an existing code, in one
    /// transaction. Returns the codes actually inserted.
    async fn insert_batch(&self, candidates: &[String]) -> Result<Vec<String>, PortalError>;

    /// All codes, id descending.
    async fn list(&self, page: PageRequest) -> Result<Page<ActivationCode>, PortalError>;

    async fn list_unused_codes(&self) -> Result<Vec<String>, PortalError>;
}

pub trait CategoryRepository: Send + Sync {
    /// All categories, `sort_order` ascending.
    async fn list_ordered(&self) -> Result<Vec<Category>, PortalError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Category>, PortalError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, PortalError>;

    /// Duplicate name yields `CategoryAlreadyExists`.
    async fn create(&self, category: &NewCategory) -> Result<Category, PortalError>;

    /// Move every guide of `id` onto the reserved category (created on demand),
    /// then delete `id`. One transaction. Returns how many guides moved.
    async fn delete_reassigning(&self, id: i32) -> Result<u64, PortalError>;
}

pub trait TagRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Tag>, PortalError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Tag>, PortalError>;

    /// Duplicate name yields `TagAlreadyExists`.
    async fn create(&self, name: &str) -> Result<Tag, PortalError>;

    /// Delete a tag and its guide memberships. Returns `false` if not found.
    async fn delete(&self, id: i32) -> Result<bool, PortalError>;

    async fn list_for_guide(&self, guide_id: i32) -> Result<Vec<Tag>, PortalError>;
}

pub trait GuideRepository: Send + Sync {
    /// Published guides matching `filter`, `created_at` descending.
    async fn list_published(
        &self,
        filter: &GuideFilter,
        page: PageRequest,
    ) -> Result<Page<Guide>, PortalError>;

    /// Every guide, `updated_at` descending.
    async fn list_all(&self, page: PageRequest) -> Result<Page<Guide>, PortalError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Guide>, PortalError>;

    /// `view_count = view_count + 1`. Returns `false` if not found.
    async fn increment_views(&self, id: i32) -> Result<bool, PortalError>;

    /// `like_count = like_count + 1`. Returns the new count, `None` if not found.
    async fn increment_likes(&self, id: i32) -> Result<Option<i32>, PortalError>;

    /// Up to `limit` other published guides in the same category, random order.
    async fn related(&self, guide: &Guide, limit: u64) -> Result<Vec<Guide>, PortalError>;

    async fn create(&self, draft: &GuideDraft) -> Result<Guide, PortalError>;

    /// Replace the guide's fields and tag set. `None` if not found.
    async fn update(&self, id: i32, draft: &GuideDraft) -> Result<Option<Guide>, PortalError>;

    /// Returns `false` if not found.
    async fn delete(&self, id: i32) -> Result<bool, PortalError>;

    async fn count(&self) -> Result<u64, PortalError>;
}

pub trait FavoriteRepository: Send + Sync {
    /// Remove the membership if present, otherwise add it. One transaction.
    async fn toggle(&self, user_id: i32, guide_id: i32) -> Result<FavoriteAction, PortalError>;

    async fn is_favorite(&self, user_id: i32, guide_id: i32) -> Result<bool, PortalError>;

    async fn find_favorites(&self, user_id: i32) -> Result<Vec<Guide>, PortalError>;
}

pub trait FeedbackRepository: Send + Sync {
    async fn create(&self, feedback: &NewFeedback) -> Result<Feedback, PortalError>;

    /// Newest first.
    async fn list(&self, page: PageRequest) -> Result<Page<Feedback>, PortalError>;

    /// Returns `false` if not found.
    async fn set_status(&self, id: i32, status: FeedbackStatus) -> Result<bool, PortalError>;
}
