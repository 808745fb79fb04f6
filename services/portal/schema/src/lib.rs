//! sea-orm entities for the portal database.

pub mod activation_codes;
pub mod categories;
pub mod feedbacks;
pub mod guide_contents;
pub mod guide_tags;
pub mod tags;
pub mod user_favorites;
pub mod users;
