pub mod account;
pub mod activation;
pub mod admin_guide;
pub mod ai_polish;
pub mod codes;
pub mod favorite;
pub mod feedback;
pub mod guide;
pub mod media;
pub mod seed;
pub mod taxonomy;
pub mod users;
