pub mod auth;
pub mod media;
pub mod photos;
pub mod root;
