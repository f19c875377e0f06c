//! Business logic behind the photo routes

pub mod album;
pub mod listing;
pub mod upload;
