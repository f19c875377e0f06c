//! Data models for the marketplace
//!
//! Albums group photos uploaded by a photographer, photos carry the original
//! and watermarked preview URLs, and orders record purchased download grants.

mod album;
mod order;
mod photo;

pub use album::*;
pub use order::*;
pub use photo::*;
