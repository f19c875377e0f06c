//! Request parsing helpers

pub mod upload;
