//! Photomart API Library
//!
//! HTTP surface of the photo marketplace: the upload and listing handlers,
//! the services behind them, and application setup.

mod api_doc;
pub mod auth;
pub mod constants;
pub mod error;
mod handlers;
pub mod services;
pub mod setup;
pub mod state;
mod telemetry;
mod utils;

pub use error::{ErrorResponse, HttpAppError};
pub use services::upload::{UploadFile, UploadOutcome, UploadRequest, UploadWorkflow};
