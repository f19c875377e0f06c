//! Photographer principal resolution.
//!
//! There is no authentication yet. The photographer is taken from the
//! `photographerId` form field, or falls back to the configured default
//! principal. Services only ever see the resolved context.

use photomart_core::AppError;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhotographerContext {
    pub photographer_id: Uuid,
}

impl PhotographerContext {
    pub fn new(photographer_id: Uuid) -> Self {
        Self { photographer_id }
    }

    /// Resolve the principal from an optional client-supplied id.
    pub fn resolve(supplied: Option<&str>, default_id: Uuid) -> Result<Self, AppError> {
        match supplied.map(str::trim).filter(|value| !value.is_empty()) {
            Some(value) => Uuid::parse_str(value).map(Self::new).map_err(|_| {
                AppError::InvalidInput(format!("Invalid photographerId: {}", value))
            }),
            None => Ok(Self::new(default_id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use photomart_core::config::DEFAULT_PHOTOGRAPHER_ID;

    #[test]
    fn test_missing_id_uses_default_principal() {
        let ctx = PhotographerContext::resolve(None, DEFAULT_PHOTOGRAPHER_ID).unwrap();
        assert_eq!(ctx.photographer_id, DEFAULT_PHOTOGRAPHER_ID);

        let blank = PhotographerContext::resolve(Some("  "), DEFAULT_PHOTOGRAPHER_ID).unwrap();
        assert_eq!(blank.photographer_id, DEFAULT_PHOTOGRAPHER_ID);
    }

    #[test]
    fn test_supplied_id_wins() {
        let id = Uuid::new_v4();
        let ctx =
            PhotographerContext::resolve(Some(&id.to_string()), DEFAULT_PHOTOGRAPHER_ID).unwrap();
        assert_eq!(ctx.photographer_id, id);
    }

    #[test]
    fn test_malformed_id_is_rejected() {
        let err = PhotographerContext::resolve(Some("photographer-1"), DEFAULT_PHOTOGRAPHER_ID)
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
