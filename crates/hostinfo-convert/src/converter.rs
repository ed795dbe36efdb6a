//! The converter capability and the identity fallback.

use crate::models::{ConverterResult, Outcome};
use crate::sentinels::is_blank;

/// A normalization rule for one canonical key.
///
/// Implementations are pure: the same input always yields the same
/// [`Outcome`], and no state is shared between calls.
pub trait Converter: Send + Sync {
    /// Canonical key a scalar result is stored under.
    fn key(&self) -> &str;

    /// Header strings that select this converter, including the key itself.
    fn aliases(&self) -> &[&str];

    /// Converts a raw imported value. `None` means the field was absent.
    fn convert(&self, raw: Option<&str>) -> Outcome;
}

/// Passes a value through unchanged unless it is absent or blank.
pub fn identity(raw: Option<&str>) -> Outcome {
    match raw {
        Some(value) if !is_blank(value) => ConverterResult::scalar(value).into(),
        _ => Outcome::empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_passes_through() {
        assert_eq!(
            identity(Some("Rack 12")).result,
            ConverterResult::scalar("Rack 12")
        );
    }

    #[test]
    fn test_identity_drops_blank() {
        assert!(identity(None).result.is_empty());
        assert!(identity(Some("   ")).result.is_empty());
    }
}
