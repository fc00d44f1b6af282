//! Natural-language prompt parsing port trait.

use crate::domain::error::BitacoreError;
use crate::domain::schema::BacktestRequest;

/// Maps free text to a [`BacktestRequest`].
///
/// The engine consumes the result identically to a directly supplied
/// request; it never learns where a configuration came from.
pub trait PromptPort {
    fn parse(&self, prompt: &str) -> Result<BacktestRequest, BitacoreError>;
}
