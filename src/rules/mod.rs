//! Named, pure track-reordering rules.

use thiserror::Error;

use crate::domain::Track;

mod by_title;

pub use by_title::ByTitle;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("unsupported rule: {name}")]
    UnknownRule { name: String },
}

/// A rule never mutates its input and returns the same order for the same tracks.
pub trait Rule: Send + Sync {
    fn name(&self) -> &'static str;

    fn apply(&self, tracks: &[Track]) -> Vec<Track>;
}

/// Names of every registered rule.
pub const RULE_NAMES: &[&str] = &[ByTitle::NAME];

/// Resolves a rule name. Unknown names are an error, never a pass-through.
pub fn resolve(name: &str) -> Result<Box<dyn Rule>, RuleError> {
    match name {
        ByTitle::NAME => Ok(Box::new(ByTitle)),
        _ => Err(RuleError::UnknownRule {
            name: name.to_string(),
        }),
    }
}
