use crate::domain::Track;

use super::Rule;

/// Sort tracks alphabetically by title, ignoring case. Equal titles keep
/// their relative order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByTitle;

impl ByTitle {
    pub const NAME: &'static str = "by_title";
}

impl Rule for ByTitle {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&self, tracks: &[Track]) -> Vec<Track> {
        let mut sorted = tracks.to_vec();
        // sort_by_key is stable
        sorted.sort_by_key(|t| t.title.to_lowercase());
        sorted
    }
}
