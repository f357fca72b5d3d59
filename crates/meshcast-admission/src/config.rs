//! Search configuration.

/// Tuning for the constrained path search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchConfig {
    /// Last slice the search may expand into. `None` explores until the
    /// frontier is exhausted.
    pub max_slice: Option<u32>,
}

impl SearchConfig {
    /// Bound the search depth.
    pub fn with_max_slice(mut self, max_slice: u32) -> Self {
        self.max_slice = Some(max_slice);
        self
    }

    /// Whether a hop landing in slice `value` is within the horizon.
    pub(crate) fn allows(&self, value: u32) -> bool {
        self.max_slice.map_or(true, |max| value <= max)
    }
}
