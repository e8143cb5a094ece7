use serde::Serialize;

/// Default display cap (the "3-deal rule").
pub const DEFAULT_DISPLAY_CAP: usize = 3;

/// Truncated view over an already ranked list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LimitedMatches<T> {
    pub results: Vec<T>,
    pub total_found: usize,
    pub cap: usize,
}

impl<T> LimitedMatches<T> {
    pub fn was_truncated(&self) -> bool {
        self.total_found > self.results.len()
    }
}

/// Keep the first `cap` entries. The input order is trusted and never re-sorted.
pub fn limit_matches<T>(mut ranked: Vec<T>, cap: usize) -> LimitedMatches<T> {
    let total_found = ranked.len();
    ranked.truncate(cap);

    LimitedMatches {
        results: ranked,
        total_found,
        cap,
    }
}
