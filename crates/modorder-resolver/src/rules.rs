//! Hard-coded ordering rules for known mod interactions.

/// A pair of natives (by file name) that must always load in this order
/// whenever both are enabled.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FixedOrder {
    pub first: String,
    pub second: String,
}

impl FixedOrder {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }

    /// The built-in rule table.
    pub fn defaults() -> Vec<Self> {
        DEFAULT_FIXED_ORDERS
            .iter()
            .map(|(first, second)| Self::new(*first, *second))
            .collect()
    }
}

/// `(first, second)`: `first` must load before `second`.
pub const DEFAULT_FIXED_ORDERS: &[(&str, &str)] = &[
    // nighter hooks must be in place before the seamless co-op core starts
    ("nighter.dll", "nrsc.dll"),
];

/// Whether `rules` require `first` to load before `second`.
pub fn requires(rules: &[FixedOrder], first: &str, second: &str) -> bool {
    rules.iter().any(|r| r.first == first && r.second == second)
}

/// Natives that default to `load_early` when enabled: the seamless co-op
/// core library.
pub fn wants_early_load(path: &str) -> bool {
    let lower = path.to_lowercase();
    lower.contains("seamlesscoop") && lower.contains("nrsc.dll")
}
