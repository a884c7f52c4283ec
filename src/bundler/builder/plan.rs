//! Build plan selection.

/// How a set of entries is bundled, decided once from the entry count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildPlan {
    /// Nothing to bundle.
    Empty,

    /// One entry, built once and watched when requested.
    SingleWatchable(String),

    /// Several entries, built one after another with watch disabled.
    MultiSequential(Vec<String>),
}

impl BuildPlan {
    pub fn from_entries(mut entries: Vec<String>) -> Self {
        match entries.len() {
            0 => Self::Empty,
            1 => Self::SingleWatchable(entries.remove(0)),
            _ => Self::MultiSequential(entries),
        }
    }

    /// Entries in build order.
    pub fn entries(&self) -> &[String] {
        match self {
            Self::Empty => &[],
            Self::SingleWatchable(entry) => std::slice::from_ref(entry),
            Self::MultiSequential(entries) => entries,
        }
    }

    /// Whether builds under this plan run in watch mode.
    pub fn watches(&self, requested: bool) -> bool {
        matches!(self, Self::SingleWatchable(_)) && requested
    }
}
