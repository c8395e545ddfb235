use std::fmt;

/// Where a list screen is in its fetch cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SyncPhase {
    #[default]
    Idle,
    /// First load; nothing has been shown yet.
    Loading,
    /// The list is visible and a new copy is on its way.
    Refreshing,
    /// The last fetch failed. Whatever was in the store is still there.
    Error(String),
}

impl SyncPhase {
    /// True while a fetch is outstanding.
    pub fn is_busy(&self) -> bool {
        matches!(self, SyncPhase::Loading | SyncPhase::Refreshing)
    }

    /// False only while the initial load hides the list.
    pub fn shows_list(&self) -> bool {
        !matches!(self, SyncPhase::Loading)
    }
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncPhase::Idle => write!(f, "idle"),
            SyncPhase::Loading => write!(f, "loading"),
            SyncPhase::Refreshing => write!(f, "refreshing"),
            SyncPhase::Error(e) => write!(f, "error: {}", e),
        }
    }
}

/// How overlapping fetches are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchOrdering {
    /// Every response is applied as it arrives, so the one that resolves
    /// last wins even if it was issued first.
    #[default]
    LastResolved,
    /// Each fetch takes a sequence number; only the most recently issued
    /// fetch may touch the store or the phase.
    LatestRequest,
}
