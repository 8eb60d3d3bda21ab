//! Page lifecycle definitions for a single crawl invocation
//!
//! Every frontier entry walks this lifecycle once it is dequeued.

use std::fmt;

/// Represents the current state of a URL in the crawl process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    // ===== Active States =====
    /// URL is waiting in the frontier queue
    Queued,

    /// URL passed the filter predicate and the robots policy
    PolitenessChecked,

    /// Markup was retrieved successfully
    Fetched,

    /// Text, title and links were extracted from the markup
    Extracted,

    /// Content passed the minimum-length check and is ready to store
    Filtered,

    // ===== Terminal States =====
    /// Content was added to the knowledge store
    Stored,

    /// URL was skipped (filter, robots policy, or thin content)
    Skipped,

    /// Fetch failed; the failure is recorded in the crawl result
    Errored,
}

impl PageState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stored | Self::Skipped | Self::Errored)
    }

    /// Returns true if this is an active state (page may still be processed)
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Checks whether moving from `self` to `next` follows the lifecycle
    ///
    /// The happy path is strictly linear. `Skipped` and `Errored` may be
    /// entered from any active state; terminal states never move again.
    pub fn can_transition_to(&self, next: PageState) -> bool {
        if self.is_terminal() {
            return false;
        }

        match next {
            Self::Skipped | Self::Errored => true,
            Self::PolitenessChecked => *self == Self::Queued,
            Self::Fetched => *self == Self::PolitenessChecked,
            Self::Extracted => *self == Self::Fetched,
            Self::Filtered => *self == Self::Extracted,
            Self::Stored => *self == Self::Filtered,
            Self::Queued => false,
        }
    }

    /// Returns the lowercase label used in logs and statistics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::PolitenessChecked => "politeness_checked",
            Self::Fetched => "fetched",
            Self::Extracted => "extracted",
            Self::Filtered => "filtered",
            Self::Stored => "stored",
            Self::Skipped => "skipped",
            Self::Errored => "errored",
        }
    }

    /// Returns all possible page states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Queued,
            Self::PolitenessChecked,
            Self::Fetched,
            Self::Extracted,
            Self::Filtered,
            Self::Stored,
            Self::Skipped,
            Self::Errored,
        ]
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
