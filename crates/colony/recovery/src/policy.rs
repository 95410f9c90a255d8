use serde::{Deserialize, Serialize};

/// How many approvals an exit from recovery needs.
///
/// Evaluated against the number of recovery roles held at exit time, not at
/// entry time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuorumPolicy {
    /// `⌊n/2⌋ + 1` of the current role holders.
    #[default]
    StrictMajority,
    /// A fixed count, never less than one and never more than the number of
    /// current role holders. Role grants are frozen during recovery, so an
    /// uncapped count could never be reached.
    Fixed(u64),
}

impl QuorumPolicy {
    pub fn required(self, role_count: u64) -> u64 {
        match self {
            QuorumPolicy::StrictMajority => role_count / 2 + 1,
            QuorumPolicy::Fixed(k) => k.max(1).min(role_count.max(1)),
        }
    }

    pub fn is_met(self, approvals: u64, role_count: u64) -> bool {
        approvals >= self.required(role_count)
    }
}
