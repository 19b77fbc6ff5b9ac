use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::SchedulerError;

/// Learning status of a flashcard. Variants are declared in review order,
/// so `Ord` follows the forward-only progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    ToLearn,
    OnceChecked,
    TwiceChecked,
    FullyMemorized,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::ToLearn,
        Status::OnceChecked,
        Status::TwiceChecked,
        Status::FullyMemorized,
    ];

    /// Exact string stored in the `flashcards.status` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::ToLearn => "to-learn",
            Status::OnceChecked => "once-checked",
            Status::TwiceChecked => "twice-checked",
            Status::FullyMemorized => "fully-memorized",
        }
    }

    /// Status reached after one successful review, `None` once terminal.
    pub fn next(self) -> Option<Status> {
        match self {
            Status::ToLearn => Some(Status::OnceChecked),
            Status::OnceChecked => Some(Status::TwiceChecked),
            Status::TwiceChecked => Some(Status::FullyMemorized),
            Status::FullyMemorized => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }

    /// Number of successful reviews needed to reach this status.
    pub fn rank(self) -> u8 {
        match self {
            Status::ToLearn => 0,
            Status::OnceChecked => 1,
            Status::TwiceChecked => 2,
            Status::FullyMemorized => 3,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| SchedulerError::InvalidState {
                value: s.to_string(),
            })
    }
}
