// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity configured for a constraint.
///
/// An absent constraint is modeled as `None` by the owning group, never as a `Level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Fail,
    Warn,
    Inform,
    Ignore,
}

impl Level {
    fn severity(&self) -> u8 {
        match self {
            Level::Fail => 3,
            Level::Warn => 2,
            Level::Inform => 1,
            Level::Ignore => 0,
        }
    }

    /// The less severe of the two levels.
    pub fn least_severe(self, other: Level) -> Level {
        if other.severity() < self.severity() {
            other
        } else {
            self
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Level::Fail => "FAIL",
            Level::Warn => "WARN",
            Level::Inform => "INFORM",
            Level::Ignore => "IGNORE",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_severe_is_symmetric() {
        assert_eq!(Level::Fail.least_severe(Level::Warn), Level::Warn);
        assert_eq!(Level::Warn.least_severe(Level::Fail), Level::Warn);
        assert_eq!(Level::Inform.least_severe(Level::Ignore), Level::Ignore);
        assert_eq!(Level::Fail.least_severe(Level::Fail), Level::Fail);
    }
}
