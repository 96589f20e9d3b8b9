// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Leaf constraint types.

use crate::level::Level;
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Wildcard accepted by every [`MultiValuesConstraint`].
pub const ANY_VALUE: &str = "*";

/// Implemented by every leaf constraint.
pub trait LeveledConstraint {
    fn level(&self) -> Level;
}

/// Level of an optional constraint, `None` when the constraint is absent.
pub fn level_of<C: LeveledConstraint>(constraint: &Option<C>) -> Option<Level> {
    constraint.as_ref().map(LeveledConstraint::level)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConstraint {
    pub level: Level,
}

impl LevelConstraint {
    pub const fn new(level: Level) -> Self {
        Self { level }
    }
}

impl LeveledConstraint for LevelConstraint {
    fn level(&self) -> Level {
        self.level
    }
}

/// A constraint with an accepted-value set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiValuesConstraint {
    pub level: Level,
    #[serde(default)]
    pub ids: Vec<String>,
}

impl MultiValuesConstraint {
    pub fn new<I, S>(level: Level, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            level,
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn accepts(&self, value: &str) -> bool {
        self.ids.iter().any(|id| id == ANY_VALUE || id == value)
    }

    /// Every value is accepted; an empty value list is accepted only by the wildcard.
    pub fn accepts_all<'a>(&self, values: impl IntoIterator<Item = &'a str>) -> bool {
        let mut seen = false;
        for value in values {
            seen = true;
            if !self.accepts(value) {
                return false;
            }
        }
        seen || self.ids.iter().any(|id| id == ANY_VALUE)
    }

    pub fn accepts_any<'a>(&self, mut values: impl Iterator<Item = &'a str>) -> bool {
        values.any(|v| self.accepts(v))
    }
}

impl LeveledConstraint for MultiValuesConstraint {
    fn level(&self) -> Level {
        self.level
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueConstraint {
    pub level: Level,
    pub value: String,
}

impl LeveledConstraint for ValueConstraint {
    fn level(&self) -> Level {
        self.level
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntValueConstraint {
    pub level: Level,
    pub value: i64,
}

impl LeveledConstraint for IntValueConstraint {
    fn level(&self) -> Level {
        self.level
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeUnit {
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    fn millis(&self) -> u64 {
        match self {
            TimeUnit::Milliseconds => 1,
            TimeUnit::Seconds => 1_000,
            TimeUnit::Minutes => 60_000,
            TimeUnit::Hours => 3_600_000,
            TimeUnit::Days => 86_400_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeConstraint {
    pub level: Level,
    pub value: u64,
    pub unit: TimeUnit,
}

impl TimeConstraint {
    pub const fn new(level: Level, value: u64, unit: TimeUnit) -> Self {
        Self { level, value, unit }
    }

    pub fn duration(&self) -> Duration {
        let millis = self.value.saturating_mul(self.unit.millis()).min(i64::MAX as u64);
        Duration::milliseconds(millis as i64)
    }
}

impl LeveledConstraint for TimeConstraint {
    fn level(&self) -> Level {
        self.level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_accepts_everything_including_nothing() {
        let any = MultiValuesConstraint::new(Level::Fail, [ANY_VALUE]);
        assert!(any.accepts("anything"));
        assert!(any.accepts_all(std::iter::empty()));

        let some = MultiValuesConstraint::new(Level::Fail, ["a", "b"]);
        assert!(some.accepts_all(["a", "b"]));
        assert!(!some.accepts_all(["a", "c"]));
        assert!(!some.accepts_all(std::iter::empty()));
        assert!(some.accepts_any(["c", "b"].into_iter()));
    }

    #[test]
    fn time_constraint_converts_units() {
        let six_hours = TimeConstraint::new(Level::Warn, 6, TimeUnit::Hours);
        assert_eq!(six_hours.duration(), Duration::hours(6));
        let huge = TimeConstraint::new(Level::Warn, u64::MAX, TimeUnit::Days);
        assert!(huge.duration() > Duration::days(365 * 1000));
    }
}
