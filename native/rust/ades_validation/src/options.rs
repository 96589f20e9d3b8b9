// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How far the validation process goes for each signature.
///
/// Levels are ordered; every level also runs the ones before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationLevel {
    BasicSignatures,
    Timestamps,
    LongTermData,
    #[default]
    ArchivalData,
}

impl ValidationLevel {
    pub fn name(&self) -> &'static str {
        match self {
            ValidationLevel::BasicSignatures => "BASIC_SIGNATURES",
            ValidationLevel::Timestamps => "TIMESTAMPS",
            ValidationLevel::LongTermData => "LONG_TERM_DATA",
            ValidationLevel::ArchivalData => "ARCHIVAL_DATA",
        }
    }
}

impl fmt::Display for ValidationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Options of a validation run.
#[derive(Debug, Clone, Default)]
pub struct ValidationOptions {
    /// Highest validation level to run.
    pub validation_level: ValidationLevel,
    /// When set, the simple report lists the meaning of every indication it uses.
    pub include_semantics: bool,
    /// The instant the validation is performed at.
    ///
    /// Falls back to the validation date recorded in the diagnostic data; the wall clock is never read.
    pub current_time: Option<DateTime<Utc>>,
}
