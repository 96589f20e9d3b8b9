// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Proof-of-existence bookkeeping for one validation run.

use crate::index::TokenIndex;
use ades_validation_diagnostic::Timestamp;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// A point in time at which a token is known to have existed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Poe {
    pub(crate) time: DateTime<Utc>,
    /// Timestamp providing the proof; `None` for the current time.
    pub(crate) timestamp_id: Option<String>,
}

/// Every token exists at the current time; valid timestamps add earlier proofs for what they cover.
#[derive(Debug, Clone)]
pub(crate) struct PoeStore {
    current_time: DateTime<Utc>,
    proofs: HashMap<String, Vec<Poe>>,
}

impl PoeStore {
    pub(crate) fn new(current_time: DateTime<Utc>) -> Self {
        Self {
            current_time,
            proofs: HashMap::new(),
        }
    }

    pub(crate) fn add(&mut self, token_id: &str, time: DateTime<Utc>, timestamp_id: Option<&str>) {
        self.proofs.entry(token_id.to_string()).or_default().push(Poe {
            time,
            timestamp_id: timestamp_id.map(str::to_string),
        });
    }

    /// Records the proofs a valid `timestamp` provides for the objects it covers.
    pub(crate) fn add_from_timestamp(&mut self, index: &TokenIndex<'_>, timestamp: &Timestamp) {
        for covered in index.covered(&timestamp.id) {
            self.add(covered, timestamp.production_time, Some(&timestamp.id));
        }
        tracing::debug!(
            timestamp_id = %timestamp.id,
            production_time = %timestamp.production_time,
            covered = index.covered(&timestamp.id).len(),
            "proof of existence extracted"
        );
    }

    /// Earliest proof of existence of `token_id`.
    pub(crate) fn lowest(&self, token_id: &str) -> DateTime<Utc> {
        self.lowest_proof(token_id).map_or(self.current_time, |p| p.time.min(self.current_time))
    }

    /// The earliest timestamp-backed proof, if any.
    pub(crate) fn lowest_proof(&self, token_id: &str) -> Option<&Poe> {
        self.proofs.get(token_id)?.iter().min_by_key(|p| p.time)
    }

    /// Whether `token_id` is proven to exist at or before `time`.
    pub(crate) fn exists_at(&self, token_id: &str, time: DateTime<Utc>) -> bool {
        self.lowest(token_id) <= time
    }

    /// Whether a proof earlier than the current time exists for `token_id`.
    pub(crate) fn has_earlier_proof(&self, token_id: &str) -> bool {
        self.lowest(token_id) < self.current_time
    }

    pub(crate) fn current_time(&self) -> DateTime<Utc> {
        self.current_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn year(y: i32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn every_token_exists_now() {
        let store = PoeStore::new(year(2020));
        assert_eq!(store.lowest("S-1"), year(2020));
        assert!(store.exists_at("S-1", year(2020)));
        assert!(!store.exists_at("S-1", year(2019)));
        assert!(!store.has_earlier_proof("S-1"));
    }

    #[test]
    fn lowest_proof_wins() {
        let mut store = PoeStore::new(year(2020));
        store.add("S-1", year(2015), Some("T-2"));
        store.add("S-1", year(2012), Some("T-1"));
        assert_eq!(store.lowest("S-1"), year(2012));
        assert_eq!(store.lowest_proof("S-1").and_then(|p| p.timestamp_id.as_deref()), Some("T-1"));
        assert!(store.has_earlier_proof("S-1"));
    }

    #[test]
    fn future_proof_does_not_move_past_now() {
        let mut store = PoeStore::new(year(2020));
        store.add("S-1", year(2030), Some("T-1"));
        assert_eq!(store.lowest("S-1"), year(2020));
    }
}
