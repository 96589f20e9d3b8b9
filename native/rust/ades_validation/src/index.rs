// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Per-run lookup tables over a diagnostic snapshot.
//!
//! Timestamps form a DAG: a timestamp only covers tokens produced no later than itself. The index
//! keeps the edges in both directions as id lists and never stores references between timestamps.

use crate::error::ValidationError;
use ades_validation_diagnostic::{Certificate, DiagnosticData, Revocation, Signature, Timestamp};
use std::collections::HashMap;

pub(crate) struct TokenIndex<'a> {
    signatures: HashMap<&'a str, &'a Signature>,
    certificates: HashMap<&'a str, &'a Certificate>,
    revocations: HashMap<&'a str, &'a Revocation>,
    timestamps: HashMap<&'a str, &'a Timestamp>,
    /// timestamp id -> ids of the tokens it covers
    covers: HashMap<&'a str, Vec<&'a str>>,
    /// token id -> ids of the timestamps covering it
    covered_by: HashMap<&'a str, Vec<&'a str>>,
}

fn dangling(kind: &'static str, id: &str, referenced_by: &str) -> ValidationError {
    ValidationError::DanglingReference {
        kind,
        id: id.to_string(),
        referenced_by: referenced_by.to_string(),
    }
}

impl<'a> TokenIndex<'a> {
    pub(crate) fn build(data: &'a DiagnosticData) -> Result<Self, ValidationError> {
        let signatures: HashMap<_, _> = data.signatures.iter().map(|s| (s.id.as_str(), s)).collect();
        let certificates: HashMap<_, _> = data.certificates.iter().map(|c| (c.id.as_str(), c)).collect();
        let revocations: HashMap<_, _> = data.revocations.iter().map(|r| (r.id.as_str(), r)).collect();
        let timestamps: HashMap<_, _> = data.timestamps.iter().map(|t| (t.id.as_str(), t)).collect();

        let mut covers: HashMap<&'a str, Vec<&'a str>> = HashMap::new();
        let mut covered_by: HashMap<&'a str, Vec<&'a str>> = HashMap::new();
        let mut link = |timestamp: &'a str, token: &'a str| {
            let list = covers.entry(timestamp).or_default();
            if !list.contains(&token) {
                list.push(token);
                covered_by.entry(token).or_default().push(timestamp);
            }
        };

        for signature in &data.signatures {
            if let Some(parent) = &signature.parent_id {
                if !signatures.contains_key(parent.as_str()) {
                    return Err(dangling("signature", parent, &signature.id));
                }
            }
            for id in &signature.certificate_chain {
                if !certificates.contains_key(id.as_str()) {
                    return Err(dangling("certificate", id, &signature.id));
                }
            }
            for id in &signature.timestamp_ids {
                if !timestamps.contains_key(id.as_str()) {
                    return Err(dangling("timestamp", id, &signature.id));
                }
                link(id.as_str(), signature.id.as_str());
            }
        }

        for timestamp in &data.timestamps {
            for id in &timestamp.certificate_chain {
                if !certificates.contains_key(id.as_str()) {
                    return Err(dangling("certificate", id, &timestamp.id));
                }
            }
            for object in &timestamp.timestamped_objects {
                link(timestamp.id.as_str(), object.id.as_str());
            }
        }

        for certificate in &data.certificates {
            for id in &certificate.certificate_chain {
                if !certificates.contains_key(id.as_str()) {
                    return Err(dangling("certificate", id, &certificate.id));
                }
            }
        }

        Ok(Self {
            signatures,
            certificates,
            revocations,
            timestamps,
            covers,
            covered_by,
        })
    }

    pub(crate) fn signature(&self, id: &str) -> Option<&'a Signature> {
        self.signatures.get(id).copied()
    }

    pub(crate) fn certificate(&self, id: &str) -> Option<&'a Certificate> {
        self.certificates.get(id).copied()
    }

    pub(crate) fn revocation(&self, id: &str) -> Option<&'a Revocation> {
        self.revocations.get(id).copied()
    }

    pub(crate) fn timestamp(&self, id: &str) -> Option<&'a Timestamp> {
        self.timestamps.get(id).copied()
    }

    /// Tokens covered by `timestamp_id`.
    pub(crate) fn covered(&self, timestamp_id: &str) -> &[&'a str] {
        self.covers.get(timestamp_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Timestamps covering `token_id`, oldest first.
    pub(crate) fn timestamps_covering(&self, token_id: &str) -> Vec<&'a Timestamp> {
        let mut list: Vec<&'a Timestamp> = self
            .covered_by
            .get(token_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.timestamp(id))
            .collect();
        list.sort_by(|a, b| a.production_time.cmp(&b.production_time).then_with(|| a.id.cmp(&b.id)));
        list
    }

    /// Signing certificate followed by its issuers, resolved against the snapshot.
    ///
    /// The signing certificate leads the list even when the token's chain omits it.
    pub(crate) fn chain(&self, signing_certificate_id: Option<&str>, chain_ids: &[String]) -> Vec<&'a Certificate> {
        let mut chain = Vec::new();
        if let Some(signing) = signing_certificate_id.and_then(|id| self.certificate(id)) {
            chain.push(signing);
        }
        for id in chain_ids {
            if chain.iter().any(|c| c.id == *id) {
                continue;
            }
            if let Some(certificate) = self.certificate(id) {
                chain.push(certificate);
            }
        }
        chain
    }

    /// Revocation records known for `certificate`, skipping entries missing from the snapshot.
    pub(crate) fn revocations_of(&self, certificate: &Certificate) -> Vec<&'a Revocation> {
        certificate
            .revocations
            .iter()
            .filter_map(|entry| {
                let found = self.revocation(&entry.revocation_id);
                if found.is_none() {
                    tracing::warn!(
                        certificate = %certificate.id,
                        revocation = %entry.revocation_id,
                        "revocation entry refers to unknown revocation data"
                    );
                }
                found
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ades_validation_diagnostic::{
        BasicSignature, DigestAlgorithm, DigestMatcher, DigestMatcherType, SignedAttributes, TimestampType,
        TimestampedObject, TimestampedObjectCategory,
    };
    use chrono::{TimeZone, Utc};

    fn timestamp(id: &str, year: i32, covers: &[&str]) -> Timestamp {
        Timestamp {
            id: id.into(),
            timestamp_type: TimestampType::ArchiveTimestamp,
            production_time: Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).unwrap(),
            basic_signature: BasicSignature::default(),
            signing_certificate: None,
            certificate_chain: Vec::new(),
            message_imprint: DigestMatcher::intact(DigestMatcherType::MessageImprint, DigestAlgorithm::Sha256),
            timestamped_objects: covers
                .iter()
                .map(|c| TimestampedObject {
                    category: TimestampedObjectCategory::Timestamp,
                    id: (*c).into(),
                })
                .collect(),
        }
    }

    fn signature(id: &str, timestamps: &[&str]) -> Signature {
        Signature {
            id: id.into(),
            parent_id: None,
            structural_validation: None,
            signature_format: None,
            claimed_signing_time: None,
            signed_attributes: SignedAttributes::default(),
            basic_signature: BasicSignature::default(),
            signing_certificate: None,
            certificate_chain: Vec::new(),
            digest_matchers: Vec::new(),
            timestamp_ids: timestamps.iter().map(|t| (*t).into()).collect(),
        }
    }

    #[test]
    fn attached_and_covered_timestamps_are_linked_once() {
        let mut data = DiagnosticData::new(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap());
        data.signatures.push(signature("S-1", &["T-1", "T-2"]));
        data.timestamps.push(timestamp("T-2", 2015, &["S-1", "T-1"]));
        data.timestamps.push(timestamp("T-1", 2012, &[]));

        let index = TokenIndex::build(&data).unwrap();
        let covering: Vec<_> = index.timestamps_covering("S-1").iter().map(|t| t.id.as_str()).collect();
        assert_eq!(covering, vec!["T-1", "T-2"]);
        assert_eq!(index.covered("T-2"), &["S-1", "T-1"]);
        assert_eq!(index.timestamps_covering("T-1").len(), 1);
    }

    #[test]
    fn unknown_attached_timestamp_is_an_error() {
        let mut data = DiagnosticData::new(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap());
        data.signatures.push(signature("S-1", &["T-404"]));

        let error = TokenIndex::build(&data).err().unwrap();
        assert!(matches!(error, ValidationError::DanglingReference { kind: "timestamp", .. }));
    }
}
