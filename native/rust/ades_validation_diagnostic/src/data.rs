// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::certificate::Certificate;
use crate::error::DiagnosticError;
use crate::revocation::Revocation;
use crate::signature::Signature;
use crate::timestamp::Timestamp;
use crate::trust::TrustedList;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The complete snapshot handed to the executors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticData {
    /// Instant the snapshot was produced at.
    pub validation_date: DateTime<Utc>,
    #[serde(default)]
    pub document_name: Option<String>,
    #[serde(default)]
    pub signatures: Vec<Signature>,
    #[serde(default)]
    pub certificates: Vec<Certificate>,
    #[serde(default)]
    pub revocations: Vec<Revocation>,
    #[serde(default)]
    pub timestamps: Vec<Timestamp>,
    #[serde(default)]
    pub trusted_lists: Vec<TrustedList>,
}

impl DiagnosticData {
    pub fn new(validation_date: DateTime<Utc>) -> Self {
        Self {
            validation_date,
            document_name: None,
            signatures: Vec::new(),
            certificates: Vec::new(),
            revocations: Vec::new(),
            timestamps: Vec::new(),
            trusted_lists: Vec::new(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, DiagnosticError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DiagnosticError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String, DiagnosticError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn signature(&self, id: &str) -> Option<&Signature> {
        self.signatures.iter().find(|s| s.id == id)
    }

    pub fn signature_mut(&mut self, id: &str) -> Option<&mut Signature> {
        self.signatures.iter_mut().find(|s| s.id == id)
    }

    pub fn certificate(&self, id: &str) -> Option<&Certificate> {
        self.certificates.iter().find(|c| c.id == id)
    }

    pub fn certificate_mut(&mut self, id: &str) -> Option<&mut Certificate> {
        self.certificates.iter_mut().find(|c| c.id == id)
    }

    pub fn revocation(&self, id: &str) -> Option<&Revocation> {
        self.revocations.iter().find(|r| r.id == id)
    }

    pub fn revocation_mut(&mut self, id: &str) -> Option<&mut Revocation> {
        self.revocations.iter_mut().find(|r| r.id == id)
    }

    pub fn timestamp(&self, id: &str) -> Option<&Timestamp> {
        self.timestamps.iter().find(|t| t.id == id)
    }

    pub fn timestamp_mut(&mut self, id: &str) -> Option<&mut Timestamp> {
        self.timestamps.iter_mut().find(|t| t.id == id)
    }

    pub fn trusted_list(&self, id: &str) -> Option<&TrustedList> {
        self.trusted_lists.iter().find(|t| t.id == id)
    }

    pub fn first_signature_id(&self) -> Option<&str> {
        self.signatures.first().map(|s| s.id.as_str())
    }

    /// Timestamps not referenced by any signature.
    pub fn detached_timestamps(&self) -> impl Iterator<Item = &Timestamp> {
        self.timestamps.iter().filter(move |t| {
            !self
                .signatures
                .iter()
                .any(|s| s.timestamp_ids.iter().any(|id| id == &t.id))
        })
    }
}
