// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::token::{BasicSignature, DigestMatcher, SigningCertificateRef};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimestampType {
    ContentTimestamp,
    AllDataObjectsTimestamp,
    IndividualDataObjectsTimestamp,
    SignatureTimestamp,
    ValidationDataRefsOnlyTimestamp,
    ValidationDataTimestamp,
    ArchiveTimestamp,
}

impl TimestampType {
    pub fn is_content_timestamp(&self) -> bool {
        matches!(
            self,
            TimestampType::ContentTimestamp
                | TimestampType::AllDataObjectsTimestamp
                | TimestampType::IndividualDataObjectsTimestamp
        )
    }

    pub fn is_signature_timestamp(&self) -> bool {
        *self == TimestampType::SignatureTimestamp
    }

    pub fn is_validation_data_timestamp(&self) -> bool {
        matches!(
            self,
            TimestampType::ValidationDataRefsOnlyTimestamp | TimestampType::ValidationDataTimestamp
        )
    }

    pub fn is_archive_timestamp(&self) -> bool {
        *self == TimestampType::ArchiveTimestamp
    }

    /// Position in the coherence order: content, signature, validation data, archive.
    pub fn coherence_rank(&self) -> u8 {
        if self.is_content_timestamp() {
            0
        } else if self.is_signature_timestamp() {
            1
        } else if self.is_validation_data_timestamp() {
            2
        } else {
            3
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimestampedObjectCategory {
    Signature,
    Certificate,
    Revocation,
    Timestamp,
    SignedData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimestampedObject {
    pub category: TimestampedObjectCategory,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timestamp {
    pub id: String,
    #[serde(rename = "type")]
    pub timestamp_type: TimestampType,
    pub production_time: DateTime<Utc>,
    #[serde(default)]
    pub basic_signature: BasicSignature,
    #[serde(default)]
    pub signing_certificate: Option<SigningCertificateRef>,
    #[serde(default)]
    pub certificate_chain: Vec<String>,
    pub message_imprint: DigestMatcher,
    #[serde(default)]
    pub timestamped_objects: Vec<TimestampedObject>,
}

impl Timestamp {
    pub fn signing_certificate_id(&self) -> Option<&str> {
        self.signing_certificate
            .as_ref()
            .and_then(|r| r.certificate_id.as_deref())
    }

    pub fn covers(&self, token_id: &str) -> bool {
        self.timestamped_objects.iter().any(|o| o.id == token_id)
    }
}
