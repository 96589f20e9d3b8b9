// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::token::{BasicSignature, DigestMatcher, SigningCertificateRef};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Presence of the optional signed attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignedAttributes {
    pub signing_time: bool,
    pub content_type: bool,
    pub content_hints: bool,
    pub content_identifier: bool,
    pub commitment_type_indication: bool,
    pub signer_location: bool,
    pub content_timestamp: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
    pub id: String,
    /// Set for counter-signatures.
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub structural_validation: Option<bool>,
    #[serde(default)]
    pub signature_format: Option<String>,
    #[serde(default)]
    pub claimed_signing_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub signed_attributes: SignedAttributes,
    #[serde(default)]
    pub basic_signature: BasicSignature,
    #[serde(default)]
    pub signing_certificate: Option<SigningCertificateRef>,
    /// Signing certificate first.
    #[serde(default)]
    pub certificate_chain: Vec<String>,
    #[serde(default)]
    pub digest_matchers: Vec<DigestMatcher>,
    #[serde(default)]
    pub timestamp_ids: Vec<String>,
}

impl Signature {
    pub fn is_counter_signature(&self) -> bool {
        self.parent_id.is_some()
    }

    pub fn signing_certificate_id(&self) -> Option<&str> {
        self.signing_certificate
            .as_ref()
            .and_then(|r| r.certificate_id.as_deref())
    }
}
