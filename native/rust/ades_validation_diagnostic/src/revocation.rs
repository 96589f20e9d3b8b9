// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::token::{BasicSignature, SigningCertificateRef};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RevocationType {
    Crl,
    Ocsp,
}

/// A CRL or OCSP response.
///
/// Per-certificate status lives on [`crate::Certificate::revocations`]; this record carries the
/// facts about the revocation token itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Revocation {
    pub id: String,
    #[serde(rename = "type")]
    pub revocation_type: RevocationType,
    #[serde(default)]
    pub origin: Option<String>,
    pub production_date: DateTime<Utc>,
    pub this_update: DateTime<Utc>,
    #[serde(default)]
    pub next_update: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expired_certs_on_crl: Option<DateTime<Utc>>,
    #[serde(default)]
    pub archive_cut_off: Option<DateTime<Utc>>,
    #[serde(default)]
    pub basic_signature: BasicSignature,
    #[serde(default)]
    pub signing_certificate: Option<SigningCertificateRef>,
    #[serde(default)]
    pub certificate_chain: Vec<String>,
    #[serde(default)]
    pub cert_hash_present: bool,
    #[serde(default)]
    pub cert_hash_match: bool,
}

impl Revocation {
    pub fn is_ocsp(&self) -> bool {
        self.revocation_type == RevocationType::Ocsp
    }

    pub fn signing_certificate_id(&self) -> Option<&str> {
        self.signing_certificate
            .as_ref()
            .and_then(|r| r.certificate_id.as_deref())
    }

    /// Earliest date from which the token still reports expired certificates.
    pub fn expired_certs_retention(&self) -> Option<DateTime<Utc>> {
        match (self.expired_certs_on_crl, self.archive_cut_off) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}
