// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::algorithms::EncryptionAlgorithm;
use crate::token::{BasicSignature, SigningCertificateRef};
use crate::trust::TrustServiceProvider;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub(crate) fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KeyUsage {
    DigitalSignature,
    NonRepudiation,
    KeyEncipherment,
    DataEncipherment,
    KeyAgreement,
    KeyCertSign,
    CrlSign,
    EncipherOnly,
    DecipherOnly,
}

impl KeyUsage {
    pub fn name(&self) -> &'static str {
        match self {
            KeyUsage::DigitalSignature => "digitalSignature",
            KeyUsage::NonRepudiation => "nonRepudiation",
            KeyUsage::KeyEncipherment => "keyEncipherment",
            KeyUsage::DataEncipherment => "dataEncipherment",
            KeyUsage::KeyAgreement => "keyAgreement",
            KeyUsage::KeyCertSign => "keyCertSign",
            KeyUsage::CrlSign => "crlSign",
            KeyUsage::EncipherOnly => "encipherOnly",
            KeyUsage::DecipherOnly => "decipherOnly",
        }
    }
}

/// QC type declared by the `QcType` statement (ETSI EN 319 412-5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QcType {
    #[serde(rename = "qc-type-esign")]
    Esign,
    #[serde(rename = "qc-type-eseal")]
    Eseal,
    #[serde(rename = "qc-type-web")]
    Web,
}

impl QcType {
    pub fn name(&self) -> &'static str {
        match self {
            QcType::Esign => "qc-type-esign",
            QcType::Eseal => "qc-type-eseal",
            QcType::Web => "qc-type-web",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RevocationReason {
    Unspecified,
    KeyCompromise,
    CaCompromise,
    AffiliationChanged,
    Superseded,
    CessationOfOperation,
    CertificateHold,
    RemoveFromCrl,
    PrivilegeWithdrawn,
    AaCompromise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CertificateStatus {
    Good,
    Revoked,
    Unknown,
}

/// Status a revocation record asserts for one certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRevocation {
    pub revocation_id: String,
    pub status: CertificateStatus,
    #[serde(default)]
    pub reason: Option<RevocationReason>,
    #[serde(default)]
    pub revocation_date: Option<DateTime<Utc>>,
}

impl CertificateRevocation {
    pub fn is_revoked(&self) -> bool {
        self.status == CertificateStatus::Revoked
    }

    /// A revoked entry whose reason is `certificateHold`.
    pub fn is_on_hold(&self) -> bool {
        self.is_revoked() && self.reason == Some(RevocationReason::CertificateHold)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DistinguishedNameAttributes {
    pub common_name: Option<String>,
    pub given_name: Option<String>,
    pub surname: Option<String>,
    pub pseudonym: Option<String>,
    pub title: Option<String>,
    pub email: Option<String>,
    pub country: Option<String>,
    pub locality: Option<String>,
    pub state: Option<String>,
    pub organization_name: Option<String>,
    pub organization_unit: Option<String>,
    pub organization_identifier: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BasicConstraints {
    pub ca: bool,
    pub path_len_constraint: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificatePolicy {
    pub oid: String,
    #[serde(default)]
    pub cps_url: Option<String>,
}

/// Permitted and excluded subtrees, matched as name suffixes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NameConstraints {
    pub permitted_subtrees: Vec<String>,
    pub excluded_subtrees: Vec<String>,
}

impl NameConstraints {
    /// Returns true when `name` falls inside the permitted subtrees and outside the excluded ones.
    pub fn permits(&self, name: &str) -> bool {
        let name = name.to_ascii_lowercase();
        let within = |subtree: &String| name.ends_with(&subtree.to_ascii_lowercase());
        let permitted = self.permitted_subtrees.is_empty() || self.permitted_subtrees.iter().any(within);
        permitted && !self.excluded_subtrees.iter().any(within)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QcLimitValue {
    pub currency: String,
    pub amount: u64,
    pub exponent: u32,
}

impl QcLimitValue {
    /// amount × 10^exponent, saturating.
    pub fn value(&self) -> u64 {
        10u64
            .checked_pow(self.exponent)
            .and_then(|scale| self.amount.checked_mul(scale))
            .unwrap_or(u64::MAX)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Psd2Info {
    pub roles: Vec<String>,
    pub nca_name: Option<String>,
    pub nca_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QcStatements {
    pub compliance: bool,
    pub qc_types: Vec<QcType>,
    pub sscd: bool,
    pub limit_value: Option<QcLimitValue>,
    pub retention_period: Option<u32>,
    pub pds_locations: Vec<String>,
    pub legislation_country_codes: Vec<String>,
    pub semantics_identifier: Option<String>,
    pub psd2: Option<Psd2Info>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateExtension {
    pub oid: String,
    #[serde(default)]
    pub critical: bool,
}

/// An X.509 certificate as seen by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub id: String,
    #[serde(default)]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub subject: DistinguishedNameAttributes,
    #[serde(default)]
    pub subject_dn: String,
    #[serde(default)]
    pub issuer_dn: String,
    #[serde(default = "default_true")]
    pub issuer_entity_key_match: bool,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
    #[serde(default)]
    pub public_key_algorithm: Option<EncryptionAlgorithm>,
    #[serde(default)]
    pub public_key_size: Option<u32>,
    #[serde(default)]
    pub basic_signature: BasicSignature,
    #[serde(default)]
    pub self_signed: bool,
    #[serde(default)]
    pub trusted: bool,
    #[serde(default)]
    pub sunset_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub key_usages: Vec<KeyUsage>,
    #[serde(default)]
    pub extended_key_usages: Vec<String>,
    #[serde(default)]
    pub basic_constraints: BasicConstraints,
    #[serde(default)]
    pub certificate_policies: Vec<CertificatePolicy>,
    #[serde(default = "default_true")]
    pub policy_tree_valid: bool,
    #[serde(default)]
    pub name_constraints: Option<NameConstraints>,
    #[serde(default)]
    pub subject_alternative_names: Vec<String>,
    #[serde(default)]
    pub qc_statements: Option<QcStatements>,
    #[serde(default)]
    pub extensions: Vec<CertificateExtension>,
    #[serde(default)]
    pub aia_urls: Vec<String>,
    #[serde(default)]
    pub crl_distribution_points: Vec<String>,
    #[serde(default)]
    pub ocsp_access_urls: Vec<String>,
    #[serde(default)]
    pub id_pkix_ocsp_no_check: bool,
    #[serde(default)]
    pub no_rev_avail: bool,
    #[serde(default)]
    pub signing_certificate: Option<SigningCertificateRef>,
    /// Issuer chain, closest issuer first. Excludes this certificate.
    #[serde(default)]
    pub certificate_chain: Vec<String>,
    #[serde(default)]
    pub revocations: Vec<CertificateRevocation>,
    #[serde(default)]
    pub trust_service_providers: Vec<TrustServiceProvider>,
}

impl Certificate {
    pub fn is_valid_at(&self, time: DateTime<Utc>) -> bool {
        self.not_before <= time && time <= self.not_after
    }

    pub fn is_ca(&self) -> bool {
        self.basic_constraints.ca
    }

    pub fn has_extension(&self, oid: &str) -> bool {
        self.extensions.iter().any(|e| e.oid == oid)
    }

    pub fn has_policy(&self, oid: &str) -> bool {
        self.certificate_policies.iter().any(|p| p.oid == oid)
    }

    pub fn policy_ids(&self) -> Vec<String> {
        self.certificate_policies.iter().map(|p| p.oid.clone()).collect()
    }

    pub fn qc_compliance(&self) -> bool {
        self.qc_statements.as_ref().is_some_and(|qc| qc.compliance)
    }

    pub fn qc_sscd(&self) -> bool {
        self.qc_statements.as_ref().is_some_and(|qc| qc.sscd)
    }

    pub fn qc_types(&self) -> &[QcType] {
        self.qc_statements.as_ref().map(|qc| qc.qc_types.as_slice()).unwrap_or(&[])
    }

    /// Revocation access is advertised through CRL distribution points or OCSP.
    pub fn has_revocation_access(&self) -> bool {
        !self.crl_distribution_points.is_empty() || !self.ocsp_access_urls.is_empty()
    }

    pub fn issuer_id(&self) -> Option<&str> {
        self.signing_certificate
            .as_ref()
            .and_then(|r| r.certificate_id.as_deref())
            .or_else(|| self.certificate_chain.first().map(String::as_str))
    }

    pub fn revocation_entry(&self, revocation_id: &str) -> Option<&CertificateRevocation> {
        self.revocations.iter().find(|r| r.revocation_id == revocation_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_constraints_match_suffixes_case_insensitively() {
        let nc = NameConstraints {
            permitted_subtrees: vec!["O=Example,C=BE".into()],
            excluded_subtrees: vec!["OU=Blocked,O=Example,C=BE".into()],
        };
        assert!(nc.permits("CN=Alice,o=example,c=be"));
        assert!(!nc.permits("CN=Bob,OU=Blocked,O=Example,C=BE"));
        assert!(!nc.permits("CN=Carol,O=Other,C=FR"));
    }

    #[test]
    fn limit_value_saturates() {
        let small = QcLimitValue { currency: "EUR".into(), amount: 5, exponent: 3 };
        assert_eq!(small.value(), 5000);
        let huge = QcLimitValue { currency: "EUR".into(), amount: 5, exponent: 40 };
        assert_eq!(huge.value(), u64::MAX);
    }
}
