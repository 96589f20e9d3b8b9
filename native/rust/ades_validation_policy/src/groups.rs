// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Constraint groups of the policy tree.
//!
//! Every leaf is optional. An absent leaf skips its check entirely.

use crate::constraints::{IntValueConstraint, LevelConstraint, MultiValuesConstraint, TimeConstraint, ValueConstraint};
use crate::crypto::CryptographicConstraint;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignatureConstraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structural_validation: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acceptable_formats: Option<MultiValuesConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basic_signature_constraints: Option<BasicSignatureConstraints>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signed_attributes: Option<SignedAttributesConstraints>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_signature_time_before_expiration_date_of_signing_certificate: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp_coherence: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp_delay: Option<TimeConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revocation_time_against_best_signature_time: Option<LevelConstraint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignedAttributesConstraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signing_certificate_present: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signing_certificate_digest_value_present: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signing_certificate_digest_value_match: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signing_certificate_issuer_serial_match: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signing_certificate_digest_algorithm: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signing_time: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_hints: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_identifier: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commitment_type_indication: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signer_location: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_timestamp: Option<LevelConstraint>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BasicSignatureConstraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_data_existence: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_data_intact: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature_intact: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prospective_certificate_chain: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trusted_service_type_identifier: Option<MultiValuesConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trusted_service_status: Option<MultiValuesConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signing_certificate: Option<CertificateConstraints>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_certificate: Option<CertificateConstraints>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cryptographic: Option<CryptographicConstraint>,
}

/// Certificates whose extension or policy OIDs match are exempt from revocation checks.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RevocationDataSkipConstraint {
    pub certificate_extensions: Vec<String>,
    pub certificate_policies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CertificateConstraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recognition: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunset_date: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validity_range: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number_present: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surname: Option<MultiValuesConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given_name: Option<MultiValuesConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub common_name: Option<MultiValuesConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pseudonym: Option<MultiValuesConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<MultiValuesConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<MultiValuesConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<MultiValuesConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locality: Option<MultiValuesConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<MultiValuesConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_identifier: Option<MultiValuesConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_unit: Option<MultiValuesConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<MultiValuesConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_of_pseudonym: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_signed: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_self_signed: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_usage: Option<MultiValuesConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extended_key_usage: Option<MultiValuesConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_path_length: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_ids: Option<MultiValuesConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_qualification_ids: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_supported_by_qscd_ids: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qc_compliance: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qc_eu_limit_value_currency: Option<ValueConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_qc_eu_limit_value: Option<IntValueConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_qc_eu_retention_period: Option<IntValueConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qc_sscd: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qc_eu_pds_location: Option<MultiValuesConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qc_type: Option<MultiValuesConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qc_legislation_country_codes: Option<MultiValuesConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_to_natural_person: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_to_legal_person: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantics_identifier: Option<MultiValuesConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub psd2_qc_type_roles_of_psp: Option<MultiValuesConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub psd2_qc_comp_nca_name: Option<MultiValuesConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub psd2_qc_comp_nca_id: Option<MultiValuesConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_tree: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_constraints: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer_name: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_critical_extensions: Option<MultiValuesConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forbidden_extensions: Option<MultiValuesConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authority_info_access_present: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revocation_info_access_present: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_rev_avail_certificate: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revocation_data_skip: Option<RevocationDataSkipConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revocation_data_available: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acceptable_revocation_data_found: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_revoked: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_on_hold: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crl_next_update_present: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocsp_next_update_present: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revocation_freshness: Option<TimeConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cryptographic: Option<CryptographicConstraint>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimestampConstraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp_delay: Option<TimeConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coherence: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_signature_time_before_expiration_date_of_signing_certificate: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_imprint_data_found: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_imprint_data_intact: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basic_signature_constraints: Option<BasicSignatureConstraints>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp_valid: Option<LevelConstraint>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RevocationConstraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consistent: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unknown_status: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_issued_ocsp: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocsp_cert_hash_present: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocsp_cert_hash_match: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revocation_issuer_known: Option<LevelConstraint>,
    /// Signing certificate of the revocation data chains to a trust anchor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revocation_issuer_trusted: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer_valid_at_production_time: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basic_signature_constraints: Option<BasicSignatureConstraints>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EidasConstraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tl_freshness: Option<TimeConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tl_not_expired: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tl_well_signed: Option<LevelConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tl_version: Option<MultiValuesConstraint>,
}
