// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Test-only utilities for composing validation scenarios.
//!
//! This crate keeps the production `ades_validation_diagnostic` surface free of test
//! conveniences while still supporting concise scenario composition in this repo. Builders start
//! from a token that passes every default check and expose one method per fact a test usually
//! wants to break.

pub mod scenarios;

use ades_validation_diagnostic::{
    BasicConstraints, BasicSignature, Certificate, CertificateExtension, CertificatePolicy, CertificateRevocation,
    CertificateStatus, DigestAlgorithm, DigestMatcher, DigestMatcherType, DistinguishedNameAttributes,
    EncryptionAlgorithm, KeyUsage, QcStatements, QcType, Revocation, RevocationReason, RevocationType, Signature,
    SignedAttributes, SigningCertificateRef, Timestamp, TimestampType, TimestampedObject, TimestampedObjectCategory,
    TrustService, TrustServiceProvider, TrustServiceStatusPeriod, TrustedList,
};
use chrono::{DateTime, Duration, TimeZone, Utc};

/// Midnight UTC of a calendar date.
///
/// # Panics
///
/// Panics when the date does not exist.
pub fn utc(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_else(|| panic!("{year}-{month}-{day} is not a calendar date"))
}

/// `years` of 365 days.
pub fn years(years: i64) -> Duration {
    Duration::days(365 * years)
}

fn default_signature() -> BasicSignature {
    BasicSignature::new(EncryptionAlgorithm::Rsa, DigestAlgorithm::Sha256, 2048)
}

/// Chain of `issuer`: the issuer first, then its own issuers.
fn chain_of(issuer: &Certificate) -> Vec<String> {
    std::iter::once(issuer.id.clone())
        .chain(issuer.certificate_chain.iter().cloned())
        .collect()
}

pub struct CertificateBuilder {
    certificate: Certificate,
}

impl CertificateBuilder {
    /// An RSA 2048 end-entity certificate valid from 2000 to 2100, issued by itself.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let subject_dn = format!("CN={id}");
        Self {
            certificate: Certificate {
                serial_number: Some(format!("{id}-0001")),
                subject: DistinguishedNameAttributes {
                    common_name: Some(id.clone()),
                    ..DistinguishedNameAttributes::default()
                },
                issuer_dn: subject_dn.clone(),
                subject_dn,
                issuer_entity_key_match: true,
                not_before: utc(2000, 1, 1),
                not_after: utc(2100, 1, 1),
                public_key_algorithm: Some(EncryptionAlgorithm::Rsa),
                public_key_size: Some(2048),
                basic_signature: default_signature(),
                self_signed: false,
                trusted: false,
                sunset_date: None,
                key_usages: Vec::new(),
                extended_key_usages: Vec::new(),
                basic_constraints: BasicConstraints::default(),
                certificate_policies: Vec::new(),
                policy_tree_valid: true,
                name_constraints: None,
                subject_alternative_names: Vec::new(),
                qc_statements: None,
                extensions: Vec::new(),
                aia_urls: Vec::new(),
                crl_distribution_points: Vec::new(),
                ocsp_access_urls: Vec::new(),
                id_pkix_ocsp_no_check: false,
                no_rev_avail: false,
                signing_certificate: None,
                certificate_chain: Vec::new(),
                revocations: Vec::new(),
                trust_service_providers: Vec::new(),
                id,
            },
        }
    }

    pub fn validity(mut self, not_before: DateTime<Utc>, not_after: DateTime<Utc>) -> Self {
        self.certificate.not_before = not_before;
        self.certificate.not_after = not_after;
        self
    }

    pub fn common_name(mut self, name: impl Into<String>) -> Self {
        self.certificate.subject.common_name = Some(name.into());
        self
    }

    pub fn pseudonym(mut self, pseudonym: impl Into<String>) -> Self {
        self.certificate.subject.pseudonym = Some(pseudonym.into());
        self
    }

    pub fn without_serial(mut self) -> Self {
        self.certificate.serial_number = None;
        self
    }

    /// Issued by `issuer`: takes its subject as issuer name and its chain.
    pub fn issued_by(mut self, issuer: &Certificate) -> Self {
        self.certificate.issuer_dn = issuer.subject_dn.clone();
        self.certificate.certificate_chain = chain_of(issuer);
        self.certificate.self_signed = false;
        self
    }

    /// A self-signed trust anchor.
    pub fn trusted(mut self) -> Self {
        self.certificate.trusted = true;
        self.certificate.self_signed = true;
        self.certificate.issuer_dn = self.certificate.subject_dn.clone();
        self
    }

    pub fn sunset(mut self, date: DateTime<Utc>) -> Self {
        self.certificate.sunset_date = Some(date);
        self
    }

    pub fn ca(mut self, path_len_constraint: Option<u32>) -> Self {
        self.certificate.basic_constraints = BasicConstraints {
            ca: true,
            path_len_constraint,
        };
        self.key_usage(KeyUsage::KeyCertSign).key_usage(KeyUsage::CrlSign)
    }

    pub fn key_usage(mut self, usage: KeyUsage) -> Self {
        if !self.certificate.key_usages.contains(&usage) {
            self.certificate.key_usages.push(usage);
        }
        self
    }

    pub fn extended_key_usage(mut self, oid: impl Into<String>) -> Self {
        self.certificate.extended_key_usages.push(oid.into());
        self
    }

    pub fn extension(mut self, oid: impl Into<String>, critical: bool) -> Self {
        self.certificate.extensions.push(CertificateExtension {
            oid: oid.into(),
            critical,
        });
        self
    }

    pub fn policy(mut self, oid: impl Into<String>) -> Self {
        self.certificate.certificate_policies.push(CertificatePolicy {
            oid: oid.into(),
            cps_url: None,
        });
        self
    }

    pub fn ocsp_no_check(mut self) -> Self {
        self.certificate.id_pkix_ocsp_no_check = true;
        self
    }

    pub fn no_rev_avail(mut self) -> Self {
        self.certificate.no_rev_avail = true;
        self
    }

    /// Signature the issuer put on this certificate.
    pub fn signature(mut self, encryption: EncryptionAlgorithm, digest: DigestAlgorithm, key_length: u32) -> Self {
        self.certificate.basic_signature = BasicSignature::new(encryption, digest, key_length);
        self
    }

    pub fn broken_signature(mut self) -> Self {
        self.certificate.basic_signature.signature_intact = false;
        self.certificate.basic_signature.signature_valid = false;
        self
    }

    pub fn public_key(mut self, algorithm: EncryptionAlgorithm, size: u32) -> Self {
        self.certificate.public_key_algorithm = Some(algorithm);
        self.certificate.public_key_size = Some(size);
        self
    }

    pub fn crl_distribution_point(mut self, url: impl Into<String>) -> Self {
        self.certificate.crl_distribution_points.push(url.into());
        self
    }

    /// A `good` entry in revocation `revocation_id`.
    pub fn good_in(self, revocation_id: impl Into<String>) -> Self {
        self.revocation_entry(revocation_id, CertificateStatus::Good, None, None)
    }

    pub fn revoked_in(
        self,
        revocation_id: impl Into<String>,
        reason: RevocationReason,
        revocation_date: DateTime<Utc>,
    ) -> Self {
        self.revocation_entry(revocation_id, CertificateStatus::Revoked, Some(reason), Some(revocation_date))
    }

    pub fn revocation_entry(
        mut self,
        revocation_id: impl Into<String>,
        status: CertificateStatus,
        reason: Option<RevocationReason>,
        revocation_date: Option<DateTime<Utc>>,
    ) -> Self {
        self.certificate.revocations.push(CertificateRevocation {
            revocation_id: revocation_id.into(),
            status,
            reason,
            revocation_date,
        });
        self
    }

    /// QC statements claiming compliance, the given types and SSCD as stated.
    pub fn qualified(mut self, qc_types: &[QcType], sscd: bool) -> Self {
        self.certificate.qc_statements = Some(QcStatements {
            compliance: true,
            qc_types: qc_types.to_vec(),
            sscd,
            ..QcStatements::default()
        });
        self
    }

    pub fn trust_service_provider(mut self, provider: TrustServiceProvider) -> Self {
        self.certificate.trust_service_providers.push(provider);
        self
    }

    pub fn build(self) -> Certificate {
        self.certificate
    }
}

pub struct RevocationBuilder {
    revocation: Revocation,
}

impl RevocationBuilder {
    fn new(id: impl Into<String>, revocation_type: RevocationType) -> Self {
        let ocsp = revocation_type == RevocationType::Ocsp;
        Self {
            revocation: Revocation {
                id: id.into(),
                revocation_type,
                origin: None,
                production_date: utc(2020, 1, 1),
                this_update: utc(2020, 1, 1),
                next_update: None,
                expired_certs_on_crl: None,
                archive_cut_off: None,
                basic_signature: default_signature(),
                signing_certificate: None,
                certificate_chain: Vec::new(),
                cert_hash_present: ocsp,
                cert_hash_match: ocsp,
            },
        }
    }

    pub fn crl(id: impl Into<String>) -> Self {
        Self::new(id, RevocationType::Crl)
    }

    pub fn ocsp(id: impl Into<String>) -> Self {
        Self::new(id, RevocationType::Ocsp)
    }

    /// Sets thisUpdate and the production date together.
    pub fn this_update(mut self, time: DateTime<Utc>) -> Self {
        self.revocation.this_update = time;
        self.revocation.production_date = time;
        self
    }

    pub fn production_date(mut self, time: DateTime<Utc>) -> Self {
        self.revocation.production_date = time;
        self
    }

    pub fn next_update(mut self, time: DateTime<Utc>) -> Self {
        self.revocation.next_update = Some(time);
        self
    }

    pub fn expired_certs_on_crl(mut self, time: DateTime<Utc>) -> Self {
        self.revocation.expired_certs_on_crl = Some(time);
        self
    }

    pub fn signed_by(mut self, issuer: &Certificate) -> Self {
        self.revocation.signing_certificate = Some(SigningCertificateRef::matching(&issuer.id, DigestAlgorithm::Sha256));
        self.revocation.certificate_chain = chain_of(issuer);
        self
    }

    pub fn signature(mut self, encryption: EncryptionAlgorithm, digest: DigestAlgorithm, key_length: u32) -> Self {
        self.revocation.basic_signature = BasicSignature::new(encryption, digest, key_length);
        self
    }

    pub fn build(self) -> Revocation {
        self.revocation
    }
}

pub struct SignatureBuilder {
    signature: Signature,
}

impl SignatureBuilder {
    /// An intact RSA 2048 / SHA-256 signature with a signing-time attribute.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            signature: Signature {
                id: id.into(),
                parent_id: None,
                structural_validation: Some(true),
                signature_format: Some("PAdES-BASELINE-B".to_string()),
                claimed_signing_time: None,
                signed_attributes: SignedAttributes {
                    signing_time: true,
                    ..SignedAttributes::default()
                },
                basic_signature: default_signature(),
                signing_certificate: None,
                certificate_chain: Vec::new(),
                digest_matchers: vec![DigestMatcher::intact(DigestMatcherType::MessageDigest, DigestAlgorithm::Sha256)],
                timestamp_ids: Vec::new(),
            },
        }
    }

    /// Signed by `certificate`, referenced through a matching SHA-256 signing-certificate attribute.
    pub fn signed_by(mut self, certificate: &Certificate) -> Self {
        self.signature.signing_certificate =
            Some(SigningCertificateRef::matching(&certificate.id, DigestAlgorithm::Sha256));
        self.signature.certificate_chain = chain_of(certificate);
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.signature.signature_format = Some(format.into());
        self
    }

    pub fn claimed_signing_time(mut self, time: DateTime<Utc>) -> Self {
        self.signature.claimed_signing_time = Some(time);
        self
    }

    pub fn counter_signature_of(mut self, parent_id: impl Into<String>) -> Self {
        self.signature.parent_id = Some(parent_id.into());
        self
    }

    /// Algorithms of the signature value and of its message digest.
    pub fn signature(mut self, encryption: EncryptionAlgorithm, digest: DigestAlgorithm, key_length: u32) -> Self {
        self.signature.basic_signature = BasicSignature::new(encryption, digest, key_length);
        for matcher in &mut self.signature.digest_matchers {
            matcher.digest_algorithm = Some(digest);
        }
        self
    }

    pub fn timestamp(mut self, timestamp_id: impl Into<String>) -> Self {
        self.signature.timestamp_ids.push(timestamp_id.into());
        self
    }

    pub fn build(self) -> Signature {
        self.signature
    }
}

pub struct TimestampBuilder {
    timestamp: Timestamp,
}

impl TimestampBuilder {
    pub fn new(id: impl Into<String>, timestamp_type: TimestampType, production_time: DateTime<Utc>) -> Self {
        Self {
            timestamp: Timestamp {
                id: id.into(),
                timestamp_type,
                production_time,
                basic_signature: default_signature(),
                signing_certificate: None,
                certificate_chain: Vec::new(),
                message_imprint: DigestMatcher::intact(DigestMatcherType::MessageImprint, DigestAlgorithm::Sha256),
                timestamped_objects: Vec::new(),
            },
        }
    }

    pub fn signed_by(mut self, tsa: &Certificate) -> Self {
        self.timestamp.signing_certificate = Some(SigningCertificateRef::matching(&tsa.id, DigestAlgorithm::Sha256));
        self.timestamp.certificate_chain = chain_of(tsa);
        self
    }

    pub fn covers(mut self, category: TimestampedObjectCategory, id: impl Into<String>) -> Self {
        self.timestamp.timestamped_objects.push(TimestampedObject {
            category,
            id: id.into(),
        });
        self
    }

    pub fn broken_imprint(mut self) -> Self {
        self.timestamp.message_imprint.data_intact = false;
        self
    }

    pub fn build(self) -> Timestamp {
        self.timestamp
    }
}

/// One trust service of one provider, published on trusted list `tl_id`.
pub struct TrustServiceBuilder {
    provider: TrustServiceProvider,
}

impl TrustServiceBuilder {
    pub fn new(tl_id: impl Into<String>, service_type: impl Into<String>) -> Self {
        Self {
            provider: TrustServiceProvider {
                names: vec!["Test Provider".to_string()],
                registration_identifiers: Vec::new(),
                country_code: None,
                tl_id: tl_id.into(),
                lotl_id: None,
                services: vec![TrustService {
                    names: vec!["Test Service".to_string()],
                    service_type: service_type.into(),
                    service_digital_identifier: None,
                    status_history: Vec::new(),
                }],
            },
        }
    }

    pub fn lotl(mut self, lotl_id: impl Into<String>) -> Self {
        self.provider.lotl_id = Some(lotl_id.into());
        self
    }

    pub fn digital_identifier(mut self, certificate_id: impl Into<String>) -> Self {
        if let Some(service) = self.provider.services.first_mut() {
            service.service_digital_identifier = Some(certificate_id.into());
        }
        self
    }

    /// Appends a status period; later qualifiers and infos attach to it.
    pub fn status(mut self, status: impl Into<String>, start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> Self {
        if let Some(service) = self.provider.services.first_mut() {
            service.status_history.push(TrustServiceStatusPeriod {
                status: status.into(),
                start_date: start,
                end_date: end,
                captured_qualifiers: Vec::new(),
                additional_service_infos: Vec::new(),
            });
        }
        self
    }

    fn last_period(&mut self) -> Option<&mut TrustServiceStatusPeriod> {
        self.provider
            .services
            .first_mut()
            .and_then(|s| s.status_history.last_mut())
    }

    pub fn qualifier(mut self, uri: impl Into<String>) -> Self {
        if let Some(period) = self.last_period() {
            period.captured_qualifiers.push(uri.into());
        }
        self
    }

    pub fn additional_info(mut self, uri: impl Into<String>) -> Self {
        if let Some(period) = self.last_period() {
            period.additional_service_infos.push(uri.into());
        }
        self
    }

    pub fn build(self) -> TrustServiceProvider {
        self.provider
    }
}

/// A well-signed version 5 trusted list.
pub fn trusted_list(id: impl Into<String>, issue_date: DateTime<Utc>, next_update: DateTime<Utc>) -> TrustedList {
    TrustedList {
        id: id.into(),
        url: None,
        country_code: None,
        lotl: false,
        issue_date,
        next_update: Some(next_update),
        version: Some(5),
        well_signed: true,
        mra: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_certificate_takes_issuer_name_and_chain() {
        let root = CertificateBuilder::new("ROOT").trusted().ca(None).build();
        let ca = CertificateBuilder::new("CA").issued_by(&root).ca(Some(0)).build();
        let leaf = CertificateBuilder::new("LEAF").issued_by(&ca).build();

        assert_eq!(leaf.issuer_dn, ca.subject_dn);
        assert_eq!(leaf.certificate_chain, vec!["CA".to_string(), "ROOT".to_string()]);
        assert_eq!(leaf.issuer_id(), Some("CA"));
        assert!(root.self_signed);
    }

    #[test]
    fn this_update_moves_production_date() {
        let crl = RevocationBuilder::crl("R-1").this_update(utc(2021, 3, 1)).build();
        assert_eq!(crl.production_date, utc(2021, 3, 1));
        assert!(!crl.cert_hash_present);
        assert!(RevocationBuilder::ocsp("R-2").build().cert_hash_present);
    }

    #[test]
    fn signature_algorithm_applies_to_digest_matchers() {
        let signature = SignatureBuilder::new("S-1")
            .signature(EncryptionAlgorithm::Ecdsa, DigestAlgorithm::Sha1, 256)
            .build();
        assert!(signature
            .digest_matchers
            .iter()
            .all(|m| m.digest_algorithm == Some(DigestAlgorithm::Sha1)));
    }
}
