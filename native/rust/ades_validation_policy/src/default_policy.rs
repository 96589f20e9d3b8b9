// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Built-in default policy, modeled on the common QES/AdES validation baseline.

use crate::constraints::{LevelConstraint, MultiValuesConstraint, TimeConstraint, TimeUnit};
use crate::crypto::{Algo, AlgoExpirationDate, CryptographicConstraint, ExpirationAlgo, ListAlgo};
use crate::groups::{
    BasicSignatureConstraints, CertificateConstraints, EidasConstraints, RevocationConstraints,
    SignatureConstraints, SignedAttributesConstraints, TimestampConstraints,
};
use crate::level::Level;
use crate::policy::{ValidationModel, ValidationPolicy};
use once_cell::sync::Lazy;

pub const DEFAULT_POLICY_NAME: &str = "QES AdESQC TL based";

/// `id-kp-timeStamping`.
pub const TIMESTAMPING_EKU: &str = "1.3.6.1.5.5.7.3.8";

pub(crate) static DEFAULT_POLICY: Lazy<ValidationPolicy> = Lazy::new(build);

const fn fail() -> Option<LevelConstraint> {
    Some(LevelConstraint::new(Level::Fail))
}

const fn warn() -> Option<LevelConstraint> {
    Some(LevelConstraint::new(Level::Warn))
}

const fn inform() -> Option<LevelConstraint> {
    Some(LevelConstraint::new(Level::Inform))
}

fn revocation_required() -> CertificateConstraints {
    CertificateConstraints {
        revocation_data_available: fail(),
        acceptable_revocation_data_found: fail(),
        crl_next_update_present: warn(),
        not_revoked: fail(),
        not_on_hold: fail(),
        ..CertificateConstraints::default()
    }
}

fn signing_certificate() -> CertificateConstraints {
    CertificateConstraints {
        recognition: fail(),
        validity_range: fail(),
        signature: fail(),
        serial_number_present: warn(),
        usage_of_pseudonym: inform(),
        not_self_signed: warn(),
        key_usage: Some(MultiValuesConstraint::new(Level::Warn, ["nonRepudiation"])),
        issuer_name: fail(),
        ..revocation_required()
    }
}

fn ca_certificate() -> CertificateConstraints {
    CertificateConstraints {
        validity_range: fail(),
        signature: fail(),
        ca: fail(),
        max_path_length: fail(),
        key_usage: Some(MultiValuesConstraint::new(Level::Fail, ["keyCertSign"])),
        ..revocation_required()
    }
}

fn basic_signature(signing: CertificateConstraints, ca: CertificateConstraints) -> BasicSignatureConstraints {
    BasicSignatureConstraints {
        reference_data_existence: fail(),
        reference_data_intact: fail(),
        signature_intact: fail(),
        prospective_certificate_chain: fail(),
        trusted_service_type_identifier: None,
        trusted_service_status: None,
        signing_certificate: Some(signing),
        ca_certificate: Some(ca),
        cryptographic: None,
    }
}

fn signature() -> SignatureConstraints {
    SignatureConstraints {
        structural_validation: None,
        acceptable_formats: Some(MultiValuesConstraint::new(Level::Fail, ["*"])),
        basic_signature_constraints: Some(basic_signature(signing_certificate(), ca_certificate())),
        signed_attributes: Some(SignedAttributesConstraints {
            signing_certificate_present: fail(),
            signing_certificate_digest_value_present: fail(),
            signing_certificate_digest_value_match: fail(),
            signing_certificate_issuer_serial_match: warn(),
            signing_certificate_digest_algorithm: warn(),
            signing_time: fail(),
            ..SignedAttributesConstraints::default()
        }),
        best_signature_time_before_expiration_date_of_signing_certificate: fail(),
        timestamp_coherence: warn(),
        timestamp_delay: None,
        revocation_time_against_best_signature_time: fail(),
    }
}

fn timestamp() -> TimestampConstraints {
    let signing = CertificateConstraints {
        recognition: fail(),
        validity_range: fail(),
        signature: fail(),
        extended_key_usage: Some(MultiValuesConstraint::new(Level::Warn, [TIMESTAMPING_EKU])),
        ..revocation_required()
    };
    let ca = CertificateConstraints {
        key_usage: None,
        ..ca_certificate()
    };
    TimestampConstraints {
        timestamp_delay: None,
        coherence: None,
        best_signature_time_before_expiration_date_of_signing_certificate: None,
        message_imprint_data_found: fail(),
        message_imprint_data_intact: fail(),
        basic_signature_constraints: Some(basic_signature(signing, ca)),
        timestamp_valid: warn(),
    }
}

fn revocation() -> RevocationConstraints {
    let signing = CertificateConstraints {
        recognition: fail(),
        validity_range: fail(),
        signature: fail(),
        ..CertificateConstraints::default()
    };
    let ca = CertificateConstraints {
        validity_range: fail(),
        signature: fail(),
        ..CertificateConstraints::default()
    };
    let mut basic = basic_signature(signing, ca);
    basic.reference_data_existence = None;
    basic.reference_data_intact = None;
    RevocationConstraints {
        consistent: fail(),
        unknown_status: fail(),
        self_issued_ocsp: warn(),
        ocsp_cert_hash_present: inform(),
        ocsp_cert_hash_match: fail(),
        revocation_issuer_known: fail(),
        revocation_issuer_trusted: fail(),
        issuer_valid_at_production_time: fail(),
        basic_signature_constraints: Some(basic),
    }
}

fn eidas() -> EidasConstraints {
    EidasConstraints {
        tl_freshness: Some(TimeConstraint::new(Level::Warn, 6, TimeUnit::Hours)),
        tl_not_expired: warn(),
        tl_well_signed: warn(),
        tl_version: Some(MultiValuesConstraint::new(Level::Fail, ["5", "6"])),
    }
}

fn expiring(name: &str, size: Option<u32>, date: Option<&str>) -> ExpirationAlgo {
    ExpirationAlgo {
        name: name.to_string(),
        size,
        date: date.map(str::to_string),
    }
}

fn cryptographic() -> CryptographicConstraint {
    let encryption = ["RSA", "RSASSA-PSS", "DSA", "ECDSA", "PLAIN-ECDSA", "EdDSA"];
    let digests = [
        "MD5", "SHA1", "SHA224", "SHA256", "SHA384", "SHA512", "SHA3-224", "SHA3-256", "SHA3-384", "SHA3-512",
        "RIPEMD160", "WHIRLPOOL",
    ];
    CryptographicConstraint {
        level: Level::Fail,
        acceptable_encryption_algo: Some(ListAlgo {
            level: None,
            algos: encryption.iter().map(|n| Algo::new(*n)).collect(),
        }),
        mini_public_key_size: Some(ListAlgo {
            level: None,
            algos: vec![
                Algo::sized("DSA", 1024),
                Algo::sized("RSA", 786),
                Algo::sized("ECDSA", 160),
                Algo::sized("EdDSA", 256),
            ],
        }),
        acceptable_digest_algo: Some(ListAlgo {
            level: None,
            algos: digests.iter().map(|n| Algo::new(*n)).collect(),
        }),
        algo_expiration_date: Some(AlgoExpirationDate {
            level: None,
            format: Some("yyyy-MM-dd".to_string()),
            algos: vec![
                expiring("MD5", None, Some("2005-12-01")),
                expiring("SHA1", None, Some("2009-12-01")),
                expiring("SHA224", None, Some("2026-01-01")),
                expiring("SHA256", None, None),
                expiring("SHA384", None, None),
                expiring("SHA512", None, None),
                expiring("SHA3-224", None, Some("2026-01-01")),
                expiring("SHA3-256", None, None),
                expiring("SHA3-384", None, None),
                expiring("SHA3-512", None, None),
                expiring("RIPEMD160", None, Some("2011-12-01")),
                expiring("WHIRLPOOL", None, Some("2020-12-01")),
                expiring("DSA", Some(1024), Some("2015-12-01")),
                expiring("DSA", Some(2048), Some("2026-01-01")),
                expiring("DSA", Some(3072), None),
                expiring("RSA", Some(786), Some("2009-01-01")),
                expiring("RSA", Some(1024), Some("2016-01-01")),
                expiring("RSA", Some(1536), Some("2017-01-01")),
                expiring("RSA", Some(1900), Some("2026-01-01")),
                expiring("RSA", Some(3000), None),
                expiring("ECDSA", Some(160), Some("2013-01-01")),
                expiring("ECDSA", Some(224), Some("2026-01-01")),
                expiring("ECDSA", Some(256), None),
                expiring("EdDSA", Some(256), None),
            ],
            update_date: None,
            level_after_update: None,
        }),
    }
}

fn build() -> ValidationPolicy {
    ValidationPolicy {
        name: DEFAULT_POLICY_NAME.to_string(),
        description: Some(
            "Validates electronic signatures and indicates whether they are Advanced electronic Signatures \
             (AdES), AdES supported by a Qualified Certificate (AdES/QC) or a Qualified electronic Signature (QES)."
                .to_string(),
        ),
        model: ValidationModel::Shell,
        signature: Some(signature()),
        counter_signature: None,
        timestamp: Some(timestamp()),
        revocation: Some(revocation()),
        eidas: Some(eidas()),
        cryptographic: Some(cryptographic()),
    }
}
