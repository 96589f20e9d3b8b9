// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use ades_validation_diagnostic::{DigestAlgorithm, EncryptionAlgorithm};
use ades_validation_policy::{
    Context, CryptographicConstraint, Expiration, Level, LevelConstraint, PolicyError, SubContext, TimeConstraint,
    TimeUnit, ValidationPolicy, ValidationPolicyBuilder, DEFAULT_POLICY_NAME,
};
use chrono::{TimeZone, Utc};

#[test]
fn default_policy_is_a_fresh_copy_each_time() {
    let mut first = ValidationPolicy::default_policy();
    first.name = "changed".into();
    let second = ValidationPolicy::default_policy();
    assert_eq!(second.name, DEFAULT_POLICY_NAME);
}

#[test]
fn default_policy_validates_and_round_trips_through_json() {
    let policy = ValidationPolicy::default_policy();
    policy.validate().unwrap();
    let json = policy.to_json_string().unwrap();
    assert!(json.contains("\"signingCertificateDigestAlgorithm\""));
    assert!(json.contains("\"algoExpirationDate\""));
    let reloaded = ValidationPolicy::from_json_str(&json).unwrap();
    assert_eq!(reloaded, policy);
}

#[test]
fn absent_leaves_stay_absent_after_loading() {
    let policy = ValidationPolicy::from_json_str(
        r#"{
            "name": "minimal",
            "signature": { "basicSignatureConstraints": { "signatureIntact": { "level": "WARN" } } }
        }"#,
    )
    .unwrap();
    let basic = policy.basic_signature_constraints(Context::Signature).unwrap();
    assert_eq!(basic.signature_intact, Some(LevelConstraint::new(Level::Warn)));
    assert!(basic.reference_data_intact.is_none());
    assert!(policy.certificate_constraints(Context::Signature, SubContext::SigningCertificate).is_none());
    assert!(policy.cryptographic_suite(Context::Signature).unwrap().is_none());
}

#[test]
fn malformed_skip_oid_is_rejected() {
    let err = ValidationPolicy::from_json_str(
        r#"{
            "name": "bad",
            "signature": { "basicSignatureConstraints": { "caCertificate": {
                "revocationDataSkip": { "certificateExtensions": ["not-an-oid"] }
            } } }
        }"#,
    )
    .unwrap_err();
    assert!(matches!(err, PolicyError::InvalidOid(oid) if oid == "not-an-oid"));
}

#[test]
fn unparseable_expiration_date_is_rejected() {
    let policy = ValidationPolicyBuilder::from_default()
        .algo_expiration_date("SHA1", None, Some("sometime"))
        .build();
    assert!(matches!(policy.validate(), Err(PolicyError::InvalidDate { .. })));
}

#[test]
fn counter_signature_falls_back_to_signature_constraints() {
    let policy = ValidationPolicy::default_policy();
    assert_eq!(
        policy.signature_constraints(Context::CounterSignature),
        policy.signature_constraints(Context::Signature)
    );

    let custom = ValidationPolicyBuilder::from_default()
        .counter_signature(|c| c.structural_validation = Some(LevelConstraint::new(Level::Inform)))
        .build();
    assert_ne!(
        custom.signature_constraints(Context::CounterSignature),
        custom.signature_constraints(Context::Signature)
    );
}

#[test]
fn suite_resolution_prefers_context_then_certificate_then_global() {
    let local = CryptographicConstraint {
        level: Level::Inform,
        acceptable_encryption_algo: None,
        mini_public_key_size: None,
        acceptable_digest_algo: None,
        algo_expiration_date: None,
    };
    let policy = ValidationPolicyBuilder::from_default()
        .certificate(Context::Timestamp, SubContext::CaCertificate, |c| c.cryptographic = Some(local.clone()))
        .build();

    let now = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    let ca_suite = policy
        .certificate_cryptographic_suite(Context::Timestamp, SubContext::CaCertificate)
        .unwrap()
        .unwrap();
    assert_eq!(ca_suite.level_at(now), Level::Inform);

    let signing_suite = policy
        .certificate_cryptographic_suite(Context::Timestamp, SubContext::SigningCertificate)
        .unwrap()
        .unwrap();
    assert_eq!(signing_suite.level_at(now), Level::Fail);
}

#[test]
fn default_suite_matches_the_weak_key_floor() {
    let policy = ValidationPolicy::default_policy();
    let suite = policy.cryptographic_suite(Context::Revocation).unwrap().unwrap();
    let expected = Utc.with_ymd_and_hms(2009, 1, 1, 0, 0, 0).unwrap();
    assert_eq!(suite.encryption_expiration(EncryptionAlgorithm::Rsa, 1023), Expiration::At(expected));
    assert_eq!(suite.min_key_size(EncryptionAlgorithm::Rsa), Some(786));
    assert_eq!(suite.digest_expiration(DigestAlgorithm::Sha256), Expiration::Never);
    assert!(!suite.is_digest_acceptable(DigestAlgorithm::Md2));
}

#[test]
fn builder_mutations_are_visible_in_the_suite() {
    let policy = ValidationPolicyBuilder::from_default()
        .algo_expiration_date("SHA1", None, Some("2014-01-01"))
        .algo_expiration_level(Level::Warn)
        .build();
    let suite = policy.cryptographic_suite(Context::Signature).unwrap().unwrap();
    let now = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    assert_eq!(
        suite.digest_expiration(DigestAlgorithm::Sha1),
        Expiration::At(Utc.with_ymd_and_hms(2014, 1, 1, 0, 0, 0).unwrap())
    );
    assert_eq!(suite.expiration_level(now), Level::Warn);
    assert_eq!(suite.digest_level(now), Level::Fail);
}

#[test]
fn builder_sets_leaf_constraints() {
    let policy = ValidationPolicyBuilder::new("t")
        .signing_certificate_digest_algorithm(Some(Level::Fail))
        .timestamp_delay(Some(TimeConstraint::new(Level::Fail, 1, TimeUnit::Days)))
        .revocation_data_skip(
            Context::Signature,
            SubContext::CaCertificate,
            ["1.3.6.1.5.5.7.48.1.5"],
            Vec::<String>::new(),
        )
        .build();
    policy.validate().unwrap();
    let attrs = policy.signed_attributes(Context::Signature).unwrap();
    assert_eq!(attrs.signing_certificate_digest_algorithm, Some(LevelConstraint::new(Level::Fail)));
    let skip = policy
        .certificate_constraints(Context::Signature, SubContext::CaCertificate)
        .and_then(|c| c.revocation_data_skip.as_ref())
        .unwrap();
    assert_eq!(skip.certificate_extensions, vec!["1.3.6.1.5.5.7.48.1.5".to_string()]);
}
