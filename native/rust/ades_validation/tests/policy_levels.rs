// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use ades_validation::{Reports, SignatureProcessExecutor};
use ades_validation_conclusion::{Indication, MessageTag, Status, SubIndication};
use ades_validation_diagnostic::{DiagnosticData, DigestAlgorithm};
use ades_validation_policy::{
    Context, Level, LevelConstraint, SubContext, ValidationPolicy, ValidationPolicyBuilder,
};
use ades_validation_test_utils::scenarios::{qualified_signature, CA, SIGNATURE, SIGNER};
use ades_validation_test_utils::utc;
use sha2::{Digest, Sha256};

fn sha1_signature(data: &mut DiagnosticData) {
    let signature = data.signature_mut(SIGNATURE).unwrap();
    signature.basic_signature.digest_algorithm = Some(DigestAlgorithm::Sha1);
    for matcher in &mut signature.digest_matchers {
        matcher.digest_algorithm = Some(DigestAlgorithm::Sha1);
    }
}

fn sha1_until(date: &str) -> ValidationPolicy {
    ValidationPolicyBuilder::from_default()
        .algo_expiration_date("SHA1", None, Some(date))
        .build()
}

#[test]
fn executor_can_be_reused_with_different_policies() {
    let mut data = qualified_signature(utc(2013, 6, 1));
    sha1_signature(&mut data);
    let executor = SignatureProcessExecutor::new();

    let lenient = sha1_until("2014-01-01");
    let first = executor.execute(&data, &lenient).unwrap();
    assert_eq!(Some(Indication::TotalPassed), first.simple_report.indication(SIGNATURE));

    let strict = sha1_until("2013-01-01");
    let second = executor.execute(&data, &strict).unwrap();
    assert_eq!(Some(Indication::Indeterminate), second.simple_report.indication(SIGNATURE));
    assert_eq!(
        Some(SubIndication::CryptoConstraintsFailureNoPoe),
        second.simple_report.sub_indication(SIGNATURE)
    );

    let again = executor.execute(&data, &lenient).unwrap();
    assert_eq!(first.detailed_report, again.detailed_report);
    assert_eq!(first.simple_report, again.simple_report);
}

fn sha1_certificate_reference() -> DiagnosticData {
    let mut data = qualified_signature(utc(2021, 1, 1));
    let reference = data
        .signature_mut(SIGNATURE)
        .unwrap()
        .signing_certificate
        .as_mut()
        .unwrap();
    reference.digest_algorithm = Some(DigestAlgorithm::Sha1);
    data
}

#[test]
fn expired_signing_certificate_reference_digest_fails_when_enabled() {
    let data = sha1_certificate_reference();
    let policy = ValidationPolicyBuilder::from_default()
        .signing_certificate_digest_algorithm(Some(Level::Fail))
        .build();

    let reports = SignatureProcessExecutor::new().execute(&data, &policy).unwrap();
    assert_eq!(Some(Indication::Indeterminate), reports.simple_report.indication(SIGNATURE));
    assert_eq!(
        Some(SubIndication::CryptoConstraintsFailureNoPoe),
        reports.simple_report.sub_indication(SIGNATURE)
    );

    let conclusion = reports.detailed_report.basic_conclusion(SIGNATURE).unwrap();
    let error = conclusion
        .errors
        .iter()
        .find(|m| m.tag == MessageTag::ASCCM_ANS_5)
        .expect("expiration error");
    assert!(error.has_arg_text("SHA1"));
    assert!(error.has_arg_tag(MessageTag::ACCM_POS_SIGND_CERT_REF));
}

#[test]
fn expiration_level_downgrades_the_reference_digest_failure() {
    let data = sha1_certificate_reference();
    let policy = ValidationPolicyBuilder::from_default()
        .signing_certificate_digest_algorithm(Some(Level::Fail))
        .algo_expiration_level(Level::Warn)
        .build();

    let reports = SignatureProcessExecutor::new().execute(&data, &policy).unwrap();
    assert_eq!(Some(Indication::TotalPassed), reports.simple_report.indication(SIGNATURE));
    let conclusion = reports.detailed_report.basic_conclusion(SIGNATURE).unwrap();
    assert!(conclusion.errors.is_empty());
    assert!(conclusion.has_warning(MessageTag::ASCCM_ANS_5));
}

#[test]
fn revocation_data_skip_exempts_matching_ca_certificate() {
    let mut data = qualified_signature(utc(2021, 1, 1));
    {
        let ca = data.certificate_mut(CA).unwrap();
        ca.revocations.clear();
        ca.extensions.push(ades_validation_diagnostic::CertificateExtension {
            oid: "1.2.3.4.5".to_string(),
            critical: false,
        });
    }

    let without_skip = SignatureProcessExecutor::new()
        .execute(&data, &ValidationPolicy::default_policy())
        .unwrap();
    let basic = without_skip.detailed_report.basic_conclusion(SIGNATURE).unwrap();
    assert_eq!(Some(SubIndication::TryLater), basic.sub_indication);

    let policy = ValidationPolicyBuilder::from_default()
        .revocation_data_skip(
            Context::Signature,
            SubContext::CaCertificate,
            ["1.2.3.4.5"],
            Vec::<String>::new(),
        )
        .build();
    let reports = SignatureProcessExecutor::new().execute(&data, &policy).unwrap();

    let bbb = reports.detailed_report.basic_building_blocks(SIGNATURE).unwrap();
    let ca = bbb.sub_xcv(CA).unwrap();
    assert!(!ca.has_constraint(MessageTag::BBB_XCV_IRDPFC));
    assert!(ca.conclusion.has_info(MessageTag::BBB_XCV_REVOC_SKIP));
    assert!(bbb.sub_xcv(SIGNER).unwrap().has_constraint(MessageTag::BBB_XCV_IRDPFC));
    assert_eq!(Some(Indication::TotalPassed), reports.simple_report.indication(SIGNATURE));
}

#[test]
fn ignored_constraint_is_reported_but_absent_constraint_is_not() {
    let mut data = qualified_signature(utc(2021, 1, 1));
    data.certificate_mut(SIGNER).unwrap().serial_number = None;

    let ignoring = ValidationPolicyBuilder::from_default()
        .certificate(Context::Signature, SubContext::SigningCertificate, |c| {
            c.serial_number_present = Some(LevelConstraint::new(Level::Ignore));
        })
        .build();
    let reports = SignatureProcessExecutor::new().execute(&data, &ignoring).unwrap();
    let signer = reports
        .detailed_report
        .basic_building_blocks(SIGNATURE)
        .unwrap()
        .sub_xcv(SIGNER)
        .unwrap();
    let constraint = signer.constraint(MessageTag::BBB_XCV_ISNP).unwrap();
    assert_eq!(Status::Ignored, constraint.status);
    assert_eq!(Some(Indication::TotalPassed), reports.simple_report.indication(SIGNATURE));

    let absent = ValidationPolicyBuilder::from_default()
        .certificate(Context::Signature, SubContext::SigningCertificate, |c| {
            c.serial_number_present = None;
        })
        .build();
    let reports = SignatureProcessExecutor::new().execute(&data, &absent).unwrap();
    let signer = reports
        .detailed_report
        .basic_building_blocks(SIGNATURE)
        .unwrap()
        .sub_xcv(SIGNER)
        .unwrap();
    assert!(!signer.has_constraint(MessageTag::BBB_XCV_ISNP));
}

fn fingerprint(reports: &Reports) -> String {
    let json = serde_json::to_vec(&reports.detailed_report).unwrap();
    hex::encode(Sha256::digest(&json))
}

#[test]
fn detailed_report_is_deterministic() {
    let data = qualified_signature(utc(2021, 1, 1));
    let policy = ValidationPolicy::default_policy();

    let first = SignatureProcessExecutor::new().execute(&data, &policy).unwrap();
    let second = SignatureProcessExecutor::new().execute(&data, &policy).unwrap();
    assert_eq!(fingerprint(&first), fingerprint(&second));
}
