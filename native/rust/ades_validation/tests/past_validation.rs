// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use ades_validation::{BlockKind, Reports, SignatureProcessExecutor};
use ades_validation_conclusion::{Indication, MessageTag, Status, SubIndication};
use ades_validation_diagnostic::{DiagnosticData, DigestAlgorithm, TimestampType};
use ades_validation_policy::{ValidationPolicy, ValidationPolicyBuilder};
use ades_validation_test_utils::scenarios::{
    qualified_signature, rsa1023, with_archive_timestamp, with_timestamp, ARCHIVE_TIMESTAMP, CRL_SIGNER, SIGNATURE,
    SIGNER,
};
use ades_validation_test_utils::utc;

fn use_sha1(data: &mut DiagnosticData) {
    let signature = data.signature_mut(SIGNATURE).unwrap();
    signature.basic_signature.digest_algorithm = Some(DigestAlgorithm::Sha1);
    for matcher in &mut signature.digest_matchers {
        matcher.digest_algorithm = Some(DigestAlgorithm::Sha1);
    }
}

/// SHA-1 signature on 2020-06-01 under a policy retiring SHA-1 on 2018-01-01.
fn sha1_signature(archive_timestamp: bool) -> (DiagnosticData, ValidationPolicy) {
    let mut data = qualified_signature(utc(2020, 6, 1));
    {
        let signer = data.certificate_mut(SIGNER).unwrap();
        signer.not_before = utc(2016, 1, 1);
    }
    data.signature_mut(SIGNATURE).unwrap().claimed_signing_time = Some(utc(2017, 5, 31));
    use_sha1(&mut data);
    if archive_timestamp {
        data = with_archive_timestamp(data, utc(2017, 6, 1));
    }
    let policy = ValidationPolicyBuilder::from_default()
        .algo_expiration_date("SHA1", None, Some("2018-01-01"))
        .build();
    (data, policy)
}

fn run(data: &DiagnosticData, policy: &ValidationPolicy) -> Reports {
    SignatureProcessExecutor::new().execute(data, policy).unwrap()
}

#[test]
fn expired_digest_without_proof_of_existence_stays_indeterminate() {
    let (data, policy) = sha1_signature(false);
    let reports = run(&data, &policy);

    let detailed = &reports.detailed_report;
    assert!(detailed
        .basic_conclusion(SIGNATURE)
        .unwrap()
        .has_sub_indication(SubIndication::CryptoConstraintsFailureNoPoe));
    assert_eq!(Some(Indication::Indeterminate), detailed.indication(SIGNATURE));
    assert_eq!(Some(SubIndication::CryptoConstraintsFailureNoPoe), detailed.sub_indication(SIGNATURE));

    let bbb = detailed.basic_building_blocks(SIGNATURE).unwrap();
    assert!(bbb.psv.is_some());
    assert!(!bbb.psv.as_ref().unwrap().is_passed());
}

#[test]
fn archive_timestamp_heals_expired_digest() {
    let (data, policy) = sha1_signature(true);
    let reports = run(&data, &policy);
    let detailed = &reports.detailed_report;

    assert!(detailed
        .basic_conclusion(SIGNATURE)
        .unwrap()
        .has_sub_indication(SubIndication::CryptoConstraintsFailureNoPoe));
    assert!(detailed.basic_conclusion(ARCHIVE_TIMESTAMP).unwrap().is_passed());
    assert!(detailed.timestamp_conclusion(ARCHIVE_TIMESTAMP).unwrap().is_passed());

    assert_eq!(Some(Indication::TotalPassed), detailed.indication(SIGNATURE));
    assert_eq!(Some(utc(2017, 6, 1)), detailed.best_signature_time(SIGNATURE));

    let bbb = detailed.basic_building_blocks(SIGNATURE).unwrap();
    let psv = bbb.block(BlockKind::Psv).unwrap();
    assert!(psv.is_passed());
    assert!(bbb.block(BlockKind::Pcv).is_some());
    assert!(bbb.block(BlockKind::Vts).is_some());

    let archival = detailed.archival_data(SIGNATURE).unwrap();
    assert!(archival.has_constraint(MessageTag::PSV_IPSVC));
    assert_eq!(Some(utc(2017, 6, 1)), archival.best_signature_time());

    let simple = reports.simple_report.signature(SIGNATURE).unwrap();
    assert_eq!(1, simple.timestamps.len());
    assert_eq!(Indication::Passed, simple.timestamps[0].indication);
    assert!(reports.simple_report.timestamps.is_empty());
}

#[test]
fn archive_timestamp_after_expiration_does_not_heal() {
    let (mut data, policy) = sha1_signature(false);
    data = with_archive_timestamp(data, utc(2019, 6, 1));

    let reports = run(&data, &policy);
    assert_eq!(Some(Indication::Indeterminate), reports.simple_report.indication(SIGNATURE));
    // The proof exists, it is just too late.
    assert_eq!(
        Some(SubIndication::CryptoConstraintsFailure),
        reports.simple_report.sub_indication(SIGNATURE)
    );
}

#[test]
fn archive_timestamp_over_altered_data_gives_no_proof() {
    let (data, policy) = sha1_signature(false);
    let mut data = with_timestamp(data, "T-ARC-ALTERED", TimestampType::ArchiveTimestamp, utc(2017, 6, 1));
    data.timestamp_mut("T-ARC-ALTERED").unwrap().message_imprint.data_intact = false;
    let data = with_archive_timestamp(data, utc(2017, 9, 1));

    let reports = run(&data, &policy);
    let detailed = &reports.detailed_report;
    assert!(!detailed.basic_conclusion("T-ARC-ALTERED").unwrap().is_passed());
    assert!(detailed.basic_conclusion(ARCHIVE_TIMESTAMP).unwrap().is_passed());

    let archival = detailed.archival_data(SIGNATURE).unwrap();
    let altered = archival
        .constraints_named(MessageTag::ARCH_ITVPC)
        .find(|c| c.block_id.as_deref() == Some("T-ARC-ALTERED"))
        .unwrap();
    assert_eq!(Status::Warning, altered.status);
    let valid = archival
        .constraints_named(MessageTag::ARCH_ITVPC)
        .find(|c| c.block_id.as_deref() == Some(ARCHIVE_TIMESTAMP))
        .unwrap();
    assert_eq!(Status::Ok, valid.status);

    // Only the later, intact timestamp proves the signature existed.
    assert_eq!(Some(Indication::TotalPassed), detailed.indication(SIGNATURE));
    assert_eq!(Some(utc(2017, 9, 1)), detailed.best_signature_time(SIGNATURE));
}

#[test]
fn rsa_1023_chain_fails_crypto_constraints_without_poe() {
    let data = rsa1023();
    let reports = run(&data, &ValidationPolicy::default_policy());
    let detailed = &reports.detailed_report;

    assert_eq!(Some(Indication::Indeterminate), detailed.indication(SIGNATURE));
    assert_eq!(Some(SubIndication::CryptoConstraintsFailureNoPoe), detailed.sub_indication(SIGNATURE));

    let crl = detailed.basic_building_blocks(CRL_SIGNER).unwrap();
    let crypto = crl.sav.as_ref().unwrap().cryptographic_validation().unwrap();
    assert!(!crypto.secure);
    assert_eq!(Some(utc(2009, 1, 1)), crypto.not_after);
    assert!(crypto.not_after.unwrap() < data.validation_date);

    let signature_crypto = detailed
        .basic_building_blocks(SIGNATURE)
        .unwrap()
        .sav
        .as_ref()
        .unwrap()
        .cryptographic_validation()
        .unwrap();
    assert!(!signature_crypto.secure);
    assert_eq!(Some(1023), signature_crypto.algorithm.key_length);
}

#[test]
fn revoked_signer_is_judged_at_the_basic_level_first() {
    let vd = utc(2021, 1, 1);
    let mut data = qualified_signature(vd);
    {
        let signer = data.certificate_mut(SIGNER).unwrap();
        let entry = signer.revocations.iter_mut().find(|r| r.revocation_id == CRL_SIGNER).unwrap();
        entry.status = ades_validation_diagnostic::CertificateStatus::Revoked;
        entry.reason = Some(ades_validation_diagnostic::RevocationReason::KeyCompromise);
        entry.revocation_date = Some(vd - chrono::Duration::days(10));
        signer.basic_signature.digest_algorithm = Some(DigestAlgorithm::Sha1);
    }

    let reports = SignatureProcessExecutor::new()
        .with_options(|o| o.validation_level = ades_validation::ValidationLevel::BasicSignatures)
        .execute(&data, &ValidationPolicy::default_policy())
        .unwrap();

    let conclusion = reports.detailed_report.final_conclusion(SIGNATURE).unwrap();
    assert_eq!(Some(Indication::Indeterminate), conclusion.indication);
    assert_eq!(Some(SubIndication::RevokedNoPoe), conclusion.sub_indication);
    // The expired certificate signature is still reported after the revocation.
    assert!(conclusion.has_error(MessageTag::ASCCM_ANS_5));
    assert!(conclusion.has_error(MessageTag::BBB_XCV_ISCR_ANS));
}
