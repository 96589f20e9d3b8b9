// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use ades_validation::{Block, BlockKind, Reports, SignatureProcessExecutor};
use ades_validation_conclusion::{Indication, MessageTag, Status, SubIndication};
use ades_validation_diagnostic::{
    CertificateStatus, DiagnosticData, RevocationReason, TimestampType, TimestampedObjectCategory,
};
use ades_validation_policy::{Level, LevelConstraint, TimeConstraint, TimeUnit, ValidationPolicy, ValidationPolicyBuilder};
use ades_validation_test_utils::scenarios::{
    qualified_signature, with_timestamp, CA, CRL_CA, CRL_SIGNER, ROOT, SIGNATURE, SIGNER, TIMESTAMPING_EKU,
};
use ades_validation_test_utils::{utc, years, CertificateBuilder, TimestampBuilder};
use chrono::{DateTime, Duration, Utc};

const SIGNATURE_TIMESTAMP: &str = "T-SIG";
const CONTENT_TIMESTAMP: &str = "T-CONTENT";

fn run(data: &DiagnosticData, policy: &ValidationPolicy) -> Reports {
    SignatureProcessExecutor::new().execute(data, policy).unwrap()
}

fn validation_date() -> DateTime<Utc> {
    utc(2021, 1, 1)
}

fn days_before(days: i64) -> DateTime<Utc> {
    validation_date() - Duration::days(days)
}

fn long_term(reports: &Reports) -> &Block {
    reports.detailed_report.long_term_data(SIGNATURE).unwrap()
}

fn status_of(block: &Block, tag: MessageTag) -> Status {
    block.constraint(tag).unwrap_or_else(|| panic!("{tag:?} not evaluated")).status
}

/// Signature claiming `claimed` days before validation, with a signature timestamp `stamped` days
/// before validation.
fn timestamped_signature(claimed: i64, stamped: i64) -> DiagnosticData {
    let mut data = qualified_signature(validation_date());
    data.signature_mut(SIGNATURE).unwrap().claimed_signing_time = Some(days_before(claimed));
    with_timestamp(data, SIGNATURE_TIMESTAMP, TimestampType::SignatureTimestamp, days_before(stamped))
}

/// Marks `certificate_id` revoked for key compromise `days` before validation in `revocation_id`.
fn revoke(data: &mut DiagnosticData, certificate_id: &str, revocation_id: &str, days: i64) {
    let certificate = data.certificate_mut(certificate_id).unwrap();
    let entry = certificate
        .revocations
        .iter_mut()
        .find(|r| r.revocation_id == revocation_id)
        .unwrap();
    entry.status = CertificateStatus::Revoked;
    entry.reason = Some(RevocationReason::KeyCompromise);
    entry.revocation_date = Some(days_before(days));
}

#[test]
fn best_signature_time_without_timestamp_is_the_claimed_signing_time() {
    let data = qualified_signature(validation_date());
    let reports = run(&data, &ValidationPolicy::default_policy());

    let claimed = Some(days_before(1));
    assert_eq!(claimed, reports.simple_report.signature(SIGNATURE).unwrap().best_signature_time);
    assert_eq!(claimed, reports.detailed_report.best_signature_time(SIGNATURE));
    assert_eq!(claimed, long_term(&reports).best_signature_time());
    // The checks themselves still ran at the validation time.
    assert_eq!(Some(validation_date()), long_term(&reports).control_time());
}

#[test]
fn signature_timestamp_sets_the_best_signature_time() {
    let data = timestamped_signature(10, 5);
    let reports = run(&data, &ValidationPolicy::default_policy());

    assert_eq!(Some(Indication::TotalPassed), reports.simple_report.indication(SIGNATURE));
    assert_eq!(Some(days_before(5)), reports.detailed_report.best_signature_time(SIGNATURE));
    assert_eq!(Some(days_before(5)), long_term(&reports).control_time());
    assert!(long_term(&reports).conclusion.has_info(MessageTag::ADEST_ITVPC_INFO_1));
}

#[test]
fn late_signature_timestamp_breaks_the_configured_delay() {
    let data = timestamped_signature(10, 5);
    let policy = ValidationPolicyBuilder::from_default()
        .timestamp_delay(Some(TimeConstraint::new(Level::Fail, 1, TimeUnit::Days)))
        .build();
    let reports = run(&data, &policy);

    assert_eq!(Some(Indication::Indeterminate), reports.simple_report.indication(SIGNATURE));
    assert_eq!(Some(SubIndication::SigConstraintsFailure), reports.simple_report.sub_indication(SIGNATURE));
    let ltv = long_term(&reports);
    assert_eq!(Status::Ok, status_of(ltv, MessageTag::ADEST_ISCSTP));
    assert_eq!(Status::NotOk, status_of(ltv, MessageTag::ADEST_ISTPTDABST));
    assert!(ltv.conclusion.has_error(MessageTag::ADEST_ISTPTDABST_ANS));
}

#[test]
fn signature_timestamp_within_the_delay_passes() {
    let data = timestamped_signature(10, 5);
    let policy = ValidationPolicyBuilder::from_default()
        .timestamp_delay(Some(TimeConstraint::new(Level::Fail, 7, TimeUnit::Days)))
        .build();
    let reports = run(&data, &policy);

    assert_eq!(Some(Indication::TotalPassed), reports.simple_report.indication(SIGNATURE));
    assert_eq!(Status::Ok, status_of(long_term(&reports), MessageTag::ADEST_ISTPTDABST));
}

#[test]
fn content_timestamp_after_signature_timestamp_is_incoherent() {
    let data = with_timestamp(
        timestamped_signature(12, 10),
        CONTENT_TIMESTAMP,
        TimestampType::ContentTimestamp,
        days_before(5),
    );

    let reports = run(&data, &ValidationPolicy::default_policy());
    assert_eq!(Some(Indication::TotalPassed), reports.simple_report.indication(SIGNATURE));
    let ltv = long_term(&reports);
    assert_eq!(Status::Warning, status_of(ltv, MessageTag::TSV_ASTPTCT));
    assert!(ltv.conclusion.has_warning(MessageTag::TSV_ASTPTCT_ANS));

    let strict = ValidationPolicyBuilder::from_default()
        .signature(|c| c.timestamp_coherence = Some(LevelConstraint::new(Level::Fail)))
        .build();
    let reports = run(&data, &strict);
    assert_eq!(Some(Indication::Indeterminate), reports.simple_report.indication(SIGNATURE));
    assert_eq!(Some(SubIndication::TimestampOrderFailure), reports.simple_report.sub_indication(SIGNATURE));
    assert_eq!(Status::NotOk, status_of(long_term(&reports), MessageTag::TSV_ASTPTCT));
}

#[test]
fn content_timestamp_before_signature_timestamp_is_coherent() {
    let data = with_timestamp(
        timestamped_signature(12, 5),
        CONTENT_TIMESTAMP,
        TimestampType::ContentTimestamp,
        days_before(10),
    );
    let reports = run(&data, &ValidationPolicy::default_policy());
    assert_eq!(Status::Ok, status_of(long_term(&reports), MessageTag::TSV_ASTPTCT));
}

#[test]
fn signature_timestamp_before_revocation_heals_revoked_signer() {
    let mut data = timestamped_signature(25, 20);
    revoke(&mut data, SIGNER, CRL_SIGNER, 10);

    let reports = run(&data, &ValidationPolicy::default_policy());
    let detailed = &reports.detailed_report;
    assert!(detailed
        .basic_conclusion(SIGNATURE)
        .unwrap()
        .has_sub_indication(SubIndication::RevokedNoPoe));

    let ltv = long_term(&reports);
    assert!(ltv.is_passed());
    assert_eq!(Status::Ok, status_of(ltv, MessageTag::ADEST_IRTPTBST));
    assert_eq!(Some(Indication::TotalPassed), detailed.indication(SIGNATURE));
    assert_eq!(Some(days_before(20)), detailed.best_signature_time(SIGNATURE));
}

#[test]
fn signature_timestamp_after_revocation_does_not_heal() {
    let mut data = timestamped_signature(25, 5);
    revoke(&mut data, SIGNER, CRL_SIGNER, 10);

    let reports = run(&data, &ValidationPolicy::default_policy());
    let ltv = long_term(&reports);
    assert_eq!(Status::NotOk, status_of(ltv, MessageTag::ADEST_IRTPTBST));
    assert!(ltv.conclusion.has_sub_indication(SubIndication::RevokedNoPoe));

    assert_eq!(Some(Indication::Indeterminate), reports.detailed_report.indication(SIGNATURE));
    assert_eq!(Some(SubIndication::RevokedNoPoe), reports.detailed_report.sub_indication(SIGNATURE));
}

/// `CA` revoked ten days before validation; `CRL-SIGNER` was issued by it five days earlier.
fn revoked_ca() -> DiagnosticData {
    let mut data = qualified_signature(validation_date());
    data.signature_mut(SIGNATURE).unwrap().claimed_signing_time = Some(days_before(20));
    revoke(&mut data, CA, CRL_CA, 10);
    let crl_ca = data.revocation_mut(CRL_CA).unwrap();
    crl_ca.this_update = days_before(5);
    crl_ca.production_date = days_before(5);
    let crl_signer = data.revocation_mut(CRL_SIGNER).unwrap();
    crl_signer.this_update = days_before(15);
    crl_signer.production_date = days_before(15);
    data
}

#[test]
fn revoked_ca_without_proof_of_existence_stays_indeterminate() {
    let data = revoked_ca();
    let reports = run(&data, &ValidationPolicy::default_policy());
    let detailed = &reports.detailed_report;

    assert!(detailed
        .basic_conclusion(SIGNATURE)
        .unwrap()
        .has_sub_indication(SubIndication::RevokedCaNoPoe));
    let ltv = long_term(&reports);
    assert_eq!(Status::NotOk, status_of(ltv, MessageTag::ADEST_IRTPTBST));
    assert!(ltv.conclusion.has_sub_indication(SubIndication::RevokedCaNoPoe));

    assert_eq!(Some(Indication::Indeterminate), detailed.indication(SIGNATURE));
    assert_eq!(Some(SubIndication::RevokedCaNoPoe), detailed.sub_indication(SIGNATURE));
}

#[test]
fn archive_timestamp_before_ca_revocation_heals_in_past_validation() {
    let mut data = revoked_ca();
    let vd = validation_date();
    let root = data.certificate(ROOT).cloned().unwrap();
    let tsa = CertificateBuilder::new("TSA-ROOT")
        .issued_by(&root)
        .validity(vd - years(5), vd + years(5))
        .extended_key_usage(TIMESTAMPING_EKU)
        .good_in(CRL_CA)
        .build();
    let archive = TimestampBuilder::new("T-ARC", TimestampType::ArchiveTimestamp, days_before(12))
        .signed_by(&tsa)
        .covers(TimestampedObjectCategory::Signature, SIGNATURE)
        .covers(TimestampedObjectCategory::Revocation, CRL_SIGNER)
        .build();
    data.signature_mut(SIGNATURE).unwrap().timestamp_ids.push("T-ARC".to_string());
    data.certificates.push(tsa);
    data.timestamps.push(archive);

    let reports = run(&data, &ValidationPolicy::default_policy());
    let detailed = &reports.detailed_report;
    assert!(detailed.basic_conclusion("T-ARC").unwrap().is_passed());
    assert!(long_term(&reports)
        .conclusion
        .has_sub_indication(SubIndication::RevokedCaNoPoe));

    let psv = detailed.basic_building_blocks(SIGNATURE).unwrap().block(BlockKind::Psv).unwrap();
    assert!(psv.is_passed());
    assert_eq!(Status::Ok, status_of(psv, MessageTag::PSV_ITPOCABCRT));
    assert_eq!(Status::Ok, status_of(psv, MessageTag::PSV_ITPORDAOBCT));

    assert_eq!(Some(Indication::TotalPassed), detailed.indication(SIGNATURE));
    assert_eq!(Some(days_before(12)), detailed.best_signature_time(SIGNATURE));
}
