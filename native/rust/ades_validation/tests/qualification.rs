// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use ades_validation::{
    Block, BlockDetail, CertificateQualification, QualificationTime, Reports, SignatureProcessExecutor,
    SignatureQualification,
};
use ades_validation_conclusion::{Indication, MessageTag, Status};
use ades_validation_diagnostic::trust::{qualifier, service_status, service_type};
use ades_validation_diagnostic::{DiagnosticData, TrustServiceProvider};
use ades_validation_policy::ValidationPolicy;
use ades_validation_test_utils::scenarios::{qualified_signature, LOTL, SIGNATURE, SIGNER, TRUSTED_LIST};
use ades_validation_test_utils::{utc, TrustServiceBuilder};
use chrono::{DateTime, Duration, Utc};

fn validation_date() -> DateTime<Utc> {
    utc(2021, 1, 1)
}

fn validate(data: &DiagnosticData) -> Reports {
    SignatureProcessExecutor::new()
        .execute(data, &ValidationPolicy::default_policy())
        .unwrap()
}

/// A granted CA/QC service of `BE` from 2017 carrying `qualifiers`.
fn granted_service(qualifiers: &[&str]) -> TrustServiceProvider {
    qualifiers
        .iter()
        .fold(
            TrustServiceBuilder::new(TRUSTED_LIST, service_type::CA_QC)
                .lotl(LOTL)
                .status(service_status::GRANTED, utc(2017, 1, 1), None),
            |builder, uri| builder.qualifier(*uri),
        )
        .build()
}

fn with_services(mut data: DiagnosticData, providers: Vec<TrustServiceProvider>) -> DiagnosticData {
    data.certificate_mut(SIGNER).unwrap().trust_service_providers = providers;
    data
}

fn qualification_block(reports: &Reports) -> &Block {
    reports
        .detailed_report
        .signature(SIGNATURE)
        .unwrap()
        .qualification
        .as_ref()
        .unwrap()
}

fn certificate_block(reports: &Reports, time: QualificationTime) -> &Block {
    qualification_block(reports)
        .children
        .iter()
        .find(|b| matches!(b.detail, Some(BlockDetail::CertificateQualification { time: t, .. }) if t == time))
        .unwrap()
}

fn certificate_qualification(block: &Block) -> CertificateQualification {
    match block.detail {
        Some(BlockDetail::CertificateQualification { qualification, .. }) => qualification,
        _ => CertificateQualification::Na,
    }
}

#[test]
fn qscd_status_left_to_a_certificate_without_qc_statements_is_rejected() {
    let mut data = with_services(
        qualified_signature(validation_date()),
        vec![granted_service(&[qualifier::QC_QSCD_STATUS_AS_IN_CERT])],
    );
    // Still qualified through its QCP-n-qscd policy.
    data.certificate_mut(SIGNER).unwrap().qc_statements = None;

    let reports = validate(&data);
    assert_eq!(Some(Indication::TotalPassed), reports.simple_report.indication(SIGNATURE));

    let at_signing = certificate_block(&reports, QualificationTime::BestSignatureTime);
    assert_eq!(
        Status::NotOk,
        at_signing.constraint(MessageTag::QUAL_QSCD_OVERRULE_CONS).unwrap().status
    );
    assert!(at_signing.conclusion.is_failed());

    let qualification = qualification_block(&reports);
    assert_eq!(Some(Indication::Failed), qualification.conclusion.indication);
    assert!(qualification.conclusion.has_error(MessageTag::QUAL_QSCD_OVERRULE_CONS_ANS));
    assert_eq!(SignatureQualification::UnknownQc, reports.simple_report.signature_qualification(SIGNATURE));
}

#[test]
fn qscd_status_left_to_a_certificate_with_qc_statements_is_accepted() {
    let data = with_services(
        qualified_signature(validation_date()),
        vec![granted_service(&[qualifier::QC_QSCD_STATUS_AS_IN_CERT])],
    );

    let reports = validate(&data);
    let at_signing = certificate_block(&reports, QualificationTime::BestSignatureTime);
    assert_eq!(Status::Ok, at_signing.constraint(MessageTag::QUAL_QSCD_OVERRULE_CONS).unwrap().status);
    assert_eq!(SignatureQualification::Qesig, reports.simple_report.signature_qualification(SIGNATURE));
}

#[test]
fn qscd_gained_after_issuance_is_reported() {
    let switch = validation_date() - Duration::days(180);
    let provider = TrustServiceBuilder::new(TRUSTED_LIST, service_type::CA_QC)
        .lotl(LOTL)
        .status(service_status::GRANTED, utc(2017, 1, 1), Some(switch))
        .qualifier(qualifier::QC_NO_QSCD)
        .status(service_status::GRANTED, switch, None)
        .qualifier(qualifier::QC_WITH_QSCD)
        .build();
    let data = with_services(qualified_signature(validation_date()), vec![provider]);

    let reports = validate(&data);
    assert_eq!(
        CertificateQualification::QcertForEsig,
        certificate_qualification(certificate_block(&reports, QualificationTime::CertificateIssuanceTime))
    );
    assert_eq!(
        CertificateQualification::QcertForEsigQscd,
        certificate_qualification(certificate_block(&reports, QualificationTime::BestSignatureTime))
    );

    let qualification = qualification_block(&reports);
    assert_eq!(Status::Warning, qualification.constraint(MessageTag::QUAL_TOI_TOS_CONS).unwrap().status);
    assert!(qualification.conclusion.has_warning(MessageTag::QUAL_TOI_TOS_CONS_ANS_QSCD));
    assert!(!qualification.conclusion.has_warning(MessageTag::QUAL_TOI_TOS_CONS_ANS_TYPE));
    assert_eq!(Some(Indication::Indeterminate), qualification.conclusion.indication);
    // QSCD follows the signing time.
    assert_eq!(SignatureQualification::Qesig, reports.simple_report.signature_qualification(SIGNATURE));
}

#[test]
fn unchanged_qualification_is_consistent_over_time() {
    let reports = validate(&qualified_signature(validation_date()));
    let qualification = qualification_block(&reports);
    assert_eq!(Status::Ok, qualification.constraint(MessageTag::QUAL_TOI_TOS_CONS).unwrap().status);
}

#[test]
fn conflicting_trust_services_give_an_unknown_qualified_type() {
    let data = with_services(
        qualified_signature(validation_date()),
        vec![
            granted_service(&[qualifier::QC_FOR_ESIG]),
            granted_service(&[qualifier::QC_FOR_ESEAL, qualifier::QC_NO_QSCD]),
        ],
    );

    let reports = validate(&data);
    let at_signing = certificate_block(&reports, QualificationTime::BestSignatureTime);
    assert_eq!(Status::Warning, at_signing.constraint(MessageTag::QUAL_HAS_NO_CONFLICT).unwrap().status);
    assert!(at_signing.conclusion.has_warning(MessageTag::QUAL_UNIQUE_CERT));
    assert_eq!(CertificateQualification::QcertForUnknown, certificate_qualification(at_signing));

    assert_eq!(Some(Indication::TotalPassed), reports.simple_report.indication(SIGNATURE));
    assert_eq!(SignatureQualification::UnknownQc, reports.simple_report.signature_qualification(SIGNATURE));
    assert_eq!(SignatureQualification::UnknownQc, reports.detailed_report.signature_qualification(SIGNATURE));
}
