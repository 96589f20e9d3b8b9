// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use ades_validation::{CertificateProcessExecutor, CertificateQualification, QualificationTime, ValidationError};
use ades_validation_conclusion::{Indication, SubIndication};
use ades_validation_diagnostic::{CertificateStatus, RevocationReason};
use ades_validation_policy::ValidationPolicy;
use ades_validation_test_utils::scenarios::{qualified_signature, CRL_SIGNER, ROOT, SIGNER};
use ades_validation_test_utils::utc;
use chrono::Duration;

#[test]
fn qualified_signer_certificate() {
    let data = qualified_signature(utc(2021, 1, 1));
    let reports = CertificateProcessExecutor::new(SIGNER)
        .execute(&data, &ValidationPolicy::default_policy())
        .unwrap();

    let simple = &reports.simple_report;
    assert_eq!(Indication::Passed, simple.indication);
    assert_eq!(CertificateQualification::QcertForEsigQscd, simple.qualification_at_issuance);
    assert_eq!(CertificateQualification::QcertForEsigQscd, simple.qualification_at_validation);
    assert!(simple.is_trusted());
    assert!(!simple.is_revoked());
    assert_eq!(Some("Signer"), simple.common_name.as_deref());
    assert_eq!(ROOT, simple.certificate_chain.last().unwrap().id);

    let detailed = &reports.detailed_report;
    assert!(detailed.certificate_conclusion().is_passed());
    assert_eq!(
        CertificateQualification::QcertForEsigQscd,
        detailed.certificate_qualification(QualificationTime::ValidationTime)
    );
}

#[test]
fn revoked_certificate_is_reported_as_revoked() {
    let vd = utc(2021, 1, 1);
    let mut data = qualified_signature(vd);
    let entry = data
        .certificate_mut(SIGNER)
        .unwrap()
        .revocations
        .iter_mut()
        .find(|r| r.revocation_id == CRL_SIGNER)
        .unwrap();
    entry.status = CertificateStatus::Revoked;
    entry.reason = Some(RevocationReason::KeyCompromise);
    entry.revocation_date = Some(vd - Duration::days(10));

    let reports = CertificateProcessExecutor::new(SIGNER)
        .execute(&data, &ValidationPolicy::default_policy())
        .unwrap();
    let simple = &reports.simple_report;
    assert_eq!(Indication::Indeterminate, simple.indication);
    assert_eq!(Some(SubIndication::RevokedNoPoe), simple.sub_indication);
    assert!(simple.is_revoked());
    assert_eq!(
        Some(RevocationReason::KeyCompromise),
        simple.revocation.as_ref().and_then(|r| r.reason)
    );
}

#[test]
fn certificate_without_acceptable_trusted_list_is_not_qualified() {
    let mut data = qualified_signature(utc(2021, 1, 1));
    data.trusted_lists.clear();

    let reports = CertificateProcessExecutor::new(SIGNER)
        .execute(&data, &ValidationPolicy::default_policy())
        .unwrap();
    assert_eq!(Indication::Passed, reports.simple_report.indication);
    assert_eq!(CertificateQualification::Na, reports.simple_report.qualification_at_issuance);
    assert_eq!(CertificateQualification::Na, reports.simple_report.qualification_at_validation);
}

#[test]
fn unknown_certificate_id_is_an_error() {
    let data = qualified_signature(utc(2021, 1, 1));
    let error = CertificateProcessExecutor::new("NOPE")
        .execute(&data, &ValidationPolicy::default_policy())
        .unwrap_err();
    assert!(matches!(
        error,
        ValidationError::DanglingReference { kind: "certificate", ref id, .. } if id == "NOPE"
    ));
}
