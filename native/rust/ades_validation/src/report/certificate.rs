// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::qualification::{CertificateQualification, QualificationTime};
use crate::report::{DetailedReport, Messages, SimpleCertificate};
use ades_validation_conclusion::{Indication, SubIndication};
use ades_validation_diagnostic::{Certificate, CertificateStatus, DiagnosticData, RevocationReason};
use ades_validation_policy::ValidationPolicy;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Revocation status of the validated certificate, from the revocation XCV selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRevocationSummary {
    pub revocation_id: String,
    pub status: CertificateStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<RevocationReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revocation_date: Option<DateTime<Utc>>,
}

/// Collapsed verdict of a certificate validation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleCertificateReport {
    pub policy_name: String,
    pub validation_time: DateTime<Utc>,
    pub certificate_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub common_name: Option<String>,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
    pub certificate_chain: Vec<SimpleCertificate>,
    pub indication: Indication,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_indication: Option<SubIndication>,
    pub qualification_at_issuance: CertificateQualification,
    pub qualification_at_validation: CertificateQualification,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revocation: Option<CertificateRevocationSummary>,
    pub details: Messages,
}

impl SimpleCertificateReport {
    pub fn is_trusted(&self) -> bool {
        self.certificate_chain.iter().any(|c| c.trusted)
    }

    pub fn is_revoked(&self) -> bool {
        self.revocation
            .as_ref()
            .is_some_and(|r| r.status == CertificateStatus::Revoked)
    }

    pub(crate) fn build(
        data: &DiagnosticData,
        policy: &ValidationPolicy,
        certificate: &Certificate,
        detailed: &DetailedReport,
    ) -> Self {
        let basic = detailed.basic_building_blocks(&certificate.id);
        let certificate_chain = basic
            .map(|b| b.certificate_chain.as_slice())
            .unwrap_or_default()
            .iter()
            .map(|item| SimpleCertificate {
                id: item.id.clone(),
                qualified_name: data
                    .certificate(&item.id)
                    .and_then(|c| c.subject.common_name.clone()),
                trusted: item.trusted,
            })
            .collect();

        let revocation = basic
            .and_then(|b| {
                b.selected_revocations()
                    .into_iter()
                    .find(|(certificate_id, _)| *certificate_id == certificate.id)
            })
            .and_then(|(_, revocation_id)| certificate.revocation_entry(revocation_id))
            .map(|entry| CertificateRevocationSummary {
                revocation_id: entry.revocation_id.clone(),
                status: entry.status,
                reason: entry.reason,
                revocation_date: entry.revocation_date,
            });

        let conclusion = detailed.certificate_conclusion();
        Self {
            policy_name: policy.name.clone(),
            validation_time: detailed.validation_time,
            certificate_id: certificate.id.clone(),
            common_name: certificate.subject.common_name.clone(),
            not_before: certificate.not_before,
            not_after: certificate.not_after,
            certificate_chain,
            indication: conclusion.indication.unwrap_or(Indication::Indeterminate),
            sub_indication: conclusion.sub_indication,
            qualification_at_issuance: detailed
                .certificate_qualification(QualificationTime::CertificateIssuanceTime),
            qualification_at_validation: detailed.certificate_qualification(QualificationTime::ValidationTime),
            revocation,
            details: Messages::from(conclusion),
        }
    }
}
