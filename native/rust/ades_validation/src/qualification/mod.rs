// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Qualification of certificates and signatures from trusted-list facts.

pub(crate) mod cert;
pub(crate) mod matrix;
pub(crate) mod signature;
pub(crate) mod strategy;
pub(crate) mod tl;

use crate::report::Block;
use ades_validation_diagnostic::trust::{service_status, service_type};
use ades_validation_diagnostic::{
    Certificate, DiagnosticData, TrustService, TrustServiceProvider, TrustServiceStatusPeriod,
};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Instant a certificate qualification is determined at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QualificationTime {
    CertificateIssuanceTime,
    BestSignatureTime,
    ValidationTime,
}

impl QualificationTime {
    pub fn name(&self) -> &'static str {
        match self {
            QualificationTime::CertificateIssuanceTime => "CERTIFICATE_ISSUANCE_TIME",
            QualificationTime::BestSignatureTime => "BEST_SIGNATURE_TIME",
            QualificationTime::ValidationTime => "VALIDATION_TIME",
        }
    }
}

impl fmt::Display for QualificationTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum QualifiedStatus {
    Qc,
    NotQc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) enum CertificateType {
    Esig,
    Eseal,
    Wsa,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum QscdStatus {
    Qscd,
    NotQscd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CertificateQualification {
    QcertForEsigQscd,
    QcertForEsealQscd,
    QcertForUnknownQscd,
    QcertForEsig,
    QcertForEseal,
    QcertForWsa,
    QcertForUnknown,
    CertForEsig,
    CertForEseal,
    CertForWsa,
    CertForUnknown,
    Na,
}

impl CertificateQualification {
    pub fn is_qc(&self) -> bool {
        matches!(
            self,
            CertificateQualification::QcertForEsigQscd
                | CertificateQualification::QcertForEsealQscd
                | CertificateQualification::QcertForUnknownQscd
                | CertificateQualification::QcertForEsig
                | CertificateQualification::QcertForEseal
                | CertificateQualification::QcertForWsa
                | CertificateQualification::QcertForUnknown
        )
    }

    pub fn is_qscd(&self) -> bool {
        matches!(
            self,
            CertificateQualification::QcertForEsigQscd
                | CertificateQualification::QcertForEsealQscd
                | CertificateQualification::QcertForUnknownQscd
        )
    }

    /// The certificate is meant for electronic signatures or seals.
    pub fn is_for_signature(&self) -> bool {
        matches!(self.certificate_type(), CertificateType::Esig | CertificateType::Eseal)
    }

    pub(crate) fn certificate_type(&self) -> CertificateType {
        match self {
            CertificateQualification::QcertForEsigQscd
            | CertificateQualification::QcertForEsig
            | CertificateQualification::CertForEsig => CertificateType::Esig,
            CertificateQualification::QcertForEsealQscd
            | CertificateQualification::QcertForEseal
            | CertificateQualification::CertForEseal => CertificateType::Eseal,
            CertificateQualification::QcertForWsa | CertificateQualification::CertForWsa => CertificateType::Wsa,
            _ => CertificateType::Unknown,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CertificateQualification::QcertForEsigQscd => "QCERT_FOR_ESIG_QSCD",
            CertificateQualification::QcertForEsealQscd => "QCERT_FOR_ESEAL_QSCD",
            CertificateQualification::QcertForUnknownQscd => "QCERT_FOR_UNKNOWN_QSCD",
            CertificateQualification::QcertForEsig => "QCERT_FOR_ESIG",
            CertificateQualification::QcertForEseal => "QCERT_FOR_ESEAL",
            CertificateQualification::QcertForWsa => "QCERT_FOR_WSA",
            CertificateQualification::QcertForUnknown => "QCERT_FOR_UNKNOWN",
            CertificateQualification::CertForEsig => "CERT_FOR_ESIG",
            CertificateQualification::CertForEseal => "CERT_FOR_ESEAL",
            CertificateQualification::CertForWsa => "CERT_FOR_WSA",
            CertificateQualification::CertForUnknown => "CERT_FOR_UNKNOWN",
            CertificateQualification::Na => "NA",
        }
    }
}

impl fmt::Display for CertificateQualification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignatureQualification {
    Qesig,
    Qeseal,
    UnknownQcQscd,
    AdesigQc,
    AdesealQc,
    UnknownQc,
    Adesig,
    Adeseal,
    Unknown,
    IndeterminateQesig,
    IndeterminateQeseal,
    IndeterminateUnknownQcQscd,
    IndeterminateAdesigQc,
    IndeterminateAdesealQc,
    IndeterminateUnknownQc,
    IndeterminateAdesig,
    IndeterminateAdeseal,
    IndeterminateUnknown,
    NotAdesQcQscd,
    NotAdesQc,
    NotAdes,
    Na,
}

impl SignatureQualification {
    pub fn name(&self) -> &'static str {
        match self {
            SignatureQualification::Qesig => "QESIG",
            SignatureQualification::Qeseal => "QESEAL",
            SignatureQualification::UnknownQcQscd => "UNKNOWN_QC_QSCD",
            SignatureQualification::AdesigQc => "ADESIG_QC",
            SignatureQualification::AdesealQc => "ADESEAL_QC",
            SignatureQualification::UnknownQc => "UNKNOWN_QC",
            SignatureQualification::Adesig => "ADESIG",
            SignatureQualification::Adeseal => "ADESEAL",
            SignatureQualification::Unknown => "UNKNOWN",
            SignatureQualification::IndeterminateQesig => "INDETERMINATE_QESIG",
            SignatureQualification::IndeterminateQeseal => "INDETERMINATE_QESEAL",
            SignatureQualification::IndeterminateUnknownQcQscd => "INDETERMINATE_UNKNOWN_QC_QSCD",
            SignatureQualification::IndeterminateAdesigQc => "INDETERMINATE_ADESIG_QC",
            SignatureQualification::IndeterminateAdesealQc => "INDETERMINATE_ADESEAL_QC",
            SignatureQualification::IndeterminateUnknownQc => "INDETERMINATE_UNKNOWN_QC",
            SignatureQualification::IndeterminateAdesig => "INDETERMINATE_ADESIG",
            SignatureQualification::IndeterminateAdeseal => "INDETERMINATE_ADESEAL",
            SignatureQualification::IndeterminateUnknown => "INDETERMINATE_UNKNOWN",
            SignatureQualification::NotAdesQcQscd => "NOT_ADES_QC_QSCD",
            SignatureQualification::NotAdesQc => "NOT_ADES_QC",
            SignatureQualification::NotAdes => "NOT_ADES",
            SignatureQualification::Na => "NA",
        }
    }
}

impl fmt::Display for SignatureQualification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One status period of one trust service, with the list facts qualification needs.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ServiceEntry<'a> {
    pub(crate) provider: &'a TrustServiceProvider,
    pub(crate) service: &'a TrustService,
    pub(crate) period: &'a TrustServiceStatusPeriod,
    /// The trusted list is recognised through a mutual recognition agreement.
    pub(crate) mra: bool,
}

impl ServiceEntry<'_> {
    pub(crate) fn is_ca_qc(&self) -> bool {
        matches!(
            self.service.service_type.as_str(),
            service_type::CA_QC | service_type::NATIONAL_ROOT_CA_QC
        )
    }

    pub(crate) fn is_granted(&self) -> bool {
        service_status::is_granted(&self.period.status)
    }

    pub(crate) fn has_qualifier(&self, uri: &str) -> bool {
        self.period.has_qualifier(uri)
    }

    pub(crate) fn name(&self) -> &str {
        self.service
            .names
            .first()
            .map(String::as_str)
            .unwrap_or(self.service.service_type.as_str())
    }
}

/// Status periods of every service `certificate` relates to, restricted to acceptable lists.
pub(crate) fn service_entries<'a>(
    certificate: &'a Certificate,
    acceptable_lists: &BTreeSet<&str>,
    mra_lists: &BTreeSet<&str>,
) -> Vec<ServiceEntry<'a>> {
    certificate
        .trust_service_providers
        .iter()
        .filter(|p| acceptable_lists.contains(p.tl_id.as_str()))
        .flat_map(|provider| {
            let mra = mra_lists.contains(provider.tl_id.as_str());
            provider.services.iter().flat_map(move |service| {
                service.status_history.iter().map(move |period| ServiceEntry {
                    provider,
                    service,
                    period,
                    mra,
                })
            })
        })
        .collect()
}

/// Trusted lists reached by `certificate` whose analysis passed, together with the acceptance of
/// the lists of trusted lists they are published through.
#[derive(Debug, Default)]
pub(crate) struct TrustedListAcceptance<'a> {
    /// `(lotl id, acceptable)` in provider order, without repetition.
    pub(crate) lotls: Vec<(&'a str, bool)>,
    /// `(tl id, acceptable)` for lists whose LOTL, if any, is acceptable.
    pub(crate) tls: Vec<(&'a str, bool)>,
}

impl<'a> TrustedListAcceptance<'a> {
    pub(crate) fn evaluate(certificate: &'a Certificate, analyses: &[Block]) -> Self {
        let passed = |id: &str| analyses.iter().any(|b| b.id == id && b.is_passed());
        let mut acceptance = Self::default();
        for provider in &certificate.trust_service_providers {
            if let Some(lotl) = provider.lotl_id.as_deref() {
                if !acceptance.lotls.iter().any(|(id, _)| *id == lotl) {
                    acceptance.lotls.push((lotl, passed(lotl)));
                }
            }
        }
        for provider in &certificate.trust_service_providers {
            let lotl_ok = provider
                .lotl_id
                .as_deref()
                .map_or(true, |lotl| acceptance.lotls.iter().any(|(id, ok)| *id == lotl && *ok));
            let tl = provider.tl_id.as_str();
            if lotl_ok && !acceptance.tls.iter().any(|(id, _)| *id == tl) {
                acceptance.tls.push((tl, passed(tl)));
            }
        }
        acceptance
    }

    pub(crate) fn acceptable_lists(&self) -> BTreeSet<&'a str> {
        self.tls.iter().filter(|(_, ok)| *ok).map(|(id, _)| *id).collect()
    }
}

/// Status periods usable to qualify `certificate`, taken from the lists accepted for it.
pub(crate) fn qualification_services<'a>(
    data: &DiagnosticData,
    certificate: &'a Certificate,
    acceptance: &TrustedListAcceptance<'_>,
) -> Vec<ServiceEntry<'a>> {
    let mra_lists: BTreeSet<&str> = data
        .trusted_lists
        .iter()
        .filter(|l| l.mra)
        .map(|l| l.id.as_str())
        .collect();
    service_entries(certificate, &acceptance.acceptable_lists(), &mra_lists)
}
