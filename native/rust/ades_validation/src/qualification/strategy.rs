// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! How a certificate's qualified status, type and QSCD status follow from the certificate and the
//! trust service selected for it.

use crate::qualification::matrix::certificate_qualification;
use crate::qualification::{CertificateQualification, CertificateType, QscdStatus, QualifiedStatus, ServiceEntry};
use ades_validation_diagnostic::trust::{additional_service_info, policy_oid, qualifier};
use ades_validation_diagnostic::{Certificate, QcType};

const QUALIFIED_POLICIES: [&str; 7] = [
    policy_oid::QCP_PUBLIC,
    policy_oid::QCP_PUBLIC_WITH_SSCD,
    policy_oid::QCP_NATURAL,
    policy_oid::QCP_LEGAL,
    policy_oid::QCP_NATURAL_QSCD,
    policy_oid::QCP_LEGAL_QSCD,
    policy_oid::QCP_WEB,
];

pub(crate) const QSCD_POSITIVE: [&str; 3] = [
    qualifier::QC_WITH_QSCD,
    qualifier::QC_WITH_SSCD,
    qualifier::QC_QSCD_MANAGED_ON_BEHALF,
];
pub(crate) const QSCD_NEGATIVE: [&str; 2] = [qualifier::QC_NO_QSCD, qualifier::QC_NO_SSCD];
pub(crate) const QSCD_AS_IN_CERT: [&str; 2] = [qualifier::QC_QSCD_STATUS_AS_IN_CERT, qualifier::QC_SSCD_STATUS_AS_IN_CERT];

/// Usage qualifiers and the type each one forces.
pub(crate) const USAGE_QUALIFIERS: [(&str, CertificateType); 3] = [
    (qualifier::QC_FOR_ESIG, CertificateType::Esig),
    (qualifier::QC_FOR_ESEAL, CertificateType::Eseal),
    (qualifier::QC_FOR_WSA, CertificateType::Wsa),
];

pub(crate) const ADDITIONAL_INFOS: [(&str, CertificateType); 3] = [
    (additional_service_info::FOR_ESIGNATURES, CertificateType::Esig),
    (additional_service_info::FOR_ESEALS, CertificateType::Eseal),
    (additional_service_info::FOR_WEB_AUTHENTICATION, CertificateType::Wsa),
];

fn qc_type(qc_type: QcType) -> CertificateType {
    match qc_type {
        QcType::Esign => CertificateType::Esig,
        QcType::Eseal => CertificateType::Eseal,
        QcType::Web => CertificateType::Wsa,
    }
}

/// Certificate holds QC statements or a qualified certificate policy.
pub(crate) fn is_qualified_by_certificate(certificate: &Certificate) -> bool {
    certificate.qc_compliance() || QUALIFIED_POLICIES.iter().any(|oid| certificate.has_policy(oid))
}

/// Type claimed by the certificate's own QC statements.
pub(crate) fn type_by_certificate(certificate: &Certificate) -> CertificateType {
    let mut types: Vec<CertificateType> = certificate.qc_types().iter().copied().map(qc_type).collect();
    types.sort();
    types.dedup();
    match types.as_slice() {
        [] if certificate.qc_compliance() => CertificateType::Esig,
        [single] => *single,
        _ => CertificateType::Unknown,
    }
}

/// Types a service period restricts its certificates to, by usage qualifier.
pub(crate) fn usage_types(service: &ServiceEntry<'_>) -> Vec<CertificateType> {
    USAGE_QUALIFIERS
        .iter()
        .filter(|(uri, _)| service.has_qualifier(uri))
        .map(|(_, kind)| *kind)
        .collect()
}

/// Types a service period is meant for, by additional service information.
pub(crate) fn additional_info_types(service: &ServiceEntry<'_>) -> Vec<CertificateType> {
    ADDITIONAL_INFOS
        .iter()
        .filter(|(uri, _)| service.period.has_additional_info(uri))
        .map(|(_, kind)| *kind)
        .collect()
}

pub(crate) fn qualified_status(certificate: &Certificate, service: Option<&ServiceEntry<'_>>) -> QualifiedStatus {
    let Some(service) = service else {
        return QualifiedStatus::NotQc;
    };
    if !service.is_ca_qc() || !service.is_granted() || service.has_qualifier(qualifier::NOT_QUALIFIED) {
        QualifiedStatus::NotQc
    } else if service.has_qualifier(qualifier::QC_STATEMENT) || is_qualified_by_certificate(certificate) {
        QualifiedStatus::Qc
    } else {
        QualifiedStatus::NotQc
    }
}

pub(crate) fn certificate_type(certificate: &Certificate, service: Option<&ServiceEntry<'_>>) -> CertificateType {
    if let Some(service) = service {
        if let [single] = usage_types(service).as_slice() {
            return *single;
        }
    }
    let by_certificate = type_by_certificate(certificate);
    if by_certificate != CertificateType::Unknown {
        return by_certificate;
    }
    match service.map(additional_info_types).as_deref() {
        Some([single]) => *single,
        _ => CertificateType::Unknown,
    }
}

pub(crate) fn qscd_status(
    certificate: &Certificate,
    service: Option<&ServiceEntry<'_>>,
    status: QualifiedStatus,
) -> QscdStatus {
    if status == QualifiedStatus::NotQc {
        return QscdStatus::NotQscd;
    }
    let has_any = |uris: &[&str]| service.is_some_and(|s| uris.iter().any(|u| s.has_qualifier(u)));
    let qscd = if has_any(&QSCD_POSITIVE) {
        true
    } else if has_any(&QSCD_NEGATIVE) {
        false
    } else {
        certificate.qc_sscd()
    };
    if qscd {
        QscdStatus::Qscd
    } else {
        QscdStatus::NotQscd
    }
}

/// The three facts of a qualification derived from one service, or from none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Facts {
    pub(crate) status: QualifiedStatus,
    pub(crate) kind: CertificateType,
    pub(crate) qscd: QscdStatus,
}

impl Facts {
    pub(crate) fn derive(certificate: &Certificate, service: Option<&ServiceEntry<'_>>) -> Self {
        let status = qualified_status(certificate, service);
        Self {
            status,
            kind: certificate_type(certificate, service),
            qscd: qscd_status(certificate, service, status),
        }
    }

    /// Facts several services agree on: QC and QSCD only when all say so, the type only when
    /// all share it.
    pub(crate) fn merge(all: &[Facts]) -> Option<Self> {
        let first = *all.first()?;
        Some(all.iter().skip(1).fold(first, |acc, next| Facts {
            status: if acc.status == QualifiedStatus::Qc && next.status == QualifiedStatus::Qc {
                QualifiedStatus::Qc
            } else {
                QualifiedStatus::NotQc
            },
            kind: if acc.kind == next.kind {
                acc.kind
            } else {
                CertificateType::Unknown
            },
            qscd: if acc.qscd == QscdStatus::Qscd && next.qscd == QscdStatus::Qscd {
                QscdStatus::Qscd
            } else {
                QscdStatus::NotQscd
            },
        }))
    }

    pub(crate) fn qualification(&self) -> CertificateQualification {
        certificate_qualification(self.status, self.kind, self.qscd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_only_shared_facts() {
        let esig = Facts {
            status: QualifiedStatus::Qc,
            kind: CertificateType::Esig,
            qscd: QscdStatus::Qscd,
        };
        let eseal = Facts {
            status: QualifiedStatus::Qc,
            kind: CertificateType::Eseal,
            qscd: QscdStatus::NotQscd,
        };
        let merged = Facts::merge(&[esig, eseal]).unwrap();
        assert_eq!(merged.status, QualifiedStatus::Qc);
        assert_eq!(merged.kind, CertificateType::Unknown);
        assert_eq!(merged.qscd, QscdStatus::NotQscd);
        assert_eq!(merged.qualification(), CertificateQualification::QcertForUnknown);
    }

    #[test]
    fn merge_of_nothing_is_none() {
        assert!(Facts::merge(&[]).is_none());
    }
}
