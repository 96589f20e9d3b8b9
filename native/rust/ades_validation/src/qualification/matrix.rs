// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Qualification matrices.

use crate::qualification::{CertificateQualification, CertificateType, QscdStatus, QualifiedStatus, SignatureQualification};
use ades_validation_conclusion::Indication;

pub(crate) fn certificate_qualification(
    status: QualifiedStatus,
    kind: CertificateType,
    qscd: QscdStatus,
) -> CertificateQualification {
    use CertificateQualification as Q;
    match (status, kind, qscd) {
        (QualifiedStatus::Qc, CertificateType::Esig, QscdStatus::Qscd) => Q::QcertForEsigQscd,
        (QualifiedStatus::Qc, CertificateType::Esig, QscdStatus::NotQscd) => Q::QcertForEsig,
        (QualifiedStatus::Qc, CertificateType::Eseal, QscdStatus::Qscd) => Q::QcertForEsealQscd,
        (QualifiedStatus::Qc, CertificateType::Eseal, QscdStatus::NotQscd) => Q::QcertForEseal,
        (QualifiedStatus::Qc, CertificateType::Wsa, _) => Q::QcertForWsa,
        (QualifiedStatus::Qc, CertificateType::Unknown, QscdStatus::Qscd) => Q::QcertForUnknownQscd,
        (QualifiedStatus::Qc, CertificateType::Unknown, QscdStatus::NotQscd) => Q::QcertForUnknown,
        (QualifiedStatus::NotQc, CertificateType::Esig, _) => Q::CertForEsig,
        (QualifiedStatus::NotQc, CertificateType::Eseal, _) => Q::CertForEseal,
        (QualifiedStatus::NotQc, CertificateType::Wsa, _) => Q::CertForWsa,
        (QualifiedStatus::NotQc, CertificateType::Unknown, _) => Q::CertForUnknown,
    }
}

/// Signature qualification from the signature's final indication and the signing certificate's
/// qualification.
pub(crate) fn signature_qualification(
    indication: Indication,
    certificate: CertificateQualification,
) -> SignatureQualification {
    use CertificateQualification as C;
    use SignatureQualification as S;
    if indication.is_passed() {
        match certificate {
            C::QcertForEsigQscd => S::Qesig,
            C::QcertForEsealQscd => S::Qeseal,
            C::QcertForUnknownQscd => S::UnknownQcQscd,
            C::QcertForEsig => S::AdesigQc,
            C::QcertForEseal => S::AdesealQc,
            C::QcertForUnknown => S::UnknownQc,
            C::CertForEsig => S::Adesig,
            C::CertForEseal => S::Adeseal,
            C::CertForUnknown => S::Unknown,
            C::QcertForWsa | C::CertForWsa | C::Na => S::Na,
        }
    } else if indication.is_indeterminate() {
        match certificate {
            C::QcertForEsigQscd => S::IndeterminateQesig,
            C::QcertForEsealQscd => S::IndeterminateQeseal,
            C::QcertForUnknownQscd => S::IndeterminateUnknownQcQscd,
            C::QcertForEsig => S::IndeterminateAdesigQc,
            C::QcertForEseal => S::IndeterminateAdesealQc,
            C::QcertForUnknown => S::IndeterminateUnknownQc,
            C::CertForEsig => S::IndeterminateAdesig,
            C::CertForEseal => S::IndeterminateAdeseal,
            C::CertForUnknown => S::IndeterminateUnknown,
            C::QcertForWsa | C::CertForWsa | C::Na => S::Na,
        }
    } else {
        match certificate {
            C::QcertForEsigQscd | C::QcertForEsealQscd | C::QcertForUnknownQscd => S::NotAdesQcQscd,
            C::QcertForEsig | C::QcertForEseal | C::QcertForUnknown => S::NotAdesQc,
            C::CertForEsig | C::CertForEseal | C::CertForUnknown => S::NotAdes,
            C::QcertForWsa | C::CertForWsa | C::Na => S::Na,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualified_seal_on_qscd() {
        assert_eq!(
            certificate_qualification(QualifiedStatus::Qc, CertificateType::Eseal, QscdStatus::Qscd),
            CertificateQualification::QcertForEsealQscd
        );
    }

    #[test]
    fn qscd_is_irrelevant_without_qc() {
        assert_eq!(
            certificate_qualification(QualifiedStatus::NotQc, CertificateType::Esig, QscdStatus::Qscd),
            CertificateQualification::CertForEsig
        );
    }

    #[test]
    fn signature_qualification_follows_indication() {
        let q = CertificateQualification::QcertForEsigQscd;
        assert_eq!(signature_qualification(Indication::TotalPassed, q), SignatureQualification::Qesig);
        assert_eq!(
            signature_qualification(Indication::Indeterminate, q),
            SignatureQualification::IndeterminateQesig
        );
        assert_eq!(signature_qualification(Indication::TotalFailed, q), SignatureQualification::NotAdesQcQscd);
    }

    #[test]
    fn web_certificates_do_not_qualify_signatures() {
        assert_eq!(
            signature_qualification(Indication::Passed, CertificateQualification::QcertForWsa),
            SignatureQualification::Na
        );
    }
}
