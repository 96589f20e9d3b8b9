// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Signature qualification.

use crate::qualification::cert::{certificate_qualification_at, qualification_of};
use crate::qualification::matrix::signature_qualification;
use crate::qualification::{
    qualification_services, CertificateQualification, CertificateType, QualificationTime, SignatureQualification,
    TrustedListAcceptance,
};
use crate::report::{Block, BlockDetail, BlockKind};
use ades_validation_conclusion::{Check, Conclusion, ConstraintChain, Indication, Message, MessageTag, SubIndication};
use ades_validation_diagnostic::{Certificate, DiagnosticData};
use chrono::{DateTime, Utc};

/// Inputs of the qualification of one signature.
pub(crate) struct QualificationInput<'a> {
    pub(crate) signature_id: &'a str,
    /// Final conclusion of the signature at the requested validation level.
    pub(crate) conclusion: &'a Conclusion,
    pub(crate) signing_certificate: Option<&'a Certificate>,
    /// Certificate chain starting with the signing certificate.
    pub(crate) chain: &'a [&'a Certificate],
    pub(crate) best_signature_time: DateTime<Utc>,
}

/// Certificate qualification both at issuance and at signing time are merged into the final one:
/// QC only when QC at both, the type only when unchanged, QSCD as at signing time.
fn final_certificate_qualification(
    at_issuance: CertificateQualification,
    at_signing: CertificateQualification,
) -> CertificateQualification {
    use crate::qualification::matrix::certificate_qualification;
    use crate::qualification::{QscdStatus, QualifiedStatus};

    if at_issuance == CertificateQualification::Na || at_signing == CertificateQualification::Na {
        return CertificateQualification::Na;
    }
    let status = if at_issuance.is_qc() && at_signing.is_qc() {
        QualifiedStatus::Qc
    } else {
        QualifiedStatus::NotQc
    };
    let kind = if at_issuance.certificate_type() == at_signing.certificate_type() {
        at_signing.certificate_type()
    } else {
        CertificateType::Unknown
    };
    let qscd = if at_signing.is_qscd() {
        QscdStatus::Qscd
    } else {
        QscdStatus::NotQscd
    };
    certificate_qualification(status, kind, qscd)
}

/// Qualifies the signature described by `input`, using the trusted list analyses computed for the
/// snapshot.
pub(crate) fn signature_qualification_block(
    data: &DiagnosticData,
    input: &QualificationInput<'_>,
    tl_analyses: &[Block],
) -> Block {
    let mut chain = ConstraintChain::new();
    let mut children = Vec::new();
    let indication = input.conclusion.indication.unwrap_or(Indication::Indeterminate);

    let ades_answer = if indication.is_indeterminate() {
        MessageTag::QUAL_IS_ADES_IND
    } else {
        MessageTag::QUAL_IS_ADES_INV
    };
    chain.check(Check::new(MessageTag::QUAL_IS_ADES, indication.is_passed()).warn().answer(ades_answer));

    let reaches_trusted_list = input
        .signing_certificate
        .is_some_and(|c| !c.trust_service_providers.is_empty())
        && input.chain.iter().any(|c| c.trusted);
    chain.check(
        Check::new(MessageTag::QUAL_TRUSTED_CERT_PATH, reaches_trusted_list)
            .fail()
            .answer(MessageTag::QUAL_TRUSTED_CERT_PATH_ANS)
            .on_failure(Indication::Failed, None::<SubIndication>),
    );

    let mut qualification = SignatureQualification::Na;
    if let Some(certificate) = input.signing_certificate.filter(|_| reaches_trusted_list) {
        let acceptance = TrustedListAcceptance::evaluate(certificate, tl_analyses);
        for (lotl, acceptable) in &acceptance.lotls {
            chain.check(
                Check::new(MessageTag::QUAL_ACCEPTABLE_LOTL, *acceptable)
                    .warn()
                    .answer(Message::new(MessageTag::QUAL_ACCEPTABLE_LOTL_ANS).with_text(*lotl))
                    .block_id(*lotl),
            );
        }
        for (tl, acceptable) in &acceptance.tls {
            chain.check(
                Check::new(MessageTag::QUAL_ACCEPTABLE_TL, *acceptable)
                    .warn()
                    .answer(Message::new(MessageTag::QUAL_ACCEPTABLE_TL_ANS).with_text(*tl))
                    .block_id(*tl),
            );
        }
        for analysis in tl_analyses
            .iter()
            .filter(|b| acceptance.lotls.iter().any(|(id, _)| *id == b.id) || acceptance.tls.iter().any(|(id, _)| *id == b.id))
        {
            chain.conclusion_mut().merge_messages(&analysis.conclusion);
        }

        let accepted = !acceptance.acceptable_lists().is_empty();
        chain.check(
            Check::new(MessageTag::QUAL_TRUSTED_LIST_ACCEPT, accepted)
                .fail()
                .answer(MessageTag::QUAL_TRUSTED_LIST_ACCEPT_ANS)
                .on_failure(Indication::Failed, None::<SubIndication>),
        );

        if accepted {
            let services = qualification_services(data, certificate, &acceptance);
            let at_issuance = certificate_qualification_at(
                certificate,
                input.chain,
                &services,
                QualificationTime::CertificateIssuanceTime,
                certificate.not_before,
            );
            let at_signing = certificate_qualification_at(
                certificate,
                input.chain,
                &services,
                QualificationTime::BestSignatureTime,
                input.best_signature_time,
            );
            let issuance = qualification_of(&at_issuance);
            let signing = qualification_of(&at_signing);
            chain.conclusion_mut().merge_messages(&at_issuance.conclusion);
            chain.conclusion_mut().merge_messages(&at_signing.conclusion);

            chain.check(
                Check::new(MessageTag::QUAL_QC_AT_ST, signing.is_qc())
                    .warn()
                    .answer(MessageTag::QUAL_QC_AT_ST_ANS)
                    .block_id(at_signing.id.as_str()),
            );
            chain.check(
                Check::new(MessageTag::QUAL_FOR_SIGN_AT_ST, signing.is_for_signature())
                    .warn()
                    .answer(MessageTag::QUAL_FOR_SIGN_AT_ST_ANS),
            );
            chain.check(
                Check::new(MessageTag::QUAL_QC_AT_CC, issuance.is_qc())
                    .warn()
                    .answer(MessageTag::QUAL_QC_AT_CC_ANS)
                    .block_id(at_issuance.id.as_str()),
            );
            chain.check(
                Check::new(MessageTag::QUAL_QSCD_AT_ST, signing.is_qscd())
                    .warn()
                    .answer(MessageTag::QUAL_QSCD_AT_ST_ANS),
            );

            let same_type = issuance.certificate_type() == signing.certificate_type();
            let same_qscd = issuance.is_qscd() == signing.is_qscd();
            let answer = match (same_type, same_qscd) {
                (false, false) => MessageTag::QUAL_TOI_TOS_CONS_ANS_TYPE_QSCD,
                (false, true) => MessageTag::QUAL_TOI_TOS_CONS_ANS_TYPE,
                _ => MessageTag::QUAL_TOI_TOS_CONS_ANS_QSCD,
            };
            chain.check(
                Check::new(MessageTag::QUAL_TOI_TOS_CONS, same_type && same_qscd)
                    .warn()
                    .answer(answer),
            );

            let certificate_qualification = final_certificate_qualification(issuance, signing);
            qualification = signature_qualification(indication, certificate_qualification);
            children.push(at_issuance);
            children.push(at_signing);
        }
    }

    let (constraints, mut conclusion) = chain.finish();
    conclusion.indication = Some(if !conclusion.errors.is_empty() {
        Indication::Failed
    } else if !conclusion.warnings.is_empty() {
        Indication::Indeterminate
    } else {
        Indication::Passed
    });
    conclusion.sub_indication = None;
    tracing::debug!(signature_id = %input.signature_id, %qualification, "signature qualification determined");

    Block {
        kind: BlockKind::SignatureQualification,
        id: input.signature_id.to_string(),
        constraints,
        conclusion,
        children,
        detail: Some(BlockDetail::SignatureQualification { qualification }),
    }
}

/// Qualification recorded on a signature qualification block.
pub(crate) fn qualification_of_signature(block: &Block) -> SignatureQualification {
    match block.detail {
        Some(BlockDetail::SignatureQualification { qualification }) => qualification,
        _ => SignatureQualification::Na,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_change_between_issuance_and_signing_is_unknown() {
        assert_eq!(
            final_certificate_qualification(
                CertificateQualification::QcertForEsigQscd,
                CertificateQualification::QcertForEsealQscd
            ),
            CertificateQualification::QcertForUnknownQscd
        );
    }

    #[test]
    fn qc_only_when_qc_at_both_times() {
        assert_eq!(
            final_certificate_qualification(CertificateQualification::CertForEsig, CertificateQualification::QcertForEsig),
            CertificateQualification::CertForEsig
        );
    }

    #[test]
    fn qscd_follows_signing_time() {
        assert_eq!(
            final_certificate_qualification(CertificateQualification::QcertForEsig, CertificateQualification::QcertForEsigQscd),
            CertificateQualification::QcertForEsigQscd
        );
    }
}
