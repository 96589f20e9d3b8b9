// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Validation time sliding (VTS).

use crate::bbb::revocation::{freshness, revocation_acceptance};
use crate::bbb::xcv::{revocation_exemption, validated_prefix};
use crate::context::{SuiteKey, ValidationContext};
use crate::crypto::{evaluate_target, CryptoTarget};
use crate::past::{passed_or_healable, Evidence};
use crate::report::{Block, BlockDetail, BlockKind};
use crate::token::Token;
use ades_validation_conclusion::{Check, ConstraintChain, Indication, Message, MessageTag, SubIndication};
use ades_validation_diagnostic::{Certificate, CertificateRevocation, Revocation, RevocationReason};
use ades_validation_policy::{Context, Level, ValidationModel};
use chrono::{DateTime, Utc};

/// Whether a revocation moves the control time to the revocation date.
fn revocation_moves_control_time(model: ValidationModel, entry: &CertificateRevocation) -> bool {
    if !entry.is_revoked() {
        return false;
    }
    model == ValidationModel::Shell
        || matches!(
            entry.reason,
            None | Some(RevocationReason::Unspecified | RevocationReason::KeyCompromise | RevocationReason::CaCompromise)
        )
}

/// Latest revocation of `certificate` usable at `control_time`.
fn latest_usable_revocation<'a>(
    ctx: &ValidationContext<'a>,
    evidence: &Evidence<'_>,
    certificate: &'a Certificate,
    control_time: DateTime<Utc>,
) -> Option<&'a Revocation> {
    ctx.index
        .revocations_of(certificate)
        .into_iter()
        .filter(|r| r.this_update <= control_time)
        .filter(|r| evidence.revocation_conclusions.get(&r.id).is_some_and(passed_or_healable))
        .filter(|r| revocation_acceptance(ctx, certificate, r, ctx.current_time).is_passed())
        .max_by_key(|r| r.production_date)
}

/// Earliest expiration of a FAIL-level unreliable algorithm among `targets` at `time`.
fn unreliable_until(ctx: &ValidationContext<'_>, targets: &[CryptoTarget], time: DateTime<Utc>) -> Option<DateTime<Utc>> {
    targets
        .iter()
        .filter_map(|target| evaluate_target(ctx, target, time))
        .filter(|outcome| !outcome.is_secure() && outcome.level == Level::Fail)
        .filter_map(|outcome| outcome.validation.not_after)
        .min()
}

/// Slides the control time from the trust anchor down to the signing certificate.
///
/// Returns the VTS block, which carries the final control time.
pub(crate) fn validation_time_sliding(
    ctx: &ValidationContext<'_>,
    token: Token<'_>,
    evidence: &Evidence<'_>,
) -> (Block, DateTime<Utc>) {
    let context = token.context();
    let chain_certificates = ctx.index.chain(token.signing_certificate_id(), token.chain_ids());
    let prefix = validated_prefix(&chain_certificates);
    let mut chain = ConstraintChain::new();

    let mut control_time = ctx.current_time;
    if let Some(sunset) = prefix.last().filter(|c| c.trusted).and_then(|c| c.sunset_date) {
        control_time = control_time.min(sunset);
    }

    for (position, certificate) in prefix.iter().enumerate().rev() {
        let scope = ctx.certificate_scope(context, position);
        if revocation_exemption(certificate, scope.constraints).is_some() {
            continue;
        }

        let revocation = latest_usable_revocation(ctx, evidence, certificate, control_time);
        chain.check(
            Check::new(MessageTag::BBB_VTS_IRDPFC, revocation.is_some())
                .fail()
                .answer(Message::new(MessageTag::BBB_VTS_IRDPFC_ANS).with_text(certificate.id.as_str()))
                .on_failure(Indication::Indeterminate, SubIndication::NoPoe)
                .additional_info(certificate.id.as_str()),
        );
        let Some(revocation) = revocation else {
            continue;
        };

        let entry = certificate.revocation_entry(&revocation.id);
        match entry.filter(|e| revocation_moves_control_time(ctx.policy.model, e)) {
            Some(entry) => {
                let revoked_at = entry.revocation_date.unwrap_or(revocation.production_date);
                control_time = control_time.min(revoked_at);
            }
            None => {
                let (fresh, _) = freshness(scope.constraints, revocation, control_time);
                if !fresh {
                    control_time = control_time.min(revocation.this_update);
                }
            }
        }

        let targets = [
            CryptoTarget::signature(MessageTag::ACCM_POS_CERT_SIG, &certificate.basic_signature, scope.suite_key()),
            CryptoTarget::signature(
                MessageTag::ACCM_POS_REVOC_SIG,
                &revocation.basic_signature,
                SuiteKey::Token(Context::Revocation),
            ),
        ];
        if let Some(expiration) = unreliable_until(ctx, &targets, control_time) {
            control_time = control_time.min(expiration);
        }
    }

    tracing::debug!(token_id = %token.id(), control_time = %control_time, "control time slid");
    let block = Block::from_chain(BlockKind::Vts, token.id(), chain).with_detail(BlockDetail::ControlTime { control_time });
    (block, control_time)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(reason: Option<RevocationReason>) -> CertificateRevocation {
        CertificateRevocation {
            revocation_id: "R-1".into(),
            status: ades_validation_diagnostic::CertificateStatus::Revoked,
            reason,
            revocation_date: None,
        }
    }

    #[test]
    fn shell_model_moves_on_any_revocation() {
        assert!(revocation_moves_control_time(
            ValidationModel::Shell,
            &entry(Some(RevocationReason::Superseded))
        ));
    }

    #[test]
    fn chain_model_moves_only_on_compromise() {
        assert!(!revocation_moves_control_time(
            ValidationModel::Chain,
            &entry(Some(RevocationReason::Superseded))
        ));
        assert!(revocation_moves_control_time(
            ValidationModel::Chain,
            &entry(Some(RevocationReason::KeyCompromise))
        ));
        assert!(revocation_moves_control_time(ValidationModel::Chain, &entry(None)));
    }
}
