// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Past signature validation (PSV).

use crate::bbb::revocation::{freshness, revocation_selection};
use crate::context::ValidationContext;
use crate::crypto::{all_targets, check_targets_at};
use crate::past::pcv::past_certificate_validation;
use crate::past::Evidence;
use crate::process::revocation_date;
use crate::report::{Block, BlockDetail, BlockKind};
use crate::token::Token;
use ades_validation_conclusion::{Check, Conclusion, ConstraintChain, Indication, Message, MessageTag, SubIndication};
use ades_validation_diagnostic::Revocation;
use ades_validation_policy::{level_of, Level, SubContext};
use chrono::{DateTime, Utc};

/// Blocks produced by past validation of one token.
pub(crate) struct PastValidation {
    pub(crate) psv: Block,
    pub(crate) psv_crs: Option<Block>,
    pub(crate) pcv: Block,
    pub(crate) vts: Block,
    pub(crate) control_time: DateTime<Utc>,
}

/// Validates `token` again at the best time its proofs of existence allow.
///
/// `current` is the verdict reached so far; `revocations` are the revocations its chain relies on.
pub(crate) fn past_signature_validation(
    ctx: &ValidationContext<'_>,
    token: Token<'_>,
    current: &Conclusion,
    revocations: &[&Revocation],
    evidence: &Evidence<'_>,
) -> PastValidation {
    let poe = evidence.poe;
    let signing_certificate = ctx.signing_certificate(token.signing_certificate_id());
    let chain_certificates = ctx.index.chain(token.signing_certificate_id(), token.chain_ids());
    let current_indication = current.indication.unwrap_or(Indication::Indeterminate);
    let mut chain = ConstraintChain::new();

    let selection = signing_certificate.map(|c| revocation_selection(ctx, c, ctx.current_time));
    let selected_revocation = selection.as_ref().and_then(|s| s.latest);
    let psv_crs = selection.map(|s| Block {
        kind: BlockKind::PsvCrs,
        ..s.block
    });

    let past = past_certificate_validation(ctx, token, evidence);
    chain.check(Check::result(MessageTag::PSV_IPCVA, &past.pcv.id, &past.pcv.conclusion).answer(MessageTag::PSV_IPCVA_ANS));

    let control_time = past.control_time;
    chain.check(
        Check::new(MessageTag::PSV_ITPOSVAOBCT, poe.exists_at(token.id(), control_time))
            .fail()
            .answer(Message::new(MessageTag::PSV_ITPOSVAOBCT_ANS).with_time(control_time))
            .on_failure(current_indication, current.sub_indication),
    );

    let best_signature_time = poe.lowest(token.id());
    let valid_at_best_time = signing_certificate.is_some_and(|c| c.is_valid_at(best_signature_time));
    let validity_check = |sub_indication: SubIndication, outcome: bool| {
        Check::new(MessageTag::PSV_IBSTCIV, outcome)
            .fail()
            .answer(Message::new(MessageTag::PSV_IBSTCIV_ANS).with_time(best_signature_time))
            .on_failure(Indication::Indeterminate, sub_indication)
    };
    let on_hold = signing_certificate
        .zip(selected_revocation)
        .and_then(|(c, r)| c.revocation_entry(&r.id))
        .is_some_and(|e| e.is_on_hold());

    match current.sub_indication {
        Some(SubIndication::NoCertificateChainFoundNoPoe) => {
            chain.check(validity_check(SubIndication::OutOfBoundsNoPoe, valid_at_best_time));
        }
        Some(SubIndication::RevokedNoPoe | SubIndication::RevocationOutOfBoundsNoPoe) => {
            let before_revocation = signing_certificate
                .and_then(revocation_date)
                .map_or(true, |date| best_signature_time < date);
            chain.check(validity_check(
                SubIndication::OutOfBoundsNotRevoked,
                valid_at_best_time && before_revocation,
            ));
        }
        Some(SubIndication::TryLater) if on_hold => {
            chain.check(validity_check(SubIndication::OutOfBoundsNotRevoked, valid_at_best_time));
        }
        Some(SubIndication::RevokedCaNoPoe) => {
            let ca_revocation = chain_certificates.iter().skip(1).find_map(|c| revocation_date(c));
            chain.check(
                Check::new(
                    MessageTag::PSV_ITPOCABCRT,
                    ca_revocation.is_some_and(|date| best_signature_time < date),
                )
                .fail()
                .answer(MessageTag::PSV_ITPOCABCRT_ANS)
                .on_failure(Indication::Indeterminate, SubIndication::RevokedCaNoPoe),
            );
        }
        Some(sub @ (SubIndication::OutOfBoundsNoPoe | SubIndication::OutOfBoundsNotRevoked)) => {
            chain.check(validity_check(sub, valid_at_best_time));
        }
        Some(SubIndication::CryptoConstraintsFailureNoPoe) => {
            let sub_indication = if poe.has_earlier_proof(token.id()) {
                SubIndication::CryptoConstraintsFailure
            } else {
                SubIndication::CryptoConstraintsFailureNoPoe
            };
            let targets = all_targets(ctx, token, &chain_certificates, revocations);
            check_targets_at(
                &mut chain,
                ctx,
                &targets,
                best_signature_time,
                MessageTag::TSV_WACRABST,
                sub_indication,
            );
        }
        Some(SubIndication::TryLater) => {
            let constraints = ctx.certificate_constraints(token.context(), SubContext::SigningCertificate);
            let (fresh, level) = selected_revocation
                .map_or((false, Level::Fail), |r| {
                    freshness(constraints, r, best_signature_time)
                });
            chain.check(
                Check::new(MessageTag::PSV_IRIFAPOE, fresh)
                    .level(Some(level))
                    .answer(MessageTag::PSV_IRIFAPOE_ANS)
                    .on_failure(Indication::Indeterminate, SubIndication::TryLater),
            );
        }
        _ => {
            chain.check(
                Check::new(MessageTag::PSV_IPCVC, current.is_passed())
                    .fail()
                    .answer(MessageTag::PSV_IPCVC_ANS)
                    .on_failure(current_indication, current.sub_indication),
            );
        }
    }

    if let Some(revocation) = selected_revocation {
        let revocation_time_level = ctx
            .policy
            .signature_constraints(token.context())
            .and_then(|c| level_of(&c.revocation_time_against_best_signature_time))
            .unwrap_or(Level::Fail);
        chain.check(
            Check::new(MessageTag::PSV_ITPORDAOBCT, poe.exists_at(&revocation.id, control_time))
                .level(Some(revocation_time_level))
                .answer(MessageTag::PSV_ITPORDAOBCT_ANS)
                .on_failure(Indication::Indeterminate, SubIndication::RevocationOutOfBoundsNoPoe)
                .additional_info(revocation.id.as_str()),
        );
    }

    let psv = Block::from_chain(BlockKind::Psv, token.id(), chain).with_detail(BlockDetail::ControlTime { control_time });
    PastValidation {
        psv,
        psv_crs,
        pcv: past.pcv,
        vts: past.vts,
        control_time,
    }
}
