// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Validation process for signatures providing long-term availability and integrity of validation
//! material.

use crate::bbb::BasicBuildingBlocks;
use crate::context::ValidationContext;
use crate::crypto::{all_targets, check_targets_at};
use crate::past::{past_signature_validation, poe_healable, Evidence, PastValidation};
use crate::poe::PoeStore;
use crate::process::{archival_acceptable, best_signature_time, selected_revocations};
use crate::report::{Block, BlockDetail, BlockKind};
use crate::token::Token;
use ades_validation_conclusion::{Check, Conclusion, ConstraintChain, Indication, MessageTag, SubIndication};
use ades_validation_diagnostic::Signature;
use ades_validation_policy::level_of;
use std::collections::HashMap;

/// Proofs of existence gathered from the timestamps of a snapshot.
pub(crate) struct ProofsOfExistence {
    pub(crate) store: PoeStore,
    /// Whether each timestamp may serve as a proof, by id.
    pub(crate) timestamp_validity: HashMap<String, bool>,
}

pub(crate) fn attach_past_validation(bbb: &mut BasicBuildingBlocks, past: PastValidation) {
    bbb.psv = Some(past.psv);
    bbb.psv_crs = past.psv_crs;
    bbb.pcv = Some(past.pcv);
    bbb.vts = Some(past.vts);
}

/// Walks the timestamps newest first. A timestamp whose basic validation passed, or whose
/// past validation passes with the proofs gathered so far, proves the objects it covers.
///
/// Past validation blocks computed on the way are attached to the timestamps' building blocks.
pub(crate) fn proofs_of_existence(
    ctx: &ValidationContext<'_>,
    timestamp_blocks: &mut [BasicBuildingBlocks],
    revocation_conclusions: &HashMap<String, Conclusion>,
) -> ProofsOfExistence {
    let mut store = PoeStore::new(ctx.current_time);
    let mut timestamp_validity = HashMap::new();

    let mut timestamps: Vec<_> = ctx.data.timestamps.iter().collect();
    timestamps.sort_by(|a, b| b.production_time.cmp(&a.production_time).then_with(|| a.id.cmp(&b.id)));

    for timestamp in timestamps {
        let Some(bbb) = timestamp_blocks.iter_mut().find(|b| b.id == timestamp.id) else {
            continue;
        };
        let mut valid = bbb.conclusion.is_passed();
        if !valid && bbb.conclusion.is_indeterminate() && poe_healable(bbb.conclusion.sub_indication) {
            let revocations = selected_revocations(ctx, bbb);
            let evidence = Evidence {
                poe: &store,
                revocation_conclusions,
            };
            let past =
                past_signature_validation(ctx, Token::Timestamp(timestamp), &bbb.conclusion, &revocations, &evidence);
            valid = past.psv.is_passed();
            attach_past_validation(bbb, past);
        }
        if valid {
            store.add_from_timestamp(&ctx.index, timestamp);
        } else {
            tracing::debug!(timestamp_id = %timestamp.id, "timestamp provides no proof of existence");
        }
        timestamp_validity.insert(timestamp.id.clone(), valid);
    }

    ProofsOfExistence {
        store,
        timestamp_validity,
    }
}

/// Runs the archival level for `signature` on top of its long-term block.
///
/// Returns the archival block and, when the long-term verdict needed it, the past signature
/// validation to attach to the signature's building blocks.
pub(crate) fn archival_validation(
    ctx: &ValidationContext<'_>,
    signature: &Signature,
    basic: &BasicBuildingBlocks,
    long_term: &Block,
    proofs: &ProofsOfExistence,
    timestamp_conclusions: &HashMap<String, Conclusion>,
    revocation_conclusions: &HashMap<String, Conclusion>,
) -> (Block, Option<PastValidation>) {
    let token = Token::Signature(signature);
    let poe = &proofs.store;
    let mut chain = ConstraintChain::new();

    let acceptable = archival_acceptable(&long_term.conclusion);
    chain.check(
        Check::result_with(MessageTag::ARCH_LTVV, &long_term.id, &long_term.conclusion, acceptable)
            .answer(MessageTag::ARCH_LTVV_ANS),
    );
    if !acceptable {
        return (finish(signature, chain, poe), None);
    }

    let timestamp_valid = ctx.policy.timestamp_constraints().and_then(|t| level_of(&t.timestamp_valid));
    for timestamp in ctx.index.timestamps_covering(&signature.id).iter().rev() {
        let conclusion = timestamp_conclusions.get(&timestamp.id).cloned().unwrap_or_default();
        let valid = proofs.timestamp_validity.get(&timestamp.id).copied().unwrap_or(false);
        chain.check(
            Check::new(MessageTag::ARCH_ITVPC, valid)
                .level(timestamp_valid)
                .answer(MessageTag::ARCH_ITVPC_ANS)
                .on_failure(
                    conclusion.indication.unwrap_or(Indication::Indeterminate),
                    conclusion.sub_indication,
                )
                .block_id(timestamp.id.as_str()),
        );
    }

    if long_term.is_passed() {
        return (finish(signature, chain, poe), None);
    }

    let revocations = selected_revocations(ctx, basic);
    let evidence = Evidence {
        poe,
        revocation_conclusions,
    };
    let past = past_signature_validation(ctx, token, &long_term.conclusion, &revocations, &evidence);
    chain.check(
        Check::result(MessageTag::PSV_IPSVC, &past.psv.id, &past.psv.conclusion).answer(MessageTag::PSV_IPSVC_ANS),
    );

    let sub_indication = if poe.has_earlier_proof(&signature.id) {
        SubIndication::CryptoConstraintsFailure
    } else {
        SubIndication::CryptoConstraintsFailureNoPoe
    };
    let chain_certificates = ctx.index.chain(token.signing_certificate_id(), token.chain_ids());
    let targets = all_targets(ctx, token, &chain_certificates, &revocations);
    check_targets_at(
        &mut chain,
        ctx,
        &targets,
        poe.lowest(&signature.id),
        MessageTag::TSV_WACRABST,
        sub_indication,
    );

    (finish(signature, chain, poe), Some(past))
}

fn finish(signature: &Signature, chain: ConstraintChain, poe: &PoeStore) -> Block {
    let control_time = poe.lowest(&signature.id);
    Block::from_chain(BlockKind::ArchivalData, &signature.id, chain).with_detail(BlockDetail::BestSignatureTime {
        best_signature_time: best_signature_time(signature, control_time, poe.current_time()),
        control_time,
    })
}
