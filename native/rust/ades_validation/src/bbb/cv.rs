// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::context::ValidationContext;
use crate::report::{Block, BlockKind};
use crate::token::Token;
use ades_validation_conclusion::{Check, ConstraintChain, Indication, MessageTag, SubIndication};
use ades_validation_policy::level_of;

/// Cryptographic verification: reads the intactness flags computed upstream.
pub(crate) fn cryptographic_verification(ctx: &ValidationContext<'_>, token: Token<'_>) -> Block {
    let basic = ctx.basic_constraints(token.context());
    let mut chain = ConstraintChain::new();

    match token {
        Token::Signature(signature) => {
            let existence = basic.and_then(|b| level_of(&b.reference_data_existence));
            let intact = basic.and_then(|b| level_of(&b.reference_data_intact));
            for matcher in &signature.digest_matchers {
                let mut found_check = Check::new(MessageTag::BBB_CV_IRDOF, matcher.data_found)
                    .level(existence)
                    .answer(MessageTag::BBB_CV_IRDOF_ANS)
                    .on_failure(Indication::Indeterminate, SubIndication::SignedDataNotFound);
                let mut intact_check = Check::new(MessageTag::BBB_CV_IRDOI, matcher.data_intact)
                    .level(intact)
                    .answer(MessageTag::BBB_CV_IRDOI_ANS)
                    .on_failure(Indication::Failed, SubIndication::HashFailure);
                if let Some(name) = &matcher.name {
                    found_check = found_check.additional_info(name.clone());
                    intact_check = intact_check.additional_info(name.clone());
                }
                chain.check(found_check);
                chain.check(intact_check);
            }
        }
        Token::Timestamp(timestamp) => {
            let constraints = ctx.policy.timestamp_constraints();
            chain.check(
                Check::new(MessageTag::BBB_CV_TSP_IRDOF, timestamp.message_imprint.data_found)
                    .level(constraints.and_then(|c| level_of(&c.message_imprint_data_found)))
                    .answer(MessageTag::BBB_CV_TSP_IRDOF_ANS)
                    .on_failure(Indication::Indeterminate, SubIndication::SignedDataNotFound),
            );
            chain.check(
                Check::new(MessageTag::BBB_CV_TSP_IRDOI, timestamp.message_imprint.data_intact)
                    .level(constraints.and_then(|c| level_of(&c.message_imprint_data_intact)))
                    .answer(MessageTag::BBB_CV_TSP_IRDOI_ANS)
                    .on_failure(Indication::Failed, SubIndication::HashFailure),
            );
        }
        Token::Revocation(_) | Token::Certificate(_) => {}
    }

    chain.check(
        Check::new(MessageTag::BBB_CV_ISI, token.basic_signature().signature_intact)
            .level(basic.and_then(|b| level_of(&b.signature_intact)))
            .answer(MessageTag::BBB_CV_ISI_ANS)
            .on_failure(Indication::Failed, SubIndication::SigCryptoFailure),
    );

    Block::from_chain(BlockKind::Cv, token.id(), chain)
}
