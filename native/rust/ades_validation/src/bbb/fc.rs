// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::context::ValidationContext;
use crate::report::{Block, BlockKind};
use ades_validation_conclusion::{Check, ConstraintChain, Indication, Message, MessageTag, SubIndication};
use ades_validation_diagnostic::Signature;
use ades_validation_policy::Context;

/// Format checking.
pub(crate) fn format_checking(ctx: &ValidationContext<'_>, signature: &Signature, context: Context) -> Block {
    let mut chain = ConstraintChain::new();
    let formats = ctx
        .policy
        .signature_constraints(context)
        .and_then(|c| c.acceptable_formats.as_ref());
    if let Some(formats) = formats {
        let format = signature.signature_format.as_deref().unwrap_or_default();
        chain.check(
            Check::new(MessageTag::BBB_FC_IEFF, formats.accepts(format))
                .level(Some(formats.level))
                .answer(Message::new(MessageTag::BBB_FC_IEFF_ANS).with_text(format))
                .on_failure(Indication::Failed, SubIndication::FormatFailure),
        );
    }
    Block::from_chain(BlockKind::Fc, &signature.id, chain)
}
