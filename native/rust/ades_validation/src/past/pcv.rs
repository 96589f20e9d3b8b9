// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::bbb::xcv::validated_prefix;
use crate::context::ValidationContext;
use crate::past::vts::validation_time_sliding;
use crate::past::Evidence;
use crate::report::{Block, BlockDetail, BlockKind};
use crate::token::Token;
use ades_validation_conclusion::{Check, ConstraintChain, Indication, Message, MessageTag, SubIndication};
use chrono::{DateTime, Utc};

/// Past certificate validation: the chain is checked at the control time VTS establishes.
pub(crate) struct PastCertificateValidation {
    pub(crate) pcv: Block,
    pub(crate) vts: Block,
    pub(crate) control_time: DateTime<Utc>,
}

pub(crate) fn past_certificate_validation(
    ctx: &ValidationContext<'_>,
    token: Token<'_>,
    evidence: &Evidence<'_>,
) -> PastCertificateValidation {
    let (vts, control_time) = validation_time_sliding(ctx, token, evidence);
    let mut chain = ConstraintChain::new();

    chain.check(Check::result(MessageTag::PCV_IVTSC, &vts.id, &vts.conclusion).answer(MessageTag::PCV_IVTSC_ANS));

    let chain_certificates = ctx.index.chain(token.signing_certificate_id(), token.chain_ids());
    for certificate in validated_prefix(&chain_certificates).iter().filter(|c| !c.trusted) {
        chain.check(
            Check::new(MessageTag::PCV_ICTIVRC, certificate.is_valid_at(control_time))
                .fail()
                .answer(Message::new(MessageTag::PCV_ICTIVRC_ANS).with_time(control_time))
                .on_failure(Indication::Indeterminate, SubIndication::OutOfBoundsNoPoe)
                .additional_info(certificate.id.as_str()),
        );
    }

    let pcv = Block::from_chain(BlockKind::Pcv, token.id(), chain).with_detail(BlockDetail::ControlTime { control_time });
    PastCertificateValidation {
        pcv,
        vts,
        control_time,
    }
}
