// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Basic building blocks: the per-token bundle of FC, ICS, CV, SAV and XCV, plus the past
//! validation blocks attached by the archival level.

pub(crate) mod cv;
pub(crate) mod fc;
pub(crate) mod ics;
pub(crate) mod revocation;
pub(crate) mod sav;
pub(crate) mod xcv;

use crate::context::ValidationContext;
use crate::report::{Block, BlockDetail, BlockKind};
use crate::token::Token;
use ades_validation_conclusion::{Conclusion, Indication};
use ades_validation_diagnostic::TokenKind;
use serde::Serialize;

/// One certificate of a token's chain as reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainItem {
    pub id: String,
    pub trusted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicBuildingBlocks {
    pub id: String,
    pub token_kind: TokenKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fc: Option<Block>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ics: Option<Block>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cv: Option<Block>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xcv: Option<Block>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sav: Option<Block>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub psv: Option<Block>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub psv_crs: Option<Block>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pcv: Option<Block>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vts: Option<Block>,
    pub certificate_chain: Vec<ChainItem>,
    pub conclusion: Conclusion,
}

impl BasicBuildingBlocks {
    pub fn block(&self, kind: BlockKind) -> Option<&Block> {
        match kind {
            BlockKind::Fc => self.fc.as_ref(),
            BlockKind::Ics => self.ics.as_ref(),
            BlockKind::Cv => self.cv.as_ref(),
            BlockKind::Xcv => self.xcv.as_ref(),
            BlockKind::Sav => self.sav.as_ref(),
            BlockKind::Psv => self.psv.as_ref(),
            BlockKind::PsvCrs => self.psv_crs.as_ref(),
            BlockKind::Pcv => self.pcv.as_ref(),
            BlockKind::Vts => self.vts.as_ref(),
            _ => None,
        }
    }

    /// Blocks in report order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        [
            &self.fc, &self.ics, &self.cv, &self.xcv, &self.sav, &self.psv, &self.psv_crs, &self.pcv, &self.vts,
        ]
        .into_iter()
        .flatten()
    }

    /// SubXCV block of a chain certificate.
    pub fn sub_xcv(&self, certificate_id: &str) -> Option<&Block> {
        self.xcv.as_ref()?.find(BlockKind::SubXcv, certificate_id)
    }

    /// `(certificate id, revocation id)` of every revocation XCV selected, signing certificate first.
    pub fn selected_revocations(&self) -> Vec<(&str, &str)> {
        let Some(xcv) = &self.xcv else {
            return Vec::new();
        };
        xcv.children_of(BlockKind::SubXcv)
            .filter_map(|sub| match &sub.detail {
                Some(BlockDetail::Certificate {
                    certificate_id,
                    selected_revocation: Some(revocation_id),
                    ..
                }) => Some((certificate_id.as_str(), revocation_id.as_str())),
                _ => None,
            })
            .collect()
    }

    pub fn signing_certificate_id(&self) -> Option<&str> {
        self.certificate_chain.first().map(|c| c.id.as_str())
    }
}

/// Runs the basic building blocks for `token`. A certificate token only gets XCV.
pub(crate) fn build(ctx: &ValidationContext<'_>, token: Token<'_>) -> BasicBuildingBlocks {
    tracing::debug!(token_id = %token.id(), kind = ?token.kind(), "running basic building blocks");

    let certificate_chain = ctx
        .index
        .chain(token.signing_certificate_id(), token.chain_ids())
        .into_iter()
        .map(|c| ChainItem {
            id: c.id.clone(),
            trusted: c.trusted,
        })
        .collect();

    let mut bbb = BasicBuildingBlocks {
        id: token.id().to_string(),
        token_kind: token.kind(),
        fc: None,
        ics: None,
        cv: None,
        xcv: None,
        sav: None,
        psv: None,
        psv_crs: None,
        pcv: None,
        vts: None,
        certificate_chain,
        conclusion: Conclusion::default(),
    };

    if let Token::Signature(signature) = token {
        bbb.fc = Some(fc::format_checking(ctx, signature, token.context()));
    }
    if !matches!(token, Token::Certificate(_)) {
        bbb.ics = Some(ics::identification(ctx, token));
        bbb.cv = Some(cv::cryptographic_verification(ctx, token));
    }
    bbb.xcv = Some(xcv::certificate_chain_validation(ctx, token));
    if !matches!(token, Token::Certificate(_)) {
        bbb.sav = Some(sav::signature_acceptance(ctx, token));
    }

    bbb.conclusion = conclude(&bbb);
    bbb
}

/// First non-passing block wins: FC, ICS, CV when FAILED, XCV, CV when INDETERMINATE, SAV.
fn conclude(bbb: &BasicBuildingBlocks) -> Conclusion {
    let mut conclusion = Conclusion::default();
    for block in [&bbb.fc, &bbb.ics, &bbb.cv, &bbb.xcv, &bbb.sav].into_iter().flatten() {
        conclusion.merge_messages(&block.conclusion);
    }

    let cv_failed = bbb.cv.as_ref().filter(|b| b.conclusion.is_failed());
    let precedence = [
        bbb.fc.as_ref(),
        bbb.ics.as_ref(),
        cv_failed,
        bbb.xcv.as_ref(),
        bbb.cv.as_ref(),
        bbb.sav.as_ref(),
    ];
    match precedence.into_iter().flatten().find(|b| !b.is_passed()) {
        Some(block) => conclusion.set_from(&block.conclusion),
        None => conclusion.set(Indication::Passed, None),
    }
    conclusion
}

#[cfg(test)]
mod tests {
    use super::*;
    use ades_validation_conclusion::{ConstraintChain, SubIndication};

    fn block(kind: BlockKind, conclusion: Conclusion) -> Block {
        let mut block = Block::from_chain(kind, "S-1", ConstraintChain::new());
        block.conclusion = conclusion;
        block
    }

    fn bbb(cv: Conclusion, xcv: Conclusion, sav: Conclusion) -> BasicBuildingBlocks {
        BasicBuildingBlocks {
            id: "S-1".into(),
            token_kind: TokenKind::Signature,
            fc: Some(block(BlockKind::Fc, Conclusion::passed())),
            ics: Some(block(BlockKind::Ics, Conclusion::passed())),
            cv: Some(block(BlockKind::Cv, cv)),
            xcv: Some(block(BlockKind::Xcv, xcv)),
            sav: Some(block(BlockKind::Sav, sav)),
            psv: None,
            psv_crs: None,
            pcv: None,
            vts: None,
            certificate_chain: Vec::new(),
            conclusion: Conclusion::default(),
        }
    }

    #[test]
    fn failed_cv_takes_precedence_over_chain() {
        let bbb = bbb(
            Conclusion::failed(SubIndication::HashFailure),
            Conclusion::indeterminate(SubIndication::NoCertificateChainFound),
            Conclusion::passed(),
        );
        assert!(conclude(&bbb).has_sub_indication(SubIndication::HashFailure));
    }

    #[test]
    fn chain_takes_precedence_over_indeterminate_cv() {
        let bbb = bbb(
            Conclusion::indeterminate(SubIndication::SignedDataNotFound),
            Conclusion::indeterminate(SubIndication::RevokedNoPoe),
            Conclusion::indeterminate(SubIndication::CryptoConstraintsFailureNoPoe),
        );
        assert!(conclude(&bbb).has_sub_indication(SubIndication::RevokedNoPoe));
    }

    #[test]
    fn all_passed_is_passed() {
        let bbb = bbb(Conclusion::passed(), Conclusion::passed(), Conclusion::passed());
        assert!(conclude(&bbb).is_passed());
    }
}
