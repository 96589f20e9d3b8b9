// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Nodes of the detailed report.

use crate::crypto::CryptographicValidation;
use crate::qualification::{CertificateQualification, QualificationTime, SignatureQualification};
use ades_validation_conclusion::{Conclusion, Constraint, ConstraintChain, MessageTag};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Validation block kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockKind {
    Fc,
    Ics,
    Cv,
    Sav,
    Xcv,
    SubXcv,
    Crs,
    Rac,
    Rfc,
    Psv,
    PsvCrs,
    Vts,
    Pcv,
    LongTermData,
    ArchivalData,
    TlAnalysis,
    CertQualification,
    SignatureQualification,
}

/// Values a block computes besides its conclusion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockDetail {
    Cryptographic(CryptographicValidation),
    #[serde(rename_all = "camelCase")]
    ControlTime { control_time: DateTime<Utc> },
    /// `control_time` is the proof-of-existence time the checks ran at; `best_signature_time` is
    /// the earliest valid timestamp time, else the claimed signing time.
    #[serde(rename_all = "camelCase")]
    BestSignatureTime {
        best_signature_time: DateTime<Utc>,
        control_time: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    Revocation {
        revocation_id: String,
        production_date: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    SelectedRevocation { revocation_id: Option<String> },
    #[serde(rename_all = "camelCase")]
    Certificate {
        certificate_id: String,
        trust_anchor: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        selected_revocation: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    CertificateQualification {
        time: QualificationTime,
        qualification: CertificateQualification,
    },
    #[serde(rename_all = "camelCase")]
    SignatureQualification { qualification: SignatureQualification },
}

/// One evaluated validation block: its ordered constraints, its conclusion and the child blocks
/// its result checks refer to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub kind: BlockKind,
    pub id: String,
    pub constraints: Vec<Constraint>,
    pub conclusion: Conclusion,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Block>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<BlockDetail>,
}

impl Block {
    pub(crate) fn from_chain(kind: BlockKind, id: impl Into<String>, chain: ConstraintChain) -> Self {
        let (constraints, conclusion) = chain.finish();
        let block = Self {
            kind,
            id: id.into(),
            constraints,
            conclusion,
            children: Vec::new(),
            detail: None,
        };
        tracing::debug!(
            block = ?block.kind,
            token_id = %block.id,
            indication = ?block.conclusion.indication,
            sub_indication = ?block.conclusion.sub_indication,
            "validation block concluded"
        );
        block
    }

    pub(crate) fn with_child(mut self, child: Block) -> Self {
        self.children.push(child);
        self
    }

    pub(crate) fn with_children(mut self, children: impl IntoIterator<Item = Block>) -> Self {
        self.children.extend(children);
        self
    }

    pub(crate) fn with_detail(mut self, detail: BlockDetail) -> Self {
        self.detail = Some(detail);
        self
    }

    pub fn is_passed(&self) -> bool {
        self.conclusion.is_passed()
    }

    /// First constraint named `tag`.
    pub fn constraint(&self, tag: MessageTag) -> Option<&Constraint> {
        self.constraints.iter().find(|c| c.is(tag))
    }

    pub fn constraints_named(&self, tag: MessageTag) -> impl Iterator<Item = &Constraint> {
        self.constraints.iter().filter(move |c| c.is(tag))
    }

    pub fn has_constraint(&self, tag: MessageTag) -> bool {
        self.constraint(tag).is_some()
    }

    /// First direct child of `kind`.
    pub fn child(&self, kind: BlockKind) -> Option<&Block> {
        self.children.iter().find(|b| b.kind == kind)
    }

    pub fn children_of(&self, kind: BlockKind) -> impl Iterator<Item = &Block> {
        self.children.iter().filter(move |b| b.kind == kind)
    }

    /// Depth-first search through this block and its descendants.
    pub fn find(&self, kind: BlockKind, id: &str) -> Option<&Block> {
        if self.kind == kind && self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(kind, id))
    }

    /// Whether any constraint in this subtree is named `tag`.
    pub fn contains_constraint(&self, tag: MessageTag) -> bool {
        self.has_constraint(tag) || self.children.iter().any(|c| c.contains_constraint(tag))
    }

    pub fn cryptographic_validation(&self) -> Option<&CryptographicValidation> {
        match &self.detail {
            Some(BlockDetail::Cryptographic(crypto)) => Some(crypto),
            _ => None,
        }
    }

    pub fn control_time(&self) -> Option<DateTime<Utc>> {
        match &self.detail {
            Some(BlockDetail::ControlTime { control_time } | BlockDetail::BestSignatureTime { control_time, .. }) => {
                Some(*control_time)
            }
            _ => None,
        }
    }

    pub fn best_signature_time(&self) -> Option<DateTime<Utc>> {
        match &self.detail {
            Some(BlockDetail::BestSignatureTime { best_signature_time, .. }) => Some(*best_signature_time),
            _ => None,
        }
    }
}
