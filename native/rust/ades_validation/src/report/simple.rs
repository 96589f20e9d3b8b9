// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::bbb::BasicBuildingBlocks;
use crate::qualification::SignatureQualification;
use crate::report::{Block, DetailedReport, SignatureValidation};
use ades_validation_conclusion::{Conclusion, Indication, Message, SubIndication};
use ades_validation_diagnostic::{DiagnosticData, Signature, Timestamp, TimestampType};
use ades_validation_policy::ValidationPolicy;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Errors, warnings and infos of one part of a verdict.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Messages {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<Message>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Message>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub infos: Vec<Message>,
}

impl From<&Conclusion> for Messages {
    fn from(conclusion: &Conclusion) -> Self {
        Self {
            errors: conclusion.errors.clone(),
            warnings: conclusion.warnings.clone(),
            infos: conclusion.infos.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleCertificate {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualified_name: Option<String>,
    pub trusted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleTimestamp {
    pub id: String,
    pub production_time: DateTime<Utc>,
    pub timestamp_type: TimestampType,
    pub indication: Indication,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_indication: Option<SubIndication>,
    pub details: Messages,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleSignature {
    pub id: String,
    pub counter_signature: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signing_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_signature_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signed_by: Option<String>,
    pub certificate_chain: Vec<SimpleCertificate>,
    pub indication: Indication,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_indication: Option<SubIndication>,
    pub qualification: SignatureQualification,
    pub ades_details: Messages,
    pub qualification_details: Messages,
    pub timestamps: Vec<SimpleTimestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension_period_min: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension_period_max: Option<DateTime<Utc>>,
}

/// Collapsed verdict of a signature validation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleReport {
    pub policy_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_description: Option<String>,
    pub validation_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_name: Option<String>,
    pub signatures_count: usize,
    pub valid_signatures_count: usize,
    pub signatures: Vec<SimpleSignature>,
    /// Timestamps not attached to any signature.
    pub timestamps: Vec<SimpleTimestamp>,
    /// Meaning of every indication and sub-indication used, by name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantics: Option<BTreeMap<String, String>>,
}

impl SimpleReport {
    pub fn first_signature_id(&self) -> Option<&str> {
        self.signatures.first().map(|s| s.id.as_str())
    }

    pub fn signature(&self, id: &str) -> Option<&SimpleSignature> {
        self.signatures.iter().find(|s| s.id == id)
    }

    pub fn indication(&self, signature_id: &str) -> Option<Indication> {
        self.signature(signature_id).map(|s| s.indication)
    }

    pub fn sub_indication(&self, signature_id: &str) -> Option<SubIndication> {
        self.signature(signature_id).and_then(|s| s.sub_indication)
    }

    pub fn signature_qualification(&self, signature_id: &str) -> SignatureQualification {
        self.signature(signature_id)
            .map_or(SignatureQualification::Na, |s| s.qualification)
    }

    pub fn is_valid(&self, signature_id: &str) -> bool {
        self.indication(signature_id) == Some(Indication::TotalPassed)
    }

    pub fn timestamp(&self, id: &str) -> Option<&SimpleTimestamp> {
        self.timestamps
            .iter()
            .chain(self.signatures.iter().flat_map(|s| s.timestamps.iter()))
            .find(|t| t.id == id)
    }

    pub(crate) fn build(
        data: &DiagnosticData,
        policy: &ValidationPolicy,
        detailed: &DetailedReport,
        include_semantics: bool,
    ) -> Self {
        let signatures: Vec<SimpleSignature> = detailed
            .signatures
            .iter()
            .filter_map(|validation| {
                let signature = data.signature(&validation.id)?;
                Some(simple_signature(data, detailed, signature, validation))
            })
            .collect();
        let timestamps = data
            .detached_timestamps()
            .map(|t| simple_timestamp(detailed, t))
            .collect::<Vec<_>>();

        let semantics = include_semantics.then(|| {
            let mut map = BTreeMap::new();
            let mut note = |indication: Indication, sub: Option<SubIndication>| {
                map.insert(indication.name().to_string(), indication.semantics().to_string());
                if let Some(sub) = sub {
                    map.insert(sub.name().to_string(), sub.semantics().to_string());
                }
            };
            for s in &signatures {
                note(s.indication, s.sub_indication);
                for t in &s.timestamps {
                    note(t.indication, t.sub_indication);
                }
            }
            for t in &timestamps {
                note(t.indication, t.sub_indication);
            }
            map
        });

        Self {
            policy_name: policy.name.clone(),
            policy_description: policy.description.clone(),
            validation_time: detailed.validation_time,
            document_name: data.document_name.clone(),
            signatures_count: signatures.len(),
            valid_signatures_count: signatures
                .iter()
                .filter(|s| s.indication == Indication::TotalPassed)
                .count(),
            signatures,
            timestamps,
            semantics,
        }
    }
}

fn simple_timestamp(detailed: &DetailedReport, timestamp: &Timestamp) -> SimpleTimestamp {
    let conclusion = detailed.timestamp_conclusion(&timestamp.id).cloned().unwrap_or_default();
    SimpleTimestamp {
        id: timestamp.id.clone(),
        production_time: timestamp.production_time,
        timestamp_type: timestamp.timestamp_type,
        indication: conclusion.indication.unwrap_or(Indication::Indeterminate),
        sub_indication: conclusion.sub_indication,
        details: Messages::from(&conclusion),
    }
}

fn simple_signature(
    data: &DiagnosticData,
    detailed: &DetailedReport,
    signature: &Signature,
    validation: &SignatureValidation,
) -> SimpleSignature {
    let basic = detailed.basic_building_blocks(&signature.id);
    let certificate_chain: Vec<SimpleCertificate> = basic
        .map(|b| b.certificate_chain.as_slice())
        .unwrap_or_default()
        .iter()
        .map(|item| SimpleCertificate {
            id: item.id.clone(),
            qualified_name: data
                .certificate(&item.id)
                .and_then(|c| c.subject.common_name.clone()),
            trusted: item.trusted,
        })
        .collect();
    let signed_by = certificate_chain.first().and_then(|c| c.qualified_name.clone());

    let timestamps = data
        .timestamps
        .iter()
        .filter(|t| signature.timestamp_ids.contains(&t.id))
        .map(|t| simple_timestamp(detailed, t))
        .collect();

    let conclusion = &validation.conclusion;
    let indication = conclusion.indication.unwrap_or(Indication::Indeterminate);
    let (extension_period_min, extension_period_max) =
        if indication == Indication::TotalPassed || conclusion.has_sub_indication(SubIndication::TryLater) {
            extension_period(data, basic)
        } else {
            (None, None)
        };

    SimpleSignature {
        id: signature.id.clone(),
        counter_signature: validation.counter_signature,
        parent_id: signature.parent_id.clone(),
        signature_level: signature.signature_format.clone(),
        signing_time: signature.claimed_signing_time,
        best_signature_time: validation.highest_level_block().and_then(Block::best_signature_time),
        signed_by,
        certificate_chain,
        indication,
        sub_indication: conclusion.sub_indication,
        qualification: detailed.signature_qualification(&signature.id),
        ades_details: Messages::from(conclusion),
        qualification_details: validation
            .qualification
            .as_ref()
            .map(|b| Messages::from(&b.conclusion))
            .unwrap_or_default(),
        timestamps,
        extension_period_min,
        extension_period_max,
    }
}

fn collect_expirations(block: &Block, into: &mut Vec<DateTime<Utc>>) {
    if let Some(not_after) = block.cryptographic_validation().and_then(|c| c.not_after) {
        into.push(not_after);
    }
    for child in &block.children {
        collect_expirations(child, into);
    }
}

/// Earliest and latest of the selected revocations' next updates and the algorithms' expirations.
fn extension_period(
    data: &DiagnosticData,
    basic: Option<&BasicBuildingBlocks>,
) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    let Some(basic) = basic else {
        return (None, None);
    };
    let mut dates: Vec<DateTime<Utc>> = basic
        .selected_revocations()
        .into_iter()
        .filter_map(|(_, revocation_id)| data.revocation(revocation_id)?.next_update)
        .collect();
    for block in basic.blocks() {
        collect_expirations(block, &mut dates);
    }
    (dates.iter().min().copied(), dates.iter().max().copied())
}
