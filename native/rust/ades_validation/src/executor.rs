// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Entry points of a validation run.

use crate::bbb::{self, BasicBuildingBlocks};
use crate::context::ValidationContext;
use crate::error::ValidationError;
use crate::options::{ValidationLevel, ValidationOptions};
use crate::process::archival::{archival_validation, attach_past_validation, proofs_of_existence};
use crate::process::best_signature_time;
use crate::process::ltv::long_term_validation;
use crate::qualification::cert::certificate_qualification_at;
use crate::qualification::signature::{signature_qualification_block, QualificationInput};
use crate::qualification::tl::trusted_list_analysis;
use crate::qualification::{qualification_services, QualificationTime, TrustedListAcceptance};
use crate::report::{
    Block, CertificateReports, CertificateValidation, DetailedReport, ReportScope, Reports, SignatureValidation,
    SimpleCertificateReport, SimpleReport, TimestampValidation,
};
use crate::token::Token;
use ades_validation_conclusion::{Conclusion, Indication};
use ades_validation_diagnostic::DiagnosticData;
use ades_validation_policy::ValidationPolicy;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};

fn conclusions(blocks: &[BasicBuildingBlocks]) -> HashMap<String, Conclusion> {
    blocks.iter().map(|b| (b.id.clone(), b.conclusion.clone())).collect()
}

fn trusted_list_analyses(ctx: &ValidationContext<'_>) -> Vec<Block> {
    ctx.data
        .trusted_lists
        .iter()
        .map(|list| trusted_list_analysis(ctx, list))
        .collect()
}

/// Signature-level form of a conclusion.
fn total(conclusion: &Conclusion) -> Conclusion {
    let mut total = conclusion.clone();
    total.indication = Some(total.indication.unwrap_or(Indication::Indeterminate).to_total());
    total
}

fn current_time(options: &ValidationOptions, data: &DiagnosticData) -> DateTime<Utc> {
    options.current_time.unwrap_or(data.validation_date)
}

/// Validates every signature of a diagnostic data snapshot.
///
/// Each call builds its results from scratch; the executor keeps nothing between calls.
#[derive(Debug, Clone, Default)]
pub struct SignatureProcessExecutor {
    options: ValidationOptions,
}

impl SignatureProcessExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, configure: impl FnOnce(&mut ValidationOptions)) -> Self {
        configure(&mut self.options);
        self
    }

    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    /// Runs the validation process up to the configured level.
    ///
    /// Fails only when the snapshot or the policy cannot be interpreted; check failures are part
    /// of the returned reports.
    pub fn execute(&self, data: &DiagnosticData, policy: &ValidationPolicy) -> Result<Reports, ValidationError> {
        let level = self.options.validation_level;
        let current_time = current_time(&self.options, data);
        tracing::info!(
            signatures = data.signatures.len(),
            timestamps = data.timestamps.len(),
            validation_level = %level,
            policy = %policy.name,
            "validating signatures"
        );
        let ctx = ValidationContext::new(data, policy, current_time)?;

        let revocation_blocks: Vec<BasicBuildingBlocks> = data
            .revocations
            .iter()
            .map(|r| bbb::build(&ctx, Token::Revocation(r)))
            .collect();
        let revocation_conclusions = conclusions(&revocation_blocks);

        let mut timestamp_blocks: Vec<BasicBuildingBlocks> = if level >= ValidationLevel::Timestamps {
            data.timestamps
                .iter()
                .map(|t| bbb::build(&ctx, Token::Timestamp(t)))
                .collect()
        } else {
            Vec::new()
        };
        let timestamp_conclusions = conclusions(&timestamp_blocks);

        let mut signature_blocks: Vec<BasicBuildingBlocks> = data
            .signatures
            .iter()
            .map(|s| bbb::build(&ctx, Token::Signature(s)))
            .collect();

        let mut long_term: HashMap<String, Block> = HashMap::new();
        if level >= ValidationLevel::LongTermData {
            for (signature, basic) in data.signatures.iter().zip(&signature_blocks) {
                let block = long_term_validation(&ctx, signature, basic, &timestamp_conclusions);
                long_term.insert(signature.id.clone(), block);
            }
        }

        let mut archival: HashMap<String, Block> = HashMap::new();
        if level >= ValidationLevel::ArchivalData {
            let proofs = proofs_of_existence(&ctx, &mut timestamp_blocks, &revocation_conclusions);
            for (signature, basic) in data.signatures.iter().zip(signature_blocks.iter_mut()) {
                let Some(long_term_block) = long_term.get(&signature.id) else {
                    continue;
                };
                let (block, past) = archival_validation(
                    &ctx,
                    signature,
                    basic,
                    long_term_block,
                    &proofs,
                    &timestamp_conclusions,
                    &revocation_conclusions,
                );
                if let Some(past) = past {
                    attach_past_validation(basic, past);
                }
                archival.insert(signature.id.clone(), block);
            }
        }

        let trusted_lists = trusted_list_analyses(&ctx);
        let qualify = policy.eidas_constraints().is_some();

        let signatures: Vec<SignatureValidation> = data
            .signatures
            .iter()
            .zip(&signature_blocks)
            .map(|(signature, basic)| {
                let long_term_data = long_term.remove(&signature.id);
                let archival_data = archival.remove(&signature.id);
                let level_conclusion = archival_data
                    .as_ref()
                    .or(long_term_data.as_ref())
                    .map_or(&basic.conclusion, |b| &b.conclusion);
                let conclusion = total(level_conclusion);

                let qualification = qualify.then(|| {
                    let qualification_time = archival_data
                        .as_ref()
                        .or(long_term_data.as_ref())
                        .and_then(Block::best_signature_time)
                        .unwrap_or_else(|| best_signature_time(signature, current_time, current_time));
                    let chain = ctx
                        .index
                        .chain(signature.signing_certificate_id(), &signature.certificate_chain);
                    let input = QualificationInput {
                        signature_id: &signature.id,
                        conclusion: &conclusion,
                        signing_certificate: chain.first().copied(),
                        chain: &chain,
                        best_signature_time: qualification_time,
                    };
                    signature_qualification_block(data, &input, &trusted_lists)
                });

                SignatureValidation {
                    id: signature.id.clone(),
                    counter_signature: signature.is_counter_signature(),
                    long_term_data,
                    archival_data,
                    qualification,
                    conclusion,
                }
            })
            .collect();

        let detached: HashSet<&str> = data.detached_timestamps().map(|t| t.id.as_str()).collect();
        let timestamps = timestamp_blocks
            .iter()
            .map(|b| TimestampValidation {
                id: b.id.clone(),
                detached: detached.contains(b.id.as_str()),
                conclusion: b.conclusion.clone(),
            })
            .collect();

        let mut basic_building_blocks = signature_blocks;
        basic_building_blocks.extend(timestamp_blocks);
        basic_building_blocks.extend(revocation_blocks);

        let detailed_report = DetailedReport {
            validation_time: current_time,
            validation_level: level,
            policy_name: policy.name.clone(),
            scope: ReportScope::Signatures,
            signatures,
            timestamps,
            basic_building_blocks,
            trusted_lists,
            certificate: None,
        };
        let simple_report = SimpleReport::build(data, policy, &detailed_report, self.options.include_semantics);
        tracing::debug!(
            valid_signatures = simple_report.valid_signatures_count,
            signatures = simple_report.signatures_count,
            "signature validation finished"
        );

        Ok(Reports {
            detailed_report,
            simple_report,
        })
    }
}

/// Validates one certificate of a diagnostic data snapshot: its chain and its qualification at
/// issuance time and at validation time.
#[derive(Debug, Clone)]
pub struct CertificateProcessExecutor {
    certificate_id: String,
    options: ValidationOptions,
}

impl CertificateProcessExecutor {
    pub fn new(certificate_id: impl Into<String>) -> Self {
        Self {
            certificate_id: certificate_id.into(),
            options: ValidationOptions::default(),
        }
    }

    pub fn with_options(mut self, configure: impl FnOnce(&mut ValidationOptions)) -> Self {
        configure(&mut self.options);
        self
    }

    pub fn execute(
        &self,
        data: &DiagnosticData,
        policy: &ValidationPolicy,
    ) -> Result<CertificateReports, ValidationError> {
        let current_time = current_time(&self.options, data);
        tracing::info!(certificate_id = %self.certificate_id, policy = %policy.name, "validating certificate");

        let certificate = data
            .certificate(&self.certificate_id)
            .ok_or_else(|| ValidationError::DanglingReference {
                kind: "certificate",
                id: self.certificate_id.clone(),
                referenced_by: "certificate validation".to_string(),
            })?;
        let ctx = ValidationContext::new(data, policy, current_time)?;

        let certificate_block = bbb::build(&ctx, Token::Certificate(certificate));
        let trusted_lists = trusted_list_analyses(&ctx);

        let acceptance = TrustedListAcceptance::evaluate(certificate, &trusted_lists);
        let qualifications = if acceptance.acceptable_lists().is_empty() {
            Vec::new()
        } else {
            let services = qualification_services(data, certificate, &acceptance);
            let chain = ctx.index.chain(Some(certificate.id.as_str()), &certificate.certificate_chain);
            vec![
                certificate_qualification_at(
                    certificate,
                    &chain,
                    &services,
                    QualificationTime::CertificateIssuanceTime,
                    certificate.not_before,
                ),
                certificate_qualification_at(
                    certificate,
                    &chain,
                    &services,
                    QualificationTime::ValidationTime,
                    current_time,
                ),
            ]
        };

        let conclusion = certificate_block.conclusion.clone();
        let mut basic_building_blocks = vec![certificate_block];
        basic_building_blocks.extend(data.revocations.iter().map(|r| bbb::build(&ctx, Token::Revocation(r))));

        let detailed_report = DetailedReport {
            validation_time: current_time,
            validation_level: self.options.validation_level,
            policy_name: policy.name.clone(),
            scope: ReportScope::Certificate,
            signatures: Vec::new(),
            timestamps: Vec::new(),
            basic_building_blocks,
            trusted_lists,
            certificate: Some(CertificateValidation {
                certificate_id: certificate.id.clone(),
                qualifications,
                conclusion,
            }),
        };
        let simple_report = SimpleCertificateReport::build(data, policy, certificate, &detailed_report);

        Ok(CertificateReports {
            detailed_report,
            simple_report,
        })
    }
}
