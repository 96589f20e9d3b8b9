// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::bbb::BasicBuildingBlocks;
use crate::options::ValidationLevel;
use crate::qualification::cert::qualification_of;
use crate::qualification::signature::qualification_of_signature;
use crate::qualification::{CertificateQualification, QualificationTime, SignatureQualification};
use crate::report::{Block, BlockDetail, BlockKind, CERTIFICATE_SCOPE_REQUIRED, SIGNATURE_SCOPE_REQUIRED};
use ades_validation_conclusion::{Conclusion, Indication, SubIndication};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// What a detailed report was produced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportScope {
    Signatures,
    Certificate,
}

/// Validation levels computed for one signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureValidation {
    pub id: String,
    pub counter_signature: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_term_data: Option<Block>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archival_data: Option<Block>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualification: Option<Block>,
    /// Conclusion of the requested level; PASSED and FAILED are reported as their total forms.
    pub conclusion: Conclusion,
}

impl SignatureValidation {
    /// Block of the highest level computed.
    pub fn highest_level_block(&self) -> Option<&Block> {
        self.archival_data.as_ref().or(self.long_term_data.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimestampValidation {
    pub id: String,
    /// Not attached to any signature.
    pub detached: bool,
    pub conclusion: Conclusion,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateValidation {
    pub certificate_id: String,
    /// Qualification blocks at issuance time and at validation time.
    pub qualifications: Vec<Block>,
    pub conclusion: Conclusion,
}

/// Every block evaluated during a run, queryable by token id and check name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedReport {
    pub validation_time: DateTime<Utc>,
    pub validation_level: ValidationLevel,
    pub policy_name: String,
    pub scope: ReportScope,
    pub signatures: Vec<SignatureValidation>,
    pub timestamps: Vec<TimestampValidation>,
    pub basic_building_blocks: Vec<BasicBuildingBlocks>,
    pub trusted_lists: Vec<Block>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate: Option<CertificateValidation>,
}

impl DetailedReport {
    fn require_signatures(&self) {
        if self.scope != ReportScope::Signatures {
            panic!("{}", SIGNATURE_SCOPE_REQUIRED);
        }
    }

    fn require_certificate(&self) -> &CertificateValidation {
        match (&self.scope, &self.certificate) {
            (ReportScope::Certificate, Some(certificate)) => certificate,
            _ => panic!("{}", CERTIFICATE_SCOPE_REQUIRED),
        }
    }

    /// # Panics
    ///
    /// Panics with [`SIGNATURE_SCOPE_REQUIRED`] on a certificate report.
    pub fn first_signature_id(&self) -> Option<&str> {
        self.require_signatures();
        self.signatures.first().map(|s| s.id.as_str())
    }

    /// # Panics
    ///
    /// Panics with [`SIGNATURE_SCOPE_REQUIRED`] on a certificate report.
    pub fn signature(&self, id: &str) -> Option<&SignatureValidation> {
        self.require_signatures();
        self.signatures.iter().find(|s| s.id == id)
    }

    pub fn basic_building_blocks(&self, token_id: &str) -> Option<&BasicBuildingBlocks> {
        self.basic_building_blocks.iter().find(|b| b.id == token_id)
    }

    /// Final indication of a signature.
    ///
    /// # Panics
    ///
    /// Panics with [`SIGNATURE_SCOPE_REQUIRED`] on a certificate report.
    pub fn indication(&self, signature_id: &str) -> Option<Indication> {
        self.final_conclusion(signature_id)?.indication
    }

    /// # Panics
    ///
    /// Panics with [`SIGNATURE_SCOPE_REQUIRED`] on a certificate report.
    pub fn sub_indication(&self, signature_id: &str) -> Option<SubIndication> {
        self.final_conclusion(signature_id)?.sub_indication
    }

    /// # Panics
    ///
    /// Panics with [`SIGNATURE_SCOPE_REQUIRED`] on a certificate report.
    pub fn final_conclusion(&self, signature_id: &str) -> Option<&Conclusion> {
        self.signature(signature_id).map(|s| &s.conclusion)
    }

    /// Conclusion of the basic building blocks of any token.
    pub fn basic_conclusion(&self, token_id: &str) -> Option<&Conclusion> {
        self.basic_building_blocks(token_id).map(|b| &b.conclusion)
    }

    /// # Panics
    ///
    /// Panics with [`SIGNATURE_SCOPE_REQUIRED`] on a certificate report.
    pub fn long_term_data(&self, signature_id: &str) -> Option<&Block> {
        self.signature(signature_id)?.long_term_data.as_ref()
    }

    /// # Panics
    ///
    /// Panics with [`SIGNATURE_SCOPE_REQUIRED`] on a certificate report.
    pub fn archival_data(&self, signature_id: &str) -> Option<&Block> {
        self.signature(signature_id)?.archival_data.as_ref()
    }

    /// Best signature time reached by the highest level computed for a signature.
    ///
    /// # Panics
    ///
    /// Panics with [`SIGNATURE_SCOPE_REQUIRED`] on a certificate report.
    pub fn best_signature_time(&self, signature_id: &str) -> Option<DateTime<Utc>> {
        self.signature(signature_id)?.highest_level_block()?.best_signature_time()
    }

    /// # Panics
    ///
    /// Panics with [`SIGNATURE_SCOPE_REQUIRED`] on a certificate report.
    pub fn signature_qualification(&self, signature_id: &str) -> SignatureQualification {
        self.signature(signature_id)
            .and_then(|s| s.qualification.as_ref())
            .map_or(SignatureQualification::Na, qualification_of_signature)
    }

    /// Conclusion of the XCV block of a token.
    ///
    /// # Panics
    ///
    /// Panics with [`SIGNATURE_SCOPE_REQUIRED`] on a certificate report.
    pub fn xcv_conclusion(&self, token_id: &str) -> Option<&Conclusion> {
        self.require_signatures();
        self.basic_building_blocks(token_id)?.xcv.as_ref().map(|b| &b.conclusion)
    }

    pub fn timestamp_conclusion(&self, timestamp_id: &str) -> Option<&Conclusion> {
        self.timestamps
            .iter()
            .find(|t| t.id == timestamp_id)
            .map(|t| &t.conclusion)
    }

    pub fn trusted_list_analysis(&self, list_id: &str) -> Option<&Block> {
        self.trusted_lists.iter().find(|b| b.id == list_id)
    }

    /// Conclusion of a certificate validation.
    ///
    /// # Panics
    ///
    /// Panics with [`CERTIFICATE_SCOPE_REQUIRED`] on a signature report.
    pub fn certificate_conclusion(&self) -> &Conclusion {
        &self.require_certificate().conclusion
    }

    /// Qualification of the validated certificate at `time`.
    ///
    /// # Panics
    ///
    /// Panics with [`CERTIFICATE_SCOPE_REQUIRED`] on a signature report.
    pub fn certificate_qualification(&self, time: QualificationTime) -> CertificateQualification {
        self.require_certificate()
            .qualifications
            .iter()
            .find(|b| matches!(b.detail, Some(BlockDetail::CertificateQualification { time: t, .. }) if t == time))
            .map_or(CertificateQualification::Na, qualification_of)
    }

    /// First block of `kind` for `id` anywhere in the report.
    pub fn find_block(&self, kind: BlockKind, id: &str) -> Option<&Block> {
        let from_bbb = self.basic_building_blocks.iter().flat_map(|b| b.blocks());
        let from_signatures = self.signatures.iter().flat_map(|s| {
            [&s.long_term_data, &s.archival_data, &s.qualification]
                .into_iter()
                .flatten()
        });
        let from_certificate = self.certificate.iter().flat_map(|c| c.qualifications.iter());
        from_bbb
            .chain(from_signatures)
            .chain(from_certificate)
            .chain(self.trusted_lists.iter())
            .find_map(|b| b.find(kind, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(scope: ReportScope) -> DetailedReport {
        DetailedReport {
            validation_time: DateTime::<Utc>::default(),
            validation_level: ValidationLevel::ArchivalData,
            policy_name: "test".to_string(),
            scope,
            signatures: Vec::new(),
            timestamps: Vec::new(),
            basic_building_blocks: Vec::new(),
            trusted_lists: Vec::new(),
            certificate: None,
        }
    }

    #[test]
    #[should_panic(expected = "requires a detailed report of a signature validation")]
    fn xcv_conclusion_on_certificate_report_panics() {
        report(ReportScope::Certificate).xcv_conclusion("C-1");
    }

    #[test]
    #[should_panic(expected = "requires a detailed report of a certificate validation")]
    fn certificate_conclusion_on_signature_report_panics() {
        report(ReportScope::Signatures).certificate_conclusion();
    }

    #[test]
    fn missing_signature_has_no_qualification() {
        assert_eq!(
            report(ReportScope::Signatures).signature_qualification("S-1"),
            SignatureQualification::Na
        );
    }
}
