// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Reports produced by a validation run.

mod block;
mod certificate;
mod detailed;
mod simple;

pub use block::{Block, BlockDetail, BlockKind};
pub use certificate::{CertificateRevocationSummary, SimpleCertificateReport};
pub use detailed::{CertificateValidation, DetailedReport, ReportScope, SignatureValidation, TimestampValidation};
pub use simple::{Messages, SimpleCertificate, SimpleReport, SimpleSignature, SimpleTimestamp};

use serde::Serialize;

/// Panic message of detailed-report accessors that only exist for signature validation.
pub const SIGNATURE_SCOPE_REQUIRED: &str = "this accessor requires a detailed report of a signature validation";

/// Panic message of detailed-report accessors that only exist for certificate validation.
pub const CERTIFICATE_SCOPE_REQUIRED: &str = "this accessor requires a detailed report of a certificate validation";

/// Reports of a signature validation run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reports {
    pub detailed_report: DetailedReport,
    pub simple_report: SimpleReport,
}

/// Reports of a certificate validation run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateReports {
    pub detailed_report: DetailedReport,
    pub simple_report: SimpleCertificateReport,
}
