// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Trusted-list facts: providers, services and their status history.

use crate::certificate::default_true;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Service type identifiers.
pub mod service_type {
    pub const CA_QC: &str = "http://uri.etsi.org/TrstSvc/Svctype/CA/QC";
    pub const NATIONAL_ROOT_CA_QC: &str = "http://uri.etsi.org/TrstSvc/Svctype/NationalRootCA-QC";
    pub const CA_PKC: &str = "http://uri.etsi.org/TrstSvc/Svctype/CA/PKC";
    pub const TSA_QTST: &str = "http://uri.etsi.org/TrstSvc/Svctype/TSA/QTST";
}

/// Service status URIs, eIDAS and pre-eIDAS.
pub mod service_status {
    pub const GRANTED: &str = "http://uri.etsi.org/TrstSvc/TrustedList/Svcstatus/granted";
    pub const WITHDRAWN: &str = "http://uri.etsi.org/TrstSvc/TrustedList/Svcstatus/withdrawn";
    pub const UNDER_SUPERVISION: &str = "http://uri.etsi.org/TrstSvc/TrustedList/Svcstatus/undersupervision";
    pub const SUPERVISION_IN_CESSATION: &str =
        "http://uri.etsi.org/TrstSvc/TrustedList/Svcstatus/supervisionincessation";
    pub const SUPERVISION_REVOKED: &str = "http://uri.etsi.org/TrstSvc/TrustedList/Svcstatus/supervisionrevoked";
    pub const ACCREDITED: &str = "http://uri.etsi.org/TrstSvc/TrustedList/Svcstatus/accredited";
    pub const ACCREDITATION_CEASED: &str = "http://uri.etsi.org/TrstSvc/TrustedList/Svcstatus/accreditationceased";
    pub const ACCREDITATION_REVOKED: &str = "http://uri.etsi.org/TrstSvc/TrustedList/Svcstatus/accreditationrevoked";
    pub const SET_BY_NATIONAL_LAW: &str = "http://uri.etsi.org/TrstSvc/TrustedList/Svcstatus/setbynationallaw";
    pub const DEPRECATED_BY_NATIONAL_LAW: &str =
        "http://uri.etsi.org/TrstSvc/TrustedList/Svcstatus/deprecatedbynationallaw";

    /// Statuses with the effect of `granted`.
    pub fn is_granted(status: &str) -> bool {
        matches!(
            status,
            GRANTED | UNDER_SUPERVISION | SUPERVISION_IN_CESSATION | ACCREDITED | SET_BY_NATIONAL_LAW
        )
    }
}

/// Qualifier URIs captured from `Qualifications` service information extensions.
pub mod qualifier {
    pub const QC_STATEMENT: &str = "http://uri.etsi.org/TrstSvc/TrustedList/SvcInfoExt/QCStatement";
    pub const NOT_QUALIFIED: &str = "http://uri.etsi.org/TrstSvc/TrustedList/SvcInfoExt/NotQualified";
    pub const QC_FOR_ESIG: &str = "http://uri.etsi.org/TrstSvc/TrustedList/SvcInfoExt/QCForESig";
    pub const QC_FOR_ESEAL: &str = "http://uri.etsi.org/TrstSvc/TrustedList/SvcInfoExt/QCForESeal";
    pub const QC_FOR_WSA: &str = "http://uri.etsi.org/TrstSvc/TrustedList/SvcInfoExt/QCForWSA";
    pub const QC_WITH_QSCD: &str = "http://uri.etsi.org/TrstSvc/TrustedList/SvcInfoExt/QCWithQSCD";
    pub const QC_NO_QSCD: &str = "http://uri.etsi.org/TrstSvc/TrustedList/SvcInfoExt/QCNoQSCD";
    pub const QC_QSCD_STATUS_AS_IN_CERT: &str =
        "http://uri.etsi.org/TrstSvc/TrustedList/SvcInfoExt/QCQSCDStatusAsInCert";
    pub const QC_QSCD_MANAGED_ON_BEHALF: &str =
        "http://uri.etsi.org/TrstSvc/TrustedList/SvcInfoExt/QCQSCDManagedOnBehalf";
    pub const QC_WITH_SSCD: &str = "http://uri.etsi.org/TrstSvc/TrustedList/SvcInfoExt/QCWithSSCD";
    pub const QC_NO_SSCD: &str = "http://uri.etsi.org/TrstSvc/TrustedList/SvcInfoExt/QCNoSSCD";
    pub const QC_SSCD_STATUS_AS_IN_CERT: &str =
        "http://uri.etsi.org/TrstSvc/TrustedList/SvcInfoExt/QCSSCDStatusAsInCert";
    pub const QC_FOR_LEGAL_PERSON: &str = "http://uri.etsi.org/TrstSvc/TrustedList/SvcInfoExt/QCForLegalPerson";
}

/// `AdditionalServiceInformation` URIs.
pub mod additional_service_info {
    pub const FOR_ESIGNATURES: &str = "http://uri.etsi.org/TrstSvc/TrustedList/SvcInfoExt/ForeSignatures";
    pub const FOR_ESEALS: &str = "http://uri.etsi.org/TrstSvc/TrustedList/SvcInfoExt/ForeSeals";
    pub const FOR_WEB_AUTHENTICATION: &str =
        "http://uri.etsi.org/TrstSvc/TrustedList/SvcInfoExt/ForWebSiteAuthentication";
}

/// Certificate policy OIDs with qualification meaning.
pub mod policy_oid {
    pub const QCP_PUBLIC: &str = "0.4.0.1456.1.2";
    pub const QCP_PUBLIC_WITH_SSCD: &str = "0.4.0.1456.1.1";
    pub const QCP_NATURAL: &str = "0.4.0.194112.1.0";
    pub const QCP_LEGAL: &str = "0.4.0.194112.1.1";
    pub const QCP_NATURAL_QSCD: &str = "0.4.0.194112.1.2";
    pub const QCP_LEGAL_QSCD: &str = "0.4.0.194112.1.3";
    pub const QCP_WEB: &str = "0.4.0.194112.1.4";
}

/// One entry of a service's status history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustServiceStatusPeriod {
    pub status: String,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub captured_qualifiers: Vec<String>,
    #[serde(default)]
    pub additional_service_infos: Vec<String>,
}

impl TrustServiceStatusPeriod {
    pub fn covers(&self, time: DateTime<Utc>) -> bool {
        self.start_date <= time && self.end_date.map_or(true, |end| time < end)
    }

    pub fn has_qualifier(&self, uri: &str) -> bool {
        self.captured_qualifiers.iter().any(|q| q == uri)
    }

    pub fn has_additional_info(&self, uri: &str) -> bool {
        self.additional_service_infos.iter().any(|q| q == uri)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustService {
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(rename = "type")]
    pub service_type: String,
    /// Certificate id of the service digital identifier.
    #[serde(default)]
    pub service_digital_identifier: Option<String>,
    #[serde(default)]
    pub status_history: Vec<TrustServiceStatusPeriod>,
}

impl TrustService {
    pub fn status_at(&self, time: DateTime<Utc>) -> Option<&TrustServiceStatusPeriod> {
        self.status_history.iter().find(|p| p.covers(time))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustServiceProvider {
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub registration_identifiers: Vec<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    pub tl_id: String,
    #[serde(default)]
    pub lotl_id: Option<String>,
    #[serde(default)]
    pub services: Vec<TrustService>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustedList {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub lotl: bool,
    pub issue_date: DateTime<Utc>,
    #[serde(default)]
    pub next_update: Option<DateTime<Utc>>,
    #[serde(default)]
    pub version: Option<u32>,
    #[serde(default = "default_true")]
    pub well_signed: bool,
    /// Trust services of this list are recognised through a mutual recognition agreement.
    #[serde(default)]
    pub mra: bool,
}
