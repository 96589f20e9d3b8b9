// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Message identifiers emitted by validation blocks.
//!
//! The engine never renders text. A [`Message`] is a tag plus structured arguments; turning it
//! into a sentence in some locale is left to the consumer of the report.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Opaque message identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MessageTag(&'static str);

impl MessageTag {
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for MessageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

macro_rules! message_tags {
    ($($name:ident),* $(,)?) => {
        impl MessageTag {
            $(pub const $name: MessageTag = MessageTag(stringify!($name));)*
        }
    };
}

// Format checking, identification of the signing certificate, cryptographic verification.
message_tags!(
    BBB_FC_IEFF, BBB_FC_IEFF_ANS,
    BBB_ICS_ISCI, BBB_ICS_ISCI_ANS,
    BBB_ICS_ISASCP, BBB_ICS_ISASCP_ANS,
    BBB_ICS_ISACDP, BBB_ICS_ISACDP_ANS,
    BBB_ICS_ICDVV, BBB_ICS_ICDVV_ANS,
    BBB_ICS_AIDNASNE, BBB_ICS_AIDNASNE_ANS,
    BBB_CV_IRDOF, BBB_CV_IRDOF_ANS,
    BBB_CV_IRDOI, BBB_CV_IRDOI_ANS,
    BBB_CV_TSP_IRDOF, BBB_CV_TSP_IRDOF_ANS,
    BBB_CV_TSP_IRDOI, BBB_CV_TSP_IRDOI_ANS,
    BBB_CV_ISI, BBB_CV_ISI_ANS,
);

// Signature acceptance validation and cryptographic constraints.
message_tags!(
    BBB_SAV_ISSV, BBB_SAV_ISSV_ANS,
    BBB_SAV_ISQPSTP, BBB_SAV_ISQPSTP_ANS,
    BBB_SAV_ISQPCTP, BBB_SAV_ISQPCTP_ANS,
    BBB_SAV_ISQPCHP, BBB_SAV_ISQPCHP_ANS,
    BBB_SAV_ISQPCIP, BBB_SAV_ISQPCIP_ANS,
    BBB_SAV_ISQPXTIP, BBB_SAV_ISQPXTIP_ANS,
    BBB_SAV_ISQPSLP, BBB_SAV_ISQPSLP_ANS,
    BBB_SAV_ISQPCTSIP, BBB_SAV_ISQPCTSIP_ANS,
    ASCCM, ASCCM_ANS_1, ASCCM_ANS_2, ASCCM_ANS_3, ASCCM_ANS_4, ASCCM_ANS_5,
    ACCM_POS_SIG_SIG, ACCM_POS_TST_SIG, ACCM_POS_REVOC_SIG, ACCM_POS_CERT_SIG,
    ACCM_POS_SIGND_CERT_REF, ACCM_POS_MESS_IMP, ACCM_POS_MESS_DIGEST, ACCM_POS_SIGND_PRT,
    ACCM_POS_REF, ACCM_POS_KEY, ACCM_POS_MAN_ENT, ACCM_POS_CONTENT_DIGEST,
);

// X.509 certificate validation.
message_tags!(
    BBB_XCV_CCCBB, BBB_XCV_CCCBB_ANS,
    XCV_TSL_ETIP, XCV_TSL_ETIP_ANS,
    XCV_TSL_ESP, XCV_TSL_ESP_ANS,
    BBB_XCV_SUB, BBB_XCV_SUB_ANS,
    BBB_XCV_ISCTAS, BBB_XCV_ISCTAS_ANS,
    BBB_XCV_ICTIVRSC, BBB_XCV_ICTIVRSC_ANS,
    BBB_XCV_ICSI, BBB_XCV_ICSI_ANS,
    BBB_XCV_ISNP, BBB_XCV_ISNP_ANS,
    BBB_XCV_ISCGSURN, BBB_XCV_ISCGSURN_ANS,
    BBB_XCV_ISCGGIVEN, BBB_XCV_ISCGGIVEN_ANS,
    BBB_XCV_ISCGCOMMONN, BBB_XCV_ISCGCOMMONN_ANS,
    BBB_XCV_ISCGPSEUD, BBB_XCV_ISCGPSEUD_ANS,
    BBB_XCV_ISCGTITLE, BBB_XCV_ISCGTITLE_ANS,
    BBB_XCV_ISCGEMAIL, BBB_XCV_ISCGEMAIL_ANS,
    BBB_XCV_ISCGCOUNTRY, BBB_XCV_ISCGCOUNTRY_ANS,
    BBB_XCV_ISCGLOC, BBB_XCV_ISCGLOC_ANS,
    BBB_XCV_ISCGST, BBB_XCV_ISCGST_ANS,
    BBB_XCV_ISCGOI, BBB_XCV_ISCGOI_ANS,
    BBB_XCV_ISCGOU, BBB_XCV_ISCGOU_ANS,
    BBB_XCV_ISCGON, BBB_XCV_ISCGON_ANS,
    BBB_XCV_PSEUDO_USE, BBB_XCV_PSEUDO_USE_ANS,
    BBB_XCV_SS, BBB_XCV_SS_ANS,
    BBB_XCV_NSS, BBB_XCV_NSS_ANS,
    BBB_XCV_ISCGKU, BBB_XCV_ISCGKU_ANS,
    BBB_XCV_ISCGEKU, BBB_XCV_ISCGEKU_ANS,
    BBB_XCV_ISCGCA, BBB_XCV_ISCGCA_ANS,
    BBB_XCV_ISCGMPL, BBB_XCV_ISCGMPL_ANS,
    BBB_XCV_CMDCIPI, BBB_XCV_CMDCIPI_ANS,
    BBB_XCV_CMDCIPQ, BBB_XCV_CMDCIPQ_ANS,
    BBB_XCV_CMDCIQSCD, BBB_XCV_CMDCIQSCD_ANS,
    BBB_XCV_CMDCIQC, BBB_XCV_CMDCIQC_ANS,
    BBB_XCV_CMDCILVC, BBB_XCV_CMDCILVC_ANS,
    BBB_XCV_CMDCIMLV, BBB_XCV_CMDCIMLV_ANS,
    BBB_XCV_CMDCIRP, BBB_XCV_CMDCIRP_ANS,
    BBB_XCV_CMDCISSCD, BBB_XCV_CMDCISSCD_ANS,
    BBB_XCV_CMDCIPDS, BBB_XCV_CMDCIPDS_ANS,
    BBB_XCV_CMDCIQCT, BBB_XCV_CMDCIQCT_ANS,
    BBB_XCV_CMDCIQCL, BBB_XCV_CMDCIQCL_ANS,
    BBB_XCV_CMDCIITNP, BBB_XCV_CMDCIITNP_ANS,
    BBB_XCV_CMDCIITLP, BBB_XCV_CMDCIITLP_ANS,
    BBB_XCV_CMDCISI, BBB_XCV_CMDCISI_ANS,
    BBB_XCV_CMDCIPSD2R, BBB_XCV_CMDCIPSD2R_ANS,
    BBB_XCV_CMDCIPSD2N, BBB_XCV_CMDCIPSD2N_ANS,
    BBB_XCV_CMDCIPSD2I, BBB_XCV_CMDCIPSD2I_ANS,
    BBB_XCV_IPTV, BBB_XCV_IPTV_ANS,
    BBB_XCV_INCV, BBB_XCV_INCV_ANS,
    BBB_XCV_IIDNM, BBB_XCV_IIDNM_ANS,
    BBB_XCV_ISCE, BBB_XCV_ISCE_ANS,
    BBB_XCV_IFEA, BBB_XCV_IFEA_ANS,
    BBB_XCV_AIA_PRES, BBB_XCV_AIA_PRES_ANS,
    BBB_XCV_REVOC_PRES, BBB_XCV_REVOC_PRES_ANS,
    BBB_XCV_INRA, BBB_XCV_INRA_ANS,
    BBB_XCV_OCSP_NO_CHECK,
    BBB_XCV_REVOC_SKIP,
    BBB_XCV_IRDPFC, BBB_XCV_IRDPFC_ANS,
    BBB_XCV_IARDPFC, BBB_XCV_IARDPFC_ANS,
    BBB_XCV_ISCR, BBB_XCV_ISCR_ANS,
    BBB_XCV_ISCOH, BBB_XCV_ISCOH_ANS,
    BBB_XCV_RFC, BBB_XCV_RFC_ANS,
);

// Revocation selection, acceptance and freshness.
message_tags!(
    BBB_CRS_IRDA, BBB_CRS_IRDA_ANS,
    BBB_CRS_ILRDA, BBB_CRS_ILRDA_ANS,
    BBB_RAC_IRC, BBB_RAC_IRC_ANS,
    BBB_RAC_ISK, BBB_RAC_ISK_ANS,
    BBB_RAC_IRIF, BBB_RAC_IRIF_ANS,
    BBB_RAC_IRIT, BBB_RAC_IRIT_ANS,
    BBB_RAC_ISI, BBB_RAC_ISI_ANS,
    BBB_RAC_ISOR, BBB_RAC_ISOR_ANS,
    BBB_RAC_OCHP, BBB_RAC_OCHP_ANS,
    BBB_RAC_OCHM, BBB_RAC_OCHM_ANS,
    BBB_RAC_ARIIVP, BBB_RAC_ARIIVP_ANS,
    BBB_RFC_NUP, BBB_RFC_NUP_ANS,
    BBB_RFC_IRIF, BBB_RFC_IRIF_ANS,
);

// Long-term and archival validation, past validation.
message_tags!(
    LTV_ABSV, LTV_ABSV_ANS,
    ADEST_ITVPC, ADEST_ITVPC_ANS, ADEST_ITVPC_INFO_1,
    ADEST_IRTPTBST, ADEST_IRTPTBST_ANS,
    TSV_IBSTAIDOSC, TSV_IBSTAIDOSC_ANS,
    TSV_ISCNVABST, TSV_ISCNVABST_ANS,
    TSV_ASTPTCT, TSV_ASTPTCT_ANS,
    ADEST_ISCSTP, ADEST_ISCSTP_ANS,
    ADEST_ISTPTDABST, ADEST_ISTPTDABST_ANS,
    ADEST_IRIFABST, ADEST_IRIFABST_ANS,
    TSV_WACRABST, TSV_WACRABST_ANS,
    ARCH_LTVV, ARCH_LTVV_ANS,
    ARCH_ITVPC, ARCH_ITVPC_ANS,
    PSV_IPSVC, PSV_IPSVC_ANS,
    PSV_IPCVA, PSV_IPCVA_ANS,
    PSV_ITPOSVAOBCT, PSV_ITPOSVAOBCT_ANS,
    PSV_IBSTCIV, PSV_IBSTCIV_ANS,
    PSV_ITPOCABCRT, PSV_ITPOCABCRT_ANS,
    PSV_IRIFAPOE, PSV_IRIFAPOE_ANS,
    PSV_IPCVC, PSV_IPCVC_ANS,
    PSV_ITPORDAOBCT, PSV_ITPORDAOBCT_ANS,
    PCV_IVTSC, PCV_IVTSC_ANS,
    PCV_ICTIVRC, PCV_ICTIVRC_ANS,
    BBB_VTS_IRDPFC, BBB_VTS_IRDPFC_ANS,
);

// Trusted lists and qualification.
message_tags!(
    QUAL_TL_FRESH, QUAL_TL_FRESH_ANS,
    QUAL_TL_EXP, QUAL_TL_EXP_ANS,
    QUAL_TL_VERSION, QUAL_TL_VERSION_ANS,
    QUAL_TL_WS, QUAL_TL_WS_ANS,
    QUAL_HAS_MRA_TS, QUAL_HAS_MRA_TS_ANS,
    QUAL_MRA_EQUIV, QUAL_MRA_EQUIV_ANS,
    QUAL_HAS_TS_AT_TIME, QUAL_HAS_TS_AT_TIME_ANS,
    QUAL_HAS_CAQC, QUAL_TL_SERV_CONS_ANS0,
    QUAL_HAS_TS_WITH_TYPE, QUAL_HAS_TS_WITH_TYPE_ANS,
    QUAL_TL_SERV_CONS, QUAL_TL_SERV_CONS_ANS1, QUAL_TL_SERV_CONS_ANS2, QUAL_TL_SERV_CONS_ANS3,
    QUAL_TL_SERV_CONS_ANS4, QUAL_TL_SERV_CONS_ANS5, QUAL_TL_SERV_CONS_ANS6,
    QUAL_HAS_NO_CONFLICT, QUAL_UNIQUE_CERT,
    QUAL_HAS_GRANTED, QUAL_HAS_GRANTED_ANS,
    QUAL_UNIQUE_TS, QUAL_UNIQUE_TS_ANS,
    QUAL_TL_CERT_CONS, QUAL_TL_CERT_CONS_ANS1, QUAL_TL_CERT_CONS_ANS2, QUAL_TL_CERT_CONS_ANS3,
    QUAL_VALID_CAQC, QUAL_VALID_CAQC_ANS,
    QUAL_QSCD_OVERRULE_CONS, QUAL_QSCD_OVERRULE_CONS_ANS,
    QUAL_QC_AT, QUAL_QC_AT_ANS,
    QUAL_TYPE_AT, QUAL_TYPE_AT_ANS,
    QUAL_QSCD_AT, QUAL_QSCD_AT_ANS,
    QUAL_IS_ADES, QUAL_IS_ADES_IND, QUAL_IS_ADES_INV,
    QUAL_TRUSTED_CERT_PATH, QUAL_TRUSTED_CERT_PATH_ANS,
    QUAL_ACCEPTABLE_LOTL, QUAL_ACCEPTABLE_LOTL_ANS,
    QUAL_ACCEPTABLE_TL, QUAL_ACCEPTABLE_TL_ANS,
    QUAL_TRUSTED_LIST_ACCEPT, QUAL_TRUSTED_LIST_ACCEPT_ANS,
    QUAL_QC_AT_ST, QUAL_QC_AT_ST_ANS,
    QUAL_FOR_SIGN_AT_ST, QUAL_FOR_SIGN_AT_ST_ANS,
    QUAL_QC_AT_CC, QUAL_QC_AT_CC_ANS,
    QUAL_QSCD_AT_ST, QUAL_QSCD_AT_ST_ANS,
    QUAL_TOI_TOS_CONS, QUAL_TOI_TOS_CONS_ANS_TYPE, QUAL_TOI_TOS_CONS_ANS_QSCD, QUAL_TOI_TOS_CONS_ANS_TYPE_QSCD,
);

/// Structured argument of a [`Message`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum MessageArg {
    Tag(MessageTag),
    Text(String),
    Time(DateTime<Utc>),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Message {
    pub tag: MessageTag,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<MessageArg>,
}

impl Message {
    pub fn new(tag: MessageTag) -> Self {
        Self { tag, args: Vec::new() }
    }

    pub fn with_tag(mut self, tag: MessageTag) -> Self {
        self.args.push(MessageArg::Tag(tag));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.args.push(MessageArg::Text(text.into()));
        self
    }

    pub fn with_time(mut self, time: DateTime<Utc>) -> Self {
        self.args.push(MessageArg::Time(time));
        self
    }

    pub fn has_arg_text(&self, text: &str) -> bool {
        self.args.iter().any(|a| matches!(a, MessageArg::Text(t) if t == text))
    }

    pub fn has_arg_tag(&self, tag: MessageTag) -> bool {
        self.args.iter().any(|a| matches!(a, MessageArg::Tag(t) if *t == tag))
    }
}

impl From<MessageTag> for Message {
    fn from(tag: MessageTag) -> Self {
        Message::new(tag)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag)?;
        if self.args.is_empty() {
            return Ok(());
        }
        f.write_str("(")?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match arg {
                MessageArg::Tag(t) => write!(f, "{t}")?,
                MessageArg::Text(s) => write!(f, "{s}")?,
                MessageArg::Time(t) => write!(f, "{}", t.to_rfc3339())?,
            }
        }
        f.write_str(")")
    }
}
