// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use ades_validation::{CertificateProcessExecutor, SignatureProcessExecutor, ValidationLevel};
use ades_validation_diagnostic::DiagnosticData;
use ades_validation_policy::ValidationPolicy;
use anyhow::{anyhow, Context as _};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn usage() -> &'static str {
    "ades_validation_demo\n\nUSAGE:\n  ades_validation_demo validate --diagnostic <path> [--policy <path>] [--level <level>] [--detailed] [--semantics]\n  ades_validation_demo certificate --diagnostic <path> --id <certificate id> [--policy <path>]\n\nLEVELS:\n  basic, timestamps, long-term, archival (default)\n\nNOTES:\n  Without --policy the built-in default policy is used.\n  Set RUST_LOG=ades_validation=debug to trace the checks.\n"
}

fn parse_level(value: &str) -> anyhow::Result<ValidationLevel> {
    match value {
        "basic" => Ok(ValidationLevel::BasicSignatures),
        "timestamps" => Ok(ValidationLevel::Timestamps),
        "long-term" => Ok(ValidationLevel::LongTermData),
        "archival" => Ok(ValidationLevel::ArchivalData),
        other => Err(anyhow!("unknown validation level: {other}\n\n{}", usage())),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);

    let Some(cmd) = args.next() else {
        return Err(anyhow!(usage()));
    };
    if cmd != "validate" && cmd != "certificate" {
        return Err(anyhow!(usage()));
    }

    let mut diagnostic_path: Option<PathBuf> = None;
    let mut policy_path: Option<PathBuf> = None;
    let mut certificate_id: Option<String> = None;
    let mut level = ValidationLevel::default();
    let mut detailed = false;
    let mut semantics = false;

    while let Some(a) = args.next() {
        match a.as_str() {
            "--diagnostic" => {
                let p = args
                    .next()
                    .ok_or_else(|| anyhow!("--diagnostic requires a path"))?;
                diagnostic_path = Some(PathBuf::from(p));
            }
            "--policy" => {
                let p = args.next().ok_or_else(|| anyhow!("--policy requires a path"))?;
                policy_path = Some(PathBuf::from(p));
            }
            "--id" => {
                certificate_id = Some(args.next().ok_or_else(|| anyhow!("--id requires a certificate id"))?);
            }
            "--level" => {
                let value = args.next().ok_or_else(|| anyhow!("--level requires a value"))?;
                level = parse_level(&value)?;
            }
            "--detailed" => detailed = true,
            "--semantics" => semantics = true,
            "--help" | "-h" => {
                return Err(anyhow!(usage()));
            }
            other => {
                return Err(anyhow!(format!("Unknown arg: {other}\n\n{}", usage())));
            }
        }
    }

    let diagnostic_path = diagnostic_path.ok_or_else(|| anyhow!("--diagnostic is required\n\n{}", usage()))?;
    let data = DiagnosticData::from_json_file(&diagnostic_path)
        .with_context(|| format!("failed to load diagnostic data: {}", diagnostic_path.display()))?;

    let policy = match policy_path {
        Some(path) => ValidationPolicy::from_json_file(&path)
            .with_context(|| format!("failed to load policy: {}", path.display()))?,
        None => ValidationPolicy::default_policy(),
    };

    if cmd == "certificate" {
        let id = certificate_id.ok_or_else(|| anyhow!("--id is required\n\n{}", usage()))?;
        let reports = CertificateProcessExecutor::new(id)
            .with_options(|o| o.validation_level = level)
            .execute(&data, &policy)
            .context("certificate validation failed")?;
        let report = &reports.simple_report;
        println!("{}", serde_json::to_string_pretty(report)?);
        println!("indication: {}", report.indication);
        println!("qualification at issuance: {}", report.qualification_at_issuance);
        println!("qualification at validation: {}", report.qualification_at_validation);
        return if report.indication.is_passed() {
            Ok(())
        } else {
            Err(anyhow!("certificate is not valid"))
        };
    }

    let executor = SignatureProcessExecutor::new().with_options(|o| {
        o.validation_level = level;
        o.include_semantics = semantics;
    });
    let reports = executor.execute(&data, &policy).context("validation failed")?;

    if detailed {
        println!("{}", serde_json::to_string_pretty(&reports.detailed_report)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&reports.simple_report)?);
    }

    let simple = &reports.simple_report;
    for signature in &simple.signatures {
        match signature.sub_indication {
            Some(sub) => println!("{}: {} / {} ({})", signature.id, signature.indication, sub, signature.qualification),
            None => println!("{}: {} ({})", signature.id, signature.indication, signature.qualification),
        }
    }

    if simple.signatures_count > 0 && simple.valid_signatures_count == simple.signatures_count {
        Ok(())
    } else {
        Err(anyhow!(
            "{} of {} signatures are valid",
            simple.valid_signatures_count,
            simple.signatures_count
        ))
    }
}
