//! `cwatch diff`: per-collection CAOM vs SI comparison.
//!
//! One failing collection is reported and skipped; the batch continues and
//! the final exit code says whether anything failed.

use std::fs::File;
use std::io::{self, BufWriter, Write as _};
use std::path::{Path, PathBuf};

use chrono::Utc;

use caomwatch_config::AuditConfig;
use caomwatch_recon::{
    columns, normalize, reconcile, CompareField, PhaseDurations, PhaseTimer, RawTable, SchemaError,
};
use caomwatch_report::{format_duration, write_diff_report, DiffReportContext};
use caomwatch_tap::{caom_artifact_query, si_artifact_query, TapClient, TapError};

use crate::exit_codes;
use crate::CliError;

pub fn cmd_diff(
    config_path: &Path,
    requested: &[String],
    json: bool,
    output_dir: Option<PathBuf>,
) -> Result<(), CliError> {
    let config = crate::load_config(config_path)?;
    let collections = config
        .resolve_collections(requested)
        .map_err(crate::config_usage_err)?;

    let client = build_client(&config)?;
    let out_dir = prepare_output_dir(&config, output_dir)?;

    // Batch totals are an explicit value threaded through the loop.
    let mut totals = PhaseDurations::default();
    let mut failed: Vec<String> = Vec::new();

    for collection in &collections {
        eprintln!("Processing collection {collection}.");
        match diff_collection(&config, &client, collection, &out_dir, json, &mut totals) {
            Ok(report_path) => {
                eprintln!("Comparison results written to {}", report_path.display());
            }
            Err(e) => {
                eprintln!("error: collection {collection}: {}", e.message);
                failed.push(collection.clone());
            }
        }
    }

    eprintln!(
        "All collections processed. CAOM query {}, SI query {}, compare {}, write {}.",
        format_duration(totals.query_left),
        format_duration(totals.query_right),
        format_duration(totals.compare),
        format_duration(totals.write),
    );

    if failed.is_empty() {
        Ok(())
    } else {
        Err(CliError::new(
            exit_codes::EXIT_AUDIT_PARTIAL,
            format!("{} collection(s) failed: {}", failed.len(), failed.join(", ")),
        ))
    }
}

fn diff_collection(
    config: &AuditConfig,
    client: &TapClient,
    collection: &str,
    out_dir: &Path,
    json: bool,
    totals: &mut PhaseDurations,
) -> Result<PathBuf, CliError> {
    let namespaces = config.namespaces_for(collection);
    if namespaces.is_empty() {
        return Err(CliError::new(
            exit_codes::EXIT_USAGE,
            format!("no namespace mapping for collection {collection}"),
        ));
    }

    let started = Utc::now();
    let mut phases = PhaseDurations::default();
    let mut caom_rows = RawTable::default();
    let mut si_rows = RawTable::default();

    for namespace in &namespaces {
        // The CAOM side covers every collection sharing the namespace, so
        // a shared namespace compares as one population.
        for shared in config.collections_for_namespace(namespace) {
            let site_url = config
                .site_url_for(&shared)
                .map_err(|e| CliError::new(exit_codes::EXIT_CONFIG_INVALID, e.to_string()))?;
            let adql = caom_artifact_query(&shared, namespace).map_err(query_err)?;
            eprintln!("Querying CAOM for collection {shared} with artifacts like {namespace}/%.");
            let timer = PhaseTimer::start();
            let result = client.query(site_url, &adql).map_err(query_err)?;
            phases.query_left += timer.stop();
            caom_rows.append(result).map_err(schema_err)?;
        }

        eprintln!("Querying SI namespace {namespace}.");
        let adql = si_artifact_query(namespace).map_err(query_err)?;
        let timer = PhaseTimer::start();
        let result = client.query(&config.service.si_url, &adql).map_err(query_err)?;
        phases.query_right += timer.stop();
        si_rows.append(result).map_err(schema_err)?;
    }

    let left = normalize(&caom_rows, columns::URI).map_err(schema_err)?;
    let right = normalize(&si_rows, columns::URI).map_err(schema_err)?;
    drop(caom_rows);
    drop(si_rows);

    let result = reconcile(&left, &right, &CompareField::ALL).map_err(schema_err)?;
    phases.compare += result.summary.compare_duration;

    let report_path = out_dir.join(format!("artifactDiff_{collection}.csv"));
    let write_timer = PhaseTimer::start();
    let file = File::create(&report_path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    let ended = Utc::now();
    let ctx = DiffReportContext {
        collection,
        left_label: "CAOM",
        right_label: "SI",
        started,
        ended,
        phases: &phases,
    };
    write_diff_report(&mut writer, &ctx, &result).map_err(io_err)?;
    writer.flush().map_err(io_err)?;
    phases.write += write_timer.stop();

    if json {
        let json_path = out_dir.join(format!("artifactDiff_{collection}.json"));
        let text = serde_json::to_string_pretty(&result)
            .map_err(|e| CliError::new(exit_codes::EXIT_ERROR, e.to_string()))?;
        std::fs::write(&json_path, text).map_err(io_err)?;
        eprintln!("wrote {}", json_path.display());
    }

    totals.accumulate(&phases);
    Ok(report_path)
    // `result` and both tables drop here, before the next collection is
    // queried, bounding peak memory across a long batch.
}

pub(crate) fn build_client(config: &AuditConfig) -> Result<TapClient, CliError> {
    let cert_path = config.service.resolved_cert_path();
    if !cert_path.exists() {
        return Err(CliError {
            code: exit_codes::EXIT_CERT,
            message: format!("certificate file {} does not exist", cert_path.display()),
            hint: Some("set [service] cert_path in the configuration".into()),
        });
    }
    TapClient::new(Some(&cert_path)).map_err(|e| CliError::new(exit_codes::EXIT_CERT, e.to_string()))
}

pub(crate) fn prepare_output_dir(
    config: &AuditConfig,
    requested: Option<PathBuf>,
) -> Result<PathBuf, CliError> {
    let out_dir = requested.unwrap_or_else(|| config.service.output_dir.clone());
    std::fs::create_dir_all(&out_dir).map_err(|e| {
        CliError::new(
            exit_codes::EXIT_REPORT_IO,
            format!("cannot create {}: {e}", out_dir.display()),
        )
    })?;
    Ok(out_dir)
}

pub(crate) fn query_err(e: TapError) -> CliError {
    CliError::new(exit_codes::EXIT_QUERY, e.to_string())
}

pub(crate) fn schema_err(e: SchemaError) -> CliError {
    CliError::new(exit_codes::EXIT_SCHEMA, e.to_string())
}

pub(crate) fn io_err(e: io::Error) -> CliError {
    CliError::new(exit_codes::EXIT_REPORT_IO, e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AuditConfig {
        AuditConfig::from_toml(
            r#"
[service]
output_dir = "reports"

[sites.ams]
url = "https://ams.example.org"

[collections.TEST]
site = "ams"
"#,
        )
        .unwrap()
    }

    #[test]
    fn output_dir_override_wins() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("custom");
        let out = prepare_output_dir(&config(), Some(target.clone())).unwrap();
        assert_eq!(out, target);
        assert!(target.is_dir());
    }

    #[test]
    fn missing_certificate_is_a_cert_error() {
        let mut config = config();
        config.service.cert_path = "/nonexistent/proxy.pem".into();
        let err = build_client(&config).unwrap_err();
        assert_eq!(err.code, exit_codes::EXIT_CERT);
        assert!(err.hint.is_some());
    }
}
