//! `cwatch dup`: cross-type duplicate URI profile per collection.

use std::fs::File;
use std::io::{BufWriter, Write as _};
use std::path::{Path, PathBuf};

use chrono::Utc;

use caomwatch_config::AuditConfig;
use caomwatch_recon::{columns, profile_duplicates, PhaseTimer, RawTable};
use caomwatch_report::{write_dup_report, DupReportContext};
use caomwatch_tap::{caom_product_type_query, TapClient};

use crate::audit::{build_client, io_err, prepare_output_dir, query_err, schema_err};
use crate::exit_codes;
use crate::CliError;

pub fn cmd_dup(
    config_path: &Path,
    requested: &[String],
    output_dir: Option<PathBuf>,
) -> Result<(), CliError> {
    let config = crate::load_config(config_path)?;
    let collections = config
        .resolve_collections(requested)
        .map_err(crate::config_usage_err)?;

    let client = build_client(&config)?;
    let out_dir = prepare_output_dir(&config, output_dir)?;

    let mut failed: Vec<String> = Vec::new();
    for collection in &collections {
        eprintln!("Processing collection {collection}.");
        match dup_collection(&config, &client, collection, &out_dir) {
            Ok(report_path) => {
                eprintln!("Duplicate profile written to {}", report_path.display());
            }
            Err(e) => {
                eprintln!("error: collection {collection}: {}", e.message);
                failed.push(collection.clone());
            }
        }
    }
    eprintln!("All collections processed.");

    if failed.is_empty() {
        Ok(())
    } else {
        Err(CliError::new(
            exit_codes::EXIT_AUDIT_PARTIAL,
            format!("{} collection(s) failed: {}", failed.len(), failed.join(", ")),
        ))
    }
}

fn dup_collection(
    config: &AuditConfig,
    client: &TapClient,
    collection: &str,
    out_dir: &Path,
) -> Result<PathBuf, CliError> {
    let namespaces = config.namespaces_for(collection);
    if namespaces.is_empty() {
        return Err(CliError::new(
            exit_codes::EXIT_USAGE,
            format!("no namespace mapping for collection {collection}"),
        ));
    }

    let site_url = config
        .site_url_for(collection)
        .map_err(|e| CliError::new(exit_codes::EXIT_CONFIG_INVALID, e.to_string()))?;

    let started = Utc::now();
    let mut rows = RawTable::default();
    let query_timer = PhaseTimer::start();
    for namespace in &namespaces {
        eprintln!("Querying CAOM for collection {collection} with artifacts like {namespace}/%.");
        let adql = caom_product_type_query(collection, namespace).map_err(query_err)?;
        let result = client.query(site_url, &adql).map_err(query_err)?;
        rows.append(result).map_err(schema_err)?;
    }
    let query_duration = query_timer.stop();

    let process_timer = PhaseTimer::start();
    let profile = profile_duplicates(&rows, columns::URI).map_err(schema_err)?;
    let processing_duration = process_timer.stop();
    drop(rows);

    let report_path = out_dir.join(format!("artifactDup_{collection}.tsv"));
    let file = File::create(&report_path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    let namespace_label = namespaces.join(" ");
    let ctx = DupReportContext {
        collection,
        namespaces: &namespace_label,
        started,
        ended: Utc::now(),
        query_duration,
        processing_duration,
    };
    write_dup_report(&mut writer, &ctx, &profile).map_err(io_err)?;
    writer.flush().map_err(io_err)?;

    Ok(report_path)
}
