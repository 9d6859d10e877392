use std::path::Path;
use std::time::Duration;

use caomwatch_recon::RawTable;

use crate::error::TapError;

/// Two hours, sized to the slowest observed sync query over a
/// multi-million-row collection.
const QUERY_TIMEOUT: Duration = Duration::from_secs(7200);

const USER_AGENT: &str = concat!("caomwatch/", env!("CARGO_PKG_VERSION"));

/// Blocking TAP client, shared by the CAOM and SI endpoints.
#[derive(Debug)]
pub struct TapClient {
    http: reqwest::blocking::Client,
}

impl TapClient {
    /// Build a client, loading a PEM proxy certificate when the services
    /// require client-certificate auth.
    pub fn new(cert_path: Option<&Path>) -> Result<Self, TapError> {
        let mut builder = reqwest::blocking::Client::builder()
            .timeout(QUERY_TIMEOUT)
            .user_agent(USER_AGENT);

        if let Some(path) = cert_path {
            let pem = std::fs::read(path).map_err(|e| {
                TapError::Identity(format!("cannot read {}: {e}", path.display()))
            })?;
            let identity = reqwest::Identity::from_pem(&pem)
                .map_err(|e| TapError::Identity(format!("{}: {e}", path.display())))?;
            builder = builder.identity(identity);
        }

        let http = builder.build().map_err(|e| TapError::Http(e.to_string()))?;
        Ok(Self { http })
    }

    /// Run one synchronous ADQL query and parse the CSV response.
    pub fn query(&self, base_url: &str, adql: &str) -> Result<RawTable, TapError> {
        check_endpoint(base_url)?;
        let sync_url = format!("{}/sync", base_url.trim_end_matches('/'));

        let form = [
            ("LANG", "ADQL"),
            ("RESPONSEFORMAT", "CSV"),
            ("QUERY", adql),
        ];
        let response = self
            .http
            .post(&sync_url)
            .form(&form)
            .send()
            .map_err(|e| TapError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TapError::Status {
                code: status.as_u16(),
                url: sync_url,
            });
        }

        let body = response.text().map_err(|e| TapError::Http(e.to_string()))?;
        parse_csv(&body)
    }
}

/// Services are https-only; loopback is allowed so tests can run against a
/// local mock.
fn check_endpoint(base_url: &str) -> Result<(), TapError> {
    let parsed = url::Url::parse(base_url).map_err(|_| TapError::InvalidUrl {
        url: base_url.to_string(),
    })?;
    let loopback = matches!(parsed.host_str(), Some("127.0.0.1") | Some("localhost"));
    if parsed.scheme() == "https" || (parsed.scheme() == "http" && loopback) {
        Ok(())
    } else {
        Err(TapError::InvalidUrl {
            url: base_url.to_string(),
        })
    }
}

/// Parse a TAP CSV response body. Empty cells stay empty strings; the
/// normalizer decides what null means.
pub fn parse_csv(body: &str) -> Result<RawTable, TapError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(body.as_bytes());

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| TapError::Csv(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut table = RawTable::new(columns);
    for record in reader.records() {
        let record = record.map_err(|e| TapError::Csv(e.to_string()))?;
        table.push_row(record.iter().map(|cell| cell.to_string()));
    }
    Ok(table)
}
