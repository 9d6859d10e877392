//! The comparison report: human preamble, one labelled CSV section per
//! non-empty bucket, and a trailing machine-parseable summary record.

use std::io::{self, Write};

use chrono::{DateTime, Utc};

use caomwatch_recon::{Bucket, MatchedRow, MissingRow, PhaseDurations, ReconResult};

use crate::duration::format_duration;

pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub struct DiffReportContext<'a> {
    pub collection: &'a str,
    /// Label of the authoritative side, e.g. "CAOM".
    pub left_label: &'a str,
    /// Label of the comparison side, e.g. "SI".
    pub right_label: &'a str,
    pub started: DateTime<Utc>,
    pub ended: DateTime<Utc>,
    pub phases: &'a PhaseDurations,
}

pub fn write_diff_report<W: Write>(
    w: &mut W,
    ctx: &DiffReportContext<'_>,
    result: &ReconResult,
) -> io::Result<()> {
    let s = &result.summary;
    let total = (ctx.ended - ctx.started).to_std().unwrap_or_default();
    let left = ctx.left_label;
    let right = ctx.right_label;
    let left_lc = left.to_lowercase();
    let right_lc = right.to_lowercase();

    writeln!(w, "Comparison results for collection {}", ctx.collection)?;
    writeln!(w)?;
    writeln!(w, "Began on {} UTC", ctx.started.format(TIMESTAMP_FORMAT))?;
    writeln!(w, "Ended on {} UTC", ctx.ended.format(TIMESTAMP_FORMAT))?;
    writeln!(w, "Total collection processing time: {}", format_duration(total))?;
    writeln!(w)?;
    writeln!(w, "Total {left} query time: {}", format_duration(ctx.phases.query_left))?;
    writeln!(w, "Total {right} query time: {}", format_duration(ctx.phases.query_right))?;
    writeln!(w, "Total comparison time: {}", format_duration(ctx.phases.compare))?;
    writeln!(w)?;
    writeln!(w, "Total files in {left}: {}", s.left.rows)?;
    writeln!(w, "Total files in {right}: {}", s.right.rows)?;
    writeln!(w, "Total bytes in {left}: {}", s.left.bytes)?;
    writeln!(w, "Total bytes in {right}: {}", s.right.bytes)?;
    writeln!(w, "Number of files missing in {right}: {}", s.missing_in_right.rows)?;
    writeln!(w, "Number of files missing in {left}: {}", s.missing_in_left.rows)?;
    writeln!(w, "Number of consistent files: {}", s.consistent.rows)?;
    writeln!(w, "Number of inconsistent files: {}", s.inconsistent_rows)?;

    if !result.missing_in_right.is_empty() {
        writeln!(w)?;
        writeln!(w, "List of files missing in {right}")?;
        let category = format!("MISSING_IN_{}", right.to_uppercase());
        write_missing_section(w, &category, &result.missing_in_right, &left_lc)?;
    }

    if !result.missing_in_left.is_empty() {
        writeln!(w)?;
        writeln!(w, "List of files missing in {left}")?;
        let category = format!("MISSING_IN_{}", left.to_uppercase());
        write_missing_section(w, &category, &result.missing_in_left, &right_lc)?;
    }

    for bucket in Bucket::INCONSISTENT {
        let rows: Vec<&MatchedRow> = result.rows_in(bucket).collect();
        if rows.is_empty() {
            continue;
        }
        writeln!(w)?;
        writeln!(w, "List of inconsistent files: {}", bucket.as_str().to_uppercase())?;
        write_bucket_section(w, bucket, &rows, &left_lc, &right_lc)?;
    }

    writeln!(w)?;
    writeln!(
        w,
        "summary,collection,start_time,files_{left_lc},files_{right_lc},\
         missing_in_{right_lc},missing_in_{left_lc},consistent,inconsistent,\
         {left_lc}_query_duration,{right_lc}_query_duration,compare_duration,\
         total_duration,end_time"
    )?;
    writeln!(
        w,
        "SUMMARY,{},{},{},{},{},{},{},{},{},{},{},{},{}",
        ctx.collection,
        ctx.started.format(TIMESTAMP_FORMAT),
        s.left.rows,
        s.right.rows,
        s.missing_in_right.rows,
        s.missing_in_left.rows,
        s.consistent.rows,
        s.inconsistent_rows,
        format_duration(ctx.phases.query_left),
        format_duration(ctx.phases.query_right),
        format_duration(ctx.phases.compare),
        format_duration(total),
        ctx.ended.format(TIMESTAMP_FORMAT),
    )?;

    Ok(())
}

fn write_missing_section<W: Write>(
    w: &mut W,
    category: &str,
    rows: &[MissingRow],
    suffix: &str,
) -> io::Result<()> {
    let mut out = csv::Writer::from_writer(&mut *w);
    let modified_header = format!("lastModified_{suffix}");
    out.write_record(["category", "uri", modified_header.as_str()])
        .map_err(csv_err)?;
    for row in rows {
        out.write_record([
            category,
            row.uri.as_deref().unwrap_or(""),
            row.last_modified.as_deref().unwrap_or(""),
        ])
        .map_err(csv_err)?;
    }
    out.flush()
}

fn write_bucket_section<W: Write>(
    w: &mut W,
    bucket: Bucket,
    rows: &[&MatchedRow],
    left_suffix: &str,
    right_suffix: &str,
) -> io::Result<()> {
    let mut out = csv::Writer::from_writer(&mut *w);
    let header: Vec<String> = vec![
        "category".into(),
        "uri".into(),
        format!("contentChecksum_{left_suffix}"),
        format!("contentChecksum_{right_suffix}"),
        format!("contentLength_{left_suffix}"),
        format!("contentLength_{right_suffix}"),
        format!("contentType_{left_suffix}"),
        format!("contentType_{right_suffix}"),
        format!("lastModified_{left_suffix}"),
        format!("lastModified_{right_suffix}"),
    ];
    out.write_record(&header).map_err(csv_err)?;

    let category = bucket.as_str().to_uppercase();
    for row in rows {
        let left_length = row.left.content_length.map(|n| n.to_string()).unwrap_or_default();
        let right_length = row.right.content_length.map(|n| n.to_string()).unwrap_or_default();
        out.write_record([
            category.as_str(),
            row.uri.as_str(),
            row.left.content_checksum.as_deref().unwrap_or(""),
            row.right.content_checksum.as_deref().unwrap_or(""),
            left_length.as_str(),
            right_length.as_str(),
            row.left.content_type.as_deref().unwrap_or(""),
            row.right.content_type.as_deref().unwrap_or(""),
            row.left.last_modified.as_deref().unwrap_or(""),
            row.right.last_modified.as_deref().unwrap_or(""),
        ])
        .map_err(csv_err)?;
    }
    out.flush()
}

fn csv_err(e: csv::Error) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e)
}
