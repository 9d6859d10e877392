//! The duplicate-profile report: tab-separated, with the legacy layout of
//! a preamble, a totals block, the duplicate list, and a trailing SUMMARY
//! record.

use std::io::{self, Write};
use std::time::Duration;

use chrono::{DateTime, Utc};

use caomwatch_recon::{DupProfile, PhaseTimer};

use crate::diff::TIMESTAMP_FORMAT;
use crate::duration::format_duration;

pub struct DupReportContext<'a> {
    pub collection: &'a str,
    /// Display form of the namespaces queried, e.g. "cadc:CFHT cadc:CFHTSG".
    pub namespaces: &'a str,
    pub started: DateTime<Utc>,
    pub ended: DateTime<Utc>,
    pub query_duration: Duration,
    pub processing_duration: Duration,
}

pub fn write_dup_report<W: Write>(
    w: &mut W,
    ctx: &DupReportContext<'_>,
    profile: &DupProfile,
) -> io::Result<()> {
    let write_timer = PhaseTimer::start();
    let s = profile.summary;
    let total = (ctx.ended - ctx.started).to_std().unwrap_or_default();

    writeln!(w, "Query results for collection {}", ctx.collection)?;
    writeln!(w)?;
    writeln!(w, "Start time\t{} UTC", ctx.started.format(TIMESTAMP_FORMAT))?;
    writeln!(w, "SI namespace(s)\t{}", ctx.namespaces)?;
    writeln!(w, "Query duration\t{}", format_duration(ctx.query_duration))?;
    writeln!(w, "Processing duration\t{}", format_duration(ctx.processing_duration))?;
    writeln!(w)?;
    writeln!(w, "Total number of artifact URIs\t{}", s.total_uris)?;
    writeln!(w, "Number of single instance artifact URIs\t{}", s.single_instance)?;
    writeln!(w, "Number of duplicate URIs\t{}", s.duplicates)?;
    writeln!(w, "Total instances of duplicate URIs\t{}", s.duplicate_instances)?;

    if s.duplicates > 0 {
        writeln!(w)?;
        writeln!(w, "List of duplicate uri's:")?;
        write_duplicate_list(w, profile)?;
    }

    let write_duration = write_timer.stop();
    writeln!(w)?;
    writeln!(
        w,
        "Category\tCollection\tStart time\tNum URIs\tNum unique URIs\t\
         Num duplicate URIs\tNum instances of duplicate URIs\tQuery duration\t\
         Processing duration\tWrite duration\tDuration\tEnd time"
    )?;
    writeln!(
        w,
        "SUMMARY\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
        ctx.collection,
        ctx.started.format(TIMESTAMP_FORMAT),
        s.total_uris,
        s.single_instance,
        s.duplicates,
        s.duplicate_instances,
        format_duration(ctx.query_duration),
        format_duration(ctx.processing_duration),
        format_duration(write_duration),
        format_duration(total),
        ctx.ended.format(TIMESTAMP_FORMAT),
    )?;

    Ok(())
}

fn write_duplicate_list<W: Write>(w: &mut W, profile: &DupProfile) -> io::Result<()> {
    let mut out = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(&mut *w);

    let mut header: Vec<&str> = vec!["uri"];
    header.extend(profile.flag_columns.iter().map(String::as_str));
    header.push("count");
    out.write_record(&header)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    for row in profile.duplicates() {
        let mut record: Vec<String> = vec![row.uri.clone().unwrap_or_default()];
        record.extend(row.flags.iter().map(|f| (if *f { "1" } else { "0" }).to_string()));
        record.push(row.count.to_string());
        out.write_record(&record)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;

    use caomwatch_recon::{profile_duplicates, RawTable};

    fn profile() -> DupProfile {
        let mut t = RawTable::new(["uri", "science", "preview"]);
        t.push_row(["ivo://x/a", "1", ""]);
        t.push_row(["ivo://x/a", "", "1"]);
        t.push_row(["ivo://x/b", "1", ""]);
        profile_duplicates(&t, "uri").unwrap()
    }

    #[test]
    fn golden_dup_report() {
        let ctx = DupReportContext {
            collection: "CFHT",
            namespaces: "cadc:CFHT",
            started: Utc.with_ymd_and_hms(2026, 2, 1, 10, 0, 0).unwrap(),
            ended: Utc.with_ymd_and_hms(2026, 2, 1, 10, 12, 0).unwrap(),
            query_duration: Duration::from_secs(700),
            processing_duration: Duration::from_secs(1),
        };

        let mut buf = Vec::new();
        write_dup_report(&mut buf, &ctx, &profile()).unwrap();
        let report = String::from_utf8(buf).unwrap();

        let expected = "\
Query results for collection CFHT

Start time\t2026-02-01T10:00:00 UTC
SI namespace(s)\tcadc:CFHT
Query duration\t00:11:40
Processing duration\t00:00:01

Total number of artifact URIs\t2
Number of single instance artifact URIs\t1
Number of duplicate URIs\t1
Total instances of duplicate URIs\t2

List of duplicate uri's:
uri\tscience\tpreview\tcount
ivo://x/a\t1\t1\t2

Category\tCollection\tStart time\tNum URIs\tNum unique URIs\tNum duplicate URIs\tNum instances of duplicate URIs\tQuery duration\tProcessing duration\tWrite duration\tDuration\tEnd time
SUMMARY\tCFHT\t2026-02-01T10:00:00\t2\t1\t1\t2\t00:11:40\t00:00:01\t00:00:00\t00:12:00\t2026-02-01T10:12:00
";
        assert_eq!(report, expected, "\nGOT:\n{report}\nEXPECTED:\n{expected}");
    }

    #[test]
    fn no_duplicate_list_when_clean() {
        let mut t = RawTable::new(["uri", "science", "preview"]);
        t.push_row(["ivo://x/b", "1", ""]);
        let clean = profile_duplicates(&t, "uri").unwrap();

        let ctx = DupReportContext {
            collection: "DAO",
            namespaces: "cadc:DAO",
            started: Utc.with_ymd_and_hms(2026, 2, 1, 10, 0, 0).unwrap(),
            ended: Utc.with_ymd_and_hms(2026, 2, 1, 10, 0, 5).unwrap(),
            query_duration: Duration::from_secs(5),
            processing_duration: Duration::ZERO,
        };

        let mut buf = Vec::new();
        write_dup_report(&mut buf, &ctx, &clean).unwrap();
        let report = String::from_utf8(buf).unwrap();

        assert!(!report.contains("List of duplicate uri's"));
        assert!(report.contains("Number of duplicate URIs\t0"));
        assert!(report.contains("SUMMARY\tDAO\t"));
    }
}
