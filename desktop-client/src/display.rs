use std::fmt::Write;

use crate::error::ClientError;
use crate::models::{RecentUpload, UploadSummary};

pub const BAR_WIDTH: usize = 40;
pub const PREVIEW_ROWS: usize = 5;

pub fn render_summary(summary: &UploadSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total Records: {}", summary.total_count);
    let _ = writeln!(out);
    let _ = writeln!(out, "{:<12} {:>10}", "Parameter", "Average");
    let _ = writeln!(out, "{:<12} {:>10.2}", "Flowrate", summary.averages.flowrate);
    let _ = writeln!(out, "{:<12} {:>10.2}", "Pressure", summary.averages.pressure);
    let _ = writeln!(
        out,
        "{:<12} {:>10.2}",
        "Temperature", summary.averages.temperature
    );
    out
}

/// Horizontal bars scaled so the most common type fills `BAR_WIDTH`.
pub fn render_distribution(summary: &UploadSummary) -> String {
    let mut out = String::from("Equipment Type Distribution\n");
    let max = summary.type_distribution.values().copied().max().unwrap_or(0);
    let label_width = summary
        .type_distribution
        .keys()
        .map(|k| k.chars().count())
        .max()
        .unwrap_or(0);

    for (label, count) in &summary.type_distribution {
        let width = if max == 0 { 0 } else { count * BAR_WIDTH / max };
        // Nonzero counts always get at least one mark.
        let width = if *count > 0 { width.max(1) } else { 0 };
        let _ = writeln!(
            out,
            "{:<label_width$} | {} {}",
            label,
            "#".repeat(width),
            count,
            label_width = label_width
        );
    }
    out
}

pub fn render_recent(uploads: &[RecentUpload]) -> String {
    if uploads.is_empty() {
        return "No datasets uploaded yet\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "{:<20} {:>8}  {}", "Uploaded", "Records", "File");
    for upload in uploads {
        let _ = writeln!(
            out,
            "{:<20} {:>8}  {}",
            upload.uploaded_at.format("%Y-%m-%d %H:%M:%S"),
            upload.total_count,
            upload.filename
        );
    }
    out
}

/// Header plus the first `max_rows` rows of a CSV, comma separated.
pub fn preview_csv(content: &[u8], max_rows: usize) -> Result<String, ClientError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content);

    let mut out = String::new();
    let headers = reader.headers()?.clone();
    let _ = writeln!(out, "{}", headers.iter().collect::<Vec<_>>().join(", "));

    let mut shown = 0;
    for record in reader.records() {
        if shown == max_rows {
            let _ = writeln!(out, "...");
            break;
        }
        let record = record?;
        let _ = writeln!(out, "{}", record.iter().collect::<Vec<_>>().join(", "));
        shown += 1;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Averages;
    use std::collections::BTreeMap;

    fn summary() -> UploadSummary {
        let mut type_distribution = BTreeMap::new();
        type_distribution.insert("Pump".to_string(), 4);
        type_distribution.insert("Valve".to_string(), 1);
        UploadSummary {
            total_count: 5,
            type_distribution,
            averages: Averages {
                flowrate: 15.0,
                pressure: 5.666,
                temperature: 105.0,
            },
        }
    }

    #[test]
    fn summary_shows_totals_and_two_decimals() {
        let text = render_summary(&summary());
        assert!(text.starts_with("Total Records: 5\n"));
        assert!(text.contains("Pressure           5.67"));
        assert!(text.contains("Flowrate          15.00"));
    }

    #[test]
    fn bars_scale_to_most_common_type() {
        let text = render_distribution(&summary());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Equipment Type Distribution");
        assert_eq!(lines[1], format!("Pump  | {} 4", "#".repeat(BAR_WIDTH)));
        assert_eq!(lines[2], format!("Valve | {} 1", "#".repeat(BAR_WIDTH / 4)));
    }

    #[test]
    fn preview_truncates_long_files() {
        let csv = "Type,Flowrate\nPump,1\nPump,2\nValve,3\n";
        let text = preview_csv(csv.as_bytes(), 2).unwrap();
        assert_eq!(text, "Type, Flowrate\nPump, 1\nPump, 2\n...\n");

        let text = preview_csv(csv.as_bytes(), 10).unwrap();
        assert!(!text.contains("..."));
    }

    #[test]
    fn empty_recent_list_has_message() {
        assert_eq!(render_recent(&[]), "No datasets uploaded yet\n");
    }
}
