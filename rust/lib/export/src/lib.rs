//! Export utilities — pure transformations of (dataset, metadata) into
//! downloadable files. No network or storage access.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Rows rendered per page in the document format.
pub const ROWS_PER_PAGE: usize = 40;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(String),
}

/// A tabular dataset ready for export. Rows must already be filtered to
/// exactly what the caller is displaying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Metadata stamped on exported files.
#[derive(Debug, Clone, Default)]
pub struct ExportMeta {
    /// RFC 3339 generation timestamp.
    pub generated_at: String,
    /// Human-readable range label, e.g. "Last 7 days".
    pub range_label: String,
}

/// Supported export output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Tabular spreadsheet (CSV).
    Csv,
    /// Paginated plain-text document.
    Document,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Document => "txt",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Document => "text/plain",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "document" | "doc" => Ok(ExportFormat::Document),
            other => Err(format!("unknown export format '{other}'")),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Serialize a dataset as CSV: one header row, then one row per record.
pub fn to_csv(dataset: &Dataset) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(&dataset.columns)
        .map_err(|e| ExportError::Csv(e.to_string()))?;
    for row in &dataset.rows {
        writer
            .write_record(row)
            .map_err(|e| ExportError::Csv(e.to_string()))?;
    }
    writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.to_string()))
}

/// Render a dataset as a paginated plain-text document.
///
/// Pages hold [`ROWS_PER_PAGE`] rows each; every page carries the title,
/// the range label, and a "Page n of m" footer. An empty dataset still
/// produces one page so the reader sees the header rather than nothing.
pub fn to_document(dataset: &Dataset, meta: &ExportMeta) -> Vec<u8> {
    let page_count = dataset.rows.len().div_ceil(ROWS_PER_PAGE).max(1);
    let mut out = String::new();

    for page in 0..page_count {
        let start = page * ROWS_PER_PAGE;
        let end = (start + ROWS_PER_PAGE).min(dataset.rows.len());

        out.push_str(&format!("{} — {}\n", dataset.title, meta.range_label));
        if !meta.generated_at.is_empty() {
            out.push_str(&format!("Generated at {}\n", meta.generated_at));
        }
        out.push('\n');
        out.push_str(&dataset.columns.join(" | "));
        out.push('\n');
        out.push_str(&"-".repeat(dataset.columns.join(" | ").len().max(8)));
        out.push('\n');

        for row in &dataset.rows[start..end] {
            out.push_str(&row.join(" | "));
            out.push('\n');
        }
        if start == end {
            out.push_str("(no data for this range)\n");
        }

        out.push_str(&format!("\nPage {} of {}\n", page + 1, page_count));
        if page + 1 < page_count {
            out.push('\x0C'); // form feed between pages
        }
    }

    out.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(rows: usize) -> Dataset {
        Dataset {
            title: "Daily activity".into(),
            columns: vec!["date".into(), "persons".into()],
            rows: (0..rows)
                .map(|i| vec![format!("2026-08-{:02}", i + 1), i.to_string()])
                .collect(),
        }
    }

    #[test]
    fn csv_row_count_matches_dataset() {
        let bytes = to_csv(&dataset(7)).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        // Header + 7 data rows.
        assert_eq!(text.lines().count(), 8);
        assert!(text.starts_with("date,persons\n"));
    }

    #[test]
    fn csv_empty_dataset_has_only_header() {
        let bytes = to_csv(&dataset(0)).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn document_paginates() {
        let meta = ExportMeta {
            generated_at: "2026-08-30T00:00:00Z".into(),
            range_label: "Last 90 days".into(),
        };
        let bytes = to_document(&dataset(ROWS_PER_PAGE + 1), &meta);
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("Page 1 of 2"));
        assert!(text.contains("Page 2 of 2"));
        assert_eq!(text.matches('\x0C').count(), 1);
    }

    #[test]
    fn document_empty_dataset_still_renders_a_page() {
        let bytes = to_document(&dataset(0), &ExportMeta::default());
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("Page 1 of 1"));
        assert!(text.contains("no data for this range"));
    }

    #[test]
    fn format_parsing() {
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("document".parse::<ExportFormat>().unwrap(), ExportFormat::Document);
        assert!("xlsx".parse::<ExportFormat>().is_err());
    }
}
