use compliance_core::{ExcelMode, ExportConfig, ExportError};
use serde::Serialize;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::csv::{render_csv, write_delimited_fallback};
use crate::format::ExportFormat;
use crate::pdf::{PdfTableStyle, render_pdf_table};
use crate::record::Record;
use crate::sink::{FileSink, sanitize_filename};
use crate::table::Table;
use crate::xlsx::render_xlsx;

/// One export: records, destination base name and target format.
#[derive(Debug, Clone, Copy)]
pub struct ExportRequest<'a> {
    pub records: &'a [Record],
    pub filename: &'a str,
    pub format: ExportFormat,
}

impl<'a> ExportRequest<'a> {
    pub fn new(records: &'a [Record], format: ExportFormat) -> Self {
        Self {
            records,
            filename: "",
            format,
        }
    }

    pub fn with_filename(mut self, filename: &'a str) -> Self {
        self.filename = filename;
        self
    }
}

/// Success descriptor of an export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportOutcome {
    /// Emitted file name, extension included.
    pub filename: String,
    pub requested: ExportFormat,
    /// What was actually written. Differs from `requested` when the
    /// delimited fallback stands in for a workbook.
    pub written: ExportFormat,
    pub mime: String,
    pub bytes: usize,
    pub rows: usize,
    pub location: Option<PathBuf>,
}

impl ExportOutcome {
    pub fn is_fallback(&self) -> bool {
        self.requested != self.written
    }
}

// ---------------------------------------------------------------------------
// Exporter
// ---------------------------------------------------------------------------

/// Converts record sequences into export artifacts and hands them to a sink.
///
/// Every operation is all-or-nothing: the artifact is built completely in
/// memory before the sink sees a single byte.
pub struct Exporter<S: FileSink> {
    sink: S,
    config: ExportConfig,
}

impl<S: FileSink> Exporter<S> {
    pub fn new(sink: S, config: ExportConfig) -> Self {
        Self { sink, config }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn export(&self, request: &ExportRequest<'_>) -> Result<ExportOutcome, ExportError> {
        match request.format {
            ExportFormat::Csv => self.export_csv(request.records, request.filename),
            ExportFormat::Pdf => self.export_pdf(request.records, request.filename),
            ExportFormat::Excel => self.export_excel(request.records, request.filename),
        }
    }

    /// Parses `format` and exports. Unknown selectors fail with
    /// [`ExportError::UnsupportedFormat`] before any work is done.
    pub fn export_as(
        &self,
        records: &[Record],
        filename: &str,
        format: &str,
    ) -> Result<ExportOutcome, ExportError> {
        let format = ExportFormat::from_str(format)?;
        self.export(&ExportRequest::new(records, format).with_filename(filename))
    }

    pub fn export_csv(
        &self,
        records: &[Record],
        filename: &str,
    ) -> Result<ExportOutcome, ExportError> {
        let table = self.normalize(records, ExportFormat::Csv)?;
        let bytes = render_csv(&table)
            .map(String::into_bytes)
            .map_err(ExportError::generation)?;
        self.deliver(filename, ExportFormat::Csv, ExportFormat::Csv, bytes, &table)
    }

    pub fn export_pdf(
        &self,
        records: &[Record],
        filename: &str,
    ) -> Result<ExportOutcome, ExportError> {
        let table = self.normalize(records, ExportFormat::Pdf)?;
        let title = self.base_name(filename);
        let style = PdfTableStyle {
            max_cell_chars: self.config.pdf_max_cell_chars,
            ..PdfTableStyle::default()
        };
        let bytes = render_pdf_table(&title, &table, &style, &self.config.metadata)
            .map_err(ExportError::generation)?;
        self.deliver(filename, ExportFormat::Pdf, ExportFormat::Pdf, bytes, &table)
    }

    /// Writes a workbook, or the CSV bytes when the configured
    /// [`ExcelMode`] is `DelimitedFallback`.
    pub fn export_excel(
        &self,
        records: &[Record],
        filename: &str,
    ) -> Result<ExportOutcome, ExportError> {
        let table = self.normalize(records, ExportFormat::Excel)?;
        match self.config.excel_mode {
            ExcelMode::Workbook => {
                let title = self.base_name(filename);
                let bytes = render_xlsx(&title, &table, &self.config.metadata)
                    .map_err(ExportError::generation)?;
                self.deliver(filename, ExportFormat::Excel, ExportFormat::Excel, bytes, &table)
            }
            ExcelMode::DelimitedFallback => {
                warn!("Excel export of '{filename}' written as CSV (delimited fallback)");
                let bytes = write_delimited_fallback(&table).map_err(ExportError::generation)?;
                self.deliver(filename, ExportFormat::Excel, ExportFormat::Csv, bytes, &table)
            }
        }
    }

    /// Binds a report's display name for its `csv`/`pdf`/`excel` exports.
    pub fn report<'a>(&'a self, kind: ReportKind, records: &'a [Record]) -> ReportExport<'a, S> {
        ReportExport {
            exporter: self,
            kind,
            records,
        }
    }

    fn normalize(&self, records: &[Record], format: ExportFormat) -> Result<Table, ExportError> {
        let table = Table::from_records(records).inspect_err(|_| {
            debug!("Skipping {format} export: no records");
        })?;
        debug!(
            "Exporting {} rows x {} columns as {format}",
            table.row_count(),
            table.column_count()
        );
        Ok(table)
    }

    fn base_name(&self, filename: &str) -> String {
        sanitize_filename(filename, &self.config.default_filename)
    }

    fn deliver(
        &self,
        filename: &str,
        requested: ExportFormat,
        written: ExportFormat,
        bytes: Vec<u8>,
        table: &Table,
    ) -> Result<ExportOutcome, ExportError> {
        let name = format!("{}.{}", self.base_name(filename), written.extension());
        let mime = written.mime_type();
        let location = self
            .sink
            .save(&bytes, &name, mime)
            .map_err(ExportError::sink)?;

        info!("Exported {name} ({} rows, {} bytes)", table.row_count(), bytes.len());

        Ok(ExportOutcome {
            filename: name,
            requested,
            written,
            mime: mime.to_string(),
            bytes: bytes.len(),
            rows: table.row_count(),
            location,
        })
    }
}

// ---------------------------------------------------------------------------
// Report wrappers
// ---------------------------------------------------------------------------

/// The dashboard registries that offer an export button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ReportKind {
    SebiRules,
    BrokerDetails,
    ClientReports,
    FeesCollected,
    Alerts,
}

impl ReportKind {
    pub const ALL: [ReportKind; 5] = [
        Self::SebiRules,
        Self::BrokerDetails,
        Self::ClientReports,
        Self::FeesCollected,
        Self::Alerts,
    ];

    /// Base name of the exported file.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::SebiRules => "SEBI Rules",
            Self::BrokerDetails => "Broker Details",
            Self::ClientReports => "Client Reports",
            Self::FeesCollected => "Fees Collected",
            Self::Alerts => "System Alerts",
        }
    }
}

/// An exporter bound to one report's records and display name.
pub struct ReportExport<'a, S: FileSink> {
    exporter: &'a Exporter<S>,
    kind: ReportKind,
    records: &'a [Record],
}

impl<S: FileSink> ReportExport<'_, S> {
    pub fn csv(&self) -> Result<ExportOutcome, ExportError> {
        self.exporter.export_csv(self.records, self.kind.display_name())
    }

    pub fn pdf(&self) -> Result<ExportOutcome, ExportError> {
        self.exporter.export_pdf(self.records, self.kind.display_name())
    }

    pub fn excel(&self) -> Result<ExportOutcome, ExportError> {
        self.exporter.export_excel(self.records, self.kind.display_name())
    }

    pub fn export(&self, format: ExportFormat) -> Result<ExportOutcome, ExportError> {
        match format {
            ExportFormat::Csv => self.csv(),
            ExportFormat::Pdf => self.pdf(),
            ExportFormat::Excel => self.excel(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;

    fn exporter(mode: ExcelMode) -> Exporter<MemorySink> {
        let config = ExportConfig {
            excel_mode: mode,
            ..ExportConfig::default()
        };
        Exporter::new(MemorySink::new(), config)
    }

    fn sample() -> Vec<Record> {
        vec![Record::new().with("a", 1).with("b", 2)]
    }

    #[test]
    fn test_csv_outcome() {
        let exp = exporter(ExcelMode::Workbook);
        let outcome = exp.export_csv(&sample(), "x").unwrap();
        assert_eq!(outcome.filename, "x.csv");
        assert_eq!(outcome.mime, "text/csv;charset=utf-8");
        assert_eq!(outcome.rows, 1);
        assert!(!outcome.is_fallback());
        assert_eq!(exp.sink().last().unwrap().bytes, b"a,b\n1,2\n");
    }

    #[test]
    fn test_default_filename_when_blank() {
        let exp = exporter(ExcelMode::Workbook);
        let outcome = exp.export_csv(&sample(), "").unwrap();
        assert_eq!(outcome.filename, "export.csv");
    }

    #[test]
    fn test_pdf_title_is_filename() {
        let exp = exporter(ExcelMode::Workbook);
        let outcome = exp.export_pdf(&sample(), "Broker Details").unwrap();
        assert_eq!(outcome.filename, "Broker Details.pdf");
        let saved = exp.sink().last().unwrap();
        assert!(String::from_utf8_lossy(&saved.bytes).contains("(Broker Details) Tj"));
    }

    #[test]
    fn test_excel_workbook_mode() {
        let exp = exporter(ExcelMode::Workbook);
        let outcome = exp.export_excel(&sample(), "x").unwrap();
        assert_eq!(outcome.filename, "x.xlsx");
        assert_eq!(outcome.written, ExportFormat::Excel);
        assert_eq!(&exp.sink().last().unwrap().bytes[0..2], b"PK");
    }

    #[test]
    fn test_excel_fallback_is_csv() {
        let exp = exporter(ExcelMode::DelimitedFallback);
        let outcome = exp.export_excel(&sample(), "x").unwrap();
        assert_eq!(outcome.filename, "x.csv");
        assert_eq!(outcome.requested, ExportFormat::Excel);
        assert_eq!(outcome.written, ExportFormat::Csv);
        assert!(outcome.is_fallback());
    }

    #[test]
    fn test_empty_input_never_reaches_sink() {
        let exp = exporter(ExcelMode::Workbook);
        for format in ExportFormat::ALL {
            let request = ExportRequest::new(&[], format).with_filename("x");
            assert_eq!(exp.export(&request), Err(ExportError::EmptyInput));
        }
        assert!(exp.sink().is_empty());
    }

    #[test]
    fn test_export_as_rejects_unknown_format() {
        let exp = exporter(ExcelMode::Workbook);
        let err = exp.export_as(&sample(), "x", "docx").unwrap_err();
        assert_eq!(err, ExportError::UnsupportedFormat("docx".into()));
        assert!(exp.sink().is_empty());
    }

    #[test]
    fn test_report_uses_display_name() {
        let exp = exporter(ExcelMode::Workbook);
        let records = sample();
        let report = exp.report(ReportKind::Alerts, &records);
        assert_eq!(report.csv().unwrap().filename, "System Alerts.csv");
        assert_eq!(report.pdf().unwrap().filename, "System Alerts.pdf");
        assert_eq!(report.excel().unwrap().filename, "System Alerts.xlsx");
        assert_eq!(exp.sink().len(), 3);
    }

    #[test]
    fn test_display_names() {
        let names: Vec<&str> = ReportKind::ALL.iter().map(|k| k.display_name()).collect();
        assert_eq!(
            names,
            vec![
                "SEBI Rules",
                "Broker Details",
                "Client Reports",
                "Fees Collected",
                "System Alerts"
            ]
        );
    }
}
