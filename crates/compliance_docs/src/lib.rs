//! Tabular export engine: turns uniform flat records into CSV, PDF or XLSX
//! artifacts and hands them to a [`sink::FileSink`].

pub mod csv;
pub mod exporter;
pub mod format;
pub mod pdf;
pub mod record;
pub mod sink;
pub mod table;
pub mod xlsx;

pub use exporter::{ExportOutcome, ExportRequest, Exporter, ReportExport, ReportKind};
pub use format::ExportFormat;
pub use record::{Record, Value};
pub use sink::{DirectorySink, FileSink, MemorySink, SavedFile};
pub use table::Table;
