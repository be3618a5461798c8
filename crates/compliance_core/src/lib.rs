pub mod config;
pub mod error;
pub mod logging;

pub use config::{ExcelMode, ExportConfig, ExportMetadata};
pub use error::{ErrorCategory, ExportError};
