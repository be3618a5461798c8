use anyhow::{Context, Result};

use crate::table::Table;

/// Render a table as CSV text.
///
/// Fields containing a comma, a double quote, CR or LF are quoted and inner
/// quotes are doubled; everything else is written bare. Every line ends
/// with `\n`.
pub fn render_csv(table: &Table) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b',')
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer
        .write_record(table.headers())
        .context("Failed to write header record")?;

    for (idx, row) in table.text_rows().iter().enumerate() {
        writer
            .write_record(row)
            .with_context(|| format!("Failed to write data record {idx}"))?;
    }

    let bytes = writer.into_inner().context("Failed to flush CSV writer")?;

    String::from_utf8(bytes).context("CSV output contained invalid UTF-8")
}

/// The bytes written when a spreadsheet is requested but the delimited
/// fallback is configured. Identical to the CSV export.
pub fn write_delimited_fallback(table: &Table) -> Result<Vec<u8>> {
    render_csv(table)
        .map(String::into_bytes)
        .context("Delimited fallback failed")
}

/// Parse a CSV string into headers and rows.
///
/// The first record is treated as the header row.
pub fn parse_csv(input: &str) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .context("Failed to read CSV headers")?
        .iter()
        .map(String::from)
        .collect();

    let rows = reader
        .records()
        .map(|result| {
            result
                .map(|record| record.iter().map(String::from).collect())
                .context("Failed to read CSV record")
        })
        .collect::<Result<Vec<Vec<String>>>>()?;

    Ok((headers, rows))
}
