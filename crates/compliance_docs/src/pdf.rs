//! PDF table generation.
//!
//! Builds PDF 1.4 files directly: one content stream per page, the standard
//! Helvetica fonts with WinAnsi encoding, no embedded resources. All layout
//! values in [`PdfTableStyle`] are millimetres on an A4 portrait page,
//! measured from the top-left corner.

use anyhow::{Result, bail};
use compliance_core::ExportMetadata;

use crate::table::Table;

const PT_PER_MM: f64 = 72.0 / 25.4;
const PAGE_WIDTH: f64 = 595.28;
const PAGE_HEIGHT: f64 = 841.89;
const LINE_HEIGHT: f64 = 1.15;

const BOLD_FONT: &str = "/F1";
const REGULAR_FONT: &str = "/F2";

pub type Rgb = [u8; 3];

/// Visual layout of an exported table.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfTableStyle {
    pub title_font_size: f64,
    pub title_x: f64,
    pub title_y: f64,
    /// Font size of header and body cells, in points.
    pub font_size: f64,
    pub cell_padding: f64,
    /// Top of the table on the first page.
    pub start_y: f64,
    /// Top of the table on continuation pages.
    pub margin_top: f64,
    pub margin_side: f64,
    pub margin_bottom: f64,
    pub head_fill: Rgb,
    pub head_text: Rgb,
    pub body_text: Rgb,
    pub alternate_fill: Rgb,
    /// Body cells are cut to this many characters.
    pub max_cell_chars: usize,
}

impl Default for PdfTableStyle {
    fn default() -> Self {
        Self {
            title_font_size: 16.0,
            title_x: 14.0,
            title_y: 22.0,
            font_size: 8.0,
            cell_padding: 2.0,
            start_y: 30.0,
            margin_top: 30.0,
            margin_side: 14.0,
            margin_bottom: 14.0,
            head_fill: [66, 139, 202],
            head_text: [255, 255, 255],
            body_text: [20, 20, 20],
            alternate_fill: [245, 245, 245],
            max_cell_chars: 50,
        }
    }
}

/// Render `table` as a paginated PDF with `title` above it.
///
/// The header row is repeated on every page. Odd body rows get the
/// alternate fill.
pub fn render_pdf_table(
    title: &str,
    table: &Table,
    style: &PdfTableStyle,
    metadata: &ExportMetadata,
) -> Result<Vec<u8>> {
    if table.column_count() == 0 {
        bail!("Cannot render a table without columns");
    }

    let mut pages = PageWriter::new(style, table.headers());
    pages.title(title);
    pages.header_row();

    for (idx, row) in table.text_rows().iter().enumerate() {
        let cells: Vec<String> = row
            .iter()
            .map(|cell| truncate_chars(cell, style.max_cell_chars))
            .collect();
        pages.body_row(idx, &cells);
    }

    let builder = PdfBuilder {
        pages: pages.finish(),
    };
    Ok(builder.build(title, metadata))
}

/// Cut `s` to at most `max` characters.
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

// ---------------------------------------------------------------------------
// Page layout
// ---------------------------------------------------------------------------

/// Lays rows out top to bottom, starting a new page (with a fresh header
/// row) whenever the next row would cross the bottom margin.
struct PageWriter<'a> {
    style: &'a PdfTableStyle,
    headers: &'a [String],
    left: f64,
    table_width: f64,
    col_width: f64,
    row_height: f64,
    /// Distance from the top edge of the page to the next row, in points.
    cursor: f64,
    current: String,
    finished: Vec<String>,
}

impl<'a> PageWriter<'a> {
    fn new(style: &'a PdfTableStyle, headers: &'a [String]) -> Self {
        let left = style.margin_side * PT_PER_MM;
        let table_width = PAGE_WIDTH - 2.0 * left;
        Self {
            style,
            headers,
            left,
            table_width,
            col_width: table_width / headers.len() as f64,
            row_height: style.font_size * LINE_HEIGHT + 2.0 * style.cell_padding * PT_PER_MM,
            cursor: style.start_y * PT_PER_MM,
            current: String::new(),
            finished: Vec::new(),
        }
    }

    fn title(&mut self, title: &str) {
        self.current.push_str(&format!("{} rg\n", rgb([0, 0, 0])));
        self.current.push_str("BT\n");
        self.current.push_str(&format!(
            "{BOLD_FONT} {:.2} Tf\n",
            self.style.title_font_size
        ));
        self.current.push_str(&format!(
            "{:.2} {:.2} Td\n",
            self.style.title_x * PT_PER_MM,
            PAGE_HEIGHT - self.style.title_y * PT_PER_MM
        ));
        self.current.push_str(&format!("({}) Tj\n", pdf_text(title)));
        self.current.push_str("ET\n");
    }

    fn header_row(&mut self) {
        let headers = self.headers;
        self.fill_row(self.style.head_fill);
        for (col, header) in headers.iter().enumerate() {
            self.cell_text(col, BOLD_FONT, header, self.style.head_text);
        }
        self.cursor += self.row_height;
    }

    fn body_row(&mut self, index: usize, cells: &[String]) {
        let bottom_limit = PAGE_HEIGHT - self.style.margin_bottom * PT_PER_MM;
        if self.cursor + self.row_height > bottom_limit {
            self.break_page();
        }

        if index % 2 == 1 {
            self.fill_row(self.style.alternate_fill);
        }
        for (col, cell) in cells.iter().enumerate() {
            self.cell_text(col, REGULAR_FONT, cell, self.style.body_text);
        }
        self.cursor += self.row_height;
    }

    fn break_page(&mut self) {
        self.finished.push(std::mem::take(&mut self.current));
        self.cursor = self.style.margin_top * PT_PER_MM;
        self.header_row();
    }

    fn fill_row(&mut self, fill: Rgb) {
        let bottom = PAGE_HEIGHT - self.cursor - self.row_height;
        self.current.push_str(&format!("{} rg\n", rgb(fill)));
        self.current.push_str(&format!(
            "{:.2} {bottom:.2} {:.2} {:.2} re f\n",
            self.left, self.table_width, self.row_height
        ));
    }

    /// Writes one cell, clipped to its box so long text cannot bleed into
    /// the next column.
    fn cell_text(&mut self, col: usize, font: &str, text: &str, color: Rgb) {
        let x = self.left + col as f64 * self.col_width;
        let bottom = PAGE_HEIGHT - self.cursor - self.row_height;
        let padding = self.style.cell_padding * PT_PER_MM;
        let baseline = PAGE_HEIGHT - self.cursor - padding - self.style.font_size;

        self.current.push_str("q\n");
        self.current.push_str(&format!(
            "{x:.2} {bottom:.2} {:.2} {:.2} re W n\n",
            self.col_width, self.row_height
        ));
        self.current.push_str("BT\n");
        self.current
            .push_str(&format!("{font} {:.2} Tf\n", self.style.font_size));
        self.current.push_str(&format!("{} rg\n", rgb(color)));
        self.current
            .push_str(&format!("{:.2} {baseline:.2} Td\n", x + padding));
        self.current.push_str(&format!("({}) Tj\n", pdf_text(text)));
        self.current.push_str("ET\n");
        self.current.push_str("Q\n");
    }

    fn finish(mut self) -> Vec<String> {
        self.finished.push(self.current);
        self.finished
    }
}

fn rgb(color: Rgb) -> String {
    let [r, g, b] = color.map(|c| f64::from(c) / 255.0);
    format!("{r:.3} {g:.3} {b:.3}")
}

/// Encode text for a PDF string literal in WinAnsi.
///
/// Delimiters are escaped, Latin-1 characters become octal escapes, control
/// characters become spaces and anything WinAnsi cannot show becomes `?`.
fn pdf_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            c if c.is_control() => out.push(' '),
            c if c.is_ascii() => out.push(c),
            c => match winansi_byte(c) {
                Some(byte) => out.push_str(&format!("\\{byte:03o}")),
                None => out.push('?'),
            },
        }
    }
    out
}

fn winansi_byte(c: char) -> Option<u8> {
    let code = c as u32;
    if (0xA0..=0xFF).contains(&code) {
        return Some(code as u8);
    }
    let byte = match c {
        '€' => 0x80,
        '‚' => 0x82,
        '„' => 0x84,
        '…' => 0x85,
        '‰' => 0x89,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '™' => 0x99,
        _ => return None,
    };
    Some(byte)
}

// ---------------------------------------------------------------------------
// File assembly
// ---------------------------------------------------------------------------

/// Assembles page content streams into a PDF 1.4 file.
///
/// Object layout: 1 catalog, 2 page tree, 3 bold font, 4 regular font,
/// 5 info, then a page object and its content stream per page.
struct PdfBuilder {
    pages: Vec<String>,
}

impl PdfBuilder {
    const FIRST_PAGE_OBJ: usize = 6;

    fn build(&self, title: &str, metadata: &ExportMetadata) -> Vec<u8> {
        let mut objects: Vec<String> = Vec::with_capacity(5 + 2 * self.pages.len());

        objects.push("<< /Type /Catalog /Pages 2 0 R >>".into());

        let kids: Vec<String> = (0..self.pages.len())
            .map(|i| format!("{} 0 R", Self::FIRST_PAGE_OBJ + 2 * i))
            .collect();
        objects.push(format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            self.pages.len()
        ));

        objects.push(font_dict("Helvetica-Bold"));
        objects.push(font_dict("Helvetica"));
        objects.push(info_dict(title, metadata));

        for (i, content) in self.pages.iter().enumerate() {
            let content_obj = Self::FIRST_PAGE_OBJ + 2 * i + 1;
            objects.push(format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
                 /Contents {content_obj} 0 R /Resources << /Font << {BOLD_FONT} 3 0 R {REGULAR_FONT} 4 0 R >> >> >>"
            ));
            objects.push(format!(
                "<< /Length {} >>\nstream\n{content}\nendstream",
                content.len()
            ));
        }

        let mut pdf = String::from("%PDF-1.4\n");
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.push_str(&format!("{} 0 obj\n{body}\nendobj\n", i + 1));
        }

        let xref_offset = pdf.len();
        let num_objects = offsets.len() + 1;
        pdf.push_str(&format!("xref\n0 {num_objects}\n"));
        pdf.push_str("0000000000 65535 f \n");
        for offset in &offsets {
            pdf.push_str(&format!("{offset:010} 00000 n \n"));
        }

        pdf.push_str(&format!(
            "trailer\n<< /Size {num_objects} /Root 1 0 R /Info 5 0 R >>\n"
        ));
        pdf.push_str(&format!("startxref\n{xref_offset}\n%%EOF\n"));

        pdf.into_bytes()
    }
}

fn font_dict(base_font: &str) -> String {
    format!("<< /Type /Font /Subtype /Type1 /BaseFont /{base_font} /Encoding /WinAnsiEncoding >>")
}

fn info_dict(title: &str, metadata: &ExportMetadata) -> String {
    let created = metadata.timestamp().format("D:%Y%m%d%H%M%SZ");
    format!(
        "<< /Title ({}) /Author ({}) /Subject ({}) /Keywords ({}) /Creator ({}) \
         /Producer ({} {}) /CreationDate ({created}) >>",
        pdf_text(title),
        pdf_text(&metadata.author),
        pdf_text(&metadata.subject),
        pdf_text(&metadata.keywords_joined()),
        pdf_text(&metadata.title),
        pdf_text(&metadata.data_source),
        pdf_text(&metadata.version),
    )
}
