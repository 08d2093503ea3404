//! Worksheet reading
//!
//! Turns an xlsx/xls payload into header-addressed rows. Header handling
//! mirrors the upstream pandas exports the sheets are built for: the first
//! row after `skip_rows` is the header, blank headers become `Unnamed: N`,
//! repeated headers get `.1`, `.2` suffixes and blank rows are skipped.

use crate::error::{QcError, Result};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::{NaiveDate, NaiveDateTime};
use fcl_quality_common::column_key;
use std::collections::HashMap;
use std::io::Cursor;

/// One cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDateTime),
}

/// Date formats tried on text cells, day-first like the packing sheets.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d.%m.%y", "%d.%m.%Y", "%d-%m-%Y", "%d/%m/%y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%d/%m/%Y %H:%M:%S", "%d/%m/%Y %H:%M"];

/// Excel serial date → datetime (1900 system, epoch 1899-12-30).
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    // 9999-12-31
    if !(0.0..=2_958_465.0).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let seconds = (serial * 86_400.0).round() as i64;
    epoch.checked_add_signed(chrono::Duration::seconds(seconds))
}

/// Parses a date written as text, trying day-first formats.
pub fn parse_date_text(text: &str, formats: &[&str]) -> Option<NaiveDate> {
    let text = text.trim();
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt.date());
        }
    }
    formats
        .iter()
        .chain(DATE_FORMATS.iter())
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

impl Cell {
    fn from_data(data: &Data) -> Cell {
        match data {
            Data::Empty | Data::Error(_) => Cell::Empty,
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Float(f) => Cell::Number(*f),
            Data::Bool(b) => Cell::Bool(*b),
            Data::String(s) => Cell::Text(s.clone()),
            Data::DateTime(dt) => excel_serial_to_datetime(dt.as_f64())
                .map(Cell::Date)
                .unwrap_or(Cell::Number(dt.as_f64())),
            Data::DateTimeIso(s) => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .or_else(|| {
                    NaiveDate::parse_from_str(s, "%Y-%m-%d")
                        .ok()
                        .and_then(|d| d.and_hms_opt(0, 0, 0))
                })
                .map(Cell::Date)
                .unwrap_or_else(|| Cell::Text(s.clone())),
            Data::DurationIso(s) => Cell::Text(s.clone()),
        }
    }

    /// Blank text counts as empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Trimmed text form; `None` when empty. Whole numbers print without a
    /// fraction (`45.0` → `"45"`).
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => Some(format!("{}", *n as i64)),
            Cell::Number(n) => Some(n.to_string()),
            Cell::Bool(b) => Some(b.to_string()),
            Cell::Date(dt) => Some(dt.format("%Y-%m-%d").to_string()),
        }
    }

    /// Numeric form; text is parsed (comma decimals accepted).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Cell::Text(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
            Cell::Empty | Cell::Date(_) => None,
        }
    }

    /// Date form; numbers are Excel serials, text is parsed with `formats`
    /// first and the common day-first formats after.
    pub fn as_date(&self, formats: &[&str]) -> Option<NaiveDate> {
        match self {
            Cell::Date(dt) => Some(dt.date()),
            Cell::Number(n) => excel_serial_to_datetime(*n).map(|dt| dt.date()),
            Cell::Text(s) => parse_date_text(s, formats),
            Cell::Empty | Cell::Bool(_) => None,
        }
    }
}

/// Header-addressed worksheet
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    pub name: String,
    headers: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<Cell>>,
}

impl Sheet {
    /// Reads `sheet_name` from a workbook payload (xlsx, xlsm, xls, ods).
    pub fn from_workbook_bytes(bytes: &[u8], sheet_name: &str, skip_rows: usize) -> Result<Sheet> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

        if !workbook.sheet_names().iter().any(|name| name == sheet_name) {
            return Err(QcError::MalformedData(format!(
                "la hoja `{}` no existe en el libro",
                sheet_name
            )));
        }

        let range = workbook.worksheet_range(sheet_name)?;
        let (row_offset, col_offset) = range
            .start()
            .map(|(r, c)| (r as usize, c as usize))
            .unwrap_or((0, 0));

        // absolute grid starting at A1
        let grid = std::iter::repeat_with(Vec::new)
            .take(row_offset)
            .chain(range.rows().map(|row| {
                std::iter::repeat(Cell::Empty)
                    .take(col_offset)
                    .chain(row.iter().map(Cell::from_data))
                    .collect::<Vec<_>>()
            }));

        let mut rows = grid.skip(skip_rows);
        let header_cells = rows.next().unwrap_or_default();
        let body: Vec<Vec<Cell>> = rows.collect();

        let width = body
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(header_cells.len()))
            .max()
            .unwrap_or(0);
        let raw_headers: Vec<Option<String>> = (0..width)
            .map(|i| header_cells.get(i).and_then(Cell::as_text))
            .collect();

        Ok(Sheet::from_parts(sheet_name, raw_headers, body))
    }

    /// Builds a sheet from already-read cells; used by tests and fixtures.
    pub fn from_parts(name: &str, raw_headers: Vec<Option<String>>, body: Vec<Vec<Cell>>) -> Sheet {
        let headers = dedup_headers(&raw_headers);
        let mut index = HashMap::new();
        for (i, header) in headers.iter().enumerate() {
            index.entry(column_key(header)).or_insert(i);
        }
        let rows = body
            .into_iter()
            .filter(|row| !row.iter().all(Cell::is_empty))
            .collect();

        Sheet {
            name: name.to_string(),
            headers,
            index,
            rows,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn has_column(&self, header: &str) -> bool {
        self.index.contains_key(&column_key(header))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = SheetRow<'_>> {
        self.rows.iter().map(move |cells| SheetRow { sheet: self, cells })
    }
}

/// Blank headers → `Unnamed: N`; repeats → `NAME.1`, `NAME.2`.
fn dedup_headers(raw: &[Option<String>]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    raw.iter()
        .enumerate()
        .map(|(i, header)| {
            let base = match header {
                Some(h) => h.clone(),
                None => format!("Unnamed: {}", i),
            };
            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base.clone()
            } else {
                format!("{}.{}", base, count)
            };
            *count += 1;
            name
        })
        .collect()
}

/// One data row
#[derive(Debug, Clone, Copy)]
pub struct SheetRow<'a> {
    sheet: &'a Sheet,
    cells: &'a [Cell],
}

static EMPTY_CELL: Cell = Cell::Empty;

impl<'a> SheetRow<'a> {
    /// Cell under `header`; missing columns and short rows read as empty.
    pub fn get(&self, header: &str) -> &'a Cell {
        self.sheet
            .index
            .get(&column_key(header))
            .and_then(|&i| self.cells.get(i))
            .unwrap_or(&EMPTY_CELL)
    }

    pub fn text(&self, header: &str) -> Option<String> {
        self.get(header).as_text()
    }

    /// Text with a fallback for empty cells.
    pub fn text_or(&self, header: &str, default: &str) -> String {
        self.text(header).unwrap_or_else(|| default.to_string())
    }

    pub fn number(&self, header: &str) -> Option<f64> {
        self.get(header).as_f64()
    }

    pub fn date(&self, header: &str, formats: &[&str]) -> Option<NaiveDate> {
        self.get(header).as_date(formats)
    }

    /// `(header, cell)` for every column.
    pub fn cells(&self) -> impl Iterator<Item = (&'a str, &'a Cell)> {
        let cells = self.cells;
        self.sheet
            .headers
            .iter()
            .enumerate()
            .map(move |(i, h)| (h.as_str(), cells.get(i).unwrap_or(&EMPTY_CELL)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    #[test]
    fn test_excel_serial_dates() {
        let dt = excel_serial_to_datetime(45658.5).unwrap();
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(dt.format("%H:%M").to_string(), "12:00");
        assert!(excel_serial_to_datetime(-1.0).is_none());
    }

    #[test]
    fn test_parse_day_first_dates() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(parse_date_text("07.03.25", &["%d.%m.%y"]), Some(expected));
        assert_eq!(parse_date_text("07/03/2025", &[]), Some(expected));
        assert_eq!(parse_date_text("2025-03-07 10:30:00", &[]), Some(expected));
        assert_eq!(parse_date_text("sin fecha", &[]), None);
    }

    #[test]
    fn test_cell_text_forms() {
        assert_eq!(Cell::Number(45.0).as_text().as_deref(), Some("45"));
        assert_eq!(Cell::Number(12.5).as_text().as_deref(), Some("12.5"));
        assert_eq!(text("  EXC045 ").as_text().as_deref(), Some("EXC045"));
        assert_eq!(text("   ").as_text(), None);
        assert_eq!(Cell::Empty.as_text(), None);
    }

    #[test]
    fn test_cell_numbers() {
        assert_eq!(text("12,5").as_f64(), Some(12.5));
        assert_eq!(text("Dia").as_f64(), None);
        assert_eq!(Cell::Bool(true).as_f64(), Some(1.0));
    }

    #[test]
    fn test_headers_unnamed_and_duplicates() {
        let sheet = Sheet::from_parts(
            "S",
            vec![Some("FCL".into()), None, Some("FCL".into()), Some(" DIA  DESP. ".into())],
            vec![vec![text("A1"), text("x"), text("B1"), text("01/02/2025")]],
        );
        assert_eq!(sheet.headers(), &["FCL", "Unnamed: 1", "FCL.1", " DIA  DESP. "]);

        let row = sheet.rows().next().unwrap();
        assert_eq!(row.text("FCL").as_deref(), Some("A1"));
        assert_eq!(row.text("FCL.1").as_deref(), Some("B1"));
        assert_eq!(row.text("Unnamed: 1").as_deref(), Some("x"));
        assert_eq!(
            row.date("DIA DESP.", &[]),
            NaiveDate::from_ymd_opt(2025, 2, 1)
        );
    }

    #[test]
    fn test_blank_rows_skipped_and_short_rows_padded() {
        let sheet = Sheet::from_parts(
            "S",
            vec![Some("A".into()), Some("B".into())],
            vec![vec![text("1")], vec![Cell::Empty, text(" ")], vec![text("2"), text("3")]],
        );
        assert_eq!(sheet.len(), 2);
        let first = sheet.rows().next().unwrap();
        assert!(first.get("B").is_empty());
        assert!(first.get("MISSING").is_empty());
    }
}
