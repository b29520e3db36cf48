#![cfg(not(tarpaulin_include))]

use crate::error::{DashboardError, Result};
use crate::table::{TABLE_KEYS, TableRow};

pub const CSV_FILENAME: &str = "properties.csv";
pub const XLSX_FILENAME: &str = "properties.xlsx";

/// Convert table rows to CSV format
///
/// The header row lists [`TABLE_KEYS`]; absent cells are written empty and
/// quoting of commas, quotes and newlines is left to the `csv` writer.
///
/// # Arguments
/// * `rows` - Literature table rows of the current selection
///
/// # Returns
/// * `Result<String>` - CSV content as a string or an error
///
/// # Examples
/// ```
/// use htm_dashboard::downloader::to_csv;
///
/// let csv = to_csv(&[]).unwrap();
/// assert!(csv.starts_with("material,isotope"));
/// ```
pub fn to_csv(rows: &[TableRow]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(TABLE_KEYS)?;
    for row in rows {
        writer.write_record(TABLE_KEYS.iter().map(|key| row.cell(key)))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| DashboardError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| DashboardError::InvalidInput(e.to_string()))
}

/// Convert table rows to XLSX format
///
/// Writes one worksheet with a header row followed by one row per record.
/// The year column is written as a number, everything else as text.
///
/// # Arguments
/// * `rows` - Literature table rows of the current selection
///
/// # Returns
/// * `Result<Vec<u8>>` - XLSX file content as bytes or an error
#[cfg(feature = "web")]
pub fn to_xlsx(rows: &[TableRow]) -> Result<Vec<u8>> {
    use rust_xlsxwriter::Workbook;

    let xlsx_err = |e: rust_xlsxwriter::XlsxError| DashboardError::Xlsx(e.to_string());

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (c, key) in TABLE_KEYS.iter().enumerate() {
        worksheet.write_string(0, c as u16, *key).map_err(xlsx_err)?;
    }

    for (r, row) in rows.iter().enumerate() {
        let xl_row = (r + 1) as u32;
        for (c, key) in TABLE_KEYS.iter().enumerate() {
            match (*key, row.year) {
                ("year", Some(year)) => {
                    worksheet
                        .write_number(xl_row, c as u16, year as f64)
                        .map_err(xlsx_err)?;
                }
                _ => {
                    worksheet
                        .write_string(xl_row, c as u16, row.cell(key))
                        .map_err(xlsx_err)?;
                }
            }
        }
    }

    workbook.save_to_buffer().map_err(xlsx_err)
}
