// src/spreadsheets/summary_xlsx.rs

use crate::domain::summary::SummaryTable;
use crate::errors::ServerError;
use crate::responses::{xlsx_response, ResultResp};
use rust_xlsxwriter::Workbook;

pub const SUMMARY_SHEET_NAME: &str = "Custom Summary";
pub const SUMMARY_FILE_NAME: &str = "Custom_Permit_Summary.xlsx";

/// The customized summary as a downloadable workbook. Columns are written
/// exactly as displayed, with the TOTAL row last.
pub fn export_summary_xlsx(table: &SummaryTable) -> ResultResp {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(SUMMARY_SHEET_NAME)
        .map_err(|e| ServerError::XlsxError(format!("Failed to set sheet name: {e}")))?;

    for (col, header) in table.headers().iter().enumerate() {
        worksheet
            .write_string(0, col as u16, header)
            .map_err(|e| {
                ServerError::XlsxError(format!("Failed to write header '{header}': {e}"))
            })?;
    }

    let rows = table.rows.iter().chain(std::iter::once(&table.total));
    for (i, row) in rows.enumerate() {
        let r = (i + 1) as u32;
        worksheet
            .write_string(r, 0, &row.area)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write area: {e}")))?;
        for (c, count) in row.counts.iter().enumerate() {
            worksheet
                .write_number(r, (c + 1) as u16, *count as f64)
                .map_err(|e| ServerError::XlsxError(format!("Failed to write count: {e}")))?;
        }
    }

    let buffer = workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {e}")))?;

    xlsx_response(buffer, SUMMARY_FILE_NAME)
}
