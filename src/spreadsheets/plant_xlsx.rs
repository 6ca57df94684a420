// src/spreadsheets/plant_xlsx.rs

use crate::domain::plant::{
    PlantSummary, PLANT_AREA_HEADER, PLANT_COUNT_HEADER, PLANT_DEPT_HEADER, PLANT_TOTAL_LABEL,
};
use crate::errors::ServerError;
use crate::responses::{xlsx_response, ResultResp};
use rust_xlsxwriter::Workbook;

pub const PLANT_SHEET_NAME: &str = "Plantwise Summary";
pub const PLANT_FILE_NAME: &str = "Plantwise_Summary.xlsx";

/// The plantwise summary as a downloadable workbook: area / department /
/// count rows followed by a TOTAL row with an empty department cell.
pub fn export_plant_xlsx(summary: &PlantSummary) -> ResultResp {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(PLANT_SHEET_NAME)
        .map_err(|e| ServerError::XlsxError(format!("Failed to set sheet name: {e}")))?;

    let headers = [PLANT_AREA_HEADER, PLANT_DEPT_HEADER, PLANT_COUNT_HEADER];
    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *header)
            .map_err(|e| {
                ServerError::XlsxError(format!("Failed to write header '{header}': {e}"))
            })?;
    }

    for (i, row) in summary.rows.iter().enumerate() {
        let r = (i + 1) as u32;
        worksheet
            .write_string(r, 0, &row.area)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write area: {e}")))?;
        worksheet
            .write_string(r, 1, &row.department)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write department: {e}")))?;
        worksheet
            .write_number(r, 2, row.count as f64)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write count: {e}")))?;
    }

    let total_row = (summary.rows.len() + 1) as u32;
    worksheet
        .write_string(total_row, 0, PLANT_TOTAL_LABEL)
        .map_err(|e| ServerError::XlsxError(format!("Failed to write total label: {e}")))?;
    worksheet
        .write_string(total_row, 1, "")
        .map_err(|e| ServerError::XlsxError(format!("Failed to write total row: {e}")))?;
    worksheet
        .write_number(total_row, 2, summary.total as f64)
        .map_err(|e| ServerError::XlsxError(format!("Failed to write total: {e}")))?;

    let buffer = workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {e}")))?;

    xlsx_response(buffer, PLANT_FILE_NAME)
}
