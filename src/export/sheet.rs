use rust_xlsxwriter::{Format, Workbook, XlsxError};

use super::ExportError;
use crate::database::models::KeywordRow;

pub const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub const HEADERS: [&str; 7] = ["单词", "释义", "行业释义", "变形", "分组", "备注", "创建时间"];

const SHEET_NAME: &str = "keywords";

impl From<XlsxError> for ExportError {
    fn from(err: XlsxError) -> Self {
        ExportError::Spreadsheet(err.to_string())
    }
}

fn cells(row: &KeywordRow) -> [&str; 7] {
    fn text(v: &Option<String>) -> &str {
        v.as_deref().unwrap_or("")
    }
    [
        row.keyword.as_str(),
        text(&row.definition),
        text(&row.industry_definition),
        text(&row.anagram),
        text(&row.name),
        text(&row.remark),
        text(&row.create_time),
    ]
}

/// Renders keyword rows into an in-memory `.xlsx`: a bold header row, then one row per keyword.
pub fn build_workbook(rows: &[KeywordRow]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;
    for (col, title) in HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *title, &header)?;
    }
    for (i, row) in rows.iter().enumerate() {
        let line = (i + 1) as u32;
        for (col, value) in cells(row).iter().enumerate() {
            if !value.is_empty() {
                worksheet.write_string(line, col as u16, *value)?;
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}
