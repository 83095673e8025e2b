use anyhow::{Result, anyhow};
use rust_xlsxwriter::Workbook;
use serde_json::Value;
use tracing::info;

/// Spreadsheet columns and the JSON path each one is read from.
const COLUMNS: [(&str, &[&str]); 11] = [
    ("Item ID", &["id"]),
    ("Title", &["title"]),
    ("Category ID", &["category_id"]),
    ("Price", &["price"]),
    ("Currency", &["currency_id"]),
    ("Available Quantity", &["available_quantity"]),
    ("Sold Quantity", &["sold_quantity"]),
    ("Condition", &["condition"]),
    ("Listing Type", &["listing_type_id"]),
    ("Seller ID", &["seller", "id"]),
    ("Permalink", &["permalink"]),
];

pub type ListingRow = Vec<(&'static str, String)>;

pub struct ExportResult {
    pub filename: String,
    pub record_count: usize,
    pub file_size: u64,
}

/// Flattens one search result into the fixed column order.
pub fn listing_row(item: &Value) -> ListingRow {
    COLUMNS
        .iter()
        .map(|(header, path)| (*header, get_str(item, path)))
        .collect()
}

fn get_str(value: &Value, path: &[&str]) -> String {
    let mut current = value;
    for key in path {
        match current.get(*key) {
            Some(v) => current = v,
            None => return String::new(),
        }
    }
    match current {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

pub fn export_to_excel(rows: &[ListingRow], filename: &str) -> Result<ExportResult> {
    info!("Creating Excel file: {}", filename);
    let Some(first) = rows.first() else {
        return Err(anyhow!("No data to export"));
    };

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, (header, _)) in first.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }

    for (row_idx, row) in rows.iter().enumerate() {
        for (col, (_, value)) in row.iter().enumerate() {
            worksheet.write_string((row_idx + 1) as u32, col as u16, value)?;
        }
    }

    workbook.save(filename)?;
    let metadata = std::fs::metadata(filename)?;
    info!("Excel file created: {}", filename);
    Ok(ExportResult {
        filename: filename.to_string(),
        record_count: rows.len(),
        file_size: metadata.len(),
    })
}
