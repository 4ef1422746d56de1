// --- File: crates/bookotp_sheets/src/google.rs ---
//! Google Sheets implementation of [`SlotTable`].

use bookotp_common::services::BoxFuture;
use google_sheets4::api::ValueRange;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

use crate::auth::HubType;
use crate::error::SheetsError;
use crate::table::{SlotRow, SlotTable, FIRST_DATA_ROW};

/// Reads `{sheet}!A:G` and writes `{sheet}!E{n}:G{n}` with `RAW` input.
pub struct GoogleSheetsTable {
    hub: Arc<HubType>,
    spreadsheet_id: String,
    sheet_name: String,
}

impl GoogleSheetsTable {
    pub fn new(hub: Arc<HubType>, spreadsheet_id: &str, sheet_name: &str) -> Self {
        Self {
            hub,
            spreadsheet_id: spreadsheet_id.to_string(),
            sheet_name: sheet_name.to_string(),
        }
    }

    fn range(&self, cells: &str) -> String {
        a1_range(&self.sheet_name, cells)
    }
}

/// Builds an A1 range, quoting the sheet name when it is not a bare word.
pub(crate) fn a1_range(sheet_name: &str, cells: &str) -> String {
    let bare = !sheet_name.is_empty()
        && sheet_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if bare {
        format!("{sheet_name}!{cells}")
    } else {
        format!("'{}'!{cells}", sheet_name.replace('\'', "''"))
    }
}

/// Renders a cell the way the sheet shows it: strings as-is, anything else
/// through its JSON text.
pub(crate) fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Turns the raw `A:G` grid into data rows, skipping the header.
pub(crate) fn rows_from_grid(grid: Vec<Vec<Value>>) -> Vec<SlotRow> {
    grid.into_iter()
        .enumerate()
        .skip(1)
        .map(|(i, cells)| {
            let cells: Vec<String> = cells.iter().map(cell_text).collect();
            SlotRow::from_cells(i + 1, &cells)
        })
        .collect()
}

impl SlotTable for GoogleSheetsTable {
    fn fetch_rows(&self) -> BoxFuture<'_, Vec<SlotRow>, SheetsError> {
        let range = self.range("A:G");

        Box::pin(async move {
            let (_response, value_range) = self
                .hub
                .spreadsheets()
                .values_get(&self.spreadsheet_id, &range)
                .doit()
                .await?;

            let rows = rows_from_grid(value_range.values.unwrap_or_default());
            debug!(sheet = %self.sheet_name, rows = rows.len(), "Fetched slot rows");
            Ok(rows)
        })
    }

    fn fetch_row(&self, row_number: usize) -> BoxFuture<'_, Option<SlotRow>, SheetsError> {
        Box::pin(async move {
            if row_number < FIRST_DATA_ROW {
                return Err(SheetsError::RowOutOfRange(row_number));
            }
            let range = self.range(&format!("A{row_number}:G{row_number}"));
            let (_response, value_range) = self
                .hub
                .spreadsheets()
                .values_get(&self.spreadsheet_id, &range)
                .doit()
                .await?;

            Ok(value_range
                .values
                .and_then(|grid| grid.into_iter().next())
                .map(|cells| {
                    let cells: Vec<String> = cells.iter().map(cell_text).collect();
                    SlotRow::from_cells(row_number, &cells)
                }))
        })
    }

    fn update_booking(
        &self,
        row_number: usize,
        status: &str,
        name: &str,
        phone: &str,
    ) -> BoxFuture<'_, (), SheetsError> {
        let values = vec![vec![
            Value::String(status.to_string()),
            Value::String(name.to_string()),
            Value::String(phone.to_string()),
        ]];

        Box::pin(async move {
            if row_number < FIRST_DATA_ROW {
                return Err(SheetsError::RowOutOfRange(row_number));
            }
            let range = self.range(&format!("E{row_number}:G{row_number}"));
            let req = ValueRange {
                range: Some(range.clone()),
                major_dimension: Some("ROWS".to_string()),
                values: Some(values),
                ..Default::default()
            };

            let (_response, update) = self
                .hub
                .spreadsheets()
                .values_update(req, &self.spreadsheet_id, &range)
                .value_input_option("RAW")
                .doit()
                .await?;

            info!(
                sheet = %self.sheet_name,
                row = row_number,
                updated_cells = update.updated_cells.unwrap_or_default(),
                "Updated booking row"
            );
            Ok(())
        })
    }

    fn name(&self) -> &'static str {
        "google_sheets"
    }
}
