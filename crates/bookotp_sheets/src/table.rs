//! The tabular store holding bookable slots.
//!
//! Columns A..G are `service, serviceType, date, time, status, name, phone`.
//! Row 1 is a header; data rows keep their sheet row number so an update
//! can address `E{n}:G{n}` directly.

use bookotp_common::services::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::error::SheetsError;

/// Status written into column E when a slot is taken.
pub const BOOKED_STATUS: &str = "booked";

/// Number of columns read per row (A..G).
pub const COLUMN_COUNT: usize = 7;

/// First sheet row holding data (row 1 is the header).
pub const FIRST_DATA_ROW: usize = 2;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotRow {
    /// 1-based sheet row number.
    #[serde(default)]
    pub row_number: usize,
    pub service: String,
    #[serde(default)]
    pub service_type: String,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
}

impl SlotRow {
    /// Builds a row from raw cells (missing trailing cells are empty).
    pub fn from_cells(row_number: usize, cells: &[String]) -> Self {
        let cell = |i: usize| cells.get(i).cloned().unwrap_or_default();
        Self {
            row_number,
            service: cell(0),
            service_type: cell(1),
            date: cell(2),
            time: cell(3),
            status: cell(4),
            name: cell(5),
            phone: cell(6),
        }
    }

    pub fn is_open(&self) -> bool {
        is_open(&self.status)
    }

    /// Whether the first four columns match the requested slot.
    pub fn matches(&self, service: &str, service_type: &str, date: &str, time: &str) -> bool {
        self.service.trim() == service.trim()
            && self.service_type.trim() == service_type.trim()
            && self.date.trim() == date.trim()
            && self.time.trim() == time.trim()
    }
}

/// A row is open unless its status reads `booked` (any case, padded).
pub fn is_open(status: &str) -> bool {
    !status.trim().eq_ignore_ascii_case(BOOKED_STATUS)
}

/// Row-level access to the slot table.
///
/// Implementations never retry; failures propagate to the caller.
pub trait SlotTable: Send + Sync {
    /// All data rows in sheet order, header excluded.
    fn fetch_rows(&self) -> BoxFuture<'_, Vec<SlotRow>, SheetsError>;

    /// A single data row, `None` when the row is empty or past the end.
    fn fetch_row(&self, row_number: usize) -> BoxFuture<'_, Option<SlotRow>, SheetsError>;

    /// Overwrites columns E..G of `row_number`.
    fn update_booking(
        &self,
        row_number: usize,
        status: &str,
        name: &str,
        phone: &str,
    ) -> BoxFuture<'_, (), SheetsError>;

    /// Short backend name used in logs and error classification.
    fn name(&self) -> &'static str;
}
