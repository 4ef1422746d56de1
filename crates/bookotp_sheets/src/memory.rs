// --- File: crates/bookotp_sheets/src/memory.rs ---
//! In-process slot table.
//!
//! Backs the test suites and the development server when the Google Sheets
//! integration is off. Row numbers follow the sheet layout (first data row is
//! row 2) so addressing is identical to [`crate::GoogleSheetsTable`].

use bookotp_common::services::BoxFuture;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tracing::info;

use crate::error::SheetsError;
use crate::table::{SlotRow, SlotTable, FIRST_DATA_ROW};

#[derive(Debug, Default)]
pub struct MemorySlotTable {
    rows: RwLock<Vec<SlotRow>>,
    fail_updates: AtomicBool,
}

impl MemorySlotTable {
    /// Creates a table from data rows; their `row_number`s are reassigned.
    pub fn new(rows: Vec<SlotRow>) -> Self {
        Self {
            rows: RwLock::new(renumber(rows)),
            fail_updates: AtomicBool::new(false),
        }
    }

    /// Loads rows from a JSON array of slot objects.
    pub async fn from_seed_file(path: impl AsRef<Path>) -> Result<Self, SheetsError> {
        let path = path.as_ref();
        let shown = path.display().to_string();
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| SheetsError::SeedIo {
                path: shown.clone(),
                source,
            })?;
        let rows: Vec<SlotRow> =
            serde_json::from_str(&raw).map_err(|source| SheetsError::SeedFormat {
                path: shown.clone(),
                source,
            })?;
        info!(path = %shown, rows = rows.len(), "Loaded slot seed file");
        Ok(Self::new(rows))
    }

    /// Copy of the current rows.
    pub async fn snapshot(&self) -> Vec<SlotRow> {
        self.rows.read().await.clone()
    }

    /// Makes every subsequent `update_booking` fail, emulating an outage.
    pub fn set_fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    fn index_of(row_number: usize) -> Option<usize> {
        row_number.checked_sub(FIRST_DATA_ROW)
    }
}

fn renumber(mut rows: Vec<SlotRow>) -> Vec<SlotRow> {
    for (i, row) in rows.iter_mut().enumerate() {
        row.row_number = i + FIRST_DATA_ROW;
    }
    rows
}

impl SlotTable for MemorySlotTable {
    fn fetch_rows(&self) -> BoxFuture<'_, Vec<SlotRow>, SheetsError> {
        Box::pin(async move { Ok(self.rows.read().await.clone()) })
    }

    fn fetch_row(&self, row_number: usize) -> BoxFuture<'_, Option<SlotRow>, SheetsError> {
        Box::pin(async move {
            let rows = self.rows.read().await;
            Ok(Self::index_of(row_number).and_then(|i| rows.get(i).cloned()))
        })
    }

    fn update_booking(
        &self,
        row_number: usize,
        status: &str,
        name: &str,
        phone: &str,
    ) -> BoxFuture<'_, (), SheetsError> {
        let status = status.to_string();
        let name = name.to_string();
        let phone = phone.to_string();

        Box::pin(async move {
            if self.fail_updates.load(Ordering::SeqCst) {
                return Err(SheetsError::Unavailable("updates disabled".to_string()));
            }
            let mut rows = self.rows.write().await;
            let row = Self::index_of(row_number)
                .and_then(|i| rows.get_mut(i))
                .ok_or(SheetsError::RowOutOfRange(row_number))?;
            row.status = status;
            row.name = name;
            row.phone = phone;
            Ok(())
        })
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
