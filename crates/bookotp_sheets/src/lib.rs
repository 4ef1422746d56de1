// --- File: crates/bookotp_sheets/src/lib.rs ---
// Declare modules within this crate
#[cfg(feature = "google")]
pub mod auth;
pub mod error;
#[cfg(feature = "google")]
pub mod google;
#[cfg(feature = "google")]
#[cfg(test)]
mod google_test;
pub mod memory;
pub mod recorder;
#[cfg(test)]
mod recorder_proptest;
pub mod table;

pub use error::{RecorderError, SheetsError};
#[cfg(feature = "google")]
pub use google::GoogleSheetsTable;
pub use memory::MemorySlotTable;
pub use recorder::{find_open_row, sort_by_date, SlotRecorder};
pub use table::{is_open, SlotRow, SlotTable, BOOKED_STATUS};
