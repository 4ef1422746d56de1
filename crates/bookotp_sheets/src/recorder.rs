// --- File: crates/bookotp_sheets/src/recorder.rs ---
//! Booking recorder: finds the open row for a requested slot and marks it
//! booked.

use bookotp_common::{mask_phone, services::BookingDetails};
use chrono::{NaiveDate, NaiveTime};
use std::cmp::Ordering;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::error::RecorderError;
use crate::table::{SlotRow, SlotTable, BOOKED_STATUS};

/// Index (into `rows`) of the first open row matching the slot.
///
/// Rows are scanned in order, so duplicates resolve to the earliest one.
pub fn find_open_row(
    rows: &[SlotRow],
    service: &str,
    service_type: &str,
    date: &str,
    time: &str,
) -> Option<usize> {
    rows.iter()
        .position(|row| row.is_open() && row.matches(service, service_type, date, time))
}

/// Stable sort by parsed date then parsed time.
///
/// `YYYY-MM-DD` dates and `HH:MM` times sort chronologically; values that do
/// not parse sort after those that do, in string order.
pub fn sort_by_date(rows: &mut [SlotRow]) {
    rows.sort_by(|a, b| {
        compare_parsed(&a.date, &b.date, parse_date)
            .then_with(|| compare_parsed(&a.time, &b.time, parse_time))
    });
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

fn parse_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

fn compare_parsed<T: Ord>(a: &str, b: &str, parse: fn(&str) -> Option<T>) -> Ordering {
    match (parse(a), parse(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.trim().cmp(b.trim()),
    }
}

/// Serialises booking writes against one slot table.
///
/// The lock is held across fetch, re-check and update, so two recordings in
/// this process never interleave. Writers outside the process are only
/// caught by the re-read of the target row just before the update.
pub struct SlotRecorder {
    table: Arc<dyn SlotTable>,
    write_lock: Mutex<()>,
}

impl SlotRecorder {
    pub fn new(table: Arc<dyn SlotTable>) -> Self {
        Self {
            table,
            write_lock: Mutex::new(()),
        }
    }

    pub fn table_name(&self) -> &'static str {
        self.table.name()
    }

    /// Writes `booked`, the name and the phone into the row's E..G cells.
    pub async fn mark_booked(
        &self,
        row_number: usize,
        name: &str,
        phone: &str,
    ) -> Result<(), RecorderError> {
        self.table
            .update_booking(row_number, BOOKED_STATUS, name, phone)
            .await?;
        Ok(())
    }

    /// Books the first open row matching `details` for `phone`.
    ///
    /// Returns the row as written.
    pub async fn record_booking(
        &self,
        details: &BookingDetails,
        phone: &str,
    ) -> Result<SlotRow, RecorderError> {
        let _guard = self.write_lock.lock().await;
        let slot = details.to_string();

        let rows = self.table.fetch_rows().await?;
        let index = find_open_row(
            &rows,
            &details.service,
            &details.service_type,
            &details.date,
            &details.time,
        )
        .ok_or_else(|| {
            info!(event = "slot_not_found", %slot, "No open slot matches request");
            RecorderError::NoMatchingSlot(slot.clone())
        })?;
        let row_number = rows[index].row_number;

        // Re-read right before writing; another writer may have taken it.
        let current = self.table.fetch_row(row_number).await?;
        let still_open = current.as_ref().is_some_and(|row| {
            row.is_open()
                && row.matches(
                    &details.service,
                    &details.service_type,
                    &details.date,
                    &details.time,
                )
        });
        if !still_open {
            warn!(event = "slot_changed", row = row_number, %slot, "Slot changed before update");
            return Err(RecorderError::NoMatchingSlot(slot));
        }

        self.mark_booked(row_number, &details.name, phone).await?;
        info!(
            event = "slot_booked",
            row = row_number,
            %slot,
            phone = %mask_phone(phone),
            "Booking recorded"
        );

        let mut booked = rows[index].clone();
        booked.status = BOOKED_STATUS.to_string();
        booked.name = details.name.clone();
        booked.phone = phone.to_string();
        Ok(booked)
    }

    /// All rows, optionally filtered to open ones and sorted by date/time.
    pub async fn list_slots(
        &self,
        sort: bool,
        open_only: bool,
    ) -> Result<Vec<SlotRow>, RecorderError> {
        let mut rows = self.table.fetch_rows().await?;
        if open_only {
            rows.retain(SlotRow::is_open);
        }
        if sort {
            sort_by_date(&mut rows);
        }
        Ok(rows)
    }
}
