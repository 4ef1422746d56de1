//! Storage for live one-time codes.
//!
//! A store holds at most one record per phone. Every operation that reads and
//! then mutates a record runs under a single lock, so a verify racing an
//! issue for the same phone sees either the old record or the new one, never
//! a mix.

use bookotp_common::services::BookingDetails;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// A live code bound to a phone number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpRecord {
    pub phone: String,
    pub code: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub booking: Option<BookingDetails>,
}

impl OtpRecord {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// What [`OtpStore::resolve`] should do with the record it found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Remove the record and hand it back (successful match).
    Take,
    /// Leave the record in place.
    Keep,
    /// Remove the record (expired).
    Drop,
}

pub trait OtpStore: Send + Sync {
    /// Stores `record`, replacing any record for the same phone.
    fn insert(&self, record: OtpRecord);

    /// Removes and returns the record for `phone`.
    fn remove(&self, phone: &str) -> Option<OtpRecord>;

    /// Looks up `phone` and applies `decide` to the record atomically.
    ///
    /// Returns `None` when no record exists, otherwise the decision taken and
    /// the record as it was.
    fn resolve(
        &self,
        phone: &str,
        decide: &dyn Fn(&OtpRecord) -> Decision,
    ) -> Option<(Decision, OtpRecord)>;

    /// Drops every record for which `keep` returns false; returns how many.
    fn retain(&self, keep: &dyn Fn(&OtpRecord) -> bool) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-local store backed by a mutex-guarded map.
#[derive(Debug, Default)]
pub struct InMemoryOtpStore {
    records: Mutex<HashMap<String, OtpRecord>>,
}

impl InMemoryOtpStore {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock cannot leave a record half-written, so
    // a poisoned map is still consistent.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, OtpRecord>> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl OtpStore for InMemoryOtpStore {
    fn insert(&self, record: OtpRecord) {
        self.lock().insert(record.phone.clone(), record);
    }

    fn remove(&self, phone: &str) -> Option<OtpRecord> {
        self.lock().remove(phone)
    }

    fn resolve(
        &self,
        phone: &str,
        decide: &dyn Fn(&OtpRecord) -> Decision,
    ) -> Option<(Decision, OtpRecord)> {
        let mut records = self.lock();
        let decision = decide(records.get(phone)?);
        let record = match decision {
            Decision::Keep => records.get(phone)?.clone(),
            Decision::Take | Decision::Drop => records.remove(phone)?,
        };
        Some((decision, record))
    }

    fn retain(&self, keep: &dyn Fn(&OtpRecord) -> bool) -> usize {
        let mut records = self.lock();
        let before = records.len();
        records.retain(|_, record| keep(record));
        before - records.len()
    }

    fn len(&self) -> usize {
        self.lock().len()
    }
}
