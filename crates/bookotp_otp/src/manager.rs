// --- File: crates/bookotp_otp/src/manager.rs ---
use bookotp_common::{mask_phone, services::BookingDetails};
use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, Rng};
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::OtpError;
use crate::store::{Decision, InMemoryOtpStore, OtpRecord, OtpStore};

/// Length of every issued code.
pub const CODE_LENGTH: usize = 6;
const CODE_MIN: u32 = 100_000;
const CODE_MAX: u32 = 999_999;

/// A freshly issued code, ready to hand to a notifier.
#[derive(Debug, Clone)]
pub struct IssuedCode {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies one-time codes keyed by (normalised) phone number.
///
/// Phones are used as given; callers normalise them first so that different
/// spellings of one number hit the same record.
pub struct OtpManager {
    store: Arc<dyn OtpStore>,
    ttl: Duration,
}

impl OtpManager {
    pub fn new(store: Arc<dyn OtpStore>, ttl_seconds: u64) -> Self {
        let ttl = i64::try_from(ttl_seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX);
        Self { store, ttl }
    }

    /// Manager over a fresh [`InMemoryOtpStore`].
    pub fn in_memory(ttl_seconds: u64) -> Self {
        Self::new(Arc::new(InMemoryOtpStore::new()), ttl_seconds)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, phone: &str, booking: Option<BookingDetails>) -> IssuedCode {
        self.issue_at(phone, booking, Utc::now())
    }

    /// Generates a code for `phone`, replacing any live one.
    pub fn issue_at(
        &self,
        phone: &str,
        booking: Option<BookingDetails>,
        now: DateTime<Utc>,
    ) -> IssuedCode {
        let code = generate_code();
        let expires_at = now.checked_add_signed(self.ttl).unwrap_or(DateTime::<Utc>::MAX_UTC);

        self.store.insert(OtpRecord {
            phone: phone.to_string(),
            code: code.clone(),
            issued_at: now,
            expires_at,
            booking,
        });
        info!(event = "otp_issued", phone = %mask_phone(phone), %expires_at, "Issued verification code");

        IssuedCode { code, expires_at }
    }

    pub fn verify(&self, phone: &str, code: &str) -> Result<Option<BookingDetails>, OtpError> {
        self.verify_at(phone, code, Utc::now())
    }

    /// Checks `code` against the live record for `phone`.
    ///
    /// A match consumes the record and returns the booking bound at issue
    /// time. A mismatch leaves the record untouched. An expired record is
    /// removed and reported as [`OtpError::Expired`] whatever code was given.
    pub fn verify_at(
        &self,
        phone: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<BookingDetails>, OtpError> {
        let submitted = code.trim().as_bytes();
        let outcome = self.store.resolve(phone, &|record| {
            if record.is_expired_at(now) {
                Decision::Drop
            } else if constant_time_eq(record.code.as_bytes(), submitted) {
                Decision::Take
            } else {
                Decision::Keep
            }
        });

        let masked = mask_phone(phone);
        match outcome {
            None => {
                debug!(event = "otp_unknown", phone = %masked);
                Err(OtpError::UnknownPhone)
            }
            Some((Decision::Drop, _)) => {
                info!(event = "otp_expired", phone = %masked);
                Err(OtpError::Expired)
            }
            Some((Decision::Keep, _)) => {
                info!(event = "otp_mismatch", phone = %masked);
                Err(OtpError::InvalidCode)
            }
            Some((Decision::Take, record)) => {
                info!(event = "otp_verified", phone = %masked);
                Ok(record.booking)
            }
        }
    }

    /// Drops the live code for `phone`, if any.
    pub fn discard(&self, phone: &str) -> bool {
        let removed = self.store.remove(phone).is_some();
        if removed {
            debug!(event = "otp_discarded", phone = %mask_phone(phone));
        }
        removed
    }

    /// Drops the record for `phone` only while it still holds `code`.
    ///
    /// A newer code issued for the same phone in the meantime is kept.
    pub fn discard_code(&self, phone: &str, code: &str) -> bool {
        let outcome = self.store.resolve(phone, &|record| {
            if constant_time_eq(record.code.as_bytes(), code.as_bytes()) {
                Decision::Drop
            } else {
                Decision::Keep
            }
        });
        let removed = matches!(outcome, Some((Decision::Drop, _)));
        if removed {
            debug!(event = "otp_discarded", phone = %mask_phone(phone));
        }
        removed
    }

    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Utc::now())
    }

    /// Removes every record expired at `now`; returns how many.
    pub fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
        let purged = self.store.retain(&|record| !record.is_expired_at(now));
        if purged > 0 {
            debug!(event = "otp_purged", purged, "Purged expired verification codes");
        }
        purged
    }

    pub fn pending(&self) -> usize {
        self.store.len()
    }
}

fn generate_code() -> String {
    OsRng.gen_range(CODE_MIN..=CODE_MAX).to_string()
}

#[cfg(test)]
pub(crate) fn generate_code_for_test() -> String {
    generate_code()
}
