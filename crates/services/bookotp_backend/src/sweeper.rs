use bookotp_otp::OtpManager;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;

/// Periodically drops expired codes. Abort the handle to stop it.
pub fn spawn_otp_sweeper(otp: Arc<OtpManager>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(every.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let purged = otp.purge_expired();
            debug!(purged, pending = otp.pending(), "OTP sweep");
        }
    })
}
