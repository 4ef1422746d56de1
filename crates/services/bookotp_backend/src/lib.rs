// --- File: crates/services/bookotp_backend/src/lib.rs ---
pub mod app;
pub mod app_state;
pub mod service_factory;
pub mod sweeper;

pub use app::build_router;
pub use app_state::AppState;
pub use service_factory::BookOtpServiceFactory;
pub use sweeper::spawn_otp_sweeper;
