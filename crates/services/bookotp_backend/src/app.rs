// --- File: crates/services/bookotp_backend/src/app.rs ---
use axum::Router;
use bookotp_booking::routes as booking_routes;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::app_state::AppState;

/// Assembles the full HTTP surface.
///
/// Booking routes answer both at the root (`/send-otp`) and under the API
/// prefix (`/api/send-otp`).
pub fn build_router(state: &AppState) -> Router {
    let booking_router = booking_routes(state.booking.clone());

    #[allow(unused_mut)] // for the features it needs to be mutable
    let mut app = Router::new()
        .merge(booking_router.clone())
        .nest("/api", booking_router);

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    {
        use bookotp_booking::doc::BookingApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "bookotp API",
                version = "0.1.0",
                description = "OTP-confirmed bookings backed by a spreadsheet",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            servers( (url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(BookingApiDoc::openapi());
        info!("Adding Swagger UI at /api/docs");

        let swagger_ui = SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc);
        app = app.merge(swagger_ui);
    }

    info!("Routes mounted at / and /api");
    app.layer(TraceLayer::new_for_http())
}
