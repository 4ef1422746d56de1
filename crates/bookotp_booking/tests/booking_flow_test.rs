use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use bookotp_booking::{routes, BookingState};
use bookotp_common::services::{BoxFuture, BoxedError, NotificationResult, NotificationService};
use bookotp_config::AppConfig;
use bookotp_otp::OtpManager;
use bookotp_sheets::{MemorySlotTable, SlotRecorder, SlotRow, SlotTable};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use tower::ServiceExt;

const PHONE: &str = "966500000001";
const NORMALISED: &str = "+966500000001";

/// Notifier that keeps every message and can be switched to fail.
#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
    fail: AtomicBool,
}

#[derive(Debug)]
struct GatewayDown;

impl std::fmt::Display for GatewayDown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "gateway down: secret-upstream-detail")
    }
}

impl std::error::Error for GatewayDown {}

impl RecordingNotifier {
    fn messages(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    fn last_code(&self) -> String {
        let (_, body) = self.messages().last().cloned().expect("no message sent");
        body.chars().filter(|c| c.is_ascii_digit()).collect()
    }
}

impl NotificationService for RecordingNotifier {
    type Error = BoxedError;

    fn send_message(&self, to: &str, body: &str) -> BoxFuture<'_, NotificationResult, Self::Error> {
        let to = to.to_string();
        let body = body.to_string();
        Box::pin(async move {
            if self.fail.load(Ordering::SeqCst) {
                return Err(BoxedError(Box::new(GatewayDown)));
            }
            self.sent.lock().unwrap().push((to, body));
            Ok(NotificationResult {
                id: "test".into(),
                status: "queued".into(),
            })
        })
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

struct Harness {
    app: Router,
    table: Arc<MemorySlotTable>,
    notifier: Arc<RecordingNotifier>,
    otp: Arc<OtpManager>,
}

fn slot(service: &str, service_type: &str, date: &str, time: &str) -> SlotRow {
    SlotRow {
        service: service.into(),
        service_type: service_type.into(),
        date: date.into(),
        time: time.into(),
        ..Default::default()
    }
}

fn harness() -> Harness {
    let config: AppConfig = serde_json::from_value(json!({
        "server": { "host": "127.0.0.1", "port": 0 },
        "phone": { "default_country_code": "966" },
        "messages": {
            "otp_template": "Code {code}",
            "confirmation_template": "Booked {service} {date} {time} for {name}"
        }
    }))
    .unwrap();

    let table = Arc::new(MemorySlotTable::new(vec![
        slot("Dental", "", "2024-01-01", "10:00"),
        slot("Dental", "", "2024-01-01", "11:00"),
        slot("Dermatology", "Consultation", "2024-01-02", "09:30"),
    ]));
    let notifier = Arc::new(RecordingNotifier::default());
    let otp = Arc::new(OtpManager::in_memory(config.otp.ttl_seconds));

    let state = Arc::new(BookingState {
        config: Arc::new(config),
        otp: otp.clone(),
        recorder: Arc::new(SlotRecorder::new(table.clone())),
        notifier: notifier.clone(),
    });

    Harness {
        app: routes(state),
        table,
        notifier,
        otp,
    }
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn dental_request() -> Value {
    json!({
        "phone": PHONE,
        "name": "Sara",
        "service": "Dental",
        "date": "2024-01-01",
        "time": "10:00"
    })
}

#[tokio::test]
async fn test_end_to_end_booking() {
    let h = harness();

    let (status, body) = call(&h.app, "POST", "/send-otp", Some(dental_request())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["data"]["expires_in_seconds"], 300);

    let messages = h.notifier.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].0, NORMALISED);
    let code = h.notifier.last_code();
    assert_eq!(code.len(), 6);

    let (status, body) = call(
        &h.app,
        "POST",
        "/verify-otp",
        Some(json!({ "phone": PHONE, "otp": code })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["data"]["booking"]["service"], "Dental");

    let rows = h.table.snapshot().await;
    assert_eq!(rows[0].status, "booked");
    assert_eq!(rows[0].name, "Sara");
    assert_eq!(rows[0].phone, NORMALISED);
    assert!(rows[1].is_open());

    let confirmation = &h.notifier.messages()[1].1;
    assert_eq!(confirmation, "Booked Dental 2024-01-01 10:00 for Sara");

    // The same slot cannot be confirmed again.
    call(&h.app, "POST", "/send-otp", Some(dental_request())).await;
    let code = h.notifier.last_code();
    let (status, body) = call(
        &h.app,
        "POST",
        "/verify-otp",
        Some(json!({ "phone": PHONE, "otp": code })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["ok"], false);
    assert_eq!(body["kind"], "no_matching_slot");
}

#[tokio::test]
async fn test_code_is_single_use() {
    let h = harness();
    call(&h.app, "POST", "/send-otp", Some(json!({ "phone": PHONE }))).await;
    let code = h.notifier.last_code();

    let verify = json!({ "phone": PHONE, "otp": code });
    let (status, body) = call(&h.app, "POST", "/verify-otp", Some(verify.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["message"], "Phone number verified");
    assert!(body["data"].get("booking").is_none());

    let (status, body) = call(&h.app, "POST", "/verify-otp", Some(verify)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["kind"], "unknown_phone");
}

#[tokio::test]
async fn test_wrong_code_then_right_code() {
    let h = harness();
    call(&h.app, "POST", "/send-otp", Some(dental_request())).await;
    let code = h.notifier.last_code();
    let wrong = if code == "111111" { "222222" } else { "111111" };

    let (status, body) = call(
        &h.app,
        "POST",
        "/verify-otp",
        Some(json!({ "phone": PHONE, "otp": wrong })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["kind"], "invalid_code");
    assert!(h.table.snapshot().await[0].is_open());

    let (status, _) = call(
        &h.app,
        "POST",
        "/verify-otp",
        Some(json!({ "phone": "+966 500 000 001", "otp": code })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_booking_fields_on_verify_are_used_when_none_bound() {
    let h = harness();
    call(&h.app, "POST", "/send-otp", Some(json!({ "phone": PHONE }))).await;
    let code = h.notifier.last_code();

    let (status, body) = call(
        &h.app,
        "POST",
        "/verify-otp",
        Some(json!({
            "phone": PHONE,
            "otp": code,
            "name": "Omar",
            "service": "Dermatology",
            "serviceType": "Consultation",
            "date": "2024-01-02",
            "time": "09:30"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["booking"]["serviceType"], "Consultation");
    assert_eq!(h.table.snapshot().await[2].name, "Omar");
}

#[tokio::test]
async fn test_send_otp_validation() {
    let h = harness();

    let (status, body) = call(&h.app, "POST", "/send-otp", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation");

    let (status, _) = call(&h.app, "POST", "/send-otp", Some(json!({ "phone": "12" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(
        &h.app,
        "POST",
        "/send-otp",
        Some(json!({ "phone": PHONE, "service": "Dental" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation");

    // Malformed JSON is a validation error too.
    let request = Request::builder()
        .method("POST")
        .uri("/send-otp")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = h.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert!(h.notifier.messages().is_empty());
    assert_eq!(h.otp.pending(), 0);
}

#[tokio::test]
async fn test_verify_rejects_malformed_code() {
    let h = harness();
    let (status, body) = call(
        &h.app,
        "POST",
        "/verify-otp",
        Some(json!({ "phone": PHONE, "otp": "12ab" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation");
}

#[tokio::test]
async fn test_delivery_failure_discards_code() {
    let h = harness();
    h.notifier.fail.store(true, Ordering::SeqCst);

    let (status, body) = call(&h.app, "POST", "/send-otp", Some(json!({ "phone": PHONE }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["kind"], "delivery_failed");
    assert!(!body.to_string().contains("secret-upstream-detail"));
    assert_eq!(h.otp.pending(), 0);
}

#[tokio::test]
async fn test_store_failure_is_reported() {
    let h = harness();
    call(&h.app, "POST", "/send-otp", Some(dental_request())).await;
    let code = h.notifier.last_code();
    h.table.set_fail_updates(true);

    let (status, body) = call(
        &h.app,
        "POST",
        "/verify-otp",
        Some(json!({ "phone": PHONE, "otp": code })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["kind"], "store_failed");
    assert!(!body.to_string().contains("updates disabled"));
    // No confirmation goes out for a booking that was not written.
    assert_eq!(h.notifier.messages().len(), 1);
}

#[tokio::test]
async fn test_confirmation_failure_after_booking() {
    let h = harness();
    call(&h.app, "POST", "/send-otp", Some(dental_request())).await;
    let code = h.notifier.last_code();
    h.notifier.fail.store(true, Ordering::SeqCst);

    let (status, body) = call(
        &h.app,
        "POST",
        "/verify-otp",
        Some(json!({ "phone": PHONE, "otp": code })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["kind"], "delivery_failed");
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .contains("Booking recorded"));
    assert_eq!(h.table.snapshot().await[0].status, "booked");
}

#[tokio::test]
async fn test_list_slots() {
    let h = harness();
    h.table
        .update_booking(2, "booked", "Someone", "+966500000009")
        .await
        .unwrap();

    let (status, body) = call(&h.app, "GET", "/slots?sort=date&open_only=true", None).await;
    assert_eq!(status, StatusCode::OK);
    let slots = body["data"]["slots"].as_array().unwrap();
    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0]["time"], "11:00");
    assert_eq!(slots[1]["date"], "2024-01-02");
    assert!(slots[0].get("phone").is_none());

    let (status, body) = call(&h.app, "GET", "/slots", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["slots"][0]["booked"], true);

    let (status, body) = call(&h.app, "GET", "/slots?sort=price", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation");
}

#[tokio::test]
async fn test_health() {
    let h = harness();
    let (status, body) = call(&h.app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true, "data": { "status": "ok" } }));
}

/// Notifier whose first delivery waits for a release signal and then fails.
#[derive(Default)]
struct HeldFirstDelivery {
    calls: AtomicUsize,
    entered: Notify,
    release: Notify,
    sent: Mutex<Vec<String>>,
}

impl NotificationService for HeldFirstDelivery {
    type Error = BoxedError;

    fn send_message(&self, _to: &str, body: &str) -> BoxFuture<'_, NotificationResult, Self::Error> {
        let body = body.to_string();
        Box::pin(async move {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                self.entered.notify_one();
                self.release.notified().await;
                return Err(BoxedError(Box::new(GatewayDown)));
            }
            self.sent.lock().unwrap().push(body);
            Ok(NotificationResult {
                id: "test".into(),
                status: "queued".into(),
            })
        })
    }

    fn name(&self) -> &'static str {
        "held"
    }
}

#[tokio::test]
async fn test_late_delivery_failure_keeps_newer_code() {
    let config: AppConfig = serde_json::from_value(json!({
        "server": { "host": "127.0.0.1", "port": 0 },
        "messages": { "otp_template": "Code {code}" }
    }))
    .unwrap();
    let notifier = Arc::new(HeldFirstDelivery::default());
    let otp = Arc::new(OtpManager::in_memory(config.otp.ttl_seconds));
    let app = routes(Arc::new(BookingState {
        config: Arc::new(config),
        otp: otp.clone(),
        recorder: Arc::new(SlotRecorder::new(Arc::new(MemorySlotTable::default()))),
        notifier: notifier.clone(),
    }));

    let first_app = app.clone();
    let first = tokio::spawn(async move {
        call(&first_app, "POST", "/send-otp", Some(json!({ "phone": NORMALISED }))).await
    });
    notifier.entered.notified().await;

    let (status, _) = call(&app, "POST", "/send-otp", Some(json!({ "phone": NORMALISED }))).await;
    assert_eq!(status, StatusCode::OK);
    let body = notifier.sent.lock().unwrap().last().cloned().unwrap();
    let code: String = body.chars().filter(|c| c.is_ascii_digit()).collect();

    notifier.release.notify_one();
    let (status, body) = first.await.unwrap();
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["kind"], "delivery_failed");
    assert_eq!(otp.pending(), 1);

    let (status, body) = call(
        &app,
        "POST",
        "/verify-otp",
        Some(json!({ "phone": NORMALISED, "otp": code })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["message"], "Phone number verified");
}
