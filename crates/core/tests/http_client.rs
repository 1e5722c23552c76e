use axum::{http::StatusCode, response::Json, routing::post, Router};
use rackdiag_core::{
    ClientConfig, Completion, DiagnoseClient, DiagnoseFailure, DiagnoseRequest, DiagnosisResult,
    FormController, HttpDiagnoseClient,
};
use serde_json::json;
use std::net::SocketAddr;
use std::time::Duration;

async fn echo_diagnosis(Json(req): Json<DiagnoseRequest>) -> Json<serde_json::Value> {
    Json(json!({
        "diagnosis": format!("{} with {} inputs", req.diagnostic_type, req.inputs.len()),
        "confidence": 0.82,
        "next_steps": ["Check for leaks", "Add refrigerant"],
        "safety_warnings": ["High discharge temp risk"],
        "manual_reference": "Sec 4.2",
        "llm_summary": format!("suction_pressure={}", req.inputs["suction_pressure"]),
        "manual_chunks": [{"content": "Verify charge", "score": 0.9}]
    }))
}

async fn spawn_upstream() -> SocketAddr {
    let app = Router::new()
        .route("/api/diagnose", post(echo_diagnosis))
        .route(
            "/fail",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded") }),
        )
        .route("/garbage", post(|| async { "<html>not json</html>" }))
        .route(
            "/slow",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "too late"
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve upstream") });
    addr
}

fn client_for(addr: SocketAddr, path: &str, timeout: Duration) -> HttpDiagnoseClient {
    let cfg = ClientConfig::new(format!("http://{addr}{path}"), timeout).expect("config");
    HttpDiagnoseClient::new(&cfg).expect("client")
}

fn low_suction_request() -> DiagnoseRequest {
    let mut form = FormController::new();
    form.set_field_value("suction_pressure", "30").unwrap();
    form.payload()
}

#[tokio::test]
async fn success_decodes_full_result() {
    let addr = spawn_upstream().await;
    let client = client_for(addr, "/api/diagnose", Duration::from_secs(5));

    let result = client.diagnose(&low_suction_request()).await.expect("diagnosis");

    assert_eq!(result.diagnosis, "low_suction with 3 inputs");
    assert_eq!(result.llm_summary, "suction_pressure=30");
    assert_eq!(result.safety_warnings, vec!["High discharge temp risk".to_string()]);
    assert_eq!(result.manual_chunks[0].content, "Verify charge");
    assert_eq!(result.manual_chunks[0].extra["score"], 0.9);
}

#[tokio::test]
async fn error_status_is_a_failure_not_a_result() {
    let addr = spawn_upstream().await;
    let client = client_for(addr, "/fail", Duration::from_secs(5));

    let failure = client.diagnose(&low_suction_request()).await.unwrap_err();

    assert_eq!(
        failure,
        DiagnoseFailure::Status {
            status: 500,
            body: "upstream exploded".into()
        }
    );
}

#[tokio::test]
async fn undecodable_body_is_a_decode_failure() {
    let addr = spawn_upstream().await;
    let client = client_for(addr, "/garbage", Duration::from_secs(5));

    let failure = client.diagnose(&low_suction_request()).await.unwrap_err();

    assert!(matches!(failure, DiagnoseFailure::Decode(_)));
}

#[tokio::test]
async fn slow_endpoint_times_out() {
    let addr = spawn_upstream().await;
    let timeout = Duration::from_millis(200);
    let client = client_for(addr, "/slow", timeout);

    let failure = client.diagnose(&low_suction_request()).await.unwrap_err();

    assert_eq!(failure, DiagnoseFailure::Timeout(timeout));
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_failure() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    let client = client_for(addr, "/api/diagnose", Duration::from_secs(5));

    let failure = client.diagnose(&low_suction_request()).await.unwrap_err();

    assert!(matches!(failure, DiagnoseFailure::Transport(_)));
}

#[tokio::test]
async fn form_submit_through_http_client() {
    let addr = spawn_upstream().await;
    let client = client_for(addr, "/api/diagnose", Duration::from_secs(5));
    let mut form = FormController::new();
    form.select_diagnostic_type("low_suction").unwrap();
    form.set_field_value("suction_pressure", "30").unwrap();
    form.set_field_value("superheat", "10").unwrap();
    form.set_field_value("compressor_temp", "240").unwrap();

    let completion = form.submit(&client, Duration::from_secs(5)).await.unwrap();

    assert_eq!(completion, Completion::Applied);
    let result: &DiagnosisResult = form.result().expect("result displayed");
    assert_eq!(result.manual_reference, "Sec 4.2");
    assert!(!form.is_submitting());
}
