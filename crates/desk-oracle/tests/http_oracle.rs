//! `HttpOracle` against a local `tiny_http` server.

use std::io::Read;
use std::thread;
use std::time::Duration;

use desk_oracle::{HttpOracle, OracleError, Verification, VerificationAdapter, VerificationOracle};
use tiny_http::{Header, Response, Server};

/// Serve `responses` in order, one per request, and return the bodies received.
fn serve(responses: Vec<(u16, &'static str)>) -> (String, thread::JoinHandle<Vec<String>>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let url = format!("http://{}/judge", server.server_addr().to_ip().unwrap());
    let handle = thread::spawn(move || {
        let mut bodies = Vec::new();
        for (status, body) in responses {
            let mut request = server.recv().unwrap();
            let mut received = String::new();
            request.as_reader().read_to_string(&mut received).unwrap();
            bodies.push(received);
            let header = Header::from_bytes("Content-Type", "application/json").unwrap();
            request
                .respond(Response::from_string(body).with_status_code(status).with_header(header))
                .unwrap();
        }
        bodies
    });
    (url, handle)
}

#[tokio::test]
async fn posts_both_photo_refs_and_reads_judgment() {
    let (url, handle) = serve(vec![(200, r#"{"is_match": true, "confidence_score": 91.5}"#)]);
    let oracle = HttpOracle::new(url, Duration::from_secs(5)).unwrap();

    let judgment = oracle.judge("captured/s1.jpg", "enrolled/s1.jpg").await.unwrap();
    assert!(judgment.is_match);
    assert!((judgment.confidence_score - 91.5).abs() < f64::EPSILON);

    let bodies = handle.join().unwrap();
    let sent: serde_json::Value = serde_json::from_str(&bodies[0]).unwrap();
    assert_eq!(sent["captured_photo"], "captured/s1.jpg");
    assert_eq!(sent["enrolled_photo"], "enrolled/s1.jpg");
}

#[tokio::test]
async fn server_error_is_api_error() {
    let (url, handle) = serve(vec![(500, "internal")]);
    let oracle = HttpOracle::new(url, Duration::from_secs(5)).unwrap();

    let err = oracle.judge("a.jpg", "b.jpg").await.unwrap_err();
    assert!(matches!(err, OracleError::Api { status: 500, .. }));
    handle.join().unwrap();
}

#[tokio::test]
async fn adapter_degrades_garbage_body() {
    let (url, handle) = serve(vec![(200, "<html>oops</html>")]);
    let adapter = VerificationAdapter::new(
        HttpOracle::new(url, Duration::from_secs(5)).unwrap(),
        Duration::from_secs(5),
    );

    let verification = adapter.verify("a.jpg", Some("b.jpg")).await;
    assert!(matches!(verification, Verification::Unavailable(_)));
    assert!(!verification.is_match());
    handle.join().unwrap();
}

#[tokio::test]
async fn unreachable_endpoint_degrades() {
    // Bind then drop to get a port nobody listens on.
    let port = {
        let server = Server::http("127.0.0.1:0").unwrap();
        server.server_addr().to_ip().unwrap().port()
    };
    let adapter = VerificationAdapter::new(
        HttpOracle::new(format!("http://127.0.0.1:{port}/judge"), Duration::from_secs(2)).unwrap(),
        Duration::from_secs(2),
    );

    let verification = adapter.verify("a.jpg", Some("b.jpg")).await;
    assert!(matches!(verification, Verification::Unavailable(_)));
}
