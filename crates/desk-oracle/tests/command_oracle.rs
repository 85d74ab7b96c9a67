//! `CommandOracle` driven through `sh -c`. Photo refs arrive as `$1` and `$2`.

#![cfg(unix)]

use std::time::Duration;

use desk_oracle::{
    CommandOracle, OracleError, UnavailableReason, Verification, VerificationAdapter, VerificationOracle,
};

fn script(body: &str) -> CommandOracle {
    CommandOracle::new("sh", vec!["-c".into(), body.into(), "oracle".into()])
}

#[tokio::test]
async fn reads_judgment_from_stdout() {
    let oracle = script(r#"echo '{"success": true, "is_match": true, "confidence_score": 88.25}'"#);
    let judgment = oracle.judge("cap.jpg", "ref.jpg").await.unwrap();
    assert!(judgment.is_match);
    assert!((judgment.confidence_score - 88.25).abs() < f64::EPSILON);
}

#[tokio::test]
async fn receives_photo_refs_as_trailing_args() {
    let oracle = script(
        r#"if [ "$1" = "cap.jpg" ] && [ "$2" = "ref.jpg" ]; then echo '{"is_match": true, "confidence_score": 75}'; else echo '{"is_match": false, "confidence_score": 0}'; fi"#,
    );
    assert!(oracle.judge("cap.jpg", "ref.jpg").await.unwrap().is_match);
}

#[tokio::test]
async fn success_false_is_rejected() {
    let oracle = script(r#"echo '{"success": false, "confidence_score": 0, "is_match": false, "error": "Could not read images"}'"#);
    let err = oracle.judge("cap.jpg", "ref.jpg").await.unwrap_err();
    assert!(matches!(err, OracleError::Rejected(ref m) if m == "Could not read images"));
}

#[tokio::test]
async fn non_zero_exit_is_process_error() {
    let oracle = script("echo broken >&2; exit 3");
    let err = oracle.judge("cap.jpg", "ref.jpg").await.unwrap_err();
    assert!(matches!(err, OracleError::Process(ref m) if m.contains("broken")));
}

#[tokio::test]
async fn missing_program_is_process_error() {
    let oracle = CommandOracle::new("/nonexistent/examdesk-oracle", Vec::new());
    assert!(matches!(
        oracle.judge("cap.jpg", "ref.jpg").await,
        Err(OracleError::Process(_))
    ));
}

#[tokio::test]
async fn slow_script_times_out_through_adapter() {
    let adapter = VerificationAdapter::new(script("sleep 5"), Duration::from_millis(100));
    let verification = adapter.verify("cap.jpg", Some("ref.jpg")).await;
    assert_eq!(verification, Verification::Unavailable(UnavailableReason::Timeout));
}
