use rstest::rstest;
use wskutil::api::Response;
use wskutil::response::{response_error_to, ERROR_PREFIX};

fn run(res: &Response, prefix: &str, flatten: bool) -> (String, u16) {
    let mut out = Vec::new();
    let status = response_error_to(&mut out, res, prefix, flatten);
    (String::from_utf8(out).unwrap(), status)
}

fn json_response(status: u16, body: &str) -> Response {
    Response::received(status, body.as_bytes().to_vec())
}

#[test]
fn error_with_code_is_summarised() {
    let res = json_response(409, r#"{"error":"boom","code":"E1"}"#);
    let (out, status) = run(&res, ERROR_PREFIX, true);
    assert_eq!(out, "error: boom (code E1)\n");
    assert_eq!(status, 409);
}

#[test]
fn numeric_code_is_printed_as_is() {
    let res = json_response(400, r#"{"error":"bad","code":1234}"#);
    assert_eq!(run(&res, ERROR_PREFIX, true).0, "error: bad (code 1234)\n");
}

#[test]
fn lone_error_is_flattened() {
    let res = json_response(404, r#"{"error":"not found"}"#);
    assert_eq!(run(&res, ERROR_PREFIX, true).0, "error: not found\n");
}

#[test]
fn lone_error_is_pretty_printed_without_flatten() {
    let res = json_response(404, r#"{"error":"not found"}"#);
    assert_eq!(
        run(&res, ERROR_PREFIX, false).0,
        "error: {\n    \"error\": \"not found\"\n}\n"
    );
}

#[test]
fn other_json_is_pretty_printed() {
    let res = json_response(400, r#"{"reason":"quota","limit":5}"#);
    assert_eq!(
        run(&res, ERROR_PREFIX, true).0,
        "error: {\n    \"limit\": 5,\n    \"reason\": \"quota\"\n}\n"
    );
}

#[test]
fn empty_prefix_prints_message_only() {
    let res = json_response(400, r#"{"error":"boom","code":"E1"}"#);
    assert_eq!(run(&res, "", true).0, "boom (code E1)\n");
}

#[rstest]
#[case(json_response(502, "<html>Bad Gateway</html>"), "error: connection failed or timed out\n", 502)]
#[case(Response::failed("connection refused"), "error: connection refused\n", 500)]
#[case(json_response(404, "plain text"), "error: plain text\n", 404)]
#[case(json_response(404, ""), "error: unrecognized failure\n", 404)]
fn malformed_bodies_fall_back(#[case] res: Response, #[case] expected: &str, #[case] code: u16) {
    let (out, status) = run(&res, ERROR_PREFIX, true);
    assert_eq!(out, expected);
    assert_eq!(status, code);
}

#[test]
fn body_stays_readable_after_interpretation() {
    let res = json_response(500, r#"{"error":"boom"}"#);
    run(&res, ERROR_PREFIX, true);
    assert_eq!(res.text().as_deref(), Some(r#"{"error":"boom"}"#));
}
