// Turns a failed `Response` into a one-line diagnostic on stderr and
// hands back its status code, which the CLI uses as its exit status.

use crate::api::Response;
use crate::ui::get_pretty_json;
use serde_json::Value;
use std::io::Write;

/// Default prefix printed before the diagnostic.
pub const ERROR_PREFIX: &str = "error:";

/// Print a summary of `res` to stderr and return its status code.
///
/// `prefix` (when non-empty) is printed first, followed by a space. With
/// `flatten`, an error envelope without a `code` prints just its message
/// instead of the whole JSON document.
pub fn response_error(res: &Response, prefix: &str, flatten: bool) -> u16 {
    let stderr = std::io::stderr();
    let mut out = stderr.lock();
    response_error_to(&mut out, res, prefix, flatten)
}

/// `response_error` writing to `out` instead of stderr.
pub fn response_error_to<W: Write>(out: &mut W, res: &Response, prefix: &str, flatten: bool) -> u16 {
    let mut message = String::new();
    if !prefix.is_empty() {
        message.push_str(prefix);
        message.push(' ');
    }
    message.push_str(&describe(res, flatten));
    if let Err(e) = writeln!(out, "{}", message) {
        tracing::debug!(error = %e, "could not write error message");
    }
    res.status()
}

fn describe(res: &Response, flatten: bool) -> String {
    let parsed = res
        .body()
        .and_then(|body| serde_json::from_slice::<Value>(body).ok());

    if let Some(result) = parsed {
        let error = result.get("error");
        let code = result.get("code");
        return match (error, code) {
            (Some(error), Some(code)) => {
                format!("{} (code {})", plain(error), plain(code))
            }
            (Some(error), None) if flatten => plain(error),
            _ => get_pretty_json(&result),
        };
    }

    if res.status() == 502 {
        return "connection failed or timed out".to_string();
    }
    match (res.error(), res.text()) {
        (Some(error), _) => error.to_string(),
        (None, Some(text)) if !text.is_empty() => text,
        _ => "unrecognized failure".to_string(),
    }
}

/// JSON strings without their quotes, everything else as JSON text.
fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
