// HTTP transport: issues exactly one blocking request per call and hands
// back a `Response` envelope. Network failures never escape as errors; they
// are folded into a synthesized 500 envelope so that callers handle
// transport and application failures on one code path.

use crate::ui::get_pretty_json;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::blocking::Client;
use reqwest::{Method, Proxy, Url};
use std::collections::BTreeMap;
use std::io::{Read, Write};

/// Transport settings fixed when the transport is constructed.
#[derive(Clone, Debug)]
pub struct TransportConfig {
    /// Validate TLS certificates. Turning this off is an escape hatch for
    /// self-signed test endpoints (`--insecure`).
    pub secure: bool,
    /// Proxy (`host:port` or URL) used to tunnel HTTPS requests.
    pub proxy: Option<String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        TransportConfig {
            secure: true,
            proxy: None,
        }
    }
}

impl TransportConfig {
    /// Secure defaults with the proxy taken from `https_proxy`.
    pub fn from_env() -> Self {
        let proxy = std::env::var("https_proxy")
            .ok()
            .filter(|p| !p.trim().is_empty());
        TransportConfig {
            proxy,
            ..Self::default()
        }
    }
}

/// One request to send. Built with chained setters:
///
/// ```
/// use wskutil::api::Request;
/// let req = Request::new("GET", "https://example.com/api/v1/namespaces")
///     .auth("user:secret")
///     .verbose(true);
/// assert_eq!(req.method(), "GET");
/// ```
#[derive(Clone, Debug)]
pub struct Request {
    method: String,
    url: String,
    body: String,
    headers: BTreeMap<String, String>,
    auth: Option<String>,
    verbose: bool,
    proxy: Option<String>,
}

impl Request {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Request {
            method: method.into(),
            url: url.into(),
            body: String::new(),
            headers: BTreeMap::new(),
            auth: None,
            verbose: false,
            proxy: None,
        }
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// `user:password` credential sent as HTTP Basic authorization.
    pub fn auth(mut self, credentials: impl Into<String>) -> Self {
        self.auth = Some(credentials.into());
        self
    }

    /// Trace the request and response (to stdout via `Transport::request`).
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Proxy for this request only, overriding `TransportConfig::proxy`.
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    pub fn method(&self) -> &str {
        &self.method
    }
}

/// Result of a request: either a real HTTP response with its fully
/// buffered body, or a synthesized failure carrying the error message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    status: u16,
    body: Option<Vec<u8>>,
    error: Option<String>,
}

impl Response {
    /// A response that came back from the server.
    pub fn received(status: u16, body: Vec<u8>) -> Self {
        Response {
            status,
            body: Some(body),
            error: None,
        }
    }

    /// Envelope standing in for a request that never produced a response.
    pub fn failed(error: impl Into<String>) -> Self {
        Response {
            status: 500,
            body: None,
            error: Some(error.into()),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// Buffered body; may be read any number of times. `None` for a
    /// synthesized failure.
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Body decoded as UTF-8 (lossily).
    pub fn text(&self) -> Option<String> {
        self.body().map(|b| String::from_utf8_lossy(b).into_owned())
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends requests according to a fixed `TransportConfig`. A fresh client
/// is built per request: connections are used once and never pooled.
#[derive(Clone, Debug, Default)]
pub struct Transport {
    config: TransportConfig,
}

impl Transport {
    pub fn new(config: TransportConfig) -> Self {
        Transport { config }
    }

    /// Send `req` and wait for the response. The verbose trace, if
    /// requested, goes to stdout.
    pub fn request(&self, req: Request) -> Response {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        self.request_to(&mut out, req)
    }

    /// `request` writing the verbose trace to `out` instead of stdout.
    pub fn request_to<W: Write>(&self, out: &mut W, req: Request) -> Response {
        let Request {
            method,
            url,
            body,
            mut headers,
            auth,
            verbose,
            proxy,
        } = req;

        if let Some(credentials) = auth {
            headers.insert(
                "Authorization".to_string(),
                format!("Basic {}", basic_credentials(&credentials)),
            );
        }

        if verbose {
            let mut trace = format!(
                "========\nREQUEST:\n{} {}\nHeaders sent:\n{}\n",
                method,
                url,
                get_pretty_json(&serde_json::json!(headers))
            );
            if !body.is_empty() {
                trace.push_str(&format!("Body sent:\n{}\n", body));
            }
            write_trace(out, &trace);
        }

        let proxy = proxy.or_else(|| self.config.proxy.clone());
        let res = match self.send(&method, &url, body, &headers, proxy.as_deref()) {
            Ok(res) => res,
            Err(e) => {
                tracing::warn!(%method, %url, error = %e, "request failed");
                return Response::failed(e.to_string());
            }
        };

        if verbose {
            let trace = format!(
                "--------\nRESPONSE:\nGot response with code {}\nBody received:\n{}\n========\n",
                res.status(),
                res.text().unwrap_or_default()
            );
            write_trace(out, &trace);
        }
        res
    }

    fn send(
        &self,
        method: &str,
        url: &str,
        body: String,
        headers: &BTreeMap<String, String>,
        proxy: Option<&str>,
    ) -> anyhow::Result<Response> {
        let parsed = Url::parse(url)?;
        let method = Method::from_bytes(method.as_bytes())?;

        let mut builder = Client::builder().no_proxy().pool_max_idle_per_host(0);
        if parsed.scheme() != "http" {
            if !self.config.secure {
                builder = builder.danger_accept_invalid_certs(true);
            }
            if let Some(proxy) = proxy {
                builder = builder.proxy(Proxy::https(proxy_url(proxy))?);
            }
        }
        let client = builder.build()?;

        let mut req = client.request(method.clone(), parsed).body(body);
        for (name, value) in headers {
            req = req.header(name.as_str(), value.as_str());
        }

        tracing::debug!(%method, url, "sending request");
        let mut res = req.send()?;
        let status = res.status().as_u16();
        let body = read_body(&mut res);
        tracing::debug!(status, bytes = body.len(), "response received");
        Ok(Response::received(status, body))
    }
}

fn write_trace<W: Write>(out: &mut W, trace: &str) {
    if let Err(e) = out.write_all(trace.as_bytes()).and_then(|_| out.flush()) {
        tracing::debug!(error = %e, "could not write request trace");
    }
}

/// Base64 of `user:password` for a Basic `Authorization` header.
pub fn basic_credentials(credentials: &str) -> String {
    STANDARD.encode(credentials.as_bytes()).replace('\n', "")
}

fn proxy_url(proxy: &str) -> String {
    if proxy.contains("://") {
        proxy.to_string()
    } else {
        format!("http://{}", proxy)
    }
}

/// Drain `reader` into memory. A read error part way through (a severed
/// connection) ends the body: whatever arrived so far is kept.
fn read_body<R: Read>(reader: &mut R) -> Vec<u8> {
    let mut body = Vec::new();
    let mut chunk = [0u8; 8192];
    loop {
        match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => body.extend_from_slice(&chunk[..n]),
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => {
                tracing::warn!(error = %e, received = body.len(), "incomplete read, keeping partial body");
                break;
            }
        }
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    /// Yields its bytes once, then fails like a dropped connection.
    struct Severed {
        data: Option<&'static [u8]>,
    }

    impl Read for Severed {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.data.take() {
                Some(data) => {
                    buf[..data.len()].copy_from_slice(data);
                    Ok(data.len())
                }
                None => Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset")),
            }
        }
    }

    #[test]
    fn partial_read_keeps_received_bytes() {
        let mut reader = Severed { data: Some(b"abc") };
        let body = read_body(&mut reader);
        let res = Response::received(200, body);
        assert_eq!(res.text().as_deref(), Some("abc"));
        // replayable
        assert_eq!(res.body(), Some(&b"abc"[..]));
        assert_eq!(res.body(), Some(&b"abc"[..]));
    }

    #[test]
    fn read_body_reads_to_end() {
        let mut reader = io::Cursor::new(vec![7u8; 20_000]);
        assert_eq!(read_body(&mut reader).len(), 20_000);
    }

    #[test]
    fn basic_credentials_is_single_line_base64() {
        let long = "user:".to_string() + &"p".repeat(200);
        let encoded = basic_credentials(&long);
        assert!(!encoded.contains('\n'));
        assert_eq!(basic_credentials("user:pass"), "dXNlcjpwYXNz");
    }

    #[test]
    fn proxy_url_adds_scheme_to_bare_host() {
        assert_eq!(proxy_url("proxy:3128"), "http://proxy:3128");
        assert_eq!(proxy_url("https://proxy:3128"), "https://proxy:3128");
    }

    #[test]
    fn unparseable_url_becomes_failure_envelope() {
        let res = Transport::default().request(Request::new("GET", "not a url"));
        assert_eq!(res.status(), 500);
        assert!(res.error().is_some());
        assert!(res.body().is_none());
    }

    #[test]
    fn config_defaults_to_secure() {
        assert!(TransportConfig::default().secure);
    }
}
