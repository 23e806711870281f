// Library root
// -----------
// Helpers behind the `wskutil` command-line client. The binary
// (`main.rs`) only parses arguments and wires these modules together.
//
// Module responsibilities:
// - `props`: the property set (API host, version, namespace, auth key)
//   and API base URL composition.
// - `qname`: parsing and composing namespace-qualified resource names.
// - `api`: the blocking HTTP transport and its response envelope.
// - `response`: human-readable diagnostics for failed responses.
// - `params`: annotation/parameter lists and activation arguments.
// - `ui`: JSON pretty-printing, terminal colors and choice prompts.
// - `cli`: clap argument definitions.
pub mod api;
pub mod cli;
pub mod error;
pub mod params;
pub mod props;
pub mod qname;
pub mod response;
pub mod ui;

pub use error::{Error, Result};
