// Entrypoint for the `wskutil` CLI.
// - Keeps `main` small: load properties, parse arguments, build the
//   transport and dispatch to one handler per subcommand.
// - Returns `anyhow::Result` for setup errors; API failures are reported
//   by `response_error` and become the process exit status.

use anyhow::{Context, Result};
use clap::FromArgMatches;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use wskutil::api::{Request, Response, Transport, TransportConfig};
use wskutil::cli::{self, Cli, Commands, ParamArgs};
use wskutil::params::{get_activation_argument, get_annotations, get_env_vars, get_params};
use wskutil::props::{api_base, Properties};
use wskutil::qname::{get_qname, parse_qname};
use wskutil::response::{response_error, ERROR_PREFIX};
use wskutil::ui::{choose_from_array, get_pretty_json};

fn main() -> Result<()> {
    let path = Properties::default_path();
    let mut props = Properties::load(&path)
        .with_context(|| format!("Failed to load properties from {}", path.display()))?;

    let matches = cli::command(&props).get_matches();
    let cli = Cli::from_arg_matches(&matches)?;
    let auth = cli::auth_from(&matches);
    setup_logging(cli.debug);

    if let Some(host) = &cli.apihost {
        props.set("apihost", host.as_str());
    }
    if let Some(version) = &cli.apiversion {
        props.set("apiversion", version.as_str());
    }

    let transport = Transport::new(TransportConfig {
        secure: !cli.insecure,
        ..TransportConfig::from_env()
    });

    match &cli.command {
        Commands::Qname { name, namespace } => {
            let parsed = parse_qname(Some(name.as_str()), &props);
            println!("namespace: {}", parsed.namespace);
            println!("name: {}", parsed.name.unwrap_or_default());
            println!("qualified: {}", get_qname(name, namespace.as_deref())?);
        }
        Commands::Body { args, activation } => {
            println!("{}", get_pretty_json(&request_body(args, *activation)));
        }
        Commands::Get { path } => {
            let res = get(&transport, &props, path, auth, cli.verbose)?;
            if !res.is_success() {
                std::process::exit(i32::from(response_error(&res, ERROR_PREFIX, true)));
            }
            let text = res.text().unwrap_or_default();
            match serde_json::from_str::<Value>(&text) {
                Ok(value) => println!("{}", get_pretty_json(&value)),
                Err(_) => println!("{}", text),
            }
        }
        Commands::Namespaces => {
            let res = get(&transport, &props, "namespaces", auth, cli.verbose)?;
            if !res.is_success() {
                std::process::exit(i32::from(response_error(&res, ERROR_PREFIX, true)));
            }
            let namespaces: Vec<String> = serde_json::from_slice(res.body().unwrap_or_default())
                .context("Parsing namespace list")?;
            if let Some(ns) = choose_from_array(&namespaces)? {
                println!("{}", ns);
            }
        }
    }
    Ok(())
}

fn request_body(args: &ParamArgs, activation: bool) -> Value {
    if activation {
        return Value::Object(get_activation_argument(args));
    }
    let mut parameters = get_params(args);
    parameters.extend(get_env_vars(args));
    json!({
        "annotations": get_annotations(args),
        "parameters": parameters,
    })
}

/// GET `path` below the API base, with a spinner while waiting.
fn get(
    transport: &Transport,
    props: &Properties,
    path: &str,
    auth: Option<String>,
    verbose: bool,
) -> Result<Response> {
    let url = format!("{}/{}", api_base(props)?, path.trim_start_matches('/'));
    let mut req = Request::new("GET", url).verbose(verbose);
    if let Some(auth) = auth {
        req = req.auth(auth);
    }

    // verbose output would tear the spinner line
    if verbose {
        return Ok(transport.request(req));
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message("Requesting...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    let res = transport.request(req);
    spinner.finish_and_clear();
    Ok(res)
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    tracing::debug!("logging initialised at {}", level);
}
