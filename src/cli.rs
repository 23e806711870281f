// Command-line surface. The argument structs are plain clap derives; the
// `--auth` option is attached with the builder API because its default and
// whether it is required depend on the loaded properties.

use crate::props::Properties;
use clap::{Arg, ArgAction, ArgMatches, Args, Command, CommandFactory, Parser, Subcommand};

/// Subcommands that talk to the API and therefore take `--auth`.
pub const AUTHENTICATED_COMMANDS: [&str; 2] = ["get", "namespaces"];

#[derive(Parser, Debug)]
#[command(name = "wskutil", version, about = "Helper client for the resource API")]
pub struct Cli {
    /// Accept self-signed or otherwise untrusted TLS certificates.
    #[arg(short = 'i', long, global = true)]
    pub insecure: bool,

    /// Print each request and response.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Log level: -d info, -dd debug, -ddd trace.
    #[arg(short = 'd', long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// API host, overriding the `apihost` property.
    #[arg(long, env = "WSK_APIHOST", global = true)]
    pub apihost: Option<String>,

    /// API version, overriding the `apiversion` property.
    #[arg(long, global = true)]
    pub apiversion: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a (possibly qualified) resource name.
    Qname {
        name: String,
        /// Namespace for a relative name.
        #[arg(long)]
        namespace: Option<String>,
    },
    /// Print the request body built from annotations, parameters and env vars.
    Body {
        #[command(flatten)]
        args: ParamArgs,
        /// Emit a key/value activation object instead of entry lists.
        #[arg(long)]
        activation: bool,
    },
    /// GET a path below the API base URL.
    Get { path: String },
    /// List namespaces and pick one.
    Namespaces,
}

/// Repeatable `KEY VALUE` options feeding the parameter builders.
#[derive(Args, Debug, Clone, Default)]
pub struct ParamArgs {
    /// Annotation in KEY VALUE format.
    #[arg(short = 'a', long = "annotation", num_args = 2, value_names = ["KEY", "VALUE"], action = ArgAction::Append)]
    pub annotation: Vec<String>,

    /// Parameter in KEY VALUE format.
    #[arg(short = 'p', long = "param", num_args = 2, value_names = ["KEY", "VALUE"], action = ArgAction::Append)]
    pub param: Vec<String>,

    /// Init-time environment variable in KEY VALUE format.
    #[arg(short = 'e', long = "env", num_args = 2, value_names = ["KEY", "VALUE"], action = ArgAction::Append)]
    pub envvar: Vec<String>,
}

impl ParamArgs {
    pub fn annotations(&self) -> Vec<(&str, &str)> {
        pairs(&self.annotation)
    }

    pub fn params(&self) -> Vec<(&str, &str)> {
        pairs(&self.param)
    }

    pub fn env_vars(&self) -> Vec<(&str, &str)> {
        pairs(&self.envvar)
    }
}

/// Regroup flattened `KEY VALUE KEY VALUE ...` values into pairs. clap
/// guarantees an even count; a dangling key is dropped.
fn pairs(flat: &[String]) -> Vec<(&str, &str)> {
    flat.chunks_exact(2)
        .map(|kv| (kv[0].as_str(), kv[1].as_str()))
        .collect()
}

/// Add `-u/--auth` to `cmd`. It defaults to the `AUTH` property and is
/// required when that property is not set.
pub fn add_authenticated_command(cmd: Command, props: &Properties) -> Command {
    let auth = props.get("AUTH").map(str::to_string);
    let mut arg = Arg::new("auth")
        .short('u')
        .long("auth")
        .help("authorization key")
        .required(auth.is_none());
    if let Some(auth) = auth {
        arg = arg.default_value(auth);
    }
    cmd.arg(arg)
}

/// The full `wskutil` command with `--auth` on every subcommand that
/// talks to the API.
pub fn command(props: &Properties) -> Command {
    AUTHENTICATED_COMMANDS
        .iter()
        .fold(Cli::command(), |cmd, name| {
            cmd.mut_subcommand(*name, |sub| add_authenticated_command(sub, props))
        })
}

/// The `--auth` value given to (or defaulted for) the chosen subcommand.
pub fn auth_from(matches: &ArgMatches) -> Option<String> {
    let (_, sub) = matches.subcommand()?;
    sub.try_get_one::<String>("auth").ok().flatten().cloned()
}
