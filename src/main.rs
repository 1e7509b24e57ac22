use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;

use customdb::config::Configuration;
use customdb::error::{ErrorBody, Result, ScriptError};
use customdb::script::Scripts;
use customdb::user::LookupContext;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `config.yaml` file.
    #[arg(long, short)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Run the `create` script.
    Create {
        /// Email of the new user.
        #[arg(long, short, conflicts_with = "payload")]
        email: Option<String>,
        /// Raw user object as sent by the platform.
        #[arg(long, short)]
        payload: Option<String>,
    },
    /// Run the `get_user` script.
    GetUser {
        /// User email or username.
        identifier: String,
        /// Request context as sent by the platform.
        #[arg(long)]
        context: Option<String>,
    },
}

fn parse_json(raw: Option<String>) -> Result<Value> {
    raw.map_or(Ok(Value::Null), |raw| {
        serde_json::from_str(&raw).map_err(ScriptError::Payload)
    })
}

fn to_json<T: Serialize>(value: T) -> Result<Value> {
    serde_json::to_value(value)
        .map_err(|err| ScriptError::unexpected("cannot serialize result", err))
}

/// Run one script, `null` meaning the user was not found.
async fn run(scripts: &Scripts, cmd: Commands) -> Result<Value> {
    match cmd {
        Commands::Create { email, payload } => {
            let payload = match email {
                Some(email) => serde_json::json!({ "email": email }),
                None => parse_json(payload)?,
            };
            to_json(scripts.create.execute_value(payload).await?)
        },
        Commands::GetUser {
            identifier,
            context,
        } => {
            let context = LookupContext::new(parse_json(context)?);
            let outcome = scripts.get_user.execute(&identifier, &context).await?;
            to_json(outcome.into_option())
        },
    }
}

/// Render the outcome: `Ok` goes to stdout, `Err` to stderr.
fn render(result: Result<Value>) -> std::result::Result<String, String> {
    match result {
        Ok(value) => Ok(value.to_string()),
        Err(err) => Err(serde_json::to_string(&ErrorBody::from(&err))
            .unwrap_or_else(|_| err.to_string())),
    }
}

fn report(result: Result<Value>) -> ExitCode {
    match render(result) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        },
        Err(json) => {
            eprintln!("{json}");
            ExitCode::FAILURE
        },
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let mut config = Configuration::default();
    if let Some(path) = args.config {
        config = config.path(path);
    }
    let config = config.read();

    if let Err(err) = customdb::telemetry::setup_logging(&config.log) {
        eprintln!("cannot set up logging: {err}");
    }

    match config.loaded_from() {
        Some(path) => tracing::debug!(path = %path.display(), "configuration loaded"),
        None => tracing::warn!("no configuration file read, running on defaults"),
    }

    let scripts = customdb::initialize(&config);
    report(run(&scripts, args.cmd).await)
}
