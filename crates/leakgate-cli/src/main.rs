//! leakgate command-line interface.
//!
//! Two subcommands share one guarded gateway setup: `chat` runs the
//! interactive loop, `audit` replays leak probes and writes a report.

use std::path::PathBuf;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

mod audit;
mod chat;
mod ollama;

const DEFAULT_MODEL: &str = "llama3";
const DEFAULT_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_FILTERS_FILE: &str = "filters.json";
const DEFAULT_BLOCKLIST_FILE: &str = "blocklist.txt";

/// Resolved command-line options shared by both subcommands.
#[derive(Debug, Clone)]
pub struct Options {
    /// Model name requested from the backend.
    pub model: String,
    /// Base URL of the model server.
    pub base_url: String,
    /// Path of the persisted filter configuration.
    pub filters: PathBuf,
    /// Path of the optional custom blocklist.
    pub blocklist: PathBuf,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            filters: PathBuf::from(DEFAULT_FILTERS_FILE),
            blocklist: PathBuf::from(DEFAULT_BLOCKLIST_FILE),
        }
    }
}

fn usage() -> &'static str {
    "leakgate — content-redaction firewall for local model chat\n\
     \n\
     USAGE:\n\
     \x20 leakgate chat  [OPTIONS]   start the guarded interactive chat\n\
     \x20 leakgate audit [OPTIONS]   replay leak probes, write a report\n\
     \n\
     OPTIONS:\n\
     \x20 --model <NAME>       model to request (default: llama3)\n\
     \x20 --base-url <URL>     model server (default: http://localhost:11434)\n\
     \x20 --filters <PATH>     filter configuration file (default: filters.json)\n\
     \x20 --blocklist <PATH>   custom blocklist file (default: blocklist.txt)"
}

fn parse_options<I>(mut args: I) -> Result<Options, String>
where
    I: Iterator<Item = String>,
{
    let mut options = Options::default();

    while let Some(flag) = args.next() {
        let mut value = |flag: &str| {
            args.next()
                .ok_or_else(|| format!("{flag} requires a value"))
        };
        match flag.as_str() {
            "--model" => options.model = value("--model")?,
            "--base-url" => options.base_url = value("--base-url")?,
            "--filters" => options.filters = PathBuf::from(value("--filters")?),
            "--blocklist" => options.blocklist = PathBuf::from(value("--blocklist")?),
            other => return Err(format!("unknown option '{other}'")),
        }
    }

    Ok(options)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(command) = args.next() else {
        println!("{}", usage());
        return ExitCode::SUCCESS;
    };

    let options = match parse_options(args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("error: {message}\n\n{}", usage());
            return ExitCode::FAILURE;
        }
    };

    let outcome = match command.as_str() {
        "chat" => chat::run(&options),
        "audit" => audit::run(&options),
        "help" | "--help" | "-h" => {
            println!("{}", usage());
            return ExitCode::SUCCESS;
        }
        other => {
            eprintln!("error: unknown command '{other}'\n\n{}", usage());
            return ExitCode::FAILURE;
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
