//! Licenser - search, preview, copy, and personalize open-source licenses
//!
//! A one-shot CLI intended to back a launcher script filter: each invocation
//! handles a single query or action and prints its result to stdout. stderr
//! carries diagnostics only, so launcher output stays parseable.

mod alfred;
mod cache;
mod cli;
mod data;
mod personalize;
mod workflow;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use alfred::ScriptFilter;
use cli::{current_year, Cli, Command, Config};
use workflow::Workflow;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_cli(&cli);

    let workflow = match Workflow::new(&config) {
        Ok(workflow) => workflow,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Command::List { query } => {
            // Script-filter errors are rendered by the launcher, so they go
            // to stdout as items and the process still exits cleanly.
            let filter = match workflow.search(query.as_deref().unwrap_or("")).await {
                Ok(filter) => filter,
                Err(e) => ScriptFilter::error(e.to_string()),
            };
            match filter.to_json() {
                Ok(json) => {
                    println!("{}", json);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Failed to serialize output: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
        Command::View { key } => print_text(workflow.view(&key).await),
        Command::Copy { key } => print_text(workflow.body(&key).await),
        Command::Personalize { key, author, year } => {
            let year = year.unwrap_or_else(current_year);
            print_text(workflow.personalize(&key, &author, &year).await)
        }
    }
}

/// Prints a text result to stdout, or the error to stderr with a failing exit
fn print_text(result: Result<String, workflow::WorkflowError>) -> ExitCode {
    match result {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
