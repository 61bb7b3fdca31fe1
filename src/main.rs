// Entry point: serves the HTTP backend or runs the generation pipeline
// offline, depending on the subcommand.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process;
use testops_copilot::cli::{Args, Command};
use testops_copilot::generator::{detailed_scenarios, scenario_sentences};
use testops_copilot::server::{serve, AppState};
use testops_copilot::utils::write_to_file;
use testops_copilot::validator::validate_test_code;
use testops_copilot::{generate_api_tests, AppError, FormatHint, TemplateStore};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let outcome = match args.command {
        Command::Serve { host, port } => run_serve(host, port).await,
        Command::Generate {
            input,
            output,
            parsed_output,
            detailed,
        } => run_generate(input, output, parsed_output, detailed),
    };

    if let Err(err) = outcome {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

async fn run_serve(host: String, port: u16) -> testops_copilot::Result<()> {
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|err| AppError::ServerError(format!("invalid listen address: {err}")))?;

    serve(AppState::from_env(), addr).await
}

fn run_generate(
    input: PathBuf,
    output: Option<PathBuf>,
    parsed_output: Option<PathBuf>,
    detailed: bool,
) -> testops_copilot::Result<()> {
    let content = std::fs::read_to_string(&input)?;
    let hint = FormatHint::from_path(&input);
    let templates = TemplateStore::from_env();

    let generation = generate_api_tests(&content, hint, &templates)?;

    println!(
        "Parsed {} endpoint(s) from {}",
        generation.endpoints.len(),
        input.display()
    );
    println!();
    println!("Test scenarios:");
    for sentence in scenario_sentences(&generation.endpoints) {
        println!("  - {sentence}");
    }

    if detailed {
        for scenario in detailed_scenarios(&generation.endpoints) {
            println!();
            println!("{}", scenario.title);
            println!("  {}", scenario.description);
            for step in &scenario.test_steps {
                println!("  {step}");
            }
            println!("  Expected:");
            for result in &scenario.expected_results {
                println!("    - {result}");
            }
        }
    }

    // Advisory only; findings never fail the run.
    for message in validate_test_code(&generation.tests).messages {
        tracing::warn!(%message, "advisory finding in the generated test");
    }

    if let Some(path) = &parsed_output {
        let endpoints_json = serde_json::to_string_pretty(&generation.endpoints)?;
        write_to_file(path, endpoints_json)?;
        println!();
        println!("Endpoint list written to {}", path.display());
    }

    match &output {
        Some(path) => {
            write_to_file(path, &generation.tests)?;
            println!();
            println!("Tests written to {}", path.display());
        }
        None => {
            println!();
            println!("Generated test code:");
            println!("{}", generation.tests);
        }
    }

    Ok(())
}
