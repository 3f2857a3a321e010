//! Communication Intent & Risk Guard
//!
//! The entry point: CLI argument handling, pipeline construction,
//! and the terminal front end.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use commguard::config::{load_config, resolve_path};
use commguard::inference::AnthropicClient;
use commguard::input::split_messages;
use commguard::pipeline::{Guard, RunOptions, StageCallback};
use commguard::render::display_results;
use commguard::types::Stage;
use commguard::web;

/// Communication Intent & Risk Guard
#[derive(Parser, Debug)]
#[command(
    name = "commguard",
    version,
    about = "Communication Intent & Risk Guard",
    long_about = "Multi-agent pre-send analysis: intent detection, emotional tone \
                  and leakage, misinterpretation risks, and suggested rewrites."
)]
struct Cli {
    /// The message to analyze
    #[arg(short, long)]
    message: Option<String>,

    /// Read messages from a file (multiple messages separated by ---)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Interactive mode
    #[arg(short, long)]
    interactive: bool,

    /// Skip rewrite suggestions
    #[arg(long)]
    no_rewrite: bool,

    /// Serve the browser dashboard instead of analyzing in the terminal
    #[arg(long)]
    serve: bool,

    /// Dashboard port
    #[arg(long, default_value_t = 7878)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    run(Cli::parse()).await
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config();

    if config.api_key.is_empty() {
        eprintln!(
            "No API key found. Set ANTHROPIC_API_KEY or add it to {}.",
            commguard::config::get_config_path().display()
        );
        std::process::exit(1);
    }

    let client = Arc::new(AnthropicClient::new(
        config.api_url.clone(),
        config.api_key.clone(),
        config.model.clone(),
    ));
    let prompts_dir = PathBuf::from(resolve_path(&config.prompts_dir));
    let guard = Guard::new(&prompts_dir, client).context("Failed to load prompt templates")?;

    if cli.serve {
        return web::run(web::AppState { guard }, cli.port).await;
    }

    show_banner();

    let options = RunOptions {
        include_rewrite: !cli.no_rewrite,
        on_stage: Some(progress_callback()),
    };

    if cli.interactive {
        run_interactive(&guard, &options).await
    } else if let Some(ref path) = cli.file {
        run_file(&guard, &options, path).await
    } else if let Some(ref message) = cli.message {
        let analysis = guard.run(message, &options).await?;
        display_results(&analysis);
        Ok(())
    } else {
        println!(
            "{}",
            "Please provide a message using -m, -f, or -i".yellow()
        );
        println!("Use --help for usage information");
        Ok(())
    }
}

fn show_banner() {
    println!();
    println!("{}", "Communication Intent & Risk Guard".bold());
    println!("{}", "Multi-agent pre-send analysis system".dimmed());
}

/// Per-stage progress lines for the terminal front end.
fn progress_callback() -> StageCallback {
    Box::new(|stage| {
        let label = match stage {
            Stage::Intent => "Analyzing intent...",
            Stage::Emotion => "Detecting emotions...",
            Stage::Risk => "Assessing risks...",
            Stage::Rewrite => "Generating suggestions...",
        };
        println!("  {}", label.dimmed());
    })
}

// ---- Interactive Mode -------------------------------------------------------

async fn run_interactive(guard: &Guard, options: &RunOptions) -> Result<()> {
    println!();
    println!(
        "{}",
        "Enter messages to analyze (quit to exit):".dimmed()
    );
    println!();

    loop {
        let input: String = match dialoguer::Input::new()
            .with_prompt("Message")
            .allow_empty(true)
            .interact_text()
        {
            Ok(line) => line,
            // Interrupt or end of input ends the session.
            Err(_) => break,
        };

        let message = input.trim().to_string();
        if message.is_empty() {
            continue;
        }
        if matches!(message.to_lowercase().as_str(), "quit" | "exit" | "q") {
            break;
        }

        println!();
        let analysis = guard.run(&message, options).await?;
        display_results(&analysis);
        println!("\n{}\n", "\u{2500}".repeat(60).dimmed());
    }

    println!("{}", "Goodbye!".dimmed());
    Ok(())
}

// ---- File Mode --------------------------------------------------------------

async fn run_file(guard: &Guard, options: &RunOptions, path: &Path) -> Result<()> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let messages = split_messages(&content);

    if messages.is_empty() {
        println!("{}", "No messages found in file".yellow());
        return Ok(());
    }

    let total = messages.len();
    for (i, message) in messages.iter().enumerate() {
        if total > 1 {
            println!();
            println!("{}", format!("Message {}/{}", i + 1, total).bold());
        }
        let analysis = guard.run(message, options).await?;
        display_results(&analysis);
        if i + 1 < total {
            println!("\n{}\n", "\u{2550}".repeat(60).dimmed());
        }
    }

    Ok(())
}
