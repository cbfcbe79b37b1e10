//! pwassist-cli: submit Playwright codegen output or a BDD scenario to a pwassist server.
//!
//! Reads FILE (or stdin), prints prose as paragraphs and code inside fences.
//! `--copy N` prints only code block N, ready to pipe into a clipboard tool.

use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use pwassist_client::copy::{Clipboard, CopyIndicator};
use pwassist_client::labels::{ERROR_BANNER_PREFIX, labels, overview};
use pwassist_client::service::CodegenClient;
use pwassist_client::session::SubmissionStatus;
use pwassist_client::transport::{DEFAULT_SERVER_URL, HttpTransport};
use pwassist_core::segment::SegmentKind;
use pwassist_core::types::{Mode, Provider};

#[derive(Debug, Parser)]
#[command(name = "pwassist-cli", about = "Analyze Playwright codegen or generate BDD tests")]
struct Args {
    #[arg(long, value_parser = parse_mode, default_value = "analyze")]
    mode: Mode,

    #[arg(long, value_parser = parse_provider, default_value = "openai")]
    provider: Provider,

    #[arg(long, env = "PWASSIST_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    server: String,

    /// Print only the N-th code block (0-based, counting code blocks only).
    #[arg(long, value_name = "N")]
    copy: Option<usize>,

    /// Describe the modes and providers, then exit.
    #[arg(long)]
    list_modes: bool,

    /// Input file; stdin when omitted.
    file: Option<PathBuf>,
}

fn parse_mode(s: &str) -> Result<Mode, String> {
    Mode::parse(s).ok_or_else(|| "expected one of: analyze, generate".to_string())
}

fn parse_provider(s: &str) -> Result<Provider, String> {
    Provider::parse(s).ok_or_else(|| "expected one of: openai, gemini".to_string())
}

/// Writes copied code to stdout.
struct StdoutClipboard;

#[async_trait::async_trait]
impl Clipboard for StdoutClipboard {
    async fn write_text(&self, text: &str) -> anyhow::Result<()> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{text}").context("write stdout")?;
        out.flush().context("flush stdout")
    }
}

fn read_input(file: Option<&PathBuf>) -> anyhow::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("read input: {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("read stdin")?;
            Ok(buf)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let args = Args::parse();
    if args.list_modes {
        print!("{}", overview());
        return Ok(ExitCode::SUCCESS);
    }

    let input = read_input(args.file.as_ref())?;
    let ui = labels(args.mode);

    let transport = Arc::new(HttpTransport::new(&args.server)?);
    let client = CodegenClient::new(
        args.mode,
        transport,
        CopyIndicator::new(Arc::new(StdoutClipboard)),
    );
    client.change_provider(args.provider).await;
    client.set_input_text(input).await;

    eprintln!(
        "{}: {} via {}",
        ui.page_title,
        ui.button_label,
        args.provider.display_name()
    );
    eprintln!("{}", ui.loading_text);
    let state = client.submit().await;

    if state.status() != SubmissionStatus::Succeeded {
        let msg = state.last_error().unwrap_or_default();
        eprintln!("{ERROR_BANNER_PREFIX} {msg}");
        return Ok(ExitCode::FAILURE);
    }

    if let Some(index) = args.copy {
        if client.copy_code(index).await {
            return Ok(ExitCode::SUCCESS);
        }
        eprintln!("{ERROR_BANNER_PREFIX} no code block {index} in the result");
        return Ok(ExitCode::FAILURE);
    }

    println!("{}\n", ui.result_title);
    for seg in state.segments() {
        match seg.kind {
            SegmentKind::Text => println!("{}\n", seg.content),
            SegmentKind::Code => println!("```\n{}\n```\n", seg.content),
        }
    }
    Ok(ExitCode::SUCCESS)
}
