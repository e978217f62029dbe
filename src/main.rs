use std::io::Read;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use medlens::api::{start_api_server, ApiContext};
use medlens::config::{self, AppConfig};
use medlens::pipeline::extraction::UploadedFile;
use medlens::pipeline::structuring::AnalysisRecord;

#[derive(Parser, Debug)]
#[command(
    name = "medlens",
    version,
    about = "Turn lab report images and text into structured summaries."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API until Ctrl-C.
    Serve {
        /// Address to listen on (overrides MEDLENS_BIND_ADDR).
        #[arg(short, long)]
        bind: Option<SocketAddr>,
    },
    /// OCR a local image or PDF and analyze it.
    Analyze {
        /// Path to the report file.
        file: PathBuf,
    },
    /// Analyze plain report text from a file, or stdin when omitted.
    AnalyzeText {
        file: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    medlens::init_tracing();
    let cli = Cli::parse();
    let config = AppConfig::from_env().context("Invalid configuration")?;

    tracing::info!("{} v{}", config::APP_NAME, config::APP_VERSION);

    match cli.command {
        Command::Serve { bind } => serve(config, bind),
        Command::Analyze { file } => {
            let upload = UploadedFile::from_path(&file)
                .with_context(|| format!("Cannot read {}", file.display()))?;
            let processor = config.build_processor()?;
            let record = processor
                .process_file(&upload)
                .with_context(|| format!("Could not process {}", file.display()))?;
            print_record(&record)
        }
        Command::AnalyzeText { file } => {
            let text = match &file {
                Some(path) => std::fs::read_to_string(path)
                    .with_context(|| format!("Cannot read {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("Cannot read stdin")?;
                    buf
                }
            };
            let processor = config.build_processor()?;
            let record = processor.analyze_text(&text)?;
            print_record(&record)
        }
    }
}

fn serve(config: AppConfig, bind: Option<SocketAddr>) -> anyhow::Result<()> {
    // Blocking clients are built and finally dropped outside the runtime.
    let processor = Arc::new(config.build_processor()?);
    let ctx = ApiContext::new(processor.clone(), config.ocr.max_file_bytes);
    let addr = bind.unwrap_or(config.bind_addr);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Cannot start async runtime")?;

    runtime.block_on(async move {
        let mut server = start_api_server(ctx, addr)
            .await
            .with_context(|| format!("Cannot bind {addr}"))?;
        println!("Listening on http://{}", server.addr);

        tokio::signal::ctrl_c()
            .await
            .context("Cannot listen for Ctrl-C")?;
        server.shutdown();
        server.stopped().await;
        Ok(())
    })
}

fn print_record(record: &AnalysisRecord) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(record)?);
    Ok(())
}
