// src/main.rs
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use binlens::clock::SystemClock;
use binlens::filter::FilterCriteria;
use binlens::format::{format_bytes, format_duration_ms};
use binlens::session::{AnalysisSession, SessionStatus};
use binlens::view::{Tab, TabContent, compose};
use binlens::{AppState, Config};

#[derive(Parser)]
#[command(name = "binlens", about = "Binary inspection report service and viewer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
    /// Analyze a local file and print one tab of the report
    Inspect {
        file: PathBuf,
        #[arg(long, default_value = "overview")]
        tab: String,
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long, default_value = "all")]
        severity: String,
        #[arg(long, default_value_t = binlens::filter::ROW_LIMIT_DEFAULT)]
        limit: usize,
    },
    /// Download the hosted sample binary
    Sample {
        #[arg(long, default_value = "sample.bin")]
        output: PathBuf,
    },
}

fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "binlens=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_tab(content: &TabContent) -> Result<()> {
    match content {
        TabContent::Overview(overview) => {
            println!("Platform:      {}", overview.platform);
            println!("CPU Type:      {}", overview.arch);
            println!("Start Address: {}", overview.entrypoint);
            println!("File Size:     {}", overview.file_size);
            println!("Signature:     {}", overview.magic);
            println!("Stripped:      {}", overview.is_stripped);
            println!("Debug Info:    {}", overview.has_debug);
            println!("SHA-256:       {}", overview.sha256);
            println!("SHA-1:         {}", overview.sha1);
            println!(
                "Counts:        {} alerts, {} sections, {} imports, {} exports, {} symbols, {} strings",
                overview.counts.findings,
                overview.counts.sections,
                overview.counts.imports,
                overview.counts.exports,
                overview.counts.symbols,
                overview.counts.strings
            );
            println!("Visible rows:  {}", overview.visible_rows);
            if let Some(rows) = &overview.codesign {
                println!("Code signing:");
                for row in rows {
                    println!("  {:<22} {}", row.label, row.value);
                }
            }
        }
        TabContent::Findings(findings) => {
            if findings.rows.is_empty() {
                println!("No alerts match this filter.");
            }
            for finding in &findings.rows {
                println!("[{}] {}", finding.severity.as_str().to_uppercase(), finding.title);
                println!("    {}", finding.details);
                for evidence in &finding.evidence {
                    println!("    - {evidence}");
                }
            }
        }
        TabContent::Sections(sections) => {
            for section in &sections.rows {
                println!(
                    "{:<20} {:<12} {:<12} {:<12} {:?}",
                    section.name,
                    binlens::format::format_addr(section.addr),
                    binlens::format::format_addr(Some(section.offset)),
                    format_bytes(section.size),
                    section.flags
                );
            }
        }
        TabContent::Imports(imports) => {
            for import in &imports.rows {
                println!(
                    "{:<32} {}",
                    import.library.as_deref().unwrap_or("-"),
                    import.symbol
                );
            }
        }
        TabContent::Exports(exports) => {
            for export in &exports.rows {
                println!(
                    "{:<48} {}",
                    export.symbol,
                    binlens::format::format_addr(export.addr)
                );
            }
        }
        TabContent::Symbols(symbols) => {
            for symbol in &symbols.rows {
                println!(
                    "{:<48} {:<10} {}",
                    symbol.name,
                    symbol.kind,
                    binlens::format::format_addr(symbol.addr)
                );
            }
        }
        TabContent::Strings(strings) => {
            if strings.rows.is_empty() {
                println!("No text matches this filter.");
            }
            for entry in &strings.rows {
                println!(
                    "{:<12} {}",
                    binlens::format::format_addr(Some(entry.offset)),
                    entry.value
                );
            }
        }
        TabContent::Raw(raw) => println!("{raw}"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port } => {
            let config = Config::from_env()?;
            let port = port.unwrap_or(config.port);
            binlens::server::run_server(port).await
        }
        Commands::Inspect {
            file,
            tab,
            query,
            severity,
            limit,
        } => {
            init_tracing();
            let config = Config::from_env()?;
            let state = AppState::from_config(config)?;

            let tab: Tab = tab.parse()?;
            let criteria = FilterCriteria {
                query,
                severity: severity.parse()?,
                row_limit: limit,
            };

            let bytes = std::fs::read(&file)?;
            let label = file
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "uploaded binary".to_string());

            let mut session = AnalysisSession::new(Arc::new(SystemClock));
            session.load(state.analyzer.as_ref(), bytes, &label).await;

            match session.status() {
                SessionStatus::Ready => {
                    if let Some(duration) = session.last_duration_ms() {
                        eprintln!("Scan completed in {}", format_duration_ms(duration));
                    }
                    if let Some(report) = session.report() {
                        print_tab(&compose(report, &criteria, tab))?;
                    }
                    Ok(())
                }
                _ => {
                    let message = session
                        .error_message()
                        .unwrap_or("Unknown analysis error.")
                        .to_string();
                    anyhow::bail!("{message}")
                }
            }
        }
        Commands::Sample { output } => {
            init_tracing();
            let config = Config::from_env()?;
            let client = reqwest::Client::new();
            match binlens::sample::fetch_sample(&client, &config.sample_url).await {
                Ok(bytes) => {
                    std::fs::write(&output, &bytes)?;
                    println!(
                        "Sample binary written to {} ({})",
                        output.display(),
                        format_bytes(bytes.len() as u64)
                    );
                    Ok(())
                }
                Err(e) => anyhow::bail!("{}", e.remediation(&config.sample_fallback_url)),
            }
        }
    }
}
