mod server;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use url::Url;

use seolens_core::{
    HttpInspector, InspectorConfig, PageInspector, PerformanceSignals, WEIGHTS, audit_signals,
    render_markdown,
};

const DEFAULT_LOG_FILTER: &str = "seolens=info";

#[derive(Debug, Parser)]
#[command(name = "seolens", version)]
#[command(about = "seolens: SEO, content and performance audits for a single page")]
#[command(after_help = "Developed by Pon Datalab")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Audit one page and print the report
    Audit(AuditArgs),
    /// Run the HTTP API
    Serve(ServeArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Markdown,
    Json,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Json => "json",
        }
    }
}

#[derive(Debug, Args)]
struct InspectorArgs {
    /// Page load timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,
    /// Rendering service exposing `POST /content` (Browserless-compatible)
    #[arg(long, env = "SEOLENS_RENDER_ENDPOINT")]
    render_endpoint: Option<String>,
    #[arg(long, env = "SEOLENS_RENDER_TOKEN", hide_env_values = true)]
    render_token: Option<String>,
    #[arg(long)]
    user_agent: Option<String>,
    /// Record TTFB, transfer size and resource count
    #[arg(long, default_value_t = false)]
    performance: bool,
}

impl InspectorArgs {
    fn config(&self) -> InspectorConfig {
        let defaults = InspectorConfig::default();
        InspectorConfig {
            navigation_timeout: Duration::from_secs(self.timeout),
            user_agent: self.user_agent.clone().unwrap_or(defaults.user_agent),
            render_endpoint: self.render_endpoint.clone(),
            render_token: self.render_token.clone(),
            collect_performance: self.performance,
            ..defaults
        }
    }
}

#[derive(Debug, Args)]
struct AuditArgs {
    /// Page to audit
    url: String,
    #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
    format: OutputFormat,
    /// JSON file with Core Web Vitals collected in a browser
    #[arg(long)]
    vitals: Option<PathBuf>,
    /// Also write the report to this file, or into this directory
    #[arg(long)]
    save: Option<PathBuf>,
    #[command(flatten)]
    inspector: InspectorArgs,
}

#[derive(Debug, Args)]
struct ServeArgs {
    #[arg(long, env = "SEOLENS_HOST", default_value = "0.0.0.0")]
    host: String,
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,
    #[command(flatten)]
    inspector: InspectorArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with_writer(std::io::stderr)
        .init();

    WEIGHTS.validate()?;

    match Cli::parse().command {
        Command::Audit(args) => run_audit(args).await,
        Command::Serve(args) => {
            let inspector = HttpInspector::new(args.inspector.config())?;
            server::serve(&args.host, args.port, Arc::new(inspector)).await
        }
    }
}

/// `RUST_LOG` when set and valid, `seolens=info` otherwise
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

async fn run_audit(args: AuditArgs) -> Result<()> {
    let parsed_url = Url::parse(&args.url).context("invalid URL")?;

    // Read the vitals file before touching the network so a bad path fails fast.
    let vitals = args.vitals.as_deref().map(read_vitals).transpose()?;

    let inspector = HttpInspector::new(args.inspector.config())?;
    let mut signals = inspector
        .load(parsed_url.as_str())
        .await
        .with_context(|| format!("failed to inspect {parsed_url}"))?;

    if let Some(vitals) = vitals {
        signals.performance = Some(match signals.performance.take() {
            Some(measured) => measured.merged_with(vitals),
            None => vitals,
        });
    }

    let audit = audit_signals(&signals, Utc::now());
    let output = match args.format {
        OutputFormat::Markdown => render_markdown(&audit),
        OutputFormat::Json => serde_json::to_string_pretty(&audit)? + "\n",
    };

    print!("{output}");

    if let Some(save_base) = args.save {
        let output_path = build_output_path(&save_base, &parsed_url, args.format);
        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create output directory {}", parent.display())
            })?;
        }

        fs::write(&output_path, output.as_bytes())
            .with_context(|| format!("failed to write output file {}", output_path.display()))?;

        eprintln!("\nWrote output to {}", output_path.display());
    }

    Ok(())
}

fn read_vitals(path: &Path) -> Result<PerformanceSignals> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read vitals file {}", path.display()))?;
    let payload: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("vitals file {} is not valid JSON", path.display()))?;
    PerformanceSignals::from_payload(&payload)
}

fn build_output_path(base: &Path, url: &Url, format: OutputFormat) -> PathBuf {
    let has_extension = base
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case(format.extension()))
        .unwrap_or(false);

    if has_extension {
        base.to_path_buf()
    } else {
        base.join(derive_output_filename(url, format))
    }
}

fn derive_output_filename(url: &Url, format: OutputFormat) -> String {
    let host = url.host_str().unwrap_or("page");
    let mut path_component = url.path().trim_matches('/').replace('/', "_");
    if path_component.is_empty() {
        path_component = "index".to_string();
    }

    let mut parts = vec![sanitize_for_filename(host), sanitize_for_filename(&path_component)];
    if let Some(query) = url.query().filter(|query| !query.is_empty()) {
        parts.push(sanitize_for_filename(query));
    }

    format!("{}.{}", parts.join("__"), format.extension())
}

fn sanitize_for_filename(input: &str) -> String {
    input
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
