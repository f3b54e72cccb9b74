use clap::Parser;
use ferrous_rdns_application::services::work_queue;
use ferrous_rdns_application::use_cases::BulkResolveUseCase;
use ferrous_rdns_domain::{CliOverrides, TransportProtocol};
use ferrous_rdns_infrastructure::dns::ResolverSelector;
use ferrous_rdns_infrastructure::input::spawn_line_reader;
use ferrous_rdns_infrastructure::output::JsonLineSink;
use std::io::BufReader;
use std::sync::Arc;
use tracing::{error, info};

mod bootstrap;

#[derive(Parser)]
#[command(name = "ferrous-rdns")]
#[command(version)]
#[command(about = "Bulk forward and reverse DNS resolution of hostnames read from stdin")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Number of concurrent workers
    #[arg(short = 't', long)]
    threads: Option<usize>,

    /// Resolver address; the system resolver is used when absent
    #[arg(short = 'r', long, value_name = "ADDRESS")]
    resolver: Option<String>,

    /// Resolver protocol (tcp or udp)
    #[arg(short = 'P', long)]
    protocol: Option<TransportProtocol>,

    /// Resolver port
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Strip the trailing dot from reverse names
    #[arg(short = 'd', long)]
    domain: bool,

    /// Per-query timeout in milliseconds
    #[arg(long, value_name = "MS")]
    timeout: Option<u64>,

    /// Log level for stderr diagnostics (off, error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        threads: cli.threads,
        resolver_address: cli.resolver.clone(),
        port: cli.port,
        protocol: cli.protocol,
        timeout_ms: cli.timeout,
        domain_only: cli.domain,
        log_level: cli.log_level.clone(),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);

    let selector = ResolverSelector::from_config(&config)?;

    info!(
        config_file = cli.config.as_deref().unwrap_or("default"),
        threads = config.threads,
        resolver = %selector.describe(),
        domain_only = config.domain_only,
        timeout_ms = ?config.resolver.timeout_ms,
        "Configuration loaded"
    );

    let (producer, queue) = work_queue();
    let reader = spawn_line_reader(BufReader::new(std::io::stdin()), producer);

    let use_case = BulkResolveUseCase::new(
        Arc::new(selector),
        Arc::new(JsonLineSink::stdout()),
        config.threads,
        config.domain_only,
    );

    let summary = use_case.execute(queue).await;

    match reader.await {
        Ok(Ok(lines)) => info!(lines, "Input fully read"),
        Ok(Err(e)) => error!(error = %e, "Failed to read input"),
        Err(e) => error!(error = %e, "Input reader task failed"),
    }

    info!(
        hosts = summary.hosts,
        emitted = summary.emitted,
        resolved = summary.resolved_hosts,
        "Run complete"
    );

    Ok(())
}
