use {
    clap::Parser,
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(
    name = "chartrelay",
    about = "Chartrelay — browser-backed relay for historical chart data"
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, default_value_t = false)]
    json_logs: bool,

    /// Address to bind to (overrides config value).
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on (overrides config value).
    #[arg(long)]
    port: Option<u16>,

    /// Path to a config file (overrides discovery).
    #[arg(long, env = "CHARTRELAY_CONFIG")]
    config: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs)?;

    let mut config = match cli.config {
        Some(ref path) => chartrelay_config::load_config(path)?,
        None => chartrelay_config::discover_and_load(),
    };
    chartrelay_config::apply_env_overrides(&mut config);

    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    info!(
        bind = config.server.bind,
        port = config.server.port,
        upstream = config.upstream.base_url,
        "starting chartrelay"
    );

    chartrelay_gateway::start_gateway(config).await
}

fn init_tracing(log_level: &str, json_logs: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .map_err(|e| anyhow::anyhow!("invalid log level {log_level:?}: {e}"))?;

    let registry = tracing_subscriber::registry().with(filter);
    if json_logs {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
    Ok(())
}
