//! WQM CLI - render water quality map layers from the command line.

use clap::Parser;
use wqm_core::client::{BackendConfig, RestClient};

#[derive(Parser)]
#[command(
    name = "wqm-cli",
    version,
    about = "Water quality map toolkit"
)]
struct Cli {
    /// Backend project URL
    #[arg(long, env = "WQM_SUPABASE_URL")]
    url: String,

    /// Public (anon) API key
    #[arg(long, env = "WQM_SUPABASE_ANON_KEY", hide_env_values = true)]
    key: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 60)]
    timeout: u64,

    #[command(subcommand)]
    command: wqm_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let http = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(cli.timeout))
        .build()?;
    let client = RestClient::with_client(BackendConfig::new(&cli.url, &cli.key), http);
    wqm_cmd::run(cli.command, &client).await
}
