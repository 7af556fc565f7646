use anyhow::Result;
use clap::Parser;
use tracing::info;

use devops_relay::{
    Args, AzureDevOpsClient, BUILD_HASH, Config, VERSION,
    logging::{LogConfig, init_logging},
    server::{self, AppState},
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Handle --create-config flag
    if args.create_config {
        let (path, written) = Config::create_sample_config(args.config.as_deref())?;
        if written {
            println!("Sample config created at: {}", path.display());
        } else {
            println!("Config file already exists at: {}", path.display());
        }
        return Ok(());
    }

    let _log_guard = init_logging(&LogConfig::from_args(&args)?)?;
    info!(version = VERSION, build = BUILD_HASH, "starting devops-relay");

    // Resolve configuration from CLI args, environment variables, and config file
    let config = Config::load(&args)?;
    for (key, origin) in config.describe_sources() {
        info!(key, source = %origin, "configuration source");
    }
    let relay = config.resolve()?;
    let client = AzureDevOpsClient::from_config(&relay)?;
    info!(
        organization = client.organization(),
        base_url = %client.base_url(),
        timeout_secs = relay.request_timeout.as_secs(),
        "Azure DevOps client ready"
    );

    server::serve(&relay.bind_address(), AppState::from_client(client)).await
}
