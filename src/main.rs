use std::sync::Arc;

use modred_ip_backend::config::Config;
use modred_ip_backend::contracts::{ContractConfig, ContractService};
use modred_ip_backend::routes::create_router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "modred_ip_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    tracing::info!(
        network = config.network.name,
        chain_id = config.network.chain_id,
        "Starting ModredIP backend"
    );

    // Initialize contract service (signer derived once from the env secret)
    let contract_config = ContractConfig::from_app_config(&config);
    let contracts = Arc::new(ContractService::new(&contract_config)?);

    tracing::info!(
        contract = %contract_config.addresses.modred_ip,
        rpc = %contract_config.rpc_url,
        signer = ?contracts.signer_address(),
        "Connected to ModredIP contract"
    );

    let app = create_router(contracts);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;

    tracing::info!(
        addr = %config.bind_addr(),
        "Server listening"
    );

    axum::serve(listener, app).await?;

    Ok(())
}
