//! Connector Demo CLI.
//!
//! Wires the ORE ID connector from environment configuration into a
//! connector registry and runs one activate / query / deactivate cycle
//! against the in-memory identity SDK.
//!
//! Usage:
//!   OREID_APP_ID=t_demo cargo run --features cli --bin connector-demo

use std::sync::Arc;

use oreid_connector::{
    ChainAccountRecord, Connector, ConnectorConfig, ConnectorRegistry, Eip1193, OreIdConnector,
    RequestArguments, ScriptedSdkFactory, ORE_ID_CONNECTOR_NAME,
};
use tracing_subscriber::EnvFilter;

fn demo_accounts() -> Vec<ChainAccountRecord> {
    vec![
        ChainAccountRecord::new("ore1demoacct1", "ore_test"),
        ChainAccountRecord::new("0x5b38da6a701c568545dcfcb03fcb875f56beddc4", "eth_goerli")
            .with_external_key(true),
        ChainAccountRecord::new("0xab8483f64d9c6d1ecf9b849ae677dd3315835cb2", "eth_goerli"),
        ChainAccountRecord::new("0x4b20993bc481177ec7e8f571cecae8a9e22c02db", "matic"),
    ]
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match ConnectorConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("Usage: OREID_APP_ID=<app id> [OREID_AUTH_PROVIDER=google] [OREID_SUPPORTED_CHAIN_IDS=5] [OREID_RESOLUTION_POLICY=constrained|naive] connector-demo");
            std::process::exit(1);
        }
    };

    let factory = ScriptedSdkFactory::with_chain_accounts(demo_accounts());
    let mut registry = ConnectorRegistry::new();
    registry.register(Arc::new(OreIdConnector::new(Arc::new(factory), config.connector_args())));

    println!("Registered connectors: {:?}", registry.names());

    let connector = match registry.get(ORE_ID_CONNECTOR_NAME) {
        Some(c) => c,
        None => {
            eprintln!("Connector {} not registered", ORE_ID_CONNECTOR_NAME);
            std::process::exit(1);
        }
    };

    match connector.activate().await {
        Ok(update) => {
            println!("Account:  {}", update.account);
            println!("Chain id: {}", update.chain_id);
        }
        Err(e) => {
            eprintln!("Activation failed: {}", e);
            std::process::exit(1);
        }
    }

    if let Ok(provider) = connector.get_provider().await {
        match provider.request(RequestArguments::new("eth_chainId")).await {
            Ok(value) => println!("eth_chainId: {}", value),
            Err(e) => eprintln!("eth_chainId failed: {}", e),
        }
    }

    if let Err(e) = connector.deactivate().await {
        eprintln!("Deactivation failed: {}", e);
        std::process::exit(1);
    }
    println!("Session closed ({})", connector.state().await);
}
