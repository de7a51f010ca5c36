use std::sync::Arc;

use oreid_connector::{
    AuthProvider, ChainAccountRecord, ChainId, Connector, Eip1193, OreIdConnector, OreIdConnectorArgs,
    OreIdOptions, ProviderError, RequestArguments, ResolutionPolicy, ScriptedSdkFactory,
};
use serde_json::json;

fn setup_connector(records: Vec<ChainAccountRecord>, supported: &[ChainId]) -> OreIdConnector {
    OreIdConnector::new(
        Arc::new(ScriptedSdkFactory::with_chain_accounts(records)),
        OreIdConnectorArgs::new(
            OreIdOptions::new("t_provider"),
            AuthProvider::Email,
            supported.iter().copied(),
        ),
    )
}

#[tokio::test]
async fn test_provider_answers_account_queries() {
    let connector = setup_connector(
        vec![
            ChainAccountRecord::new("ore1custodial", "ore_main"),
            ChainAccountRecord::new("0xCC", "matic_mumbai"),
        ],
        &[ChainId::MATIC_MUMBAI],
    );
    connector.activate().await.unwrap();
    let provider = connector.get_provider().await.unwrap();

    assert_eq!(
        provider.request(RequestArguments::new("eth_accounts")).await,
        Ok(json!(["0xCC"]))
    );
    assert_eq!(
        provider.request(RequestArguments::new("eth_requestAccounts")).await,
        Ok(json!(["0xCC"]))
    );
    assert_eq!(
        provider.request(RequestArguments::new("eth_chainId")).await,
        Ok(json!("0x13881"))
    );
    assert_eq!(
        provider.request(RequestArguments::new("net_version")).await,
        Ok(json!("80001"))
    );
}

#[tokio::test]
async fn test_provider_rejects_node_methods() {
    let connector = setup_connector(vec![ChainAccountRecord::new("0xCC", "mainnet")], &[ChainId::MAINNET]);
    connector.activate().await.unwrap();
    let provider = connector.get_provider().await.unwrap();

    let err = provider
        .request(RequestArguments {
            method: "eth_sendTransaction".into(),
            params: Some(json!([{ "to": "0x00" }])),
        })
        .await
        .unwrap_err();
    assert_eq!(err.code, ProviderError::UNSUPPORTED_METHOD);
}

#[tokio::test]
async fn test_provider_without_qualifying_account() {
    let connector = setup_connector(vec![ChainAccountRecord::new("0xCC", "matic")], &[ChainId::GOERLI]);
    assert!(connector.activate().await.is_err());
    let provider = connector.get_provider().await.unwrap();

    assert_eq!(provider.request(RequestArguments::new("eth_accounts")).await, Ok(json!([])));
    let err = provider
        .request(RequestArguments::new("eth_requestAccounts"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ProviderError::UNAUTHORIZED);
    let err = provider.request(RequestArguments::new("eth_chainId")).await.unwrap_err();
    assert_eq!(err.code, ProviderError::UNAUTHORIZED);
}

#[tokio::test]
async fn test_provider_disconnected_after_logout() {
    let connector = setup_connector(vec![ChainAccountRecord::new("0xCC", "mainnet")], &[ChainId::MAINNET]);
    connector.activate().await.unwrap();
    let provider = connector.get_provider().await.unwrap();
    connector.deactivate().await.unwrap();

    let err = provider.request(RequestArguments::new("eth_accounts")).await.unwrap_err();
    assert_eq!(err.code, ProviderError::DISCONNECTED);
    assert!(connector.get_provider().await.is_err());
}

#[tokio::test]
async fn test_provider_unmapped_network_is_chain_disconnected() {
    let connector = OreIdConnector::new(
        Arc::new(ScriptedSdkFactory::with_chain_accounts(vec![ChainAccountRecord::new(
            "telosuser111",
            "telos_main",
        )])),
        OreIdConnectorArgs::new(OreIdOptions::new("t_provider"), AuthProvider::Email, [ChainId::GOERLI])
            .with_policy(ResolutionPolicy::naive()),
    );
    assert!(connector.activate().await.is_err());
    let provider = connector.get_provider().await.unwrap();

    let err = provider.request(RequestArguments::new("eth_chainId")).await.unwrap_err();
    assert_eq!(err.code, ProviderError::CHAIN_DISCONNECTED);
    let err = provider.request(RequestArguments::new("net_version")).await.unwrap_err();
    assert_eq!(err.code, ProviderError::CHAIN_DISCONNECTED);
}

#[test]
fn test_request_arguments_json_shape() {
    let args: RequestArguments = serde_json::from_str(r#"{ "method": "eth_chainId" }"#).unwrap();
    assert_eq!(args, RequestArguments::new("eth_chainId"));
    assert_eq!(serde_json::to_value(&args).unwrap(), json!({ "method": "eth_chainId" }));
}
