use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use ethers::types::{Address, U256};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tower_http::trace::TraceLayer;

use crate::contracts::service::MintLicenseParams;
use crate::contracts::ContractService;

pub fn create_router(contracts: Arc<ContractService>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/license", post(mint_license))
        .layer(TraceLayer::new_for_http())
        .with_state(contracts)
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Incoming license-minting request. Every field is required; presence is
/// checked in `validate` so one 400 names the full parameter list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LicenseRequest {
    pub ip_token_id: Option<u64>,
    pub commercial_use: Option<bool>,
    pub derivative_works: Option<bool>,
    pub exclusive: Option<bool>,
    pub revenue_share: Option<u64>,
    pub duration: Option<u64>,
    pub terms: Option<String>,
    pub modred_ip_contract_address: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required parameters: ipTokenId, commercialUse, derivativeWorks, exclusive, revenueShare, duration, terms, modredIpContractAddress")]
    MissingParameters,
    #[error("Invalid contract address: {0}")]
    InvalidAddress(String),
}

impl LicenseRequest {
    pub fn validate(self) -> Result<MintLicenseParams, ValidationError> {
        let (
            Some(ip_token_id),
            Some(commercial_use),
            Some(derivative_works),
            Some(exclusive),
            Some(revenue_share),
            Some(duration),
            Some(terms),
            Some(address),
        ) = (
            self.ip_token_id,
            self.commercial_use,
            self.derivative_works,
            self.exclusive,
            self.revenue_share,
            self.duration,
            self.terms,
            self.modred_ip_contract_address,
        )
        else {
            return Err(ValidationError::MissingParameters);
        };

        let contract_address = address
            .parse::<Address>()
            .map_err(|_| ValidationError::InvalidAddress(address))?;

        Ok(MintLicenseParams {
            ip_token_id: U256::from(ip_token_id),
            commercial_use,
            derivative_works,
            exclusive,
            revenue_share: U256::from(revenue_share),
            duration: U256::from(duration),
            terms,
            contract_address: Some(contract_address),
        })
    }
}

async fn mint_license(
    State(contracts): State<Arc<ContractService>>,
    Json(request): Json<LicenseRequest>,
) -> Response {
    tracing::debug!(?request, "Received license request");

    let params = match request.validate() {
        Ok(params) => params,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response();
        }
    };

    match contracts.mint_license(&params).await {
        Ok(outcome) => {
            tracing::info!(tx_hash = %outcome.tx_hash, "License minted");
            (
                StatusCode::OK,
                Json(json!({
                    "message": "License minted successfully on Hedera",
                    "data": outcome,
                })),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "License minting failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Failed to mint license on Hedera",
                    "details": "License minting failed on Hedera",
                })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::HEDERA_TESTNET;
    use crate::contracts::{ContractAddresses, ContractConfig};
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    const TEST_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const TEST_CONTRACT: &str = "0xe3Cf8C99E10C1a7138520391bef6dddC61Aa0b91";

    fn full_request() -> LicenseRequest {
        LicenseRequest {
            ip_token_id: Some(1),
            commercial_use: Some(true),
            derivative_works: Some(false),
            exclusive: Some(true),
            revenue_share: Some(1000),
            duration: Some(365),
            terms: Some("Commercial license terms".to_string()),
            modred_ip_contract_address: Some(TEST_CONTRACT.to_string()),
        }
    }

    fn test_router() -> Router {
        // Discard port, nothing listens here. Validation failures never
        // reach the RPC endpoint.
        let config = ContractConfig {
            chain: &HEDERA_TESTNET,
            rpc_url: "http://127.0.0.1:9".to_string(),
            private_key: TEST_KEY.to_string(),
            addresses: ContractAddresses::default(),
        };
        create_router(Arc::new(ContractService::new(&config).unwrap()))
    }

    #[test]
    fn test_validate_accepts_full_request() {
        let params = full_request().validate().unwrap();
        assert_eq!(params.ip_token_id, U256::from(1u64));
        assert_eq!(params.revenue_share, U256::from(1000u64));
        assert!(params.commercial_use);
        assert!(!params.derivative_works);
        assert!(params.contract_address.is_some());
    }

    #[test]
    fn test_validate_rejects_missing_field() {
        let mut request = full_request();
        request.duration = None;
        assert_eq!(
            request.validate().unwrap_err(),
            ValidationError::MissingParameters
        );
    }

    #[test]
    fn test_validate_rejects_bad_address() {
        let mut request = full_request();
        request.modred_ip_contract_address = Some("not-an-address".to_string());
        assert!(matches!(
            request.validate().unwrap_err(),
            ValidationError::InvalidAddress(_)
        ));
    }

    #[test]
    fn test_false_booleans_are_present_not_missing() {
        let mut request = full_request();
        request.commercial_use = Some(false);
        request.exclusive = Some(false);
        assert!(request.validate().is_ok());
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = test_router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_license_endpoint_rejects_empty_body() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/license")
                    .header("content-type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["error"]
            .as_str()
            .unwrap()
            .contains("Missing required parameters"));
    }

    #[tokio::test]
    async fn test_license_endpoint_rejects_bad_address() {
        let body = json!({
            "ipTokenId": 1,
            "commercialUse": true,
            "derivativeWorks": false,
            "exclusive": true,
            "revenueShare": 1000,
            "duration": 365,
            "terms": "Commercial license terms",
            "modredIpContractAddress": "0xnothex",
        });
        let response = test_router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/license")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
