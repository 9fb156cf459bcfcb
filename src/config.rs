use std::env;

use crate::chain::ChainProfile;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub network: &'static ChainProfile,
    pub rpc_url: String,
    pub wallet_private_key: String,
    pub modred_ip_address: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let network = ChainProfile::by_name(
            &env::var("HEDERA_NETWORK").unwrap_or_else(|_| "testnet".to_string()),
        )
        .map_err(|_| ConfigError::Invalid("HEDERA_NETWORK"))?;

        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("SERVER_PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()
                    .map_err(|_| ConfigError::Invalid("SERVER_PORT"))?,
            },
            rpc_url: env::var("RPC_PROVIDER_URL").unwrap_or_else(|_| network.rpc_url.to_string()),
            wallet_private_key: env::var("WALLET_PRIVATE_KEY")
                .map_err(|_| ConfigError::Missing("WALLET_PRIVATE_KEY"))?,
            modred_ip_address: env::var("MODRED_IP_CONTRACT_ADDRESS").ok(),
            network,
        })
    }

    /// Get server bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    Missing(&'static str),
    #[error("Invalid value for: {0}")]
    Invalid(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::HEDERA_TESTNET;

    fn sample_config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            network: &HEDERA_TESTNET,
            rpc_url: HEDERA_TESTNET.rpc_url.to_string(),
            wallet_private_key: "0x01".to_string(),
            modred_ip_address: None,
        }
    }

    #[test]
    fn test_bind_addr() {
        assert_eq!(sample_config().bind_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_missing_error_names_variable() {
        let err = ConfigError::Missing("WALLET_PRIVATE_KEY");
        assert_eq!(
            err.to_string(),
            "Missing environment variable: WALLET_PRIVATE_KEY"
        );
    }
}
