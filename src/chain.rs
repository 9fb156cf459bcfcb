use thiserror::Error;

#[derive(Debug, Error)]
#[error("Unknown Hedera network: {0}")]
pub struct UnknownNetwork(pub String);

/// Descriptor for one of the Hedera EVM networks the contract is deployed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainProfile {
    pub name: &'static str,
    pub chain_id: u64,
    pub rpc_url: &'static str,
    pub explorer_url: &'static str,
    pub currency_symbol: &'static str,
    pub currency_decimals: u8,
}

pub const HEDERA_TESTNET: ChainProfile = ChainProfile {
    name: "testnet",
    chain_id: 296,
    rpc_url: "https://testnet.hashio.io/api",
    explorer_url: "https://testnet.hashscan.io",
    currency_symbol: "HBAR",
    currency_decimals: 18,
};

pub const HEDERA_MAINNET: ChainProfile = ChainProfile {
    name: "mainnet",
    chain_id: 295,
    rpc_url: "https://mainnet.hashio.io/api",
    explorer_url: "https://hashscan.io",
    currency_symbol: "HBAR",
    currency_decimals: 18,
};

/// Local hardhat-style node. No public explorer, so links point at the
/// testnet hashscan instance.
pub const HEDERA_LOCAL: ChainProfile = ChainProfile {
    name: "local",
    chain_id: 298,
    rpc_url: "http://127.0.0.1:7546",
    explorer_url: "https://testnet.hashscan.io",
    currency_symbol: "HBAR",
    currency_decimals: 18,
};

impl ChainProfile {
    /// Look up a network by name (case-insensitive).
    pub fn by_name(name: &str) -> Result<&'static ChainProfile, UnknownNetwork> {
        match name.to_ascii_lowercase().as_str() {
            "testnet" => Ok(&HEDERA_TESTNET),
            "mainnet" => Ok(&HEDERA_MAINNET),
            "local" => Ok(&HEDERA_LOCAL),
            other => Err(UnknownNetwork(other.to_string())),
        }
    }

    /// Explorer link for a transaction hash.
    pub fn tx_url(&self, tx_hash: &str) -> String {
        format!("{}/tx/{}", self.explorer_url, tx_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_name_selects_testnet() {
        let chain = ChainProfile::by_name("testnet").unwrap();
        assert_eq!(chain.chain_id, 296);
        assert_eq!(chain.rpc_url, "https://testnet.hashio.io/api");
    }

    #[test]
    fn test_by_name_is_case_insensitive() {
        let chain = ChainProfile::by_name("MainNet").unwrap();
        assert_eq!(chain.chain_id, 295);
    }

    #[test]
    fn test_by_name_rejects_unknown() {
        let err = ChainProfile::by_name("previewnet").unwrap_err();
        assert!(err.to_string().contains("previewnet"));
    }

    #[test]
    fn test_tx_url() {
        let url = HEDERA_TESTNET.tx_url("0xabc123");
        assert_eq!(url, "https://testnet.hashscan.io/tx/0xabc123");
    }

    #[test]
    fn test_local_explorer_falls_back_to_testnet() {
        assert_eq!(HEDERA_LOCAL.explorer_url, HEDERA_TESTNET.explorer_url);
    }
}
