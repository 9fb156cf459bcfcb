use serde::{Deserialize, Serialize};

use crate::chain::ChainProfile;
use crate::config::Config;

#[derive(Debug, Clone)]
pub struct ContractConfig {
    pub chain: &'static ChainProfile,
    pub rpc_url: String,
    pub private_key: String,
    pub addresses: ContractAddresses,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractAddresses {
    pub modred_ip: String,
    pub erc6551_registry: String,
    pub erc6551_account: String,
}

impl Default for ContractAddresses {
    /// Addresses from the latest Ignition deployment on Hedera testnet.
    fn default() -> Self {
        Self {
            modred_ip: "0xe3Cf8C99E10C1a7138520391bef6dddC61Aa0b91".to_string(),
            erc6551_registry: "0x067fda4FcaaDAa37552e5B146d8bC441ae4B1351".to_string(),
            erc6551_account: "0x62F2DbCb28639e6172aDbbFa93f02f77F7696825".to_string(),
        }
    }
}

impl ContractConfig {
    pub fn from_app_config(config: &Config) -> Self {
        let mut addresses = ContractAddresses::default();
        if let Some(ref address) = config.modred_ip_address {
            addresses.modred_ip = address.clone();
        }

        Self {
            chain: config.network,
            rpc_url: config.rpc_url.clone(),
            private_key: config.wallet_private_key.clone(),
            addresses,
        }
    }
}
