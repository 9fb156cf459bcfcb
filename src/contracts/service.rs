use ethers::prelude::*;
use serde::{Serialize, Serializer};
use std::sync::Arc;
use thiserror::Error;

use super::config::ContractConfig;
use crate::chain::ChainProfile;

// Fixed ModredIP ABI. The registry's real logic (registration, licensing,
// royalty accounting, disputes) lives in the Solidity contract; this side
// only encodes calls against these signatures.
abigen!(
    ModredIP,
    r#"[
        struct IpAssetData { uint256 tokenId; address owner; string ipHash; string metadata; bool isActive; bool isDisputed; uint256 registrationDate; uint256 totalRevenue; uint256 royaltyTokens; address tokenBoundAccount; }
        struct LicenseData { uint256 licenseId; uint256 ipTokenId; address licensee; bool commercialUse; bool derivativeWorks; bool exclusive; uint256 revenueShare; uint256 duration; uint256 issueDate; bool isActive; string terms; }
        function registerIP(string ipHash, string metadata, string tokenUriString) external returns (uint256)
        function mintLicense(uint256 ipTokenId, bool commercialUse, bool derivativeWorks, bool exclusive, uint256 revenueShare, uint256 duration, string terms) external returns (uint256)
        function payRevenue(uint256 ipTokenId, string description) external payable
        function claimRoyalties(uint256 ipTokenId) external
        function getIPAsset(uint256 tokenId) external view returns (IpAssetData)
        function getLicense(uint256 licenseId) external view returns (LicenseData)
        function totalIPs() external view returns (uint256)
        function totalLicenses() external view returns (uint256)
        function getOwnerIPs(address owner) external view returns (uint256[])
        function getIPLicenses(uint256 ipTokenId) external view returns (uint256[])
        event Transfer(address indexed from, address indexed to, uint256 indexed tokenId)
    ]"#,
    methods {
        totalIPs() as total_ips;
        getOwnerIPs(address) as get_owner_ips;
    }
);

type Client = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Caps for the read-aggregation loops, matching the consuming UI's paging.
pub const MAX_OWNED_ASSETS: usize = 100;
pub const MAX_TOKEN_LICENSES: usize = 50;

#[derive(Debug, Error)]
pub enum ContractError {
    #[error("Invalid RPC endpoint: {0}")]
    Endpoint(String),
    #[error("Invalid signing key: {0}")]
    SigningKey(String),
    #[error("Invalid contract address: {0}")]
    InvalidAddress(String),
    #[error("Contract call failed: {0}")]
    Call(String),
    #[error("Transaction {0} dropped before confirmation")]
    MissingReceipt(String),
}

pub struct ContractService {
    client: Arc<Client>,
    chain: &'static ChainProfile,
    modred_ip: ModredIP<Client>,
}

impl ContractService {
    pub fn new(config: &ContractConfig) -> Result<Self, ContractError> {
        let provider = Provider::<Http>::try_from(config.rpc_url.as_str())
            .map_err(|e| ContractError::Endpoint(e.to_string()))?;

        let wallet: LocalWallet = config
            .private_key
            .parse()
            .map_err(|e: WalletError| ContractError::SigningKey(e.to_string()))?;
        let wallet = wallet.with_chain_id(config.chain.chain_id);

        let client = Arc::new(SignerMiddleware::new(provider, wallet));

        let address = config
            .addresses
            .modred_ip
            .parse::<Address>()
            .map_err(|e| ContractError::InvalidAddress(e.to_string()))?;
        let modred_ip = ModredIP::new(address, client.clone());

        Ok(Self {
            client,
            chain: config.chain,
            modred_ip,
        })
    }

    /// Address of the signing account submitting transactions.
    pub fn signer_address(&self) -> Address {
        self.client.signer().address()
    }

    /// Register a new IP asset. The receipt's ERC-721 mint transfer carries
    /// the token id assigned on-chain.
    pub async fn register_ip(
        &self,
        ip_hash: &str,
        metadata: &str,
        token_uri: &str,
    ) -> Result<RegisterOutcome, ContractError> {
        let call = self.modred_ip.register_ip(
            ip_hash.to_string(),
            metadata.to_string(),
            token_uri.to_string(),
        );
        let pending = call
            .send()
            .await
            .map_err(|e| ContractError::Call(e.to_string()))?;

        let submitted = format!("{:?}", pending.tx_hash());
        let receipt = pending
            .await
            .map_err(|e| ContractError::Call(e.to_string()))?
            .ok_or(ContractError::MissingReceipt(submitted))?;

        let mut ip_asset_id = None;
        for log in &receipt.logs {
            if let Ok(event) = self.modred_ip.decode_event::<TransferFilter>(
                "Transfer",
                log.topics.clone(),
                log.data.clone(),
            ) {
                if event.from.is_zero() {
                    ip_asset_id = Some(event.token_id.to_string());
                    break;
                }
            }
        }

        let outcome = self.outcome(&receipt);
        Ok(RegisterOutcome {
            tx_hash: outcome.tx_hash,
            ip_asset_id,
            block_number: outcome.block_number,
            explorer_url: outcome.explorer_url,
        })
    }

    /// Mint a license against an IP asset. An explicit contract address
    /// overrides the configured deployment for this call only.
    pub async fn mint_license(
        &self,
        params: &MintLicenseParams,
    ) -> Result<TxOutcome, ContractError> {
        let contract = self.instance(params.contract_address);

        let call = contract.mint_license(
            params.ip_token_id,
            params.commercial_use,
            params.derivative_works,
            params.exclusive,
            params.revenue_share,
            params.duration,
            params.terms.clone(),
        );
        let pending = call
            .send()
            .await
            .map_err(|e| ContractError::Call(e.to_string()))?;

        let submitted = format!("{:?}", pending.tx_hash());
        let receipt = pending
            .await
            .map_err(|e| ContractError::Call(e.to_string()))?
            .ok_or(ContractError::MissingReceipt(submitted))?;

        Ok(self.outcome(&receipt))
    }

    /// Pay revenue into an IP asset, attaching `amount_wei` as call value.
    pub async fn pay_revenue(
        &self,
        ip_token_id: U256,
        description: &str,
        amount_wei: U256,
    ) -> Result<TxOutcome, ContractError> {
        let call = self
            .modred_ip
            .pay_revenue(ip_token_id, description.to_string())
            .value(amount_wei);
        let pending = call
            .send()
            .await
            .map_err(|e| ContractError::Call(e.to_string()))?;

        let submitted = format!("{:?}", pending.tx_hash());
        let receipt = pending
            .await
            .map_err(|e| ContractError::Call(e.to_string()))?
            .ok_or(ContractError::MissingReceipt(submitted))?;

        Ok(self.outcome(&receipt))
    }

    /// Claim accrued royalties for an IP asset.
    pub async fn claim_royalties(&self, ip_token_id: U256) -> Result<TxOutcome, ContractError> {
        let call = self.modred_ip.claim_royalties(ip_token_id);
        let pending = call
            .send()
            .await
            .map_err(|e| ContractError::Call(e.to_string()))?;

        let submitted = format!("{:?}", pending.tx_hash());
        let receipt = pending
            .await
            .map_err(|e| ContractError::Call(e.to_string()))?
            .ok_or(ContractError::MissingReceipt(submitted))?;

        Ok(self.outcome(&receipt))
    }

    pub async fn get_ip_asset(&self, token_id: U256) -> Result<IpAsset, ContractError> {
        let raw = self
            .modred_ip
            .get_ip_asset(token_id)
            .call()
            .await
            .map_err(|e| ContractError::Call(e.to_string()))?;
        Ok(IpAsset::from(ip_asset_data_from_tuple(raw)))
    }

    pub async fn get_license(&self, license_id: U256) -> Result<License, ContractError> {
        let raw = self
            .modred_ip
            .get_license(license_id)
            .call()
            .await
            .map_err(|e| ContractError::Call(e.to_string()))?;
        Ok(License::from(license_data_from_tuple(raw)))
    }

    pub async fn total_ips(&self) -> Result<U256, ContractError> {
        self.modred_ip
            .total_ips()
            .call()
            .await
            .map_err(|e| ContractError::Call(e.to_string()))
    }

    pub async fn total_licenses(&self) -> Result<U256, ContractError> {
        self.modred_ip
            .total_licenses()
            .call()
            .await
            .map_err(|e| ContractError::Call(e.to_string()))
    }

    pub async fn get_owner_ips(&self, owner: Address) -> Result<Vec<U256>, ContractError> {
        self.modred_ip
            .get_owner_ips(owner)
            .call()
            .await
            .map_err(|e| ContractError::Call(e.to_string()))
    }

    pub async fn get_ip_licenses(&self, ip_token_id: U256) -> Result<Vec<U256>, ContractError> {
        self.modred_ip
            .get_ip_licenses(ip_token_id)
            .call()
            .await
            .map_err(|e| ContractError::Call(e.to_string()))
    }

    /// Next token id, downgrading RPC failures to zero.
    pub async fn next_token_id(&self) -> U256 {
        match self.total_ips().await {
            Ok(total) => total,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read total IPs, returning 0");
                U256::zero()
            }
        }
    }

    /// Next license id, downgrading RPC failures to zero.
    pub async fn next_license_id(&self) -> U256 {
        match self.total_licenses().await {
            Ok(total) => total,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read total licenses, returning 0");
                U256::zero()
            }
        }
    }

    /// Fetch up to `max_tokens` IP assets owned by `owner`. Individual
    /// asset fetch failures are skipped; an index failure yields an empty
    /// list.
    pub async fn owned_assets(&self, owner: Address, max_tokens: usize) -> Vec<IpAsset> {
        let ids = match self.get_owner_ips(owner).await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!(error = %e, owner = ?owner, "Failed to fetch owner IP index");
                return Vec::new();
            }
        };

        let mut assets = Vec::new();
        for id in ids.into_iter().take(max_tokens) {
            match self.get_ip_asset(id).await {
                Ok(asset) => assets.push(asset),
                Err(e) => {
                    tracing::warn!(error = %e, token_id = %id, "Skipping IP asset fetch");
                }
            }
        }
        assets
    }

    /// Fetch up to `max_licenses` licenses for an IP token, relabeled for
    /// the consuming UI. Same degrade-to-empty posture as `owned_assets`.
    pub async fn licenses_by_token(
        &self,
        ip_token_id: U256,
        max_licenses: usize,
    ) -> Vec<LicenseSummary> {
        let ids = match self.get_ip_licenses(ip_token_id).await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!(error = %e, token_id = %ip_token_id, "Failed to fetch IP license index");
                return Vec::new();
            }
        };

        let mut licenses = Vec::new();
        for id in ids.into_iter().take(max_licenses) {
            match self
                .modred_ip
                .get_license(id)
                .call()
                .await
                .map_err(|e| ContractError::Call(e.to_string()))
            {
                Ok(raw) => licenses.push(LicenseSummary::from(license_data_from_tuple(raw))),
                Err(e) => {
                    tracing::warn!(error = %e, license_id = %id, "Skipping license fetch");
                }
            }
        }
        licenses
    }

    fn instance(&self, address: Option<Address>) -> ModredIP<Client> {
        match address {
            Some(address) => ModredIP::new(address, self.client.clone()),
            None => self.modred_ip.clone(),
        }
    }

    fn outcome(&self, receipt: &TransactionReceipt) -> TxOutcome {
        let tx_hash = format!("{:?}", receipt.transaction_hash);
        TxOutcome {
            explorer_url: self.chain.tx_url(&tx_hash),
            block_number: receipt.block_number.unwrap_or_default().to_string(),
            tx_hash,
        }
    }
}

/// Typed parameters for a license mint, produced by request validation.
#[derive(Debug, Clone)]
pub struct MintLicenseParams {
    pub ip_token_id: U256,
    pub commercial_use: bool,
    pub derivative_works: bool,
    pub exclusive: bool,
    pub revenue_share: U256,
    pub duration: U256,
    pub terms: String,
    pub contract_address: Option<Address>,
}

/// Confirmation record for a submitted transaction. Block numbers ride as
/// strings so JSON consumers never see raw big ints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TxOutcome {
    pub tx_hash: String,
    pub block_number: String,
    pub explorer_url: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterOutcome {
    pub tx_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_asset_id: Option<String>,
    pub block_number: String,
    pub explorer_url: String,
}

/// On-chain IP asset projection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IpAsset {
    #[serde(serialize_with = "u256_string")]
    pub token_id: U256,
    pub owner: Address,
    pub ip_hash: String,
    pub metadata: String,
    pub is_active: bool,
    pub is_disputed: bool,
    #[serde(serialize_with = "u256_string")]
    pub registration_date: U256,
    #[serde(serialize_with = "u256_string")]
    pub total_revenue: U256,
    #[serde(serialize_with = "u256_string")]
    pub royalty_tokens: U256,
    pub token_bound_account: Address,
    // The contract does not track encryption; default for UI compatibility.
    pub is_encrypted: bool,
}

impl From<IpAssetData> for IpAsset {
    fn from(data: IpAssetData) -> Self {
        Self {
            token_id: data.token_id,
            owner: data.owner,
            ip_hash: data.ip_hash,
            metadata: data.metadata,
            is_active: data.is_active,
            is_disputed: data.is_disputed,
            registration_date: data.registration_date,
            total_revenue: data.total_revenue,
            royalty_tokens: data.royalty_tokens,
            token_bound_account: data.token_bound_account,
            is_encrypted: false,
        }
    }
}

/// On-chain license projection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct License {
    #[serde(serialize_with = "u256_string")]
    pub license_id: U256,
    #[serde(serialize_with = "u256_string")]
    pub ip_token_id: U256,
    pub licensee: Address,
    pub commercial_use: bool,
    pub derivative_works: bool,
    pub exclusive: bool,
    #[serde(serialize_with = "u256_string")]
    pub revenue_share: U256,
    #[serde(serialize_with = "u256_string")]
    pub duration: U256,
    #[serde(serialize_with = "u256_string")]
    pub issue_date: U256,
    pub is_active: bool,
    pub terms: String,
}

impl From<LicenseData> for License {
    fn from(data: LicenseData) -> Self {
        Self {
            license_id: data.license_id,
            ip_token_id: data.ip_token_id,
            licensee: data.licensee,
            commercial_use: data.commercial_use,
            derivative_works: data.derivative_works,
            exclusive: data.exclusive,
            revenue_share: data.revenue_share,
            duration: data.duration,
            issue_date: data.issue_date,
            is_active: data.is_active,
            terms: data.terms,
        }
    }
}

/// License relabeled for the consuming UI: `ipTokenId` -> `tokenId`,
/// `revenueShare` -> `royaltyPercentage`, `issueDate` -> `startDate`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseSummary {
    #[serde(serialize_with = "u256_string")]
    pub license_id: U256,
    #[serde(serialize_with = "u256_string")]
    pub token_id: U256,
    pub licensee: Address,
    #[serde(serialize_with = "u256_string")]
    pub royalty_percentage: U256,
    #[serde(serialize_with = "u256_string")]
    pub duration: U256,
    #[serde(serialize_with = "u256_string")]
    pub start_date: U256,
    pub is_active: bool,
    pub commercial_use: bool,
    pub terms: String,
}

impl From<LicenseData> for LicenseSummary {
    fn from(data: LicenseData) -> Self {
        Self {
            license_id: data.license_id,
            token_id: data.ip_token_id,
            licensee: data.licensee,
            royalty_percentage: data.revenue_share,
            duration: data.duration,
            start_date: data.issue_date,
            is_active: data.is_active,
            commercial_use: data.commercial_use,
            terms: data.terms,
        }
    }
}

// The human-readable ABI drops internal struct names on return values, so
// abigen yields flat tuples; rebuild the generated structs field-for-field.
#[allow(clippy::type_complexity)]
fn ip_asset_data_from_tuple(
    raw: (U256, Address, String, String, bool, bool, U256, U256, U256, Address),
) -> IpAssetData {
    IpAssetData {
        token_id: raw.0,
        owner: raw.1,
        ip_hash: raw.2,
        metadata: raw.3,
        is_active: raw.4,
        is_disputed: raw.5,
        registration_date: raw.6,
        total_revenue: raw.7,
        royalty_tokens: raw.8,
        token_bound_account: raw.9,
    }
}

#[allow(clippy::type_complexity)]
fn license_data_from_tuple(
    raw: (U256, U256, Address, bool, bool, bool, U256, U256, U256, bool, String),
) -> LicenseData {
    LicenseData {
        license_id: raw.0,
        ip_token_id: raw.1,
        licensee: raw.2,
        commercial_use: raw.3,
        derivative_works: raw.4,
        exclusive: raw.5,
        revenue_share: raw.6,
        duration: raw.7,
        issue_date: raw.8,
        is_active: raw.9,
        terms: raw.10,
    }
}

fn u256_string<S>(value: &U256, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(value)
}
