//! Configuration management for SuiRandom

use crate::address::SuiAddress;
use crate::error::DrawError;
use crate::transaction::{ObjectId, MAX_WINNERS, MIN_ADDRESSES};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub network: NetworkConfig,
    pub contract: ContractConfig,
    pub draw: DrawConfig,
    pub keystore: KeystoreConfig,
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Full node used to build, dry-run and execute transactions
    pub rpc_url: String,
    /// Full node used for SuiNS lookups
    pub resolver_url: String,
    pub chain: String,
    pub explorer_url: String,
    pub request_timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            rpc_url: "https://fullnode.testnet.sui.io:443".to_string(),
            resolver_url: "https://rpc-mainnet.suiscan.xyz".to_string(),
            chain: "sui:testnet".to_string(),
            explorer_url: "https://testnet.suivision.xyz/txblock".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl NetworkConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ContractConfig {
    pub package: String,
    pub module: String,
    pub function: String,
    pub random_object: String,
}

impl Default for ContractConfig {
    fn default() -> Self {
        ContractConfig {
            package: "0xde6dde8c563f08a62410e1702a3138ecbded82dc6e61dc24ba8490fff970ea09"
                .to_string(),
            module: "sui_random".to_string(),
            function: "select_winners".to_string(),
            random_object: "0x8".to_string(),
        }
    }
}

impl ContractConfig {
    pub fn package_id(&self) -> Result<ObjectId, DrawError> {
        SuiAddress::from_str(&self.package)
            .map_err(|e| DrawError::ConfigError(format!("contract.package: {}", e)))
    }

    pub fn random_object_id(&self) -> Result<ObjectId, DrawError> {
        SuiAddress::from_short_hex(&self.random_object)
            .map_err(|e| DrawError::ConfigError(format!("contract.random_object: {}", e)))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    /// Sender used for dry runs; must own some SUI for gas selection
    pub dry_run_sender: String,
    /// Gas budget in MIST
    pub gas_budget: u64,
    pub max_winners: u64,
    pub min_addresses: usize,
    pub resolve_concurrency: usize,
}

impl Default for DrawConfig {
    fn default() -> Self {
        DrawConfig {
            dry_run_sender: "0x75826853aa5e656121619e8510893665a40e2bbf14e2e502746fbd3c83bc5130"
                .to_string(),
            gas_budget: 50_000_000,
            max_winners: MAX_WINNERS,
            min_addresses: MIN_ADDRESSES,
            resolve_concurrency: 8,
        }
    }
}

impl DrawConfig {
    pub fn dry_run_sender(&self) -> Result<SuiAddress, DrawError> {
        SuiAddress::from_str(&self.dry_run_sender)
            .map_err(|e| DrawError::ConfigError(format!("draw.dry_run_sender: {}", e)))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct KeystoreConfig {
    pub path: Option<PathBuf>,
    /// Address of the key to sign with; first key when unset
    pub address: Option<String>,
}

impl KeystoreConfig {
    pub fn path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(crate::keystore::default_keystore_path)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig { port: 3000 }
    }
}

impl Config {
    /// Read `path`, falling back to defaults when the file does not exist,
    /// then apply environment overrides and validate.
    pub fn load(path: &Path) -> Result<Config, DrawError> {
        let mut config: Config = match fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).map_err(|e| {
                DrawError::ConfigError(format!("{}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Config::default(),
            Err(e) => return Err(e.into()),
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("SUIRANDOM_RPC_URL") {
            self.network.rpc_url = url;
        }
        if let Ok(url) = std::env::var("SUIRANDOM_RESOLVER_URL") {
            self.network.resolver_url = url;
        }
        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            self.api.port = port;
        }
    }

    pub fn validate(&self) -> Result<(), DrawError> {
        if self.network.rpc_url.is_empty() {
            return Err(DrawError::ConfigError(
                "network.rpc_url must be set".to_string(),
            ));
        }
        if self.network.resolver_url.is_empty() {
            return Err(DrawError::ConfigError(
                "network.resolver_url must be set".to_string(),
            ));
        }
        if self.network.request_timeout_secs == 0 {
            return Err(DrawError::ConfigError(
                "network.request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.draw.gas_budget == 0 {
            return Err(DrawError::ConfigError(
                "draw.gas_budget must be greater than zero".to_string(),
            ));
        }
        if self.draw.max_winners == 0 {
            return Err(DrawError::ConfigError(
                "draw.max_winners must be greater than zero".to_string(),
            ));
        }
        self.contract.package_id()?;
        self.contract.random_object_id()?;
        self.draw.dry_run_sender()?;
        if let Some(addr) = &self.keystore.address {
            SuiAddress::from_str(addr)
                .map_err(|e| DrawError::ConfigError(format!("keystore.address: {}", e)))?;
        }
        Ok(())
    }

    /// Point draws at another full node, re-checking the result.
    pub fn override_rpc_url(&mut self, url: &str) -> Result<(), DrawError> {
        self.network.rpc_url = url.to_string();
        self.validate()
    }
}

/// Load `config.toml` from the working directory.
pub fn load_config() -> Result<Config, DrawError> {
    Config::load(Path::new(DEFAULT_CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.draw.max_winners, 100);
        assert_eq!(config.draw.min_addresses, 2);
        assert_eq!(config.contract.module, "sui_random");
        assert_eq!(
            config.contract.random_object_id().unwrap(),
            SuiAddress::from_short_hex("0x8").unwrap()
        );
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.draw.gas_budget, 50_000_000);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[draw]\ngas_budget = 10000000\nresolve_concurrency = 2\n\n[network]\nrequest_timeout_secs = 5\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.draw.gas_budget, 10_000_000);
        assert_eq!(config.draw.resolve_concurrency, 2);
        assert_eq!(config.draw.max_winners, 100);
        assert_eq!(config.network.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.contract.function, "select_winners");
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = Config::default();
        config.draw.gas_budget = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.contract.package = "0x123".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("contract.package"));

        let mut config = Config::default();
        config.keystore.address = Some("nope".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[network]\nrequest_timeout_secs = 0\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("request_timeout_secs"));
    }

    #[test]
    fn test_rpc_override_is_validated() {
        let mut config = Config::default();
        config.override_rpc_url("http://127.0.0.1:9000").unwrap();
        assert_eq!(config.network.rpc_url, "http://127.0.0.1:9000");

        let err = config.override_rpc_url("").unwrap_err();
        assert!(err.to_string().contains("network.rpc_url"));
    }

    #[test]
    fn test_malformed_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[draw\n").unwrap();
        assert!(matches!(
            Config::load(&path),
            Err(DrawError::ConfigError(_))
        ));
    }
}
