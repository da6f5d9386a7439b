//! Wire types for the Sui JSON-RPC API (only the fields this crate reads)
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse<T> {
    #[allow(dead_code)]
    pub id: Option<serde_json::Value>,
    pub result: Option<T>,
    pub error: Option<JsonRpcErrorObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcErrorObject {
    pub code: i64,
    pub message: String,
}

/// One gas coin owned by an account.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coin {
    pub coin_object_id: String,
    #[serde(deserialize_with = "u64_from_string_or_number")]
    pub version: u64,
    /// Base58 object digest
    pub digest: String,
    #[serde(deserialize_with = "u64_from_string_or_number")]
    pub balance: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinPage {
    pub data: Vec<Coin>,
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_next_page: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectResponse {
    pub data: Option<ObjectData>,
    pub error: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectData {
    pub object_id: String,
    #[serde(deserialize_with = "u64_from_string_or_number")]
    pub version: u64,
    pub digest: String,
    pub owner: Option<ObjectOwner>,
}

/// Object ownership as reported by the node. Only the shared case matters
/// here; everything else collapses into `Other`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ObjectOwner {
    Shared {
        #[serde(rename = "Shared")]
        shared: SharedOwner,
    },
    Other(serde_json::Value),
}

#[derive(Debug, Clone, Deserialize)]
pub struct SharedOwner {
    #[serde(deserialize_with = "u64_from_string_or_number")]
    pub initial_shared_version: u64,
}

impl ObjectOwner {
    pub fn initial_shared_version(&self) -> Option<u64> {
        match self {
            ObjectOwner::Shared { shared } => Some(shared.initial_shared_version),
            ObjectOwner::Other(_) => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionStatus {
    pub status: String,
    pub error: Option<String>,
}

impl ExecutionStatus {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransactionEffects {
    pub status: ExecutionStatus,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub parsed_json: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DryRunResponse {
    pub effects: TransactionEffects,
    #[serde(default)]
    pub events: Vec<SuiEvent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExecuteResponse {
    pub digest: String,
    pub effects: Option<TransactionEffects>,
    pub events: Option<Vec<SuiEvent>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteOptions {
    pub show_effects: bool,
    pub show_events: bool,
    pub show_raw_effects: bool,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        ExecuteOptions {
            show_effects: true,
            show_events: true,
            show_raw_effects: true,
        }
    }
}

/// The node encodes 64-bit integers as JSON strings in some places and as
/// numbers in others.
pub fn u64_from_string_or_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

/// A bare 64-bit integer result such as the reference gas price.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(transparent)]
pub struct BigU64(#[serde(deserialize_with = "u64_from_string_or_number")] pub u64);
