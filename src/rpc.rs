//! Minimal JSON-RPC 2.0 client for a Sui full node
//!
//! Only the handful of methods needed to resolve names, assemble a
//! transaction, dry-run it and execute it are wrapped here.

pub mod types;

pub use types::*;

use crate::address::SuiAddress;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

pub const SUI_COIN_TYPE: &str = "0x2::sui::SUI";

#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },
    #[error("JSON-RPC error {code}: {message}")]
    Remote { code: i64, message: String },
    #[error("malformed response: {0}")]
    Malformed(String),
}

#[derive(Debug)]
pub struct RpcClient {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl RpcClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, RpcError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(RpcClient {
            http,
            url: url.into(),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send one request and decode its `result`. A `null` result decodes
    /// into `Option::None` when `T` is an `Option`.
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<T, RpcError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        tracing::debug!(method, url = %self.url, "rpc.call");

        let resp = self.http.post(&self.url).json(&request).send().await?;
        if !resp.status().is_success() {
            return Err(RpcError::Status {
                status: resp.status().as_u16(),
                url: self.url.clone(),
            });
        }

        let body: JsonRpcResponse<serde_json::Value> = resp.json().await?;
        if let Some(err) = body.error {
            return Err(RpcError::Remote {
                code: err.code,
                message: err.message,
            });
        }

        let result = body.result.unwrap_or(serde_json::Value::Null);
        serde_json::from_value(result)
            .map_err(|e| RpcError::Malformed(format!("{}: {}", method, e)))
    }

    pub async fn resolve_name_service_address(
        &self,
        name: &str,
    ) -> Result<Option<SuiAddress>, RpcError> {
        self.call("suix_resolveNameServiceAddress", json!([name]))
            .await
    }

    pub async fn get_reference_gas_price(&self) -> Result<u64, RpcError> {
        let price: BigU64 = self.call("suix_getReferenceGasPrice", json!([])).await?;
        Ok(price.0)
    }

    pub async fn get_coins(
        &self,
        owner: &SuiAddress,
        coin_type: &str,
        cursor: Option<&str>,
        limit: usize,
    ) -> Result<CoinPage, RpcError> {
        self.call(
            "suix_getCoins",
            json!([owner.to_string(), coin_type, cursor, limit]),
        )
        .await
    }

    pub async fn get_object(&self, id: &SuiAddress) -> Result<ObjectResponse, RpcError> {
        self.call(
            "sui_getObject",
            json!([id.to_string(), { "showOwner": true }]),
        )
        .await
    }

    pub async fn dry_run_transaction_block(
        &self,
        tx_bytes_b64: &str,
    ) -> Result<DryRunResponse, RpcError> {
        self.call("sui_dryRunTransactionBlock", json!([tx_bytes_b64]))
            .await
    }

    pub async fn execute_transaction_block(
        &self,
        tx_bytes_b64: &str,
        signatures: &[String],
        options: &ExecuteOptions,
    ) -> Result<ExecuteResponse, RpcError> {
        self.call(
            "sui_executeTransactionBlock",
            json!([tx_bytes_b64, signatures, options, "WaitForLocalExecution"]),
        )
        .await
    }
}
