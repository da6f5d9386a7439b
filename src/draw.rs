//! Winner draws against a Sui full node
//!
//! Both modes build the same transaction. A dry run uses a fixed sender and
//! asks the node to simulate it; an on-chain draw signs it with a local key
//! and executes it.

use crate::address::SuiAddress;
use crate::config::{Config, ContractConfig, DrawConfig};
use crate::crypto::KeyPair;
use crate::error::{DrawError, Result};
use crate::processing::AddressReport;
use crate::rpc::{ExecuteOptions, RpcClient, SUI_COIN_TYPE};
use crate::transaction::{
    validate_selection_with, GasData, ObjectDigest, ObjectRef, SharedObject, TransactionData,
    WinnerCall,
};
use crate::winners::{process_winners, Winner, WinnerEvent};
use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;

/// Upper bound on gas coins merged into one payment.
const MAX_GAS_COINS: usize = 256;
const COINS_PAGE_SIZE: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawMode {
    DryRun,
    OnChain,
}

#[derive(Debug, Clone, Serialize)]
pub struct DrawOutcome {
    pub mode: DrawMode,
    /// Transaction digest, only for executed draws
    pub digest: Option<String>,
    pub winners: Vec<Winner>,
}

pub struct Drawer {
    client: Arc<RpcClient>,
    contract: ContractConfig,
    settings: DrawConfig,
}

impl Drawer {
    pub fn new(client: Arc<RpcClient>, config: &Config) -> Self {
        Drawer {
            client,
            contract: config.contract.clone(),
            settings: config.draw.clone(),
        }
    }

    pub fn validate(&self, report: &AddressReport, num_winners: u64) -> Result<()> {
        validate_selection_with(
            num_winners,
            report.valid_addresses.len(),
            self.settings.min_addresses,
            self.settings.max_winners,
        )
    }

    /// Pick enough SUI coins owned by `owner` to cover the gas budget.
    pub async fn select_gas(&self, owner: &SuiAddress) -> Result<GasData> {
        let budget = self.settings.gas_budget;
        let price = self.client.get_reference_gas_price().await?;

        let mut payment: Vec<ObjectRef> = Vec::new();
        let mut total: u64 = 0;
        let mut cursor: Option<String> = None;

        'pages: loop {
            let page = self
                .client
                .get_coins(owner, SUI_COIN_TYPE, cursor.as_deref(), COINS_PAGE_SIZE)
                .await?;

            for coin in page.data {
                let id = SuiAddress::from_str(&coin.coin_object_id)?;
                payment.push((id, coin.version, ObjectDigest::from_base58(&coin.digest)?));
                total = total.saturating_add(coin.balance);
                if total >= budget || payment.len() >= MAX_GAS_COINS {
                    break 'pages;
                }
            }

            match page.next_cursor {
                Some(next) if page.has_next_page => cursor = Some(next),
                _ => break,
            }
        }

        if total < budget {
            return Err(DrawError::ExecutionFailed(format!(
                "Insufficient gas: {} holds {} MIST, budget is {} MIST",
                owner, total, budget
            )));
        }

        Ok(GasData {
            payment,
            owner: *owner,
            price,
            budget,
        })
    }

    /// Reference to the shared `Random` object.
    pub async fn random_object(&self) -> Result<SharedObject> {
        let id = self.contract.random_object_id()?;
        let response = self.client.get_object(&id).await?;

        let initial_shared_version = response
            .data
            .and_then(|data| data.owner)
            .and_then(|owner| owner.initial_shared_version())
            .ok_or_else(|| {
                DrawError::RpcError(format!("Object {} is not a shared object", id))
            })?;

        Ok(SharedObject {
            id,
            initial_shared_version,
        })
    }

    pub async fn prepare(&self, sender: SuiAddress, call: WinnerCall) -> Result<TransactionData> {
        let (gas_data, random) = tokio::try_join!(self.select_gas(&sender), self.random_object())?;
        tracing::debug!(
            target_fn = %call.target(),
            addresses = call.addresses.len(),
            gas_coins = gas_data.payment.len(),
            "built winner transaction"
        );
        call.into_transaction(sender, gas_data, random)
    }

    fn winner_call(&self, report: &AddressReport, num_winners: u64) -> Result<WinnerCall> {
        WinnerCall::from_config(&self.contract, report.valid_addresses.clone(), num_winners)
    }

    /// Simulate the draw without committing anything.
    pub async fn dry_run(&self, report: &AddressReport, num_winners: u64) -> Result<DrawOutcome> {
        self.validate(report, num_winners)?;

        let sender = self.settings.dry_run_sender()?;
        let tx = self
            .prepare(sender, self.winner_call(report, num_winners)?)
            .await?;
        let response = self
            .client
            .dry_run_transaction_block(&tx.to_base64()?)
            .await?;

        if !response.effects.status.is_success() {
            return Err(DrawError::ExecutionFailed(
                response
                    .effects
                    .status
                    .error
                    .unwrap_or_else(|| "dry run failed".to_string()),
            ));
        }

        let event = WinnerEvent::find(&response.events).ok_or(DrawError::NoWinnerData)?;
        let winners = process_winners(&event, report)?;
        tracing::info!(winners = winners.len(), "dry run complete");

        Ok(DrawOutcome {
            mode: DrawMode::DryRun,
            digest: None,
            winners,
        })
    }

    /// Sign with `keypair` and execute the draw on-chain.
    pub async fn draw(
        &self,
        report: &AddressReport,
        num_winners: u64,
        keypair: &KeyPair,
    ) -> Result<DrawOutcome> {
        self.validate(report, num_winners)?;

        let sender = keypair.address();
        let tx = self
            .prepare(sender, self.winner_call(report, num_winners)?)
            .await?;
        let tx_bytes = tx.to_bytes()?;
        let signature = keypair.sign_transaction(&tx_bytes);

        let response = self
            .client
            .execute_transaction_block(
                &tx.to_base64()?,
                &[signature],
                &ExecuteOptions::default(),
            )
            .await?;

        if let Some(effects) = &response.effects {
            if !effects.status.is_success() {
                return Err(DrawError::ExecutionFailed(format!(
                    "{} ({})",
                    effects
                        .status
                        .error
                        .clone()
                        .unwrap_or_else(|| "execution failed".to_string()),
                    response.digest
                )));
            }
        }

        let winners = match response.events.as_deref().and_then(WinnerEvent::find) {
            Some(event) => process_winners(&event, report)?,
            None => {
                tracing::warn!(digest = %response.digest, "executed draw emitted no winner event");
                Vec::new()
            }
        };
        tracing::info!(digest = %response.digest, winners = winners.len(), "draw executed");

        Ok(DrawOutcome {
            mode: DrawMode::OnChain,
            digest: Some(response.digest),
            winners,
        })
    }
}
