//! Assembly of the `select_winners` Move call
use crate::address::SuiAddress;
use crate::config::ContractConfig;
use crate::error::DrawError;
use crate::transaction::types::*;

/// Shared object reference for the on-chain `Random` object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SharedObject {
    pub id: ObjectId,
    pub initial_shared_version: SequenceNumber,
}

/// `package::module::function(addresses, num_winners, &Random)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinnerCall {
    pub package: ObjectId,
    pub module: String,
    pub function: String,
    pub addresses: Vec<SuiAddress>,
    pub num_winners: u64,
}

impl WinnerCall {
    pub fn from_config(
        contract: &ContractConfig,
        addresses: Vec<SuiAddress>,
        num_winners: u64,
    ) -> Result<Self, DrawError> {
        Ok(WinnerCall {
            package: contract.package_id()?,
            module: contract.module.clone(),
            function: contract.function.clone(),
            addresses,
            num_winners,
        })
    }

    pub fn target(&self) -> String {
        format!("{}::{}::{}", self.package, self.module, self.function)
    }

    /// Inputs: `vector<address>`, `u64`, then the `Random` object passed by
    /// immutable reference.
    pub fn inputs(&self, random: SharedObject) -> Result<Vec<CallArg>, DrawError> {
        Ok(vec![
            CallArg::Pure(bcs::to_bytes(&self.addresses)?),
            CallArg::Pure(bcs::to_bytes(&self.num_winners)?),
            CallArg::Object(ObjectArg::SharedObject {
                id: random.id,
                initial_shared_version: random.initial_shared_version,
                mutable: false,
            }),
        ])
    }

    pub fn into_transaction(
        self,
        sender: SuiAddress,
        gas_data: GasData,
        random: SharedObject,
    ) -> Result<TransactionData, DrawError> {
        let inputs = self.inputs(random)?;
        let call = ProgrammableMoveCall {
            package: self.package,
            module: self.module,
            function: self.function,
            type_arguments: Vec::new(),
            arguments: vec![Argument::Input(0), Argument::Input(1), Argument::Input(2)],
        };

        Ok(TransactionData::V1(TransactionDataV1 {
            kind: TransactionKind::ProgrammableTransaction(ProgrammableTransaction {
                inputs,
                commands: vec![Command::MoveCall(Box::new(call))],
            }),
            sender,
            gas_data,
            expiration: TransactionExpiration::None,
        }))
    }
}
