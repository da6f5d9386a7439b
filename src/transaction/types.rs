//! Transaction types mirroring Sui's BCS layout
//!
//! Field and variant order is part of the wire format: BCS encodes enum
//! variants by index and struct fields in declaration order.
use crate::address::SuiAddress;
use crate::error::DrawError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

pub type ObjectId = SuiAddress;
pub type SequenceNumber = u64;

/// 32-byte object digest. BCS writes it with a length prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectDigest(pub [u8; 32]);

impl ObjectDigest {
    /// Decode the base58 form returned by the JSON-RPC API.
    pub fn from_base58(s: &str) -> Result<Self, DrawError> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| DrawError::SerializationError(format!("Invalid digest '{}': {}", s, e)))?;
        let digest: [u8; 32] = bytes.try_into().map_err(|v: Vec<u8>| {
            DrawError::SerializationError(format!(
                "Digest must be 32 bytes, got {}",
                v.len()
            ))
        })?;
        Ok(ObjectDigest(digest))
    }
}

impl Serialize for ObjectDigest {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.0)
    }
}

impl<'de> Deserialize<'de> for ObjectDigest {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes: Vec<u8> = Vec::deserialize(deserializer)?;
        let digest: [u8; 32] = bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("object digest must be 32 bytes"))?;
        Ok(ObjectDigest(digest))
    }
}

pub type ObjectRef = (ObjectId, SequenceNumber, ObjectDigest);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionData {
    V1(TransactionDataV1),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDataV1 {
    pub kind: TransactionKind,
    pub sender: SuiAddress,
    pub gas_data: GasData,
    pub expiration: TransactionExpiration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    ProgrammableTransaction(ProgrammableTransaction),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgrammableTransaction {
    pub inputs: Vec<CallArg>,
    pub commands: Vec<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallArg {
    /// BCS bytes of a pure value
    Pure(Vec<u8>),
    Object(ObjectArg),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectArg {
    ImmOrOwnedObject(ObjectRef),
    SharedObject {
        id: ObjectId,
        initial_shared_version: SequenceNumber,
        mutable: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    MoveCall(Box<ProgrammableMoveCall>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgrammableMoveCall {
    pub package: ObjectId,
    pub module: String,
    pub function: String,
    /// Always empty for `select_winners`; encoded as a zero-length vector.
    pub type_arguments: Vec<TypeTag>,
    pub arguments: Vec<Argument>,
}

/// Placeholder for Move type tags. No variant is ever constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeTag {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Argument {
    GasCoin,
    Input(u16),
    Result(u16),
    NestedResult(u16, u16),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasData {
    pub payment: Vec<ObjectRef>,
    pub owner: SuiAddress,
    pub price: u64,
    pub budget: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionExpiration {
    None,
    Epoch(u64),
}

impl TransactionData {
    pub fn sender(&self) -> SuiAddress {
        match self {
            TransactionData::V1(data) => data.sender,
        }
    }

    pub fn gas_data(&self) -> &GasData {
        match self {
            TransactionData::V1(data) => &data.gas_data,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, DrawError> {
        Ok(bcs::to_bytes(self)?)
    }

    pub fn to_base64(&self) -> Result<String, DrawError> {
        Ok(BASE64.encode(self.to_bytes()?))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DrawError> {
        Ok(bcs::from_bytes(bytes)?)
    }
}
