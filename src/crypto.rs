//! Cryptographic primitives for SuiRandom

use crate::address::{Blake2b256, SuiAddress};
use crate::error::DrawError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use blake2::Digest;
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;

/// Signature scheme flag for ed25519 keys.
pub const ED25519_FLAG: u8 = 0x00;
pub const SECRET_KEY_SIZE: usize = 32;
pub const PUBLIC_KEY_SIZE: usize = 32;
pub const SIGNATURE_SIZE: usize = 64;

/// Intent prefix for transaction data: scope, version, app id.
const TRANSACTION_INTENT: [u8; 3] = [0, 0, 0];

#[derive(Debug, Clone)]
pub struct KeyPair {
    pub signing_key: SigningKey,
    pub verifying_key: VerifyingKey,
}

impl KeyPair {
    /// Generates a new random KeyPair using the OS random number generator.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        Self::from_signing_key(signing_key)
    }

    pub fn from_signing_key(signing_key: SigningKey) -> Self {
        let verifying_key = signing_key.verifying_key();
        KeyPair {
            signing_key,
            verifying_key,
        }
    }

    /// Creates a KeyPair from raw secret key bytes.
    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self, DrawError> {
        let secret: [u8; SECRET_KEY_SIZE] = bytes.try_into().map_err(|_| {
            DrawError::CryptoError(format!(
                "Secret key must be {} bytes, got {}",
                SECRET_KEY_SIZE,
                bytes.len()
            ))
        })?;
        Ok(Self::from_signing_key(SigningKey::from_bytes(&secret)))
    }

    pub fn secret_bytes(&self) -> [u8; SECRET_KEY_SIZE] {
        self.signing_key.to_bytes()
    }

    pub fn public_key_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        self.verifying_key.to_bytes()
    }

    /// The account address controlled by this key.
    pub fn address(&self) -> SuiAddress {
        SuiAddress::from_public_key(ED25519_FLAG, &self.public_key_bytes())
    }

    /// Sign BCS transaction bytes and return the serialized signature
    /// (`base64(flag || signature || public_key)`) expected by the node.
    pub fn sign_transaction(&self, tx_bytes: &[u8]) -> String {
        let digest = transaction_digest(tx_bytes);
        let signature = self.signing_key.sign(&digest);

        let mut serialized = Vec::with_capacity(1 + SIGNATURE_SIZE + PUBLIC_KEY_SIZE);
        serialized.push(ED25519_FLAG);
        serialized.extend_from_slice(&signature.to_bytes());
        serialized.extend_from_slice(&self.public_key_bytes());
        BASE64.encode(serialized)
    }
}

/// `blake2b256(intent || tx_bytes)`, the message actually signed.
pub fn transaction_digest(tx_bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(TRANSACTION_INTENT);
    hasher.update(tx_bytes);
    hasher.finalize().into()
}

/// Verify a serialized signature produced by [`KeyPair::sign_transaction`]
/// and return the signer's address.
pub fn verify_transaction_signature(
    tx_bytes: &[u8],
    serialized: &str,
) -> Result<SuiAddress, DrawError> {
    let raw = BASE64
        .decode(serialized)
        .map_err(|e| DrawError::CryptoError(format!("Invalid signature encoding: {}", e)))?;

    if raw.len() != 1 + SIGNATURE_SIZE + PUBLIC_KEY_SIZE {
        return Err(DrawError::CryptoError(format!(
            "Serialized signature must be exactly {} bytes, got {}",
            1 + SIGNATURE_SIZE + PUBLIC_KEY_SIZE,
            raw.len()
        )));
    }
    if raw[0] != ED25519_FLAG {
        return Err(DrawError::CryptoError(format!(
            "Unsupported signature scheme flag 0x{:02x}",
            raw[0]
        )));
    }

    let sig_bytes: [u8; SIGNATURE_SIZE] = raw[1..1 + SIGNATURE_SIZE]
        .try_into()
        .map_err(|_| DrawError::CryptoError("Malformed signature".to_string()))?;
    let pk_bytes: [u8; PUBLIC_KEY_SIZE] = raw[1 + SIGNATURE_SIZE..]
        .try_into()
        .map_err(|_| DrawError::CryptoError("Malformed public key".to_string()))?;

    let verifying_key = VerifyingKey::from_bytes(&pk_bytes)
        .map_err(|e| DrawError::CryptoError(format!("Invalid public key: {}", e)))?;
    let signature = Signature::from_bytes(&sig_bytes);

    verifying_key
        .verify(&transaction_digest(tx_bytes), &signature)
        .map_err(|_| DrawError::CryptoError("Signature verification failed".to_string()))?;

    Ok(SuiAddress::from_public_key(ED25519_FLAG, &pk_bytes))
}
