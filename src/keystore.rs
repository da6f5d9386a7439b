//! Local keystore in the Sui CLI file format
//!
//! The file is a JSON array of base64 strings, each one the scheme flag
//! followed by the 32-byte secret key. Only ed25519 keys are supported;
//! keys with other flags are kept on disk untouched but cannot sign.

use crate::address::SuiAddress;
use crate::crypto::{KeyPair, ED25519_FLAG, SECRET_KEY_SIZE};
use crate::error::DrawError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
pub struct Keystore {
    /// Raw entries as stored, preserved on save
    entries: Vec<String>,
    keys: Vec<KeyPair>,
}

impl Keystore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the keystore, returning an empty one if the file is missing.
    pub fn load(path: &Path) -> Result<Self, DrawError> {
        if !path.exists() {
            return Ok(Keystore::new());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| DrawError::KeystoreError(format!("Failed to read keystore: {}", e)))?;
        let entries: Vec<String> = serde_json::from_str(&contents)
            .map_err(|e| DrawError::KeystoreError(format!("Failed to parse keystore: {}", e)))?;

        let mut keys = Vec::new();
        for entry in &entries {
            match decode_entry(entry)? {
                Some(keypair) => keys.push(keypair),
                None => tracing::debug!("skipping non-ed25519 keystore entry"),
            }
        }

        Ok(Keystore { entries, keys })
    }

    /// Write the keystore through a temporary file and rename.
    pub fn save(&self, path: &Path) -> Result<(), DrawError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&self.entries)?;
        let temp_path = path.with_extension("tmp");
        let mut file = File::create(&temp_path).map_err(|e| {
            DrawError::KeystoreError(format!("Failed to create temp file: {}", e))
        })?;
        file.write_all(json.as_bytes())
            .map_err(|e| DrawError::KeystoreError(format!("Failed to write keystore: {}", e)))?;
        file.sync_all()
            .map_err(|e| DrawError::KeystoreError(format!("Failed to sync file: {}", e)))?;
        drop(file);

        fs::rename(&temp_path, path)
            .map_err(|e| DrawError::KeystoreError(format!("Failed to finalize write: {}", e)))?;
        Ok(())
    }

    pub fn add(&mut self, keypair: KeyPair) -> SuiAddress {
        let address = keypair.address();
        if self.find(&address).is_none() {
            self.entries.push(encode_entry(&keypair));
            self.keys.push(keypair);
        }
        address
    }

    pub fn find(&self, address: &SuiAddress) -> Option<&KeyPair> {
        self.keys.iter().find(|k| &k.address() == address)
    }

    pub fn addresses(&self) -> Vec<SuiAddress> {
        self.keys.iter().map(KeyPair::address).collect()
    }

    /// The key for `address`, or the first key when no address is given.
    pub fn select(&self, address: Option<&SuiAddress>) -> Result<&KeyPair, DrawError> {
        match address {
            Some(addr) => self.find(addr).ok_or_else(|| {
                DrawError::KeystoreError(format!("No key for address {} in keystore", addr))
            }),
            None => self.keys.first().ok_or_else(|| {
                DrawError::KeystoreError(
                    "Keystore is empty. Run `suirandom keygen` first.".to_string(),
                )
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

fn encode_entry(keypair: &KeyPair) -> String {
    let mut raw = Vec::with_capacity(1 + SECRET_KEY_SIZE);
    raw.push(ED25519_FLAG);
    raw.extend_from_slice(&keypair.secret_bytes());
    BASE64.encode(raw)
}

fn decode_entry(entry: &str) -> Result<Option<KeyPair>, DrawError> {
    let raw = BASE64
        .decode(entry.trim())
        .map_err(|e| DrawError::KeystoreError(format!("Invalid keystore entry: {}", e)))?;
    match raw.split_first() {
        Some((&ED25519_FLAG, secret)) => KeyPair::from_secret_bytes(secret).map(Some),
        Some(_) => Ok(None),
        None => Err(DrawError::KeystoreError(
            "Empty keystore entry".to_string(),
        )),
    }
}

/// `~/.sui/sui_config/sui.keystore`
pub fn default_keystore_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".sui")
        .join("sui_config")
        .join("sui.keystore")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_entry_encoding() {
        let keypair = KeyPair::generate();
        let entry = encode_entry(&keypair);
        let raw = BASE64.decode(&entry).unwrap();
        assert_eq!(raw.len(), 33);
        assert_eq!(raw[0], ED25519_FLAG);

        let decoded = decode_entry(&entry).unwrap().unwrap();
        assert_eq!(decoded.address(), keypair.address());
    }

    #[test]
    fn test_other_schemes_are_skipped() {
        let mut raw = vec![0x01];
        raw.extend_from_slice(&[3u8; 32]);
        assert!(decode_entry(&BASE64.encode(raw)).unwrap().is_none());
        assert!(decode_entry("not base64!").is_err());
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut store = Keystore::new();
        let keypair = KeyPair::generate();
        let a = store.add(keypair.clone());
        let b = store.add(keypair);
        assert_eq!(a, b);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_select() {
        let mut store = Keystore::new();
        assert!(store.select(None).is_err());

        let first = store.add(KeyPair::generate());
        let second = store.add(KeyPair::generate());
        assert_eq!(store.select(None).unwrap().address(), first);
        assert_eq!(store.select(Some(&second)).unwrap().address(), second);
        assert!(store.select(Some(&SuiAddress::ZERO)).is_err());
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = Keystore::load(&dir.path().join("sui.keystore")).unwrap();
        assert!(store.is_empty());
    }
}
