//! Sui addresses and SuiNS names
//!
//! An address is 32 bytes, written as `0x` + 64 hex characters. A SuiNS name
//! comes in two spellings: the dot form (`alice.sui`, `pay.alice.sui`) and
//! the at form (`@alice`, `pay@alice`).

use crate::error::DrawError;
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use serde::de::{self, Deserializer, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const SUI_ADDRESS_LENGTH: usize = 32;
pub const MAX_SUI_NS_NAME_LENGTH: usize = 235;
const MAX_LABEL_LENGTH: usize = 63;

pub type Blake2b256 = Blake2b<U32>;

/// 32-byte account address.
///
/// Serializes as the canonical hex string for human-readable formats (JSON)
/// and as 32 raw bytes for binary formats (BCS).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SuiAddress([u8; SUI_ADDRESS_LENGTH]);

impl SuiAddress {
    pub const ZERO: SuiAddress = SuiAddress([0u8; SUI_ADDRESS_LENGTH]);

    pub const fn new(bytes: [u8; SUI_ADDRESS_LENGTH]) -> Self {
        SuiAddress(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SUI_ADDRESS_LENGTH] {
        &self.0
    }

    /// Derive the address of a public key: `blake2b256(flag || public_key)`.
    pub fn from_public_key(scheme_flag: u8, public_key: &[u8]) -> Self {
        let mut hasher = Blake2b256::new();
        hasher.update([scheme_flag]);
        hasher.update(public_key);
        SuiAddress(hasher.finalize().into())
    }

    /// Parse a short object id such as `0x8` by left-padding it with zeros.
    /// Only used for well-known system objects in configuration.
    pub fn from_short_hex(s: &str) -> Result<Self, DrawError> {
        let hex_part = strip_hex_prefix(s);
        if hex_part.is_empty() || hex_part.len() > SUI_ADDRESS_LENGTH * 2 {
            return Err(DrawError::InvalidAddress(s.to_string()));
        }
        let padded = format!("{:0>64}", hex_part);
        Self::decode_hex(&padded).ok_or_else(|| DrawError::InvalidAddress(s.to_string()))
    }

    fn decode_hex(hex_part: &str) -> Option<Self> {
        let mut bytes = [0u8; SUI_ADDRESS_LENGTH];
        hex::decode_to_slice(hex_part, &mut bytes).ok()?;
        Some(SuiAddress(bytes))
    }
}

impl FromStr for SuiAddress {
    type Err = DrawError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex_part = strip_hex_prefix(s);
        if hex_part.len() != SUI_ADDRESS_LENGTH * 2 {
            return Err(DrawError::InvalidAddress(format!(
                "'{}' must be 64 hex characters, got {}",
                s,
                hex_part.len()
            )));
        }
        Self::decode_hex(hex_part)
            .ok_or_else(|| DrawError::InvalidAddress(format!("'{}' is not valid hex", s)))
    }
}

impl fmt::Display for SuiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for SuiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SuiAddress({})", self)
    }
}

impl Serialize for SuiAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.collect_str(self)
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for SuiAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            struct AddressVisitor;

            impl Visitor<'_> for AddressVisitor {
                type Value = SuiAddress;

                fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                    f.write_str("a 0x-prefixed 32-byte hex address")
                }

                fn visit_str<E: de::Error>(self, v: &str) -> Result<SuiAddress, E> {
                    SuiAddress::from_str(v).map_err(E::custom)
                }
            }

            deserializer.deserialize_str(AddressVisitor)
        } else {
            <[u8; SUI_ADDRESS_LENGTH]>::deserialize(deserializer).map(SuiAddress)
        }
    }
}

fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

pub fn is_valid_sui_address(s: &str) -> bool {
    SuiAddress::from_str(s).is_ok()
}

/// A validated SuiNS name, kept in lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SuiNsName(String);

impl SuiNsName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for SuiNsName {
    type Err = DrawError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if is_valid_suins_name(s) {
            Ok(SuiNsName(s.to_ascii_lowercase()))
        } else {
            Err(DrawError::InvalidName(s.to_string()))
        }
    }
}

impl fmt::Display for SuiNsName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn is_valid_suins_name(name: &str) -> bool {
    if name.len() > MAX_SUI_NS_NAME_LENGTH {
        return false;
    }

    match name.split_once('@') {
        Some((prefix, domain)) => {
            is_valid_label(domain)
                && (prefix.is_empty() || prefix.split('.').all(is_valid_label))
        }
        None => {
            let labels: Vec<&str> = name.split('.').collect();
            labels.len() >= 2
                && labels
                    .last()
                    .is_some_and(|tld| tld.eq_ignore_ascii_case("sui"))
                && labels.iter().all(|label| is_valid_label(label))
        }
    }
}

// 1-63 chars of [a-z0-9-], no leading, trailing or doubled hyphen
fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= MAX_LABEL_LENGTH
        && label
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-')
        && !label.starts_with('-')
        && !label.ends_with('-')
        && !label.contains("--")
}

/// `0x1234...cdef` style abbreviation for display.
pub fn shorten_address(address: &SuiAddress) -> String {
    let full = address.to_string();
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}
