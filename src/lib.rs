//! SuiRandom - pick random winners from a list of Sui addresses and SuiNS
//! names using the chain's on-chain randomness
//!
//! # Architecture
//!
//! ## Input Processing
//! - [`address`] - Sui addresses and SuiNS name validation
//! - [`input`] - Splitting free text into entries, duplicate detection
//! - [`resolver`] - Concurrent SuiNS name resolution
//! - [`processing`] - The full normalize/resolve/deduplicate pipeline
//!
//! ## Chain Interaction
//! - [`rpc`] - JSON-RPC client for a Sui full node
//! - [`transaction`] - BCS transaction types and the `select_winners` call
//! - [`draw`] - Dry runs and signed on-chain draws
//! - [`crypto`] - Ed25519 keys and transaction signatures
//! - [`keystore`] - Sui CLI keystore files
//!
//! ## Output
//! - [`winners`] - Winner extraction and the shareable summary
//! - [`render`] - Terminal rendering
//!
//! ## Integration
//! - [`api`] - HTTP API (feature `api`)
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types

#![forbid(unsafe_code)]

// ============================================================================
// Input Processing
// ============================================================================
pub mod address;
pub mod input;
pub mod processing;
pub mod resolver;

// ============================================================================
// Chain Interaction
// ============================================================================
pub mod crypto;
pub mod draw;
pub mod keystore;
pub mod rpc;
pub mod transaction;

// ============================================================================
// Output
// ============================================================================
pub mod render;
pub mod winners;

// ============================================================================
// Integration
// ============================================================================
#[cfg(feature = "api")]
pub mod api;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod config;
pub mod error;
