//! Integration tests for the address list pipeline

use async_trait::async_trait;
use std::str::FromStr;
use suirandom::address::{SuiAddress, SuiNsName};
use suirandom::error::{DrawError, Result};
use suirandom::processing::{process_addresses, Warning};
use suirandom::resolver::{NameResolver, StaticResolver};
use suirandom::transaction::validate_selection;

const ADDR_A: &str = "0x1111111111111111111111111111111111111111111111111111111111111111";
const ADDR_B: &str = "0x2222222222222222222222222222222222222222222222222222222222222222";
const ADDR_C: &str = "0x3333333333333333333333333333333333333333333333333333333333333333";

fn addr(s: &str) -> SuiAddress {
    SuiAddress::from_str(s).unwrap()
}

fn resolver() -> StaticResolver {
    StaticResolver::new()
        .with(SuiNsName::from_str("alice.sui").unwrap(), addr(ADDR_B))
        .with(SuiNsName::from_str("ally.sui").unwrap(), addr(ADDR_B))
        .with(SuiNsName::from_str("carol@team").unwrap(), addr(ADDR_C))
}

/// Fails for every name; the pipeline must carry on without them.
struct DownResolver;

#[async_trait]
impl NameResolver for DownResolver {
    async fn resolve(&self, _name: &SuiNsName) -> Result<Option<SuiAddress>> {
        Err(DrawError::RpcError("connection refused".to_string()))
    }
}

#[tokio::test]
async fn test_mixed_list() {
    let input = format!("{}\n  alice.sui ,carol@team\n\n{}", ADDR_A, ADDR_C);
    let report = process_addresses(&input, &resolver(), 8).await;

    assert_eq!(report.total_entries, 4);
    assert_eq!(report.names.len(), 2);
    assert_eq!(report.resolved.len(), 2);
    // Direct addresses first, resolved ones after, without repeats.
    assert_eq!(
        report.valid_addresses,
        vec![addr(ADDR_A), addr(ADDR_C), addr(ADDR_B)]
    );
    assert_eq!(
        report.name_for(&addr(ADDR_C)).map(|n| n.as_str()),
        Some("carol@team")
    );
    assert_eq!(
        report.warnings,
        vec![Warning::NameCollisions(vec!["carol@team".to_string()])]
    );
    assert!(report.can_draw(2));
}

#[tokio::test]
async fn test_duplicates_ignore_case_and_prefix() {
    let upper = ADDR_A.trim_start_matches("0x").to_uppercase();
    let input = format!("{}\n{}\nAlice.sui\nalice.sui\n{}", ADDR_A, upper, ADDR_C);
    let report = process_addresses(&input, &resolver(), 8).await;

    assert_eq!(report.total_entries, 5);
    assert_eq!(
        report.valid_addresses,
        vec![addr(ADDR_A), addr(ADDR_C), addr(ADDR_B)]
    );
    match &report.warnings[0] {
        Warning::DuplicateEntries(list) => {
            assert_eq!(list, &vec![ADDR_A.to_string(), "Alice.sui".to_string()]);
        }
        other => panic!("expected duplicate warning first, got {:?}", other),
    }
}

#[tokio::test]
async fn test_names_sharing_an_address() {
    let input = format!("alice.sui\nally.sui\n{}", ADDR_A);
    let report = process_addresses(&input, &resolver(), 8).await;

    assert_eq!(report.valid_addresses, vec![addr(ADDR_A), addr(ADDR_B)]);
    assert!(report.warnings.contains(&Warning::NameCollisions(vec![
        "alice.sui".to_string(),
        "ally.sui".to_string()
    ])));
    assert_eq!(
        report.warnings[0].to_string(),
        "Some SuiNS names resolve to the same address: alice.sui, ally.sui. Only unique addresses will be used."
    );
}

#[tokio::test]
async fn test_invalid_entries_are_reported() {
    let input = "0x123\nnot valid\n-bad.sui\nfoo..sui";
    let report = process_addresses(input, &resolver(), 8).await;

    assert_eq!(report.total_entries, 4);
    assert!(report.valid_addresses.is_empty());
    assert_eq!(report.invalid.len(), 4);
    assert!(!report.can_draw(2));
    assert!(matches!(
        validate_selection(1, report.valid_addresses.len()),
        Err(DrawError::NotEnoughAddresses { found: 0, .. })
    ));
}

#[tokio::test]
async fn test_resolver_outage_is_not_fatal() {
    let input = format!("{}\n{}\nalice.sui", ADDR_A, ADDR_B);
    let report = process_addresses(&input, &DownResolver, 8).await;

    assert_eq!(report.valid_addresses, vec![addr(ADDR_A), addr(ADDR_B)]);
    assert!(report.resolved.is_empty());
    assert_eq!(report.unresolved.len(), 1);
    assert!(report
        .warnings
        .contains(&Warning::UnresolvedNames(vec!["alice.sui".to_string()])));
    assert!(validate_selection(2, report.valid_addresses.len()).is_ok());
}

#[tokio::test]
async fn test_large_list_keeps_order() {
    let addresses: Vec<String> = (1..=150u32)
        .map(|i| format!("0x{:064x}", i))
        .collect();
    let report = process_addresses(&addresses.join(","), &resolver(), 8).await;

    assert_eq!(report.valid_addresses.len(), 150);
    assert_eq!(report.valid_addresses[0].to_string(), addresses[0]);
    assert_eq!(report.valid_addresses[149].to_string(), addresses[149]);
    assert!(validate_selection(100, 150).is_ok());
    assert!(validate_selection(101, 150).is_err());
}
