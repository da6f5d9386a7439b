//! Address list processing: the normalize, classify, resolve and deduplicate
//! pipeline that turns free text into the unique address set sent on-chain.

use crate::address::{SuiAddress, SuiNsName};
use crate::input::{classify, find_duplicates, split_entries, Entry};
use crate::resolver::{resolve_names, NameResolver};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Non-fatal findings about the submitted list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "entries", rename_all = "snake_case")]
pub enum Warning {
    DuplicateEntries(Vec<String>),
    NameCollisions(Vec<String>),
    InvalidEntries(Vec<String>),
    UnresolvedNames(Vec<String>),
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Warning::DuplicateEntries(list) => write!(
                f,
                "Duplicate entries detected: {}. Each address or name should only be entered once.",
                list.join(", ")
            ),
            Warning::NameCollisions(list) => write!(
                f,
                "Some SuiNS names resolve to the same address: {}. Only unique addresses will be used.",
                list.join(", ")
            ),
            Warning::InvalidEntries(list) => write!(
                f,
                "Ignored entries that are neither a Sui address nor a SuiNS name: {}.",
                list.join(", ")
            ),
            Warning::UnresolvedNames(list) => write!(
                f,
                "Could not resolve SuiNS names: {}. They will not take part in the draw.",
                list.join(", ")
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolvedName {
    pub name: SuiNsName,
    pub address: SuiAddress,
}

/// Everything known about a submitted list after processing.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AddressReport {
    /// Non-empty entries in the input, duplicates included
    pub total_entries: usize,
    /// Unique addresses that take part in the draw
    pub valid_addresses: Vec<SuiAddress>,
    /// Entries recognised as SuiNS names
    pub names: Vec<SuiNsName>,
    pub resolved: Vec<ResolvedName>,
    pub unresolved: Vec<SuiNsName>,
    pub invalid: Vec<String>,
    pub warnings: Vec<Warning>,
}

impl AddressReport {
    /// First name that resolved to `address`, if any.
    pub fn name_for(&self, address: &SuiAddress) -> Option<&SuiNsName> {
        self.resolved
            .iter()
            .find(|r| &r.address == address)
            .map(|r| &r.name)
    }

    pub fn can_draw(&self, min_addresses: usize) -> bool {
        self.valid_addresses.len() >= min_addresses
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run the full pipeline over `text`.
pub async fn process_addresses(
    text: &str,
    resolver: &dyn NameResolver,
    concurrency: usize,
) -> AddressReport {
    let entries = split_entries(text);
    if entries.is_empty() {
        return AddressReport::default();
    }

    let mut warnings = Vec::new();
    let duplicates = find_duplicates(&entries);
    if !duplicates.is_empty() {
        warnings.push(Warning::DuplicateEntries(duplicates));
    }

    let mut direct: Vec<SuiAddress> = Vec::new();
    let mut names: Vec<SuiNsName> = Vec::new();
    let mut invalid: Vec<String> = Vec::new();
    for entry in &entries {
        match classify(entry) {
            Entry::Address(addr) => direct.push(addr),
            Entry::Name(name) => names.push(name),
            Entry::Invalid(raw) => invalid.push(raw),
        }
    }

    let mut lookup: Vec<SuiNsName> = Vec::new();
    for name in &names {
        if !lookup.contains(name) {
            lookup.push(name.clone());
        }
    }

    tracing::debug!(
        entries = entries.len(),
        addresses = direct.len(),
        names = lookup.len(),
        "processing address list"
    );

    let resolution = resolve_names(resolver, &lookup, concurrency).await;

    let collisions = find_collisions(&direct, &resolution.resolved);
    if !collisions.is_empty() {
        warnings.push(Warning::NameCollisions(collisions));
    }
    if !invalid.is_empty() {
        warnings.push(Warning::InvalidEntries(invalid.clone()));
    }
    if !resolution.unresolved.is_empty() {
        warnings.push(Warning::UnresolvedNames(
            resolution.unresolved.iter().map(|n| n.to_string()).collect(),
        ));
    }

    let valid_addresses = unique_addresses(
        direct
            .iter()
            .chain(resolution.resolved.iter().map(|(_, addr)| addr)),
    );

    AddressReport {
        total_entries: entries.len(),
        valid_addresses,
        names,
        resolved: resolution
            .resolved
            .into_iter()
            .map(|(name, address)| ResolvedName { name, address })
            .collect(),
        unresolved: resolution.unresolved,
        invalid,
        warnings,
    }
}

/// Names that share their resolved address with another name, then names
/// whose address was also entered directly. Each name appears once.
pub fn find_collisions(
    direct: &[SuiAddress],
    resolved: &[(SuiNsName, SuiAddress)],
) -> Vec<String> {
    let mut per_address: HashMap<&SuiAddress, usize> = HashMap::new();
    for (_, addr) in resolved {
        *per_address.entry(addr).or_insert(0) += 1;
    }
    let direct: HashSet<&SuiAddress> = direct.iter().collect();

    let mut colliding: Vec<String> = Vec::new();
    for (name, addr) in resolved {
        if per_address.get(addr).copied().unwrap_or(0) > 1 {
            colliding.push(name.to_string());
        }
    }
    for (name, addr) in resolved {
        let label = name.to_string();
        if direct.contains(addr) && !colliding.contains(&label) {
            colliding.push(label);
        }
    }
    colliding
}

fn unique_addresses<'a>(addresses: impl Iterator<Item = &'a SuiAddress>) -> Vec<SuiAddress> {
    let mut seen = HashSet::new();
    addresses.filter(|addr| seen.insert(**addr)).copied().collect()
}
