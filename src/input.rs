//! Free-text input handling: splitting, classification and duplicate detection

use crate::address::{SuiAddress, SuiNsName};
use std::collections::HashMap;

/// A single entry of the submitted list after classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Address(SuiAddress),
    Name(SuiNsName),
    Invalid(String),
}

impl Entry {
    /// Canonical spelling used for duplicate detection.
    pub fn canonical(&self) -> String {
        match self {
            Entry::Address(addr) => addr.to_string(),
            Entry::Name(name) => name.to_string(),
            Entry::Invalid(raw) => raw.clone(),
        }
    }
}

/// Split on newlines and commas, trim, drop empties.
pub fn split_entries(text: &str) -> Vec<String> {
    text.split(['\n', ','])
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn classify(entry: &str) -> Entry {
    if let Ok(addr) = entry.parse::<SuiAddress>() {
        Entry::Address(addr)
    } else if let Ok(name) = entry.parse::<SuiNsName>() {
        Entry::Name(name)
    } else {
        Entry::Invalid(entry.to_string())
    }
}

/// Entries appearing more than once, each reported once in first-seen order
/// using the spelling of its first occurrence.
pub fn find_duplicates(entries: &[String]) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut order: Vec<(String, &String)> = Vec::new();

    for entry in entries {
        let key = classify(entry).canonical();
        let count = counts.entry(key.clone()).or_insert(0);
        if *count == 0 {
            order.push((key, entry));
        }
        *count += 1;
    }

    order
        .into_iter()
        .filter(|(key, _)| counts.get(key).copied().unwrap_or(0) > 1)
        .map(|(_, first)| first.clone())
        .collect()
}
