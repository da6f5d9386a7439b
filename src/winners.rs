//! Winner extraction and the shareable summary

use crate::address::{shorten_address, SuiAddress};
use crate::error::DrawError;
use crate::processing::AddressReport;
use crate::rpc::SuiEvent;
use chrono::{DateTime, Utc};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const TWEET_INTENT_URL: &str = "https://twitter.com/intent/tweet";

/// Characters left as-is by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Winner {
    pub address: SuiAddress,
    pub timestamp: DateTime<Utc>,
    /// SuiNS name the address was entered as, if any
    pub name: Option<String>,
}

impl Winner {
    /// Name when known, shortened address otherwise.
    pub fn display_label(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| shorten_address(&self.address))
    }
}

/// `parsedJson` of the event emitted by `select_winners`.
#[derive(Debug, Clone, Deserialize)]
pub struct WinnerEvent {
    pub winners: Vec<String>,
}

impl WinnerEvent {
    /// First event in `events` carrying a `winners` list.
    pub fn find(events: &[SuiEvent]) -> Option<WinnerEvent> {
        events.iter().find_map(|event| {
            tracing::debug!(event_type = %event.event_type, "inspecting event");
            serde_json::from_value(event.parsed_json.clone()).ok()
        })
    }
}

pub fn process_winners(
    event: &WinnerEvent,
    report: &AddressReport,
) -> Result<Vec<Winner>, DrawError> {
    let timestamp = Utc::now();
    event
        .winners
        .iter()
        .map(|raw| -> Result<Winner, DrawError> {
            let address = SuiAddress::from_str(raw)?;
            Ok(Winner {
                address,
                timestamp,
                name: report.name_for(&address).map(|n| n.to_string()),
            })
        })
        .collect()
}

pub fn share_text(winners: &[Winner]) -> String {
    let lines: Vec<String> = winners
        .iter()
        .map(|w| format!("👑 {}", w.display_label()))
        .collect();
    format!(
        "🎉 Random Winner Selected!\n\n{}\n\n⚡️ Powered by @SuiNetwork\n#Sui #SuiNetwork",
        lines.join("\n")
    )
}

pub fn share_url(winners: &[Winner]) -> String {
    format!(
        "{}?text={}",
        TWEET_INTENT_URL,
        utf8_percent_encode(&share_text(winners), URI_COMPONENT)
    )
}

pub fn explorer_url(explorer_base: &str, digest: &str) -> String {
    format!("{}/{}", explorer_base.trim_end_matches('/'), digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::SuiNsName;
    use crate::processing::ResolvedName;
    use serde_json::json;

    const ADDR_A: &str = "0x75826853aa5e656121619e8510893665a40e2bbf14e2e502746fbd3c83bc5130";
    const ADDR_B: &str = "0xde6dde8c563f08a62410e1702a3138ecbded82dc6e61dc24ba8490fff970ea09";

    fn report_with_alice() -> AddressReport {
        AddressReport {
            resolved: vec![ResolvedName {
                name: "alice.sui".parse::<SuiNsName>().unwrap(),
                address: ADDR_B.parse().unwrap(),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_find_winner_event() {
        let events = vec![
            SuiEvent {
                event_type: "0x2::coin::Other".to_string(),
                parsed_json: json!({ "amount": "1" }),
            },
            SuiEvent {
                event_type: "0xde::sui_random::WinnersSelected".to_string(),
                parsed_json: json!({ "winners": [ADDR_A] }),
            },
        ];
        let event = WinnerEvent::find(&events).unwrap();
        assert_eq!(event.winners, vec![ADDR_A.to_string()]);
        assert!(WinnerEvent::find(&[]).is_none());
    }

    #[test]
    fn test_process_winners_attaches_names() {
        let event = WinnerEvent {
            winners: vec![ADDR_B.to_string(), ADDR_A.to_string()],
        };
        let winners = process_winners(&event, &report_with_alice()).unwrap();
        assert_eq!(winners.len(), 2);
        assert_eq!(winners[0].name.as_deref(), Some("alice.sui"));
        assert_eq!(winners[1].name, None);
        assert_eq!(winners[1].display_label(), "0x7582...5130");
    }

    #[test]
    fn test_process_winners_rejects_garbage() {
        let event = WinnerEvent {
            winners: vec!["0xnope".to_string()],
        };
        assert!(process_winners(&event, &AddressReport::default()).is_err());
    }

    #[test]
    fn test_share_text() {
        let event = WinnerEvent {
            winners: vec![ADDR_B.to_string(), ADDR_A.to_string()],
        };
        let winners = process_winners(&event, &report_with_alice()).unwrap();
        assert_eq!(
            share_text(&winners),
            "🎉 Random Winner Selected!\n\n👑 alice.sui\n👑 0x7582...5130\n\n⚡️ Powered by @SuiNetwork\n#Sui #SuiNetwork"
        );

        let url = share_url(&winners);
        assert!(url.starts_with("https://twitter.com/intent/tweet?text="));
        assert!(url.contains("alice.sui"));
        assert!(!url.contains('\n'));
        assert!(!url.contains('+'));
    }

    #[test]
    fn test_share_url_matches_uri_component_encoding() {
        let winners = vec![Winner {
            address: ADDR_A.parse().unwrap(),
            timestamp: Utc::now(),
            name: Some("bob.sui".to_string()),
        }];
        assert_eq!(
            share_url(&winners),
            "https://twitter.com/intent/tweet?text=\
             %F0%9F%8E%89%20Random%20Winner%20Selected!%0A%0A\
             %F0%9F%91%91%20bob.sui%0A%0A\
             %E2%9A%A1%EF%B8%8F%20Powered%20by%20%40SuiNetwork%0A%23Sui%20%23SuiNetwork"
        );
    }

    #[test]
    fn test_explorer_url() {
        assert_eq!(
            explorer_url("https://testnet.suivision.xyz/txblock/", "AbC"),
            "https://testnet.suivision.xyz/txblock/AbC"
        );
    }
}
