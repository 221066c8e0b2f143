use super::SymbolSignal;
use serde::{Deserialize, Serialize};

/// Incoming WebSocket message from a viewer. The dashboard protocol is
/// push-only, so the only meaningful client frame is an application ping.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Ping,
}

/// Outgoing WebSocket message to a viewer.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// The ordered symbol universe, sent once on connect.
    Symbols { data: Vec<String> },
    /// A full ordered result snapshot, sent on connect and after every batch.
    Update { results: Vec<SymbolSignal> },
    Pong,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Signal;

    #[test]
    fn test_symbols_message_shape() {
        let msg = ServerMessage::Symbols {
            data: vec!["BTC_USDT".to_string(), "ETH_USDT".to_string()],
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"symbols\""));
        assert!(json.contains("BTC_USDT"));
    }

    #[test]
    fn test_update_message_shape() {
        let msg = ServerMessage::Update {
            results: vec![SymbolSignal {
                symbol: "BTC_USDT".to_string(),
                signal: Signal::long(90.0),
            }],
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"update\""));
        assert!(json.contains("\"verdict\":\"long\""));
    }

    #[test]
    fn test_client_ping_parses() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type":"ping"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Ping));
    }
}
