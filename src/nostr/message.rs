//! NIP-01 wire messages exchanged with a relay.

use super::{Event, Filter, relay::RelayError};
use serde_json::{Value, json};

/// Messages sent from client to relay.
#[derive(Debug, Clone, Copy)]
pub enum ClientMessage<'a> {
    Req { subscription: &'a str, filter: &'a Filter },
    Close { subscription: &'a str },
}

impl ClientMessage<'_> {
    pub fn to_json(&self) -> String {
        match self {
            Self::Req { subscription, filter } => json!(["REQ", subscription, filter]),
            Self::Close { subscription } => json!(["CLOSE", subscription]),
        }
        .to_string()
    }
}

/// Messages received from a relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayMessage {
    Event {
        subscription: String,
        event: Box<Event>,
    },
    /// End of stored events
    Eose { subscription: String },
    Notice { message: String },
    Closed { subscription: String, message: String },
    /// Anything this client has no use for (`OK`, `AUTH`, `COUNT`, ...)
    Other(String),
}

impl RelayMessage {
    pub fn parse(text: &str) -> Result<Self, RelayError> {
        let value: Value = serde_json::from_str(text)?;
        let Value::Array(mut items) = value else {
            return Err(RelayError::Protocol(format!("expected array: {text}")));
        };
        let label = match items.first() {
            Some(Value::String(label)) => label.clone(),
            _ => return Err(RelayError::Protocol(format!("missing label: {text}"))),
        };

        let message = match label.as_str() {
            "EVENT" => {
                if items.len() != 3 {
                    return Err(RelayError::Protocol(format!("malformed EVENT: {text}")));
                }
                let event = items.pop().unwrap_or_default();
                Self::Event {
                    subscription: string_at(&items, 1, text)?,
                    event: Box::new(serde_json::from_value(event)?),
                }
            }
            "EOSE" => Self::Eose {
                subscription: string_at(&items, 1, text)?,
            },
            "NOTICE" => Self::Notice {
                message: string_at(&items, 1, text)?,
            },
            "CLOSED" => Self::Closed {
                subscription: string_at(&items, 1, text)?,
                message: string_at(&items, 2, text).unwrap_or_default(),
            },
            _ => Self::Other(label),
        };
        Ok(message)
    }
}

fn string_at(items: &[Value], index: usize, text: &str) -> Result<String, RelayError> {
    items
        .get(index)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| RelayError::Protocol(format!("expected string at {index}: {text}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nostr::KIND_LONG_FORM;

    #[test]
    fn test_req_to_json() {
        let filter = Filter::new(vec!["ab".to_string()], KIND_LONG_FORM);
        let req = ClientMessage::Req {
            subscription: "sub",
            filter: &filter,
        };
        assert_eq!(
            req.to_json(),
            r#"["REQ","sub",{"authors":["ab"],"kinds":[30023]}]"#
        );
    }

    #[test]
    fn test_close_to_json() {
        let close = ClientMessage::Close { subscription: "sub" };
        assert_eq!(close.to_json(), r#"["CLOSE","sub"]"#);
    }

    #[test]
    fn test_parse_event() {
        let text = r#"["EVENT","sub",{"id":"1","pubkey":"2","created_at":3,"kind":30023,"tags":[["d","x"]],"content":"c","sig":"s"}]"#;
        let RelayMessage::Event {
            subscription,
            event,
        } = RelayMessage::parse(text).unwrap()
        else {
            panic!("expected EVENT");
        };
        assert_eq!(subscription, "sub");
        assert_eq!(event.created_at, 3);
        assert_eq!(event.tag_value("d"), Some("x"));
    }

    #[test]
    fn test_parse_eose_notice_closed() {
        assert_eq!(
            RelayMessage::parse(r#"["EOSE","sub"]"#).unwrap(),
            RelayMessage::Eose {
                subscription: "sub".to_string()
            }
        );
        assert_eq!(
            RelayMessage::parse(r#"["NOTICE","slow down"]"#).unwrap(),
            RelayMessage::Notice {
                message: "slow down".to_string()
            }
        );
        assert_eq!(
            RelayMessage::parse(r#"["CLOSED","sub","auth-required: nope"]"#).unwrap(),
            RelayMessage::Closed {
                subscription: "sub".to_string(),
                message: "auth-required: nope".to_string()
            }
        );
    }

    #[test]
    fn test_parse_other() {
        assert_eq!(
            RelayMessage::parse(r#"["OK","id",true,""]"#).unwrap(),
            RelayMessage::Other("OK".to_string())
        );
    }

    #[test]
    fn test_parse_malformed() {
        assert!(RelayMessage::parse("not json").is_err());
        assert!(RelayMessage::parse(r#"{"EOSE":"sub"}"#).is_err());
        assert!(RelayMessage::parse(r#"[1,"sub"]"#).is_err());
        assert!(RelayMessage::parse(r#"["EVENT","sub"]"#).is_err());
        assert!(RelayMessage::parse(r#"["EOSE"]"#).is_err());
    }
}
