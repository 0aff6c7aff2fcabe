//! Nostr protocol pieces: events, author keys and the relay client.

pub mod event;
pub mod message;
pub mod pubkey;
pub mod relay;

pub use event::{Event, Filter, KIND_LONG_FORM};
pub use pubkey::{PubkeyError, validate_pubkeys};
pub use relay::{Relay, RelayError, Subscription, WsRelay};
