//! Relay connection and subscription.
//!
//! A subscription delivers stored events only: once the relay signals
//! end-of-stored-events the reader thread unsubscribes, closes the socket and
//! drops its channel sender, which ends the consumer's iteration.
//!
//! ```text
//!  relay ──ws──► reader thread ──mpsc──► sync loop
//!                 │ EOSE
//!                 ▼
//!            CLOSE + close socket, drop sender
//! ```

use super::{
    Event, Filter,
    message::{ClientMessage, RelayMessage},
};
use crate::log;
use std::{
    net::TcpStream,
    sync::mpsc::{self, Receiver, Sender},
    thread::{self, JoinHandle},
};
use thiserror::Error;
use tungstenite::{Message, WebSocket, error::ProtocolError, stream::MaybeTlsStream};

type Socket = WebSocket<MaybeTlsStream<TcpStream>>;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("websocket error")]
    WebSocket(#[from] tungstenite::Error),

    #[error("malformed relay message")]
    Json(#[from] serde_json::Error),

    #[error("relay protocol violation: {0}")]
    Protocol(String),

    #[error("relay closed the subscription: {0}")]
    Closed(String),

    #[error("relay disconnected before end of stored events")]
    Disconnected,

    #[error("relay reader thread panicked")]
    ReaderPanicked,
}

/// Source of stored events for one filter.
pub trait Relay {
    /// Open a subscription. The relay is consumed: one connection serves
    /// exactly one subscription.
    fn subscribe(self, filter: Filter) -> Result<Subscription, RelayError>;
}

/// Stream of events ending at end-of-stored-events.
pub struct Subscription {
    events: Receiver<Event>,
    reader: Option<JoinHandle<Result<(), RelayError>>>,
}

impl Subscription {
    pub fn new(events: Receiver<Event>, reader: Option<JoinHandle<Result<(), RelayError>>>) -> Self {
        Self { events, reader }
    }

    /// Events in delivery order. Blocks until the next event or the end of
    /// the stream.
    pub fn events(&self) -> impl Iterator<Item = Event> + '_ {
        self.events.iter()
    }

    /// Wait for the reader to shut down and report how it ended.
    pub fn finish(self) -> Result<(), RelayError> {
        drop(self.events);
        match self.reader {
            Some(handle) => handle.join().map_err(|_| RelayError::ReaderPanicked)?,
            None => Ok(()),
        }
    }
}

// ============================================================================
// WebSocket relay
// ============================================================================

/// A connected relay (`ws://` or `wss://`).
pub struct WsRelay {
    url: String,
    socket: Socket,
}

impl WsRelay {
    pub fn connect(url: &str) -> Result<Self, RelayError> {
        // Errors if a provider is already installed.
        rustls::crypto::ring::default_provider().install_default().ok();

        let (socket, _response) = tungstenite::connect(url)?;
        log!("relay"; "connected to {url}");
        Ok(Self {
            url: url.to_string(),
            socket,
        })
    }
}

impl Relay for WsRelay {
    fn subscribe(mut self, filter: Filter) -> Result<Subscription, RelayError> {
        let subscription = format!("feedsync-{}", std::process::id());
        let req = ClientMessage::Req {
            subscription: &subscription,
            filter: &filter,
        };
        self.socket.send(Message::text(req.to_json()))?;

        let (tx, rx) = mpsc::channel();
        let reader = thread::spawn(move || {
            let Self { url, mut socket } = self;
            read_stored_events(&mut socket, &subscription, &filter, tx)?;
            unsubscribe_and_close(&mut socket, &subscription)?;
            log!("relay"; "closed {url}");
            Ok(())
        });

        Ok(Subscription::new(rx, Some(reader)))
    }
}

/// Forward matching events until EOSE. Returns early without error when the
/// consumer hangs up.
fn read_stored_events(
    socket: &mut Socket,
    subscription: &str,
    filter: &Filter,
    tx: Sender<Event>,
) -> Result<(), RelayError> {
    loop {
        let text = match socket.read() {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => return Err(RelayError::Disconnected),
            Ok(_) => continue,
            Err(e) if is_closed(&e) => return Err(RelayError::Disconnected),
            Err(e) => return Err(e.into()),
        };

        match RelayMessage::parse(text.as_str()) {
            Ok(RelayMessage::Event {
                subscription: sub,
                event,
            }) if sub == subscription => {
                if !event.has_valid_id() {
                    log!("relay"; "dropped event with invalid id: {}", event.id);
                } else if !filter.matches(&event) {
                    log!("relay"; "dropped event outside filter: {}", event.id);
                } else if tx.send(*event).is_err() {
                    return Ok(());
                }
            }
            Ok(RelayMessage::Eose { subscription: sub }) if sub == subscription => {
                log!("relay"; "end of stored events");
                return Ok(());
            }
            Ok(RelayMessage::Closed {
                subscription: sub,
                message,
            }) if sub == subscription => return Err(RelayError::Closed(message)),
            Ok(RelayMessage::Notice { message }) => log!("relay"; "notice: {message}"),
            Ok(_) => {}
            Err(e) => log!("relay"; "ignored message: {e}"),
        }
    }
}

fn unsubscribe_and_close(socket: &mut Socket, subscription: &str) -> Result<(), RelayError> {
    let close = ClientMessage::Close { subscription };
    match socket.send(Message::text(close.to_json())) {
        Err(e) if is_closed(&e) => return Ok(()),
        result => result?,
    }
    socket.close(None)?;

    // Drive the closing handshake to completion.
    loop {
        match socket.read() {
            Ok(_) => continue,
            Err(e) if is_closed(&e) => return Ok(()),
            Err(e) => return Err(e.into()),
        }
    }
}

fn is_closed(err: &tungstenite::Error) -> bool {
    matches!(
        err,
        tungstenite::Error::ConnectionClosed
            | tungstenite::Error::AlreadyClosed
            | tungstenite::Error::Protocol(ProtocolError::ResetWithoutClosingHandshake)
    )
}

// ============================================================================
// In-memory relay
// ============================================================================

/// Relay serving a fixed list of stored events.
#[cfg(test)]
pub(crate) struct MemoryRelay {
    pub events: Vec<Event>,
}

#[cfg(test)]
impl Relay for MemoryRelay {
    fn subscribe(self, filter: Filter) -> Result<Subscription, RelayError> {
        let (tx, rx) = mpsc::channel();
        for event in self.events.into_iter().filter(|e| filter.matches(e)) {
            tx.send(event).map_err(|_| RelayError::Disconnected)?;
        }
        Ok(Subscription::new(rx, None))
    }
}
