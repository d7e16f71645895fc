/// Per-connection session state.
///
/// A session exists from the moment a connection is accepted, long before
/// registration completes. Channels refer to sessions only by [`ClientId`];
/// the server owns the sessions themselves, so a destroyed session can never
/// be reached through a stale reference.
use std::fmt;
use std::net::SocketAddr;

use tokio::sync::mpsc;

use super::message::Message;

/// Opaque per-connection identifier. Allocated from a counter at accept
/// time and never reused, unlike a raw socket fd.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientId(pub u64);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// State for one connected client.
#[derive(Debug)]
pub struct Session {
    pub id: ClientId,
    pub addr: SocketAddr,
    /// Whether a correct PASS has been presented.
    pub has_password: bool,
    /// Display-form nickname; `None` until NICK succeeds.
    pub nick: Option<String>,
    pub username: Option<String>,
    pub realname: Option<String>,
    /// Outbound queue handle; the connection task drains this into the
    /// socket in FIFO order.
    tx: mpsc::UnboundedSender<Message>,
}

impl Session {
    pub fn new(id: ClientId, addr: SocketAddr, tx: mpsc::UnboundedSender<Message>) -> Self {
        Self {
            id,
            addr,
            has_password: false,
            nick: None,
            username: None,
            realname: None,
            tx,
        }
    }

    /// Registration is a computed predicate, never a stored flag: it cannot
    /// drift out of sync with its inputs.
    pub fn is_registered(&self) -> bool {
        self.has_password && self.nick.is_some() && self.username.is_some()
    }

    /// The nickname as shown in reply targets, `*` before one is known.
    pub fn display_nick(&self) -> &str {
        self.nick.as_deref().unwrap_or("*")
    }

    /// `nick!user@localhost` prefix for lines originated by this client.
    pub fn hostmask(&self) -> String {
        format!(
            "{}!{}@localhost",
            self.display_nick(),
            self.username.as_deref().unwrap_or("*"),
        )
    }

    /// Queue a line for delivery. A send to a disconnecting peer is
    /// harmless; its task is already tearing the session down.
    pub fn send(&self, msg: Message) {
        let _ = self.tx.send(msg);
    }
}
