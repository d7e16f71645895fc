/// Server core — shared state, the listener, and per-connection tasks.
///
/// All protocol state lives in [`ServerState`] behind one `RwLock`. Every
/// command runs to completion with the write lock held, so the effect of a
/// command is fully observable before the next command from any client is
/// processed. Channels store ids, sessions store outbound queue handles,
/// and only this module moves bytes between them.
use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures::SinkExt;
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tokio::sync::{mpsc, RwLock};
use tokio_stream::StreamExt;
use tokio_util::codec::Framed;
use tracing::{info, warn};

use super::channel::Channel;
use super::codec::{CodecError, IrcCodec};
use super::commands::{self, Flow};
use super::message::Message;
use super::session::{ClientId, Session};

/// ASCII case folding, as advertised by `CASEMAPPING=ascii`. Applied to
/// nickname and channel-name keys; display forms keep their typed case.
pub fn irc_lower(name: &str) -> String {
    name.to_ascii_lowercase()
}

/// Shared server state.
#[derive(Debug)]
pub struct ServerState {
    /// The connection password every client must present with PASS.
    pub password: String,
    /// Every accepted connection, registered or not.
    pub sessions: HashMap<ClientId, Session>,
    /// Folded nickname → session. A nickname is held from the moment NICK
    /// succeeds, even before registration completes.
    pub nicks: HashMap<String, ClientId>,
    /// Folded channel name → channel.
    pub channels: HashMap<String, Channel>,
    /// Sessions that have already received the welcome burst.
    pub welcomed: HashSet<ClientId>,
    next_id: u64,
}

impl ServerState {
    pub fn new(password: String) -> Self {
        Self {
            password,
            sessions: HashMap::new(),
            nicks: HashMap::new(),
            channels: HashMap::new(),
            welcomed: HashSet::new(),
            next_id: 0,
        }
    }

    /// Create a session for a freshly accepted connection.
    pub fn admit(&mut self, addr: SocketAddr, tx: mpsc::UnboundedSender<Message>) -> ClientId {
        self.next_id += 1;
        let id = ClientId(self.next_id);
        self.sessions.insert(id, Session::new(id, addr, tx));
        id
    }

    pub fn session(&self, id: ClientId) -> Option<&Session> {
        self.sessions.get(&id)
    }

    pub fn session_mut(&mut self, id: ClientId) -> Option<&mut Session> {
        self.sessions.get_mut(&id)
    }

    /// Case-folded nickname lookup.
    pub fn lookup_nick(&self, nick: &str) -> Option<ClientId> {
        self.nicks.get(&irc_lower(nick)).copied()
    }

    /// Queue a line for one client.
    pub fn send_to(&self, id: ClientId, msg: Message) {
        if let Some(session) = self.sessions.get(&id) {
            session.send(msg);
        }
    }

    /// Append a line to the outbound queue of every member of a channel,
    /// except `exclude`. Queues are drained FIFO, so every recipient
    /// observes channel traffic in the order it was issued here.
    pub fn broadcast_to_channel(&self, name: &str, msg: &Message, exclude: Option<ClientId>) {
        let Some(channel) = self.channels.get(name) else {
            return;
        };
        for member in channel.members() {
            if Some(member) != exclude {
                self.send_to(member, msg.clone());
            }
        }
    }

    /// Folded names of every channel the client belongs to. Membership has
    /// a single source of truth (the channels), so this is a filter, not a
    /// second bookkeeping list.
    pub fn channels_of(&self, id: ClientId) -> Vec<String> {
        self.channels
            .values()
            .filter(|ch| ch.is_member(id))
            .map(|ch| ch.name.clone())
            .collect()
    }

    /// Space-separated member nicknames, operators prefixed with `@`,
    /// sorted for stable output.
    pub fn name_list(&self, channel: &Channel) -> String {
        let mut names: Vec<String> = channel
            .members()
            .filter_map(|id| self.sessions.get(&id))
            .map(|s| {
                let op = if channel.is_operator(s.id) { "@" } else { "" };
                format!("{op}{}", s.display_nick())
            })
            .collect();
        names.sort_by(|a, b| a.trim_start_matches('@').cmp(b.trim_start_matches('@')));
        names.join(" ")
    }

    /// Tear a session down: drop it from every channel (deleting channels
    /// left empty), release its nickname, and forget its welcome flag.
    pub fn destroy_session(&mut self, id: ClientId) {
        let Some(session) = self.sessions.remove(&id) else {
            return;
        };
        if let Some(nick) = session.nick {
            self.nicks.remove(&irc_lower(&nick));
        }
        self.welcomed.remove(&id);
        self.channels.retain(|_, channel| {
            channel.remove_member(id);
            !channel.is_empty()
        });
    }
}

/// Shared, thread-safe server state.
pub type SharedState = Arc<RwLock<ServerState>>;

/// A bound listener plus the state it serves. Binding is separate from
/// running so a caller can bind port 0 and learn the chosen address.
pub struct IrcServer {
    listener: TcpListener,
    state: SharedState,
}

impl IrcServer {
    pub async fn bind(addr: impl ToSocketAddrs, password: String) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            state: Arc::new(RwLock::new(ServerState::new(password))),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections forever, one task per client.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        loop {
            let (socket, addr) = self.listener.accept().await?;
            info!(%addr, "new connection");
            let state = Arc::clone(&self.state);
            tokio::spawn(async move {
                if let Err(e) = handle_client(socket, addr, state).await {
                    warn!(%addr, "client error: {e}");
                }
                info!(%addr, "disconnected");
            });
        }
    }
}

/// Handle a single client connection: frame inbound bytes, dispatch each
/// message under the state lock, and drain the outbound queue.
async fn handle_client(
    socket: TcpStream,
    addr: SocketAddr,
    state: SharedState,
) -> Result<(), CodecError> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();
    let id = state.write().await.admit(addr, tx);
    let mut framed = Framed::new(socket, IrcCodec::default());

    let result = async {
        loop {
            tokio::select! {
                // Inbound message from the client's TCP stream.
                frame = framed.next() => {
                    match frame {
                        Some(Ok(msg)) => {
                            let flow = commands::dispatch(&mut *state.write().await, id, &msg);
                            if matches!(flow, Flow::Quit) {
                                // Linger zero elicits an RST on close; a
                                // quitting peer gets no farewell bytes.
                                let _ = framed.get_ref().set_linger(Some(Duration::ZERO));
                                break;
                            }
                        }
                        Some(Err(e)) => return Err(e),
                        None => break, // Connection closed.
                    }
                }

                // Outgoing line queued by a handler (possibly on behalf of
                // another client's broadcast).
                Some(msg) = rx.recv() => {
                    framed.send(msg).await?;
                }
            }
        }
        Ok(())
    }
    .await;

    state.write().await.destroy_session(id);
    result
}
