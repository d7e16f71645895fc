/// Command dispatch and handlers.
///
/// Every handler is a synchronous function over `&mut ServerState`; the
/// connection task calls [`dispatch`] with the state write lock held, so a
/// command's full effect lands before any other client's next command.
/// Handlers never fail — each either completes or queues a numeric reply.
use std::collections::HashSet;

use tracing::debug;

use super::channel::{is_valid_channel_name, Channel, JoinCheck, MAX_CHANNELS_PER_CLIENT};
use super::message::Message;
use super::modes::{parse_mode_string, render_changes, ModeChange};
use super::replies::*;
use super::server::{irc_lower, ServerState};
use super::session::{ClientId, Session};

/// What the connection task should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Commands an unregistered session may issue.
const PRE_REGISTRATION: [&str; 5] = ["PASS", "NICK", "USER", "QUIT", "CAP"];

pub fn dispatch(st: &mut ServerState, id: ClientId, msg: &Message) -> Flow {
    let cmd = msg.command.to_ascii_uppercase();
    debug!(client = %id, %cmd, "dispatch");

    let registered = st.session(id).is_some_and(Session::is_registered);
    if !registered && !PRE_REGISTRATION.contains(&cmd.as_str()) {
        err(st, id, ERR_NOTREGISTERED, &[]);
        return Flow::Continue;
    }

    match cmd.as_str() {
        "PASS" => pass(st, id, msg),
        "NICK" => nick(st, id, msg),
        "USER" => user(st, id, msg),
        "CAP" => cap(st, id, msg),
        "QUIT" => return Flow::Quit,
        "PING" => ping(st, id, msg),
        "JOIN" => join(st, id, msg),
        "PART" => part(st, id, msg),
        "PRIVMSG" => privmsg(st, id, msg),
        "TOPIC" => topic(st, id, msg),
        "KICK" => kick(st, id, msg),
        "INVITE" => invite(st, id, msg),
        "MODE" => mode(st, id, msg),
        "LIST" => list(st, id),
        "NAMES" => names(st, id, msg),
        "WHOIS" => whois(st, id, msg),
        _ => err(st, id, ERR_UNKNOWNCOMMAND, &[&cmd]),
    }
    Flow::Continue
}

// ── Helpers ──────────────────────────────────────────────────────

fn nick_of(st: &ServerState, id: ClientId) -> String {
    st.session(id)
        .map(|s| s.display_nick().to_owned())
        .unwrap_or_else(|| "*".into())
}

fn hostmask_of(st: &ServerState, id: ClientId) -> String {
    st.session(id)
        .map(Session::hostmask)
        .unwrap_or_else(|| "*!*@localhost".into())
}

fn err(st: &ServerState, id: ClientId, code: &str, middles: &[&str]) {
    st.send_to(id, error(&nick_of(st, id), code, middles));
}

fn is_member(st: &ServerState, name: &str, id: ClientId) -> bool {
    st.channels.get(name).is_some_and(|ch| ch.is_member(id))
}

fn is_operator(st: &ServerState, name: &str, id: ClientId) -> bool {
    st.channels.get(name).is_some_and(|ch| ch.is_operator(id))
}

/// Drop a member from a channel, deleting the channel once empty.
fn remove_from_channel(st: &mut ServerState, name: &str, id: ClientId) {
    let emptied = match st.channels.get_mut(name) {
        Some(channel) => {
            channel.remove_member(id);
            channel.is_empty()
        }
        None => return,
    };
    if emptied {
        st.channels.remove(name);
        debug!(channel = name, "channel emptied, deleting");
    }
}

// ── Registration ─────────────────────────────────────────────────

fn pass(st: &mut ServerState, id: ClientId, msg: &Message) {
    let Some(supplied) = msg.params.first() else {
        err(st, id, ERR_NEEDMOREPARAMS, &["PASS"]);
        return;
    };
    if st.session(id).is_some_and(|s| s.has_password) {
        err(st, id, ERR_ALREADYREGISTRED, &[]);
        return;
    }
    if *supplied != st.password {
        err(st, id, ERR_PASSWDMISMATCH, &[]);
        return;
    }
    if let Some(session) = st.session_mut(id) {
        session.has_password = true;
    }
    maybe_welcome(st, id);
}

fn nick(st: &mut ServerState, id: ClientId, msg: &Message) {
    let Some(new_nick) = msg.params.first() else {
        err(st, id, ERR_NONICKNAMEGIVEN, &[]);
        return;
    };
    if new_nick.is_empty() || new_nick.contains(' ') {
        err(st, id, ERR_ERRONEUSNICKNAME, &[new_nick]);
        return;
    }
    let folded = irc_lower(new_nick);
    if st.nicks.get(&folded).is_some_and(|holder| *holder != id) {
        err(st, id, ERR_NICKNAMEINUSE, &[new_nick]);
        return;
    }

    let old = st.session(id).and_then(|s| s.nick.clone());
    let renaming = old.as_deref() != Some(new_nick.as_str());

    // A registered rename is announced to everyone sharing a channel,
    // and to the client itself.
    if renaming && st.session(id).is_some_and(Session::is_registered) {
        let line = Message {
            prefix: Some(hostmask_of(st, id)),
            command: "NICK".into(),
            params: vec![new_nick.clone()],
            trailing: true,
        };
        let mut notified = HashSet::from([id]);
        st.send_to(id, line.clone());
        for name in st.channels_of(id) {
            if let Some(channel) = st.channels.get(&name) {
                for member in channel.members() {
                    if notified.insert(member) {
                        st.send_to(member, line.clone());
                    }
                }
            }
        }
    }

    if let Some(old) = old {
        st.nicks.remove(&irc_lower(&old));
    }
    st.nicks.insert(folded, id);
    if let Some(session) = st.session_mut(id) {
        session.nick = Some(new_nick.clone());
    }
    maybe_welcome(st, id);
}

fn user(st: &mut ServerState, id: ClientId, msg: &Message) {
    // USER <username> <mode> <unused> :<realname>
    let realname = msg.params.last().filter(|r| !r.is_empty() && msg.trailing);
    if msg.params.len() < 4 || realname.is_none() {
        err(st, id, ERR_NEEDMOREPARAMS, &["USER"]);
        return;
    }
    if st.session(id).is_some_and(|s| s.username.is_some()) {
        err(st, id, ERR_ALREADYREGISTRED, &[]);
        return;
    }
    let username = msg.params[0].clone();
    let realname = realname.cloned().unwrap_or_default();
    if let Some(session) = st.session_mut(id) {
        session.username = Some(username);
        session.realname = Some(realname);
    }
    maybe_welcome(st, id);
}

fn cap(st: &mut ServerState, id: ClientId, msg: &Message) {
    // No capabilities are offered; CAP never blocks registration.
    match msg
        .params
        .first()
        .map(|s| s.to_ascii_uppercase())
        .as_deref()
    {
        Some("LS") => st.send_to(
            id,
            server_message("CAP", vec!["*".into(), "LS".into(), String::new()], true),
        ),
        Some("LIST") => st.send_to(
            id,
            server_message("CAP", vec!["*".into(), "LIST".into(), String::new()], true),
        ),
        Some("REQ") => {
            let requested = msg.params.get(1).cloned().unwrap_or_default();
            st.send_to(
                id,
                server_message("CAP", vec!["*".into(), "NAK".into(), requested], true),
            );
        }
        _ => {} // END and anything else get no reply.
    }
}

/// Send the welcome burst (001-005, then MOTD) once registration
/// completes, and never a second time for the same session.
fn maybe_welcome(st: &mut ServerState, id: ClientId) {
    let (registered, nick, hostmask) = match st.session(id) {
        Some(s) => (s.is_registered(), s.display_nick().to_owned(), s.hostmask()),
        None => return,
    };
    if !registered || !st.welcomed.insert(id) {
        return;
    }
    debug!(client = %id, %nick, "registered");

    let burst = [
        numeric(
            &nick,
            RPL_WELCOME,
            &[],
            &format!("Welcome to the Internet Relay Network {hostmask}"),
        ),
        numeric(
            &nick,
            RPL_YOURHOST,
            &[],
            &format!("Your host is {SERVER_NAME}, running version {VERSION}"),
        ),
        numeric(&nick, RPL_CREATED, &[], "This server was created at process start"),
        server_message(
            RPL_MYINFO,
            vec![
                nick.clone(),
                SERVER_NAME.into(),
                VERSION.into(),
                "o".into(),
                "itkl".into(),
            ],
            false,
        ),
        numeric(
            &nick,
            RPL_ISUPPORT,
            &[
                "CASEMAPPING=ascii",
                "CHANTYPES=#&",
                "CHANLIMIT=#&:10",
                "CHANNELLEN=200",
                "CHANMODES=,k,l,it",
                "PREFIX=(o)@",
            ],
            "are supported by this server",
        ),
        numeric(
            &nick,
            RPL_MOTDSTART,
            &[],
            &format!("- {SERVER_NAME} Message of the Day -"),
        ),
        numeric(&nick, RPL_MOTD, &[], "- Welcome aboard. Mind the tide."),
        numeric(&nick, RPL_MOTD, &[], "- All state lives in one process; be kind to it."),
        numeric(&nick, RPL_ENDOFMOTD, &[], "End of /MOTD command"),
    ];
    for msg in burst {
        st.send_to(id, msg);
    }
}

// ── Connection upkeep ────────────────────────────────────────────

fn ping(st: &mut ServerState, id: ClientId, msg: &Message) {
    let token = msg.params.first().cloned().unwrap_or_default();
    if token.is_empty() {
        err(st, id, ERR_NOORIGIN, &[]);
        return;
    }
    st.send_to(
        id,
        server_message("PONG", vec![SERVER_NAME.into(), token], true),
    );
}

// ── Channel operations ───────────────────────────────────────────

fn join(st: &mut ServerState, id: ClientId, msg: &Message) {
    let Some(name_raw) = msg.params.first() else {
        err(st, id, ERR_NEEDMOREPARAMS, &["JOIN"]);
        return;
    };
    if !is_valid_channel_name(name_raw) {
        err(st, id, ERR_BADCHANMASK, &[name_raw]);
        return;
    }
    let name = irc_lower(name_raw);
    let key = msg.params.get(1).map(String::as_str);

    if is_member(st, &name, id) {
        return;
    }
    if st.channels_of(id).len() >= MAX_CHANNELS_PER_CLIENT {
        err(st, id, ERR_TOOMANYCHANNELS, &[&name]);
        return;
    }

    if let Some(channel) = st.channels.get_mut(&name) {
        match channel.can_join(id, key) {
            JoinCheck::InviteOnly => {
                err(st, id, ERR_INVITEONLYCHAN, &[&name]);
                return;
            }
            JoinCheck::Full => {
                err(st, id, ERR_CHANNELISFULL, &[&name]);
                return;
            }
            JoinCheck::BadKey => {
                err(st, id, ERR_BADCHANNELKEY, &[&name]);
                return;
            }
            JoinCheck::Ok => {
                channel.add_member(id);
                channel.consume_invite_if_present(id);
            }
        }
    } else {
        // First join creates the channel; the creator is its operator.
        let mut channel = Channel::new(name.clone());
        channel.add_member(id);
        channel.add_operator(id);
        st.channels.insert(name.clone(), channel);
        debug!(channel = %name, "channel created");
    }

    let line = Message {
        prefix: Some(hostmask_of(st, id)),
        command: "JOIN".into(),
        params: vec![name.clone()],
        trailing: true,
    };
    st.broadcast_to_channel(&name, &line, None);

    // Topic state and the member list go to the joiner.
    let nick = nick_of(st, id);
    if let Some(channel) = st.channels.get(&name) {
        if !channel.topic.is_empty() {
            st.send_to(id, numeric(&nick, RPL_TOPIC, &[&name], &channel.topic));
        }
        let list = st.name_list(channel);
        st.send_to(id, numeric(&nick, RPL_NAMREPLY, &["=", &name], &list));
    }
    st.send_to(
        id,
        numeric(&nick, RPL_ENDOFNAMES, &[&name], "End of /NAMES list"),
    );
}

fn part(st: &mut ServerState, id: ClientId, msg: &Message) {
    let Some(name_raw) = msg.params.first() else {
        err(st, id, ERR_NEEDMOREPARAMS, &["PART"]);
        return;
    };
    let name = irc_lower(name_raw);
    if !st.channels.contains_key(&name) {
        err(st, id, ERR_NOSUCHCHANNEL, &[&name]);
        return;
    }
    if !is_member(st, &name, id) {
        err(st, id, ERR_NOTONCHANNEL, &[&name]);
        return;
    }

    let mut params = vec![name.clone()];
    let mut trailing = false;
    if let Some(reason) = msg.params.get(1) {
        params.push(reason.clone());
        trailing = true;
    }
    let line = Message {
        prefix: Some(hostmask_of(st, id)),
        command: "PART".into(),
        params,
        trailing,
    };
    st.broadcast_to_channel(&name, &line, None);
    remove_from_channel(st, &name, id);
}

fn privmsg(st: &mut ServerState, id: ClientId, msg: &Message) {
    let Some(target) = msg.params.first() else {
        err(st, id, ERR_NORECIPIENT, &[]);
        return;
    };
    let Some(text) = msg.params.get(1).filter(|t| !t.is_empty()) else {
        err(st, id, ERR_NOTEXTTOSEND, &[]);
        return;
    };

    let deliver = |target: &str| Message {
        prefix: Some(hostmask_of(st, id)),
        command: "PRIVMSG".into(),
        params: vec![target.to_owned(), text.clone()],
        trailing: true,
    };

    if target.starts_with('#') || target.starts_with('&') {
        let name = irc_lower(target);
        if !st.channels.contains_key(&name) {
            err(st, id, ERR_NOSUCHCHANNEL, &[&name]);
            return;
        }
        if !is_member(st, &name, id) {
            err(st, id, ERR_CANNOTSENDTOCHAN, &[&name]);
            return;
        }
        // Fan out to every member except the sender.
        st.broadcast_to_channel(&name, &deliver(&name), Some(id));
    } else {
        match st.lookup_nick(target) {
            Some(peer) => st.send_to(peer, deliver(target)),
            None => err(st, id, ERR_NOSUCHNICK, &[target]),
        }
    }
}

fn topic(st: &mut ServerState, id: ClientId, msg: &Message) {
    let Some(name_raw) = msg.params.first() else {
        err(st, id, ERR_NEEDMOREPARAMS, &["TOPIC"]);
        return;
    };
    let name = irc_lower(name_raw);
    if !st.channels.contains_key(&name) {
        err(st, id, ERR_NOSUCHCHANNEL, &[&name]);
        return;
    }
    if !is_member(st, &name, id) {
        err(st, id, ERR_NOTONCHANNEL, &[&name]);
        return;
    }

    let nick = nick_of(st, id);
    let Some(new_topic) = msg.params.get(1) else {
        // Query.
        let current = st
            .channels
            .get(&name)
            .map(|ch| ch.topic.clone())
            .unwrap_or_default();
        if current.is_empty() {
            st.send_to(id, numeric(&nick, RPL_NOTOPIC, &[&name], "No topic is set"));
        } else {
            st.send_to(id, numeric(&nick, RPL_TOPIC, &[&name], &current));
        }
        return;
    };

    let locked = st
        .channels
        .get(&name)
        .is_some_and(|ch| ch.modes.topic_locked);
    if locked && !is_operator(st, &name, id) {
        err(st, id, ERR_CHANOPRIVSNEEDED, &[&name]);
        return;
    }
    if let Some(channel) = st.channels.get_mut(&name) {
        channel.topic = new_topic.clone();
    }
    let line = Message {
        prefix: Some(hostmask_of(st, id)),
        command: "TOPIC".into(),
        params: vec![name.clone(), new_topic.clone()],
        trailing: true,
    };
    st.broadcast_to_channel(&name, &line, None);
}

fn kick(st: &mut ServerState, id: ClientId, msg: &Message) {
    if msg.params.len() < 2 {
        err(st, id, ERR_NEEDMOREPARAMS, &["KICK"]);
        return;
    }
    let name = irc_lower(&msg.params[0]);
    let target_raw = &msg.params[1];

    if !st.channels.contains_key(&name) {
        err(st, id, ERR_NOSUCHCHANNEL, &[&name]);
        return;
    }
    if !is_member(st, &name, id) {
        err(st, id, ERR_NOTONCHANNEL, &[&name]);
        return;
    }
    if !is_operator(st, &name, id) {
        err(st, id, ERR_CHANOPRIVSNEEDED, &[&name]);
        return;
    }
    let Some(target_id) = st.lookup_nick(target_raw) else {
        err(st, id, ERR_NOSUCHNICK, &[target_raw]);
        return;
    };
    if !is_member(st, &name, target_id) {
        err(st, id, ERR_USERNOTINCHANNEL, &[target_raw, &name]);
        return;
    }

    let target_nick = nick_of(st, target_id);
    let reason = msg
        .params
        .get(2)
        .cloned()
        .unwrap_or_else(|| nick_of(st, id));
    let line = Message {
        prefix: Some(hostmask_of(st, id)),
        command: "KICK".into(),
        params: vec![name.clone(), target_nick, reason],
        trailing: true,
    };
    // The target hears the kick too, then leaves.
    st.broadcast_to_channel(&name, &line, None);
    remove_from_channel(st, &name, target_id);
}

fn invite(st: &mut ServerState, id: ClientId, msg: &Message) {
    if msg.params.len() < 2 {
        err(st, id, ERR_NEEDMOREPARAMS, &["INVITE"]);
        return;
    }
    let target_raw = &msg.params[0];
    let name = irc_lower(&msg.params[1]);

    if !st.channels.contains_key(&name) {
        err(st, id, ERR_NOSUCHCHANNEL, &[&name]);
        return;
    }
    if !is_member(st, &name, id) {
        err(st, id, ERR_NOTONCHANNEL, &[&name]);
        return;
    }
    if !is_operator(st, &name, id) {
        err(st, id, ERR_CHANOPRIVSNEEDED, &[&name]);
        return;
    }
    let Some(target_id) = st.lookup_nick(target_raw) else {
        err(st, id, ERR_NOSUCHNICK, &[target_raw]);
        return;
    };
    if is_member(st, &name, target_id) {
        err(st, id, ERR_USERONCHANNEL, &[target_raw, &name]);
        return;
    }

    if let Some(channel) = st.channels.get_mut(&name) {
        channel.add_invite(target_id);
    }
    let target_nick = nick_of(st, target_id);
    st.send_to(
        target_id,
        Message {
            prefix: Some(hostmask_of(st, id)),
            command: "INVITE".into(),
            params: vec![target_nick.clone(), name.clone()],
            trailing: true,
        },
    );
    let nick = nick_of(st, id);
    st.send_to(
        id,
        server_message(RPL_INVITING, vec![nick, target_nick, name], false),
    );
}

fn mode(st: &mut ServerState, id: ClientId, msg: &Message) {
    let Some(name_raw) = msg.params.first() else {
        err(st, id, ERR_NEEDMOREPARAMS, &["MODE"]);
        return;
    };
    let name = irc_lower(name_raw);
    if !st.channels.contains_key(&name) {
        err(st, id, ERR_NOSUCHCHANNEL, &[&name]);
        return;
    }

    let nick = nick_of(st, id);
    if msg.params.len() == 1 {
        if let Some(channel) = st.channels.get(&name) {
            let mut params = vec![nick, name.clone(), channel.modes.flag_string()];
            params.extend(channel.modes.args());
            st.send_to(id, server_message(RPL_CHANNELMODEIS, params, false));
        }
        return;
    }

    if !is_operator(st, &name, id) {
        err(st, id, ERR_CHANOPRIVSNEEDED, &[&name]);
        return;
    }

    // Left to right; a change that cannot apply is skipped or answered,
    // never aborts the rest of the string.
    let mut accepted: Vec<ModeChange> = Vec::new();
    for change in parse_mode_string(&msg.params[1], &msg.params[2..]) {
        match change.mode {
            'i' => {
                if let Some(channel) = st.channels.get_mut(&name) {
                    channel.modes.invite_only = change.setting;
                }
                accepted.push(change);
            }
            't' => {
                if let Some(channel) = st.channels.get_mut(&name) {
                    channel.modes.topic_locked = change.setting;
                }
                accepted.push(change);
            }
            'k' => {
                if change.setting {
                    let Some(ref key) = change.param else { continue };
                    if st.channels.get(&name).is_some_and(|ch| ch.modes.key.is_some()) {
                        err(st, id, ERR_KEYSET, &[&name]);
                        continue;
                    }
                    if let Some(channel) = st.channels.get_mut(&name) {
                        channel.modes.key = Some(key.clone());
                    }
                } else if let Some(channel) = st.channels.get_mut(&name) {
                    channel.modes.key = None;
                }
                accepted.push(change);
            }
            'l' => {
                if change.setting {
                    let Some(limit) = change
                        .param
                        .as_deref()
                        .and_then(|p| p.parse::<usize>().ok())
                        .filter(|n| *n > 0)
                    else {
                        continue;
                    };
                    if let Some(channel) = st.channels.get_mut(&name) {
                        channel.modes.limit = Some(limit);
                    }
                } else if let Some(channel) = st.channels.get_mut(&name) {
                    channel.modes.limit = None;
                }
                accepted.push(change);
            }
            'o' => {
                let Some(ref target_raw) = change.param else { continue };
                let target = st
                    .lookup_nick(target_raw)
                    .filter(|t| is_member(st, &name, *t));
                let Some(target) = target else {
                    err(st, id, ERR_USERNOTINCHANNEL, &[target_raw, &name]);
                    continue;
                };
                if let Some(channel) = st.channels.get_mut(&name) {
                    if change.setting {
                        channel.add_operator(target);
                    } else {
                        channel.remove_operator(target);
                    }
                }
                // Broadcast the display form, not the typed one.
                accepted.push(ModeChange {
                    param: Some(nick_of(st, target)),
                    ..change
                });
            }
            unknown => {
                err(st, id, ERR_UNKNOWNMODE, &[&unknown.to_string()]);
            }
        }
    }

    if !accepted.is_empty() {
        let (flags, args) = render_changes(&accepted);
        let mut params = vec![name.clone(), flags];
        params.extend(args);
        let line = Message {
            prefix: Some(hostmask_of(st, id)),
            command: "MODE".into(),
            params,
            trailing: false,
        };
        st.broadcast_to_channel(&name, &line, None);
    }
}

fn list(st: &mut ServerState, id: ClientId) {
    let nick = nick_of(st, id);
    st.send_to(id, numeric(&nick, RPL_LISTSTART, &["Channel"], "Users  Name"));
    let mut channels: Vec<&Channel> = st.channels.values().collect();
    channels.sort_by(|a, b| a.name.cmp(&b.name));
    for channel in channels {
        let topic = if channel.topic.is_empty() {
            "No topic"
        } else {
            &channel.topic
        };
        let count = channel.member_count().to_string();
        st.send_to(
            id,
            numeric(&nick, RPL_LIST, &[&channel.name, &count], topic),
        );
    }
    st.send_to(id, numeric(&nick, RPL_LISTEND, &[], "End of /LIST"));
}

fn names(st: &mut ServerState, id: ClientId, msg: &Message) {
    let Some(name_raw) = msg.params.first() else {
        err(st, id, ERR_NEEDMOREPARAMS, &["NAMES"]);
        return;
    };
    let name = irc_lower(name_raw);
    let nick = nick_of(st, id);
    let Some(channel) = st.channels.get(&name) else {
        err(st, id, ERR_NOSUCHCHANNEL, &[&name]);
        return;
    };
    let list = st.name_list(channel);
    st.send_to(id, numeric(&nick, RPL_NAMREPLY, &["=", &name], &list));
    st.send_to(
        id,
        numeric(&nick, RPL_ENDOFNAMES, &[&name], "End of /NAMES list"),
    );
}

fn whois(st: &mut ServerState, id: ClientId, msg: &Message) {
    let nick = nick_of(st, id);
    let Some(target_raw) = msg.params.first() else {
        err(st, id, ERR_NONICKNAMEGIVEN, &[]);
        return;
    };
    let Some(target_id) = st.lookup_nick(target_raw) else {
        err(st, id, ERR_NOSUCHNICK, &[target_raw]);
        st.send_to(
            id,
            numeric(&nick, RPL_ENDOFWHOIS, &[target_raw], "End of /WHOIS list"),
        );
        return;
    };
    let Some(target) = st.session(target_id) else {
        return;
    };

    let target_nick = target.display_nick().to_owned();
    let username = target.username.clone().unwrap_or_else(|| "*".into());
    let realname = target.realname.clone().unwrap_or_default();
    st.send_to(
        id,
        numeric(
            &nick,
            RPL_WHOISUSER,
            &[&target_nick, &username, "localhost", "*"],
            &realname,
        ),
    );
    st.send_to(
        id,
        numeric(
            &nick,
            RPL_WHOISSERVER,
            &[&target_nick, SERVER_NAME],
            "A small IRC relay server",
        ),
    );
    let mut joined: Vec<String> = st
        .channels
        .values()
        .filter(|ch| ch.is_member(target_id))
        .map(|ch| {
            let op = if ch.is_operator(target_id) { "@" } else { "" };
            format!("{op}{}", ch.name)
        })
        .collect();
    joined.sort();
    if !joined.is_empty() {
        st.send_to(
            id,
            numeric(&nick, RPL_WHOISCHANNELS, &[&target_nick], &joined.join(" ")),
        );
    }
    st.send_to(
        id,
        numeric(&nick, RPL_WHOISIDLE, &[&target_nick, "0"], "seconds idle"),
    );
    st.send_to(
        id,
        numeric(&nick, RPL_ENDOFWHOIS, &[&target_nick], "End of /WHOIS list"),
    );
}
