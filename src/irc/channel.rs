/// Channel state: membership, operators, outstanding invites, modes, and
/// the admission predicate.
///
/// Channels hold [`ClientId`]s only, never session handles. Fan-out and
/// nickname resolution go through the server, which owns the sessions.
use std::collections::HashSet;

use super::modes::ChannelModes;
use super::session::ClientId;

/// Longest permitted channel name, in bytes.
pub const MAX_CHANNEL_NAME_LEN: usize = 200;

/// Most channels a single client may belong to at once.
pub const MAX_CHANNELS_PER_CLIENT: usize = 10;

/// A channel name starts with `#` or `&`, is at most 200 bytes, and
/// contains no space, comma, or BEL.
pub fn is_valid_channel_name(name: &str) -> bool {
    if name.is_empty() || name.len() > MAX_CHANNEL_NAME_LEN {
        return false;
    }
    if !name.starts_with('#') && !name.starts_with('&') {
        return false;
    }
    !name.contains([' ', ',', '\x07'])
}

/// Outcome of the admission predicate, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinCheck {
    Ok,
    InviteOnly,
    Full,
    BadKey,
}

#[derive(Debug)]
pub struct Channel {
    pub name: String,
    /// Empty string means no topic is set.
    pub topic: String,
    pub modes: ChannelModes,
    members: HashSet<ClientId>,
    operators: HashSet<ClientId>,
    invited: HashSet<ClientId>,
}

impl Channel {
    pub fn new(name: String) -> Self {
        Self {
            name,
            topic: String::new(),
            modes: ChannelModes::default(),
            members: HashSet::new(),
            operators: HashSet::new(),
            invited: HashSet::new(),
        }
    }

    /// Returns false if the client was already a member.
    pub fn add_member(&mut self, id: ClientId) -> bool {
        self.members.insert(id)
    }

    /// Removing a member also removes any operator grant, keeping
    /// `operators ⊆ members`.
    pub fn remove_member(&mut self, id: ClientId) {
        self.members.remove(&id);
        self.operators.remove(&id);
    }

    /// Idempotent; a non-member cannot become an operator.
    pub fn add_operator(&mut self, id: ClientId) {
        if self.members.contains(&id) {
            self.operators.insert(id);
        }
    }

    /// Idempotent.
    pub fn remove_operator(&mut self, id: ClientId) {
        self.operators.remove(&id);
    }

    pub fn add_invite(&mut self, id: ClientId) {
        self.invited.insert(id);
    }

    /// Returns true and forgets the invite iff one was outstanding.
    pub fn consume_invite_if_present(&mut self, id: ClientId) -> bool {
        self.invited.remove(&id)
    }

    pub fn is_member(&self, id: ClientId) -> bool {
        self.members.contains(&id)
    }

    pub fn is_operator(&self, id: ClientId) -> bool {
        self.operators.contains(&id)
    }

    pub fn members(&self) -> impl Iterator<Item = ClientId> + '_ {
        self.members.iter().copied()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Admission check, evaluated invite-only, then limit, then key.
    pub fn can_join(&self, id: ClientId, supplied_key: Option<&str>) -> JoinCheck {
        if self.modes.invite_only && !self.invited.contains(&id) {
            return JoinCheck::InviteOnly;
        }
        if let Some(limit) = self.modes.limit {
            if self.members.len() >= limit {
                return JoinCheck::Full;
            }
        }
        if let Some(ref key) = self.modes.key {
            if supplied_key != Some(key.as_str()) {
                return JoinCheck::BadKey;
            }
        }
        JoinCheck::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: ClientId = ClientId(1);
    const B: ClientId = ClientId(2);

    // ── Name validity ───────────────────────────────────────────────

    #[test]
    fn bare_hash_is_a_valid_name() {
        assert!(is_valid_channel_name("#"));
        assert!(is_valid_channel_name("&ops"));
    }

    #[test]
    fn invalid_names() {
        assert!(!is_valid_channel_name(""));
        assert!(!is_valid_channel_name("xchan"));
        assert!(!is_valid_channel_name("#a b"));
        assert!(!is_valid_channel_name("#a,b"));
        assert!(!is_valid_channel_name("#a\x07b"));
    }

    #[test]
    fn name_length_boundary() {
        let ok = format!("#{}", "a".repeat(MAX_CHANNEL_NAME_LEN - 1));
        let too_long = format!("#{}", "a".repeat(MAX_CHANNEL_NAME_LEN));
        assert!(is_valid_channel_name(&ok));
        assert!(!is_valid_channel_name(&too_long));
    }

    // ── Membership and operators ────────────────────────────────────

    #[test]
    fn add_member_reports_novelty() {
        let mut ch = Channel::new("#c".into());
        assert!(ch.add_member(A));
        assert!(!ch.add_member(A));
        assert_eq!(ch.member_count(), 1);
    }

    #[test]
    fn removing_member_revokes_operator() {
        let mut ch = Channel::new("#c".into());
        ch.add_member(A);
        ch.add_operator(A);
        assert!(ch.is_operator(A));

        ch.remove_member(A);
        assert!(!ch.is_member(A));
        assert!(!ch.is_operator(A));
        assert!(ch.is_empty());
    }

    #[test]
    fn non_member_cannot_become_operator() {
        let mut ch = Channel::new("#c".into());
        ch.add_operator(A);
        assert!(!ch.is_operator(A));
    }

    #[test]
    fn operator_removal_is_idempotent() {
        let mut ch = Channel::new("#c".into());
        ch.add_member(A);
        ch.add_operator(A);
        ch.remove_operator(A);
        ch.remove_operator(A);
        assert!(!ch.is_operator(A));
        assert!(ch.is_member(A));
    }

    // ── Invites ─────────────────────────────────────────────────────

    #[test]
    fn invite_is_consumed_once() {
        let mut ch = Channel::new("#c".into());
        ch.add_invite(A);
        assert!(ch.consume_invite_if_present(A));
        assert!(!ch.consume_invite_if_present(A));
    }

    // ── Admission ───────────────────────────────────────────────────

    #[test]
    fn open_channel_admits() {
        let ch = Channel::new("#c".into());
        assert_eq!(ch.can_join(A, None), JoinCheck::Ok);
    }

    #[test]
    fn invite_only_blocks_uninvited() {
        let mut ch = Channel::new("#c".into());
        ch.modes.invite_only = true;
        assert_eq!(ch.can_join(A, None), JoinCheck::InviteOnly);

        ch.add_invite(A);
        assert_eq!(ch.can_join(A, None), JoinCheck::Ok);
    }

    #[test]
    fn limit_blocks_when_full() {
        let mut ch = Channel::new("#c".into());
        ch.modes.limit = Some(1);
        ch.add_member(A);
        assert_eq!(ch.can_join(B, None), JoinCheck::Full);
    }

    #[test]
    fn key_mismatch_blocks() {
        let mut ch = Channel::new("#c".into());
        ch.modes.key = Some("secret".into());
        assert_eq!(ch.can_join(A, None), JoinCheck::BadKey);
        assert_eq!(ch.can_join(A, Some("wrong")), JoinCheck::BadKey);
        assert_eq!(ch.can_join(A, Some("secret")), JoinCheck::Ok);
    }

    #[test]
    fn invite_only_outranks_full_outranks_key() {
        let mut ch = Channel::new("#c".into());
        ch.modes.invite_only = true;
        ch.modes.limit = Some(0);
        ch.modes.key = Some("secret".into());

        // Uninvited: invite-only wins.
        assert_eq!(ch.can_join(A, None), JoinCheck::InviteOnly);

        // Invited but full: the limit is checked next.
        ch.add_invite(A);
        assert_eq!(ch.can_join(A, None), JoinCheck::Full);

        // Room available, wrong key: the key is checked last.
        ch.modes.limit = Some(5);
        assert_eq!(ch.can_join(A, None), JoinCheck::BadKey);
    }
}
