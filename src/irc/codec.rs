/// IRC line codec — frames a TCP byte stream into IRC messages.
///
/// Splits on LF (a preceding CR is tolerated and stripped), parses each line
/// into a [`Message`], and serializes outgoing messages with `\r\n`
/// termination.
///
/// Lines the parser rejects are skipped without a reply and without
/// dropping the connection, so adversarial input cannot provoke
/// amplification. A line that outgrows the message cap before its LF
/// arrives is discarded up to the next LF, then framing resumes.
use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::trace;

use super::message::{Message, MAX_MESSAGE_LENGTH};

/// Codec error. Protocol-level parse failures never surface here — they are
/// swallowed by the decoder — so this is I/O only.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A tokio codec that frames IRC messages on LF boundaries.
#[derive(Debug, Default)]
pub struct IrcCodec {
    /// Set while skipping the tail of an over-long line.
    discarding: bool,
}

impl Decoder for IrcCodec {
    type Item = Message;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            let Some(pos) = src.iter().position(|b| *b == b'\n') else {
                if self.discarding {
                    src.clear();
                } else if src.len() > MAX_MESSAGE_LENGTH + 2 {
                    trace!("line exceeds message cap, discarding to next LF");
                    src.clear();
                    self.discarding = true;
                }
                return Ok(None);
            };

            // Extract the line (without LF), advance past the terminator.
            let line = src.split_to(pos);
            src.advance(1);

            if self.discarding {
                self.discarding = false;
                continue;
            }

            let content = match line.last() {
                Some(b'\r') => &line[..line.len() - 1],
                _ => &line[..],
            };

            let Ok(text) = std::str::from_utf8(content) else {
                trace!("dropping non-UTF-8 line");
                continue;
            };
            match Message::parse(text) {
                Ok(msg) => return Ok(Some(msg)),
                Err(err) => {
                    trace!(%err, "dropping malformed line");
                    continue;
                }
            }
        }
    }
}

impl Encoder<Message> for IrcCodec {
    type Error = CodecError;

    fn encode(&mut self, item: Message, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let wire = item.to_wire();
        dst.reserve(wire.len() + 2);
        dst.put_slice(wire.as_bytes());
        dst.put_slice(b"\r\n");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    // ── Decoder ──────────────────────────────────────────────────

    #[test]
    fn decode_complete_line() {
        let mut codec = IrcCodec::default();
        let mut buf = BytesMut::from("NICK alice\r\n");
        let msg = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(msg.command, "NICK");
        assert_eq!(msg.params, vec!["alice"]);
        assert!(buf.is_empty());
    }

    #[test]
    fn decode_lf_only_terminator() {
        let mut codec = IrcCodec::default();
        let mut buf = BytesMut::from("NICK alice\n");
        let msg = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(msg.command, "NICK");
        assert_eq!(msg.params, vec!["alice"]);
    }

    #[test]
    fn decode_partial_line_then_complete() {
        let mut codec = IrcCodec::default();
        let mut buf = BytesMut::from("NICK al");

        assert!(codec.decode(&mut buf).unwrap().is_none());

        buf.extend_from_slice(b"ice\r\n");
        let msg = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(msg.command, "NICK");
        assert_eq!(msg.params, vec!["alice"]);
    }

    #[test]
    fn decode_two_messages_in_one_read() {
        let mut codec = IrcCodec::default();
        let mut buf = BytesMut::from("NICK alice\r\nUSER alice 0 * :Alice A\r\n");

        let msg1 = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(msg1.command, "NICK");

        let msg2 = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(msg2.command, "USER");
        assert_eq!(msg2.params, vec!["alice", "0", "*", "Alice A"]);

        assert!(buf.is_empty());
    }

    #[test]
    fn decode_skips_malformed_line() {
        let mut codec = IrcCodec::default();
        let mut buf = BytesMut::from(":no-command\r\nNICK alice\r\n");
        let msg = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(msg.command, "NICK");
    }

    #[test]
    fn decode_skips_empty_line() {
        let mut codec = IrcCodec::default();
        let mut buf = BytesMut::from("\r\nPING :tok\r\n");
        let msg = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(msg.command, "PING");
    }

    #[test]
    fn decode_skips_oversized_complete_line() {
        let mut codec = IrcCodec::default();
        let mut long = vec![b'A'; 600];
        long.extend_from_slice(b"\r\nNICK alice\r\n");
        let mut buf = BytesMut::from(long.as_slice());
        let msg = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(msg.command, "NICK");
    }

    #[test]
    fn decode_discards_unterminated_oversize_then_recovers() {
        let mut codec = IrcCodec::default();
        let mut buf = BytesMut::from(vec![b'A'; 700].as_slice());

        // No LF yet: the over-long line is dropped and skip mode engages.
        assert!(codec.decode(&mut buf).unwrap().is_none());
        assert!(buf.is_empty());

        // The tail of the bad line plus a good one.
        buf.extend_from_slice(b"AAAA\r\nNICK alice\r\n");
        let msg = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(msg.command, "NICK");
    }

    #[test]
    fn decode_empty_buffer() {
        let mut codec = IrcCodec::default();
        let mut buf = BytesMut::new();
        assert!(codec.decode(&mut buf).unwrap().is_none());
    }

    // ── Encoder ──────────────────────────────────────────────────

    #[test]
    fn encode_appends_crlf() {
        let mut codec = IrcCodec::default();
        let mut buf = BytesMut::new();
        let msg = Message {
            prefix: None,
            command: "PING".into(),
            params: vec!["token".into()],
            trailing: true,
        };
        codec.encode(msg, &mut buf).unwrap();
        assert_eq!(&buf[..], b"PING :token\r\n");
    }

    #[test]
    fn encode_with_prefix() {
        let mut codec = IrcCodec::default();
        let mut buf = BytesMut::new();
        let msg = Message {
            prefix: Some("irc.estuary".into()),
            command: "001".into(),
            params: vec!["alice".into(), "Welcome".into()],
            trailing: true,
        };
        codec.encode(msg, &mut buf).unwrap();
        assert_eq!(&buf[..], b":irc.estuary 001 alice :Welcome\r\n");
    }

    // ── Roundtrip through codec ──────────────────────────────────

    #[test]
    fn roundtrip_through_codec() {
        let mut codec = IrcCodec::default();

        let original = Message {
            prefix: Some("alice!alice@localhost".into()),
            command: "PRIVMSG".into(),
            params: vec!["#estuary".into(), "Hello everyone!".into()],
            trailing: true,
        };
        let mut buf = BytesMut::new();
        codec.encode(original.clone(), &mut buf).unwrap();

        let decoded = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(decoded, original);
    }
}
