/// IRC message parsing and serialization.
///
/// Implements the RFC 2812 message format:
///   [`:`prefix SPACE] command (SPACE param)* [SPACE `:` trailing]
///
/// Messages are terminated by LF (with an optional preceding CR) on the
/// wire, but parsing operates on the content without the terminator.
use std::fmt;

/// Maximum length of a single message, terminator included.
pub const MAX_MESSAGE_LENGTH: usize = 512;

/// Maximum number of parameters, trailing counted.
pub const MAX_PARAMS: usize = 15;

/// A parsed IRC message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Optional prefix (server name or `nick!user@host`).
    pub prefix: Option<String>,
    /// The command (e.g. `PRIVMSG`, `001`, `NICK`). Case is preserved here;
    /// the dispatcher folds it to upper case.
    pub command: String,
    /// Parameters — the last may be the trailing param (spaces allowed).
    pub params: Vec<String>,
    /// Whether the source line introduced the last parameter with `:`.
    pub trailing: bool,
}

/// Errors that can occur during message parsing. All of them are dropped
/// silently by the server: a malformed line gets no reply.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty message")]
    Empty,
    #[error("message exceeds {MAX_MESSAGE_LENGTH} bytes")]
    TooLong,
    #[error("message contains a NUL byte")]
    NulByte,
    #[error("missing command")]
    MissingCommand,
    #[error("command contains a non-alphanumeric byte")]
    BadCommand,
    #[error("more than {MAX_PARAMS} parameters")]
    TooManyParams,
}

impl Message {
    /// Parse a single IRC message from a line (without the trailing LF).
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        if input.is_empty() {
            return Err(ParseError::Empty);
        }
        if input.len() > MAX_MESSAGE_LENGTH {
            return Err(ParseError::TooLong);
        }
        if input.contains('\0') {
            return Err(ParseError::NulByte);
        }

        let line = input.strip_suffix('\r').unwrap_or(input);
        let mut rest = line.trim_start_matches(' ');

        let prefix = if let Some(after) = rest.strip_prefix(':') {
            // Prefix runs until the next space and must be non-empty.
            let Some(idx) = after.find(' ') else {
                return Err(ParseError::MissingCommand);
            };
            let prefix = &after[..idx];
            if prefix.is_empty() {
                return Err(ParseError::MissingCommand);
            }
            rest = after[idx + 1..].trim_start_matches(' ');
            Some(prefix.to_owned())
        } else {
            None
        };

        let (command, mut rest) = match rest.find(' ') {
            Some(idx) => (&rest[..idx], &rest[idx + 1..]),
            None => (rest, ""),
        };
        if command.is_empty() {
            return Err(ParseError::MissingCommand);
        }
        if !command.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(ParseError::BadCommand);
        }

        let mut params = Vec::new();
        let mut trailing = false;
        loop {
            rest = rest.trim_start_matches(' ');
            if rest.is_empty() {
                break;
            }
            if let Some(text) = rest.strip_prefix(':') {
                // Trailing parameter: the remainder of the line, verbatim.
                params.push(text.to_owned());
                trailing = true;
                break;
            }
            match rest.find(' ') {
                Some(idx) => {
                    params.push(rest[..idx].to_owned());
                    rest = &rest[idx + 1..];
                }
                None => {
                    params.push(rest.to_owned());
                    break;
                }
            }
        }
        if params.len() > MAX_PARAMS {
            return Err(ParseError::TooManyParams);
        }

        Ok(Message {
            prefix,
            command: command.to_owned(),
            params,
            trailing,
        })
    }

    /// Serialize to the IRC wire format (without the trailing `\r\n`).
    ///
    /// The last parameter is introduced with `:` when the trailing flag is
    /// set or its value demands it (empty, leading `:`, or contains a space).
    pub fn to_wire(&self) -> String {
        let mut out = String::new();

        if let Some(ref prefix) = self.prefix {
            out.push(':');
            out.push_str(prefix);
            out.push(' ');
        }

        out.push_str(&self.command);

        if let Some((last, middles)) = self.params.split_last() {
            for param in middles {
                out.push(' ');
                out.push_str(param);
            }
            out.push(' ');
            if self.trailing || last.is_empty() || last.starts_with(':') || last.contains(' ') {
                out.push(':');
            }
            out.push_str(last);
        }

        out
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_wire())
    }
}
