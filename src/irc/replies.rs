/// The numeric reply vocabulary.
///
/// Every server-originated line has the shape
/// `:<server> <code> <target> <payload>` where the target is the
/// recipient's nickname, or `*` before one is known. Error payloads come
/// from a fixed-text table keyed by numeric, so handlers pass only the
/// variable middles.
use super::message::Message;

/// Name this server identifies itself with in every reply prefix.
pub const SERVER_NAME: &str = "irc.estuary";

/// Version token for 002/004.
pub const VERSION: &str = concat!("estuary-", env!("CARGO_PKG_VERSION"));

pub const RPL_WELCOME: &str = "001";
pub const RPL_YOURHOST: &str = "002";
pub const RPL_CREATED: &str = "003";
pub const RPL_MYINFO: &str = "004";
pub const RPL_ISUPPORT: &str = "005";
pub const RPL_WHOISUSER: &str = "311";
pub const RPL_WHOISSERVER: &str = "312";
pub const RPL_WHOISIDLE: &str = "317";
pub const RPL_ENDOFWHOIS: &str = "318";
pub const RPL_WHOISCHANNELS: &str = "319";
pub const RPL_LISTSTART: &str = "321";
pub const RPL_LIST: &str = "322";
pub const RPL_LISTEND: &str = "323";
pub const RPL_CHANNELMODEIS: &str = "324";
pub const RPL_NOTOPIC: &str = "331";
pub const RPL_TOPIC: &str = "332";
pub const RPL_INVITING: &str = "341";
pub const RPL_NAMREPLY: &str = "353";
pub const RPL_ENDOFNAMES: &str = "366";
pub const RPL_MOTD: &str = "372";
pub const RPL_MOTDSTART: &str = "375";
pub const RPL_ENDOFMOTD: &str = "376";

pub const ERR_NOSUCHNICK: &str = "401";
pub const ERR_NOSUCHCHANNEL: &str = "403";
pub const ERR_CANNOTSENDTOCHAN: &str = "404";
pub const ERR_TOOMANYCHANNELS: &str = "405";
pub const ERR_NOORIGIN: &str = "409";
pub const ERR_NORECIPIENT: &str = "411";
pub const ERR_NOTEXTTOSEND: &str = "412";
pub const ERR_UNKNOWNCOMMAND: &str = "421";
pub const ERR_NONICKNAMEGIVEN: &str = "431";
pub const ERR_ERRONEUSNICKNAME: &str = "432";
pub const ERR_NICKNAMEINUSE: &str = "433";
pub const ERR_USERNOTINCHANNEL: &str = "441";
pub const ERR_NOTONCHANNEL: &str = "442";
pub const ERR_USERONCHANNEL: &str = "443";
pub const ERR_NOTREGISTERED: &str = "451";
pub const ERR_NEEDMOREPARAMS: &str = "461";
pub const ERR_ALREADYREGISTRED: &str = "462";
pub const ERR_PASSWDMISMATCH: &str = "464";
pub const ERR_KEYSET: &str = "467";
pub const ERR_CHANNELISFULL: &str = "471";
pub const ERR_UNKNOWNMODE: &str = "472";
pub const ERR_INVITEONLYCHAN: &str = "473";
pub const ERR_BANNEDFROMCHAN: &str = "474";
pub const ERR_BADCHANNELKEY: &str = "475";
pub const ERR_BADCHANMASK: &str = "476";
pub const ERR_CHANOPRIVSNEEDED: &str = "482";

/// Fixed text for each error numeric.
pub fn error_text(code: &str) -> &'static str {
    match code {
        ERR_NOSUCHNICK => "No such nick/channel",
        ERR_NOSUCHCHANNEL => "No such channel",
        ERR_CANNOTSENDTOCHAN => "Cannot send to channel",
        ERR_TOOMANYCHANNELS => "You have joined too many channels",
        ERR_NOORIGIN => "No origin specified",
        ERR_NORECIPIENT => "No recipient given (PRIVMSG)",
        ERR_NOTEXTTOSEND => "No text to send",
        ERR_UNKNOWNCOMMAND => "Unknown command",
        ERR_NONICKNAMEGIVEN => "No nickname given",
        ERR_ERRONEUSNICKNAME => "Erroneous nickname",
        ERR_NICKNAMEINUSE => "Nickname is already in use",
        ERR_USERNOTINCHANNEL => "They aren't on that channel",
        ERR_NOTONCHANNEL => "You're not on that channel",
        ERR_USERONCHANNEL => "is already on channel",
        ERR_NOTREGISTERED => "You have not registered",
        ERR_NEEDMOREPARAMS => "Not enough parameters",
        ERR_ALREADYREGISTRED => "You may not reregister",
        ERR_PASSWDMISMATCH => "Password incorrect",
        ERR_KEYSET => "Channel key already set",
        ERR_CHANNELISFULL => "Cannot join channel (+l)",
        ERR_UNKNOWNMODE => "is unknown mode char to me",
        ERR_INVITEONLYCHAN => "Cannot join channel (+i)",
        ERR_BANNEDFROMCHAN => "Cannot join channel (+b)",
        ERR_BADCHANNELKEY => "Cannot join channel (+k)",
        ERR_BADCHANMASK => "Bad Channel Mask",
        ERR_CHANOPRIVSNEEDED => "You're not channel operator",
        _ => "Unknown error",
    }
}

/// A line originated by this server (`:<server> …`).
pub fn server_message(command: &str, params: Vec<String>, trailing: bool) -> Message {
    Message {
        prefix: Some(SERVER_NAME.into()),
        command: command.into(),
        params,
        trailing,
    }
}

/// `:<server> <code> <target> <middles…> :<text>`
pub fn numeric(target: &str, code: &str, middles: &[&str], text: &str) -> Message {
    let mut params = Vec::with_capacity(middles.len() + 2);
    params.push(target.to_owned());
    params.extend(middles.iter().map(|m| (*m).to_owned()));
    params.push(text.to_owned());
    server_message(code, params, true)
}

/// An error numeric with its text looked up from the table.
pub fn error(target: &str, code: &str, middles: &[&str]) -> Message {
    numeric(target, code, middles, error_text(code))
}
