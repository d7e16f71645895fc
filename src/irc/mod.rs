pub mod channel;
pub mod codec;
pub mod commands;
pub mod message;
pub mod modes;
pub mod replies;
pub mod server;
pub mod session;
