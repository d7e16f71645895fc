use clap::Parser;

/// Command-line arguments: the listening port and the shared connection
/// password every client must present with PASS.
#[derive(Parser, Debug)]
#[command(version, about = "A small password-protected IRC relay server")]
pub struct Args {
    /// TCP port to listen on (1-65535).
    #[arg(value_parser = clap::value_parser!(u16).range(1..))]
    pub port: u16,

    /// Connection password.
    #[arg(value_parser = parse_password)]
    pub password: String,
}

fn parse_password(raw: &str) -> Result<String, String> {
    if raw.contains('\0') {
        return Err("password must not contain NUL bytes".into());
    }
    Ok(raw.to_owned())
}
