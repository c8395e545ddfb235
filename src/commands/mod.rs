mod auth;
mod config_cmd;
mod log;
mod profile;
mod status;
mod welcome;

pub use auth::AuthCommand;
pub use config_cmd::ConfigCommand;
pub use log::LogCommand;
pub use profile::ProfileCommand;
pub use status::StatusCommand;
pub use welcome::WelcomeCommand;

use std::io::{self, Write};

use glucolog_core::{ApiClient, FileStore, LogStore, LogSync};

use crate::config::Config;

/// The sync controller every log command runs through.
pub(crate) fn log_sync(config: &Config) -> LogSync<ApiClient, FileStore> {
    LogSync::new(config.api_client(), config.session_store(), LogStore::new())
        .with_ordering(config.fetch_ordering())
}

/// Prints `message` and reads one trimmed line from stdin.
pub(crate) fn prompt(message: &str) -> io::Result<String> {
    print!("{}", message);
    io::stdout().flush()?;

    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "no input"));
    }
    Ok(input.trim().to_string())
}

/// `[y/N]` question; anything but `y` is a no.
pub(crate) fn confirm(question: &str) -> io::Result<bool> {
    let answer = prompt(&format!("{} [y/N] ", question))?;
    Ok(answer.eq_ignore_ascii_case("y"))
}
