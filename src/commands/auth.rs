//! Phone/OTP authentication commands.

use clap::{Args, Subcommand};
use std::io;

use glucolog_core::auth::INVALID_OTP_MESSAGE;
use glucolog_core::session::{auth_token, AUTH_TOKEN_KEY, USER_KEY};
use glucolog_core::{
    check_otp, full_phone, mask_phone, mask_token, ApiError, AuthInputError, KeyValueStore,
    SessionError, SyncError,
};

use super::{log_sync, prompt};
use crate::config::Config;

/// Authentication commands
#[derive(Args)]
pub struct AuthCommand {
    #[command(subcommand)]
    command: AuthSubcommand,
}

#[derive(Subcommand)]
enum AuthSubcommand {
    /// Log in with a one-time code sent to your phone
    Login {
        /// 10-digit phone number, without country code
        #[arg(long)]
        phone: Option<String>,
    },
    /// Log out (remove the stored token)
    Logout,
    /// Show authentication status
    Status,
}

impl AuthCommand {
    pub async fn run(&self, config: &Config) -> Result<(), AuthError> {
        match &self.command {
            AuthSubcommand::Login { phone } => login(config, phone.as_deref()).await,
            AuthSubcommand::Logout => logout(config),
            AuthSubcommand::Status => status(config),
        }
    }
}

/// Errors that can occur during authentication
#[derive(Debug)]
pub enum AuthError {
    /// I/O error
    IoError(io::Error),
    /// Phone number or code rejected before sending
    InvalidInput(AuthInputError),
    /// Request failed
    Api(ApiError),
    /// Server refused the code
    Verification(String),
    /// Session file error
    Session(SessionError),
    Sync(SyncError),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::IoError(e) => write!(f, "I/O error: {}", e),
            AuthError::InvalidInput(e) => write!(f, "{}", e),
            AuthError::Api(e) => {
                write!(f, "{}", e.server_message().unwrap_or("Failed to send OTP"))
            }
            AuthError::Verification(msg) => write!(f, "{}", msg),
            AuthError::Session(e) => write!(f, "{}", e),
            AuthError::Sync(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<io::Error> for AuthError {
    fn from(e: io::Error) -> Self {
        AuthError::IoError(e)
    }
}

impl From<SessionError> for AuthError {
    fn from(e: SessionError) -> Self {
        AuthError::Session(e)
    }
}

impl From<AuthInputError> for AuthError {
    fn from(e: AuthInputError) -> Self {
        AuthError::InvalidInput(e)
    }
}

impl From<ApiError> for AuthError {
    fn from(e: ApiError) -> Self {
        AuthError::Api(e)
    }
}

/// Interactive login flow
async fn login(config: &Config, phone: Option<&str>) -> Result<(), AuthError> {
    let country_code = &config.country_code.value;
    let local = match phone {
        Some(p) => p.to_string(),
        None => prompt(&format!("Enter your phone number: {} ", country_code))?,
    };
    let phone = full_phone(&local, country_code)?;
    let masked = mask_phone(&phone, country_code);

    let client = config.api_client();
    client.request_otp(&phone).await?;
    println!("OTP sent to {}", masked);

    let token = loop {
        let answer = prompt("Enter the 6-digit OTP (leave empty to resend): ")?;
        if answer.is_empty() {
            client.request_otp(&phone).await?;
            println!("OTP resent to {}", masked);
            continue;
        }
        let otp = match check_otp(&answer) {
            Ok(otp) => otp,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        match client.verify_otp(&phone, otp).await {
            Ok(Some(token)) => break token,
            Ok(None) => return Err(AuthError::Verification(INVALID_OTP_MESSAGE.to_string())),
            Err(e @ ApiError::Status { .. }) => {
                let msg = e.server_message().unwrap_or(INVALID_OTP_MESSAGE);
                return Err(AuthError::Verification(msg.to_string()));
            }
            Err(e) => return Err(e.into()),
        }
    };

    let session = config.session_store();
    session.set(AUTH_TOKEN_KEY, &token)?;
    tracing::info!("Stored auth token in {}", session.path().display());

    println!("✓ Logged in as {}", masked);
    if session.get(USER_KEY)?.is_none() {
        println!();
        println!("Next, create your profile:");
        println!("  gl profile create --name <NAME> --email <EMAIL> --gender <male|female> --age <AGE>");
    }
    Ok(())
}

fn logout(config: &Config) -> Result<(), AuthError> {
    let sync = log_sync(config);
    if auth_token(sync.session())?.is_none() {
        println!("Not logged in.");
        return Ok(());
    }

    sync.end_session().map_err(AuthError::Sync)?;
    println!("Logged out.");
    Ok(())
}

fn status(config: &Config) -> Result<(), AuthError> {
    let session = config.session_store();
    match auth_token(&session)? {
        Some(token) => {
            println!("Logged in");
            println!("  Token:   {}", mask_token(&token));
            println!(
                "  Profile: {}",
                if session.get(USER_KEY)?.is_some() {
                    "created"
                } else {
                    "not created"
                }
            );
        }
        None => {
            println!("Not logged in.");
            println!("Run 'gl auth login' to sign in.");
        }
    }
    println!("  Server:  {}", config.api_url.value);
    Ok(())
}
