use clap::{Args, Subcommand};

use glucolog_core::session::{auth_token, USER_KEY};
use glucolog_core::{Gender, KeyValueStore, ProfileForm};

use crate::config::Config;

#[derive(Args)]
pub struct ProfileCommand {
    #[command(subcommand)]
    pub command: ProfileSubcommand,
}

#[derive(Subcommand)]
pub enum ProfileSubcommand {
    /// Create your profile (required once after first login)
    Create {
        /// Full name
        #[arg(long)]
        name: Option<String>,

        /// Email address
        #[arg(long)]
        email: Option<String>,

        /// Gender (male, female)
        #[arg(long)]
        gender: Option<Gender>,

        /// Age in years (13-120)
        #[arg(long)]
        age: Option<String>,
    },

    /// Show the stored profile
    Show,
}

impl ProfileCommand {
    pub async fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let session = config.session_store();

        match &self.command {
            ProfileSubcommand::Create {
                name,
                email,
                gender,
                age,
            } => {
                let form = ProfileForm {
                    name: name.clone().unwrap_or_default(),
                    email: email.clone().unwrap_or_default(),
                    gender: *gender,
                    age: age.clone().unwrap_or_default(),
                };
                let profile = match form.validate() {
                    Ok(profile) => profile,
                    Err(errors) => {
                        for error in &errors {
                            eprintln!("  - {}", error);
                        }
                        return Err("Profile has invalid fields".into());
                    }
                };

                let token = auth_token(&session)?
                    .ok_or("Not logged in. Run 'gl auth login' first.")?;

                let user = config
                    .api_client()
                    .create_profile(&token, &profile)
                    .await
                    .map_err(|e| e.server_message().unwrap_or("Failed to create profile").to_string())?;

                session.set(USER_KEY, &serde_json::to_string(&user)?)?;
                println!("✓ Profile created successfully!");
                Ok(())
            }

            ProfileSubcommand::Show => {
                let Some(raw) = session.get(USER_KEY)? else {
                    println!("No profile stored.");
                    println!("Run 'gl profile create' after logging in.");
                    return Ok(());
                };

                let user: serde_json::Value = serde_json::from_str(&raw)?;
                match user.as_object() {
                    Some(fields) => {
                        for (key, value) in fields {
                            match value.as_str() {
                                Some(s) => println!("{}: {}", key, s),
                                None => println!("{}: {}", key, value),
                            }
                        }
                    }
                    None => println!("{}", user),
                }
                Ok(())
            }
        }
    }
}
