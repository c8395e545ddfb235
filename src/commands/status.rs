use clap::Args;

use glucolog_core::{resolve_launch, Launch};

use crate::config::Config;

/// Show where the app would start and what to do next
#[derive(Args)]
pub struct StatusCommand {}

impl StatusCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let launch = resolve_launch(&config.session_store());

        println!("Start screen: {}", launch);
        match launch {
            Launch::Home => println!("You're all set. Run 'gl log list' to see your readings."),
            Launch::Login => println!("Run 'gl auth login' to sign in."),
            Launch::Onboarding => println!("Run 'gl welcome' to get started."),
        }
        Ok(())
    }
}
