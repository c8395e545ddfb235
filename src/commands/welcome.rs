use clap::Args;

use glucolog_core::session::ONBOARDING_SEEN_KEY;
use glucolog_core::KeyValueStore;

use crate::config::Config;

const SLIDES: [(&str, &str); 3] = [
    (
        "Personalized Meals",
        "Enjoy tasty, expert-designed diets to match your health goals.",
    ),
    (
        "Track Progress",
        "Stay on top of your sugar, weight, and health milestones.",
    ),
    (
        "Expert Support",
        "Get diet plans curated by health professionals.",
    ),
];

/// Show the introduction shown on first launch
#[derive(Args)]
pub struct WelcomeCommand {}

impl WelcomeCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let session = config.session_store();

        if session.get(ONBOARDING_SEEN_KEY)?.is_some() {
            println!("You've already seen the introduction.");
            println!("Run 'gl auth login' to sign in.");
            return Ok(());
        }

        for (i, (title, body)) in SLIDES.iter().enumerate() {
            println!("{}/{}  {}", i + 1, SLIDES.len(), title);
            println!("      {}", body);
            println!();
        }
        println!("Get started with: gl auth login");

        session.set(ONBOARDING_SEEN_KEY, "true")?;
        Ok(())
    }
}
