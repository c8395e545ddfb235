use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// When a glucose reading was taken relative to meals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingContext {
    Fasting,
    BeforeBreakfast,
    BeforeLunch,
    BeforeDinner,
    AfterBreakfast,
    AfterLunch,
    AfterDinner,
    Random,
}

impl ReadingContext {
    pub const ALL: [ReadingContext; 8] = [
        ReadingContext::Fasting,
        ReadingContext::BeforeBreakfast,
        ReadingContext::BeforeLunch,
        ReadingContext::BeforeDinner,
        ReadingContext::AfterBreakfast,
        ReadingContext::AfterLunch,
        ReadingContext::AfterDinner,
        ReadingContext::Random,
    ];

    /// Wire name sent to the server.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingContext::Fasting => "fasting",
            ReadingContext::BeforeBreakfast => "before_breakfast",
            ReadingContext::BeforeLunch => "before_lunch",
            ReadingContext::BeforeDinner => "before_dinner",
            ReadingContext::AfterBreakfast => "after_breakfast",
            ReadingContext::AfterLunch => "after_lunch",
            ReadingContext::AfterDinner => "after_dinner",
            ReadingContext::Random => "random",
        }
    }

    /// Human label, e.g. "Before breakfast".
    pub fn label(&self) -> &'static str {
        match self {
            ReadingContext::Fasting => "Fasting",
            ReadingContext::BeforeBreakfast => "Before breakfast",
            ReadingContext::BeforeLunch => "Before lunch",
            ReadingContext::BeforeDinner => "Before dinner",
            ReadingContext::AfterBreakfast => "After breakfast",
            ReadingContext::AfterLunch => "After lunch",
            ReadingContext::AfterDinner => "After dinner",
            ReadingContext::Random => "Random",
        }
    }
}

impl fmt::Display for ReadingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReadingContext {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        ReadingContext::ALL
            .into_iter()
            .find(|ctx| ctx.as_str() == normalized)
            .ok_or_else(|| {
                let valid: Vec<&str> = ReadingContext::ALL.iter().map(|c| c.as_str()).collect();
                format!(
                    "Invalid reading context '{}'. Valid options: {}",
                    s,
                    valid.join(", ")
                )
            })
    }
}
