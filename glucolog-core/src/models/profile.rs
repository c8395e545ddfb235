use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            _ => Err(format!(
                "Invalid gender '{}'. Valid options: male, female",
                s
            )),
        }
    }
}

/// A single field-level problem found by [`ProfileForm::validate`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Name is required")]
    NameRequired,
    #[error("Please select gender")]
    GenderRequired,
    #[error("Age is required")]
    AgeRequired,
    #[error("Enter an age between 13-120")]
    AgeOutOfRange,
    #[error("Email is required")]
    EmailRequired,
    #[error("Enter a valid email")]
    EmailInvalid,
}

pub const MIN_AGE: u32 = 13;
pub const MAX_AGE: u32 = 120;

/// Raw profile input, exactly as typed.
#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
    pub gender: Option<Gender>,
    pub age: String,
}

/// Body of `POST /profile/create`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewProfile {
    pub name: String,
    pub email: String,
    pub gender: Gender,
    pub age: u32,
}

impl ProfileForm {
    /// Checks every field and returns all problems at once, or the
    /// normalized request body.
    pub fn validate(&self) -> Result<NewProfile, Vec<ValidationError>> {
        let mut errors = Vec::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push(ValidationError::NameRequired);
        }

        if self.gender.is_none() {
            errors.push(ValidationError::GenderRequired);
        }

        let age = self.age.trim();
        let parsed_age = if age.is_empty() {
            errors.push(ValidationError::AgeRequired);
            None
        } else {
            match age.parse::<u32>() {
                Ok(n) if (MIN_AGE..=MAX_AGE).contains(&n) => Some(n),
                _ => {
                    errors.push(ValidationError::AgeOutOfRange);
                    None
                }
            }
        };

        let email = self.email.trim();
        if email.is_empty() {
            errors.push(ValidationError::EmailRequired);
        } else if !is_valid_email(email) {
            errors.push(ValidationError::EmailInvalid);
        }

        match (self.gender, parsed_age) {
            (Some(gender), Some(age)) if errors.is_empty() => Ok(NewProfile {
                name: name.to_string(),
                email: email.to_lowercase(),
                gender,
                age,
            }),
            _ => Err(errors),
        }
    }
}

/// `local@domain.tld`, no whitespace, exactly one `@`.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}
