//! Input rules for phone/OTP sign-in.

use thiserror::Error;

/// Digits in a local phone number, excluding the country code.
pub const PHONE_DIGITS: usize = 10;
pub const OTP_DIGITS: usize = 6;

/// Shown when verification fails without a server message.
pub const INVALID_OTP_MESSAGE: &str = "Invalid OTP. Please try again.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthInputError {
    #[error("Please enter a valid 10-digit phone number")]
    InvalidPhone,
    #[error("Please enter a 6-digit OTP")]
    InvalidOtp,
}

/// Turns a typed local number into the full international form sent to the
/// server, e.g. `"98765 43210"` → `"+919876543210"`.
///
/// Spaces and dashes are ignored. Anything else must be a digit, and there
/// must be exactly [`PHONE_DIGITS`] of them.
pub fn full_phone(input: &str, country_code: &str) -> Result<String, AuthInputError> {
    let mut digits = String::with_capacity(PHONE_DIGITS);
    for c in input.chars() {
        match c {
            '0'..='9' => digits.push(c),
            ' ' | '-' => {}
            _ => return Err(AuthInputError::InvalidPhone),
        }
    }
    if digits.len() != PHONE_DIGITS {
        return Err(AuthInputError::InvalidPhone);
    }
    Ok(format!("{}{}", country_code, digits))
}

pub fn check_otp(input: &str) -> Result<&str, AuthInputError> {
    let otp = input.trim();
    if otp.len() == OTP_DIGITS && otp.chars().all(|c| c.is_ascii_digit()) {
        Ok(otp)
    } else {
        Err(AuthInputError::InvalidOtp)
    }
}

/// `+919876543210` → `+91 987654***3210`.
pub fn mask_phone(phone: &str, country_code: &str) -> String {
    match phone.strip_prefix(country_code) {
        Some(local) if local.len() == PHONE_DIGITS && local.is_ascii() => {
            format!("{} {}***{}", country_code, &local[..6], &local[6..])
        }
        _ => phone.to_string(),
    }
}

/// Keeps the first and last four characters of a token.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
