//! Form validators shared by signup, profile and the admin product editor.
//!
//! Every validator returns a [`Validation`] carrying the message to show next
//! to the field; the SDK's own operations turn a failed one into
//! [`SdkError::InvalidArgument`](crate::error::SdkError::InvalidArgument).

use rust_decimal::Decimal;

use crate::error::SdkError;

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_NAME_LEN: usize = 2;
const MIN_PHONE_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub is_valid: bool,
    pub message: String,
}

impl Validation {
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            message: String::new(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: message.into(),
        }
    }

    pub fn into_result(self) -> Result<(), SdkError> {
        if self.is_valid {
            Ok(())
        } else {
            Err(SdkError::InvalidArgument(self.message))
        }
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// `local@domain.tld` with no whitespace and exactly one `@`.
pub fn validate_email(email: &str) -> Validation {
    if is_blank(email) {
        return Validation::fail("Email is required");
    }
    let well_formed = !email.chars().any(char::is_whitespace)
        && email.split_once('@').is_some_and(|(local, domain)| {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .rsplit_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        });
    if well_formed {
        Validation::ok()
    } else {
        Validation::fail("Please enter a valid email address")
    }
}

pub fn validate_password(password: &str, min_len: usize) -> Validation {
    if is_blank(password) {
        return Validation::fail("Password is required");
    }
    if password.chars().count() < min_len {
        return Validation::fail(format!(
            "Password must be at least {min_len} characters long"
        ));
    }
    Validation::ok()
}

pub fn validate_name(name: &str, min_len: usize) -> Validation {
    let name = name.trim();
    if name.is_empty() {
        return Validation::fail("Name is required");
    }
    if name.chars().count() < min_len {
        return Validation::fail(format!("Name must be at least {min_len} characters long"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphabetic() || c.is_whitespace() || c == '\'' || c == '-')
    {
        return Validation::fail("Name can only contain letters, spaces, hyphens, and apostrophes");
    }
    Validation::ok()
}

/// Phone is optional; when present it needs at least ten characters of
/// digits, spaces and `-+()`.
pub fn validate_phone(phone: &str) -> Validation {
    let phone = phone.trim();
    if phone.is_empty() {
        return Validation::ok();
    }
    let allowed = phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '+' | '(' | ')'));
    if allowed && phone.chars().count() >= MIN_PHONE_LEN {
        Validation::ok()
    } else {
        Validation::fail("Please enter a valid phone number")
    }
}

pub fn validate_required(value: &str, field: &str) -> Validation {
    if is_blank(value) {
        Validation::fail(format!("{field} is required"))
    } else {
        Validation::ok()
    }
}

pub fn validate_price(value: Decimal, min: Decimal) -> Validation {
    if value < min {
        Validation::fail(format!("Price must be at least {min}"))
    } else {
        Validation::ok()
    }
}

pub fn validate_stock(value: i64) -> Validation {
    if value < 0 {
        Validation::fail("Stock quantity cannot be negative")
    } else {
        Validation::ok()
    }
}

pub fn validate_url(url: &str) -> Validation {
    let url = url.trim();
    if url.is_empty() {
        return Validation::fail("URL is required");
    }
    match reqwest::Url::parse(url) {
        Ok(_) => Validation::ok(),
        Err(_) => Validation::fail("Please enter a valid URL"),
    }
}

/// At least one URL; every one must parse.
pub fn validate_image_urls<S: AsRef<str>>(urls: &[S]) -> Validation {
    let urls: Vec<&str> = urls
        .iter()
        .map(|u| u.as_ref().trim())
        .filter(|u| !u.is_empty())
        .collect();
    if urls.is_empty() {
        return Validation::fail("At least one image URL is required");
    }
    match urls.iter().find(|u| !validate_url(u).is_valid) {
        Some(bad) => Validation::fail(format!("Invalid URL: {bad}")),
        None => Validation::ok(),
    }
}

/// Split the admin form's comma-separated image field.
pub fn split_image_urls(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(str::to_string)
        .collect()
}
