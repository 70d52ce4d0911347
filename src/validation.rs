// src/validation.rs
//! Input checks run by the CLI and TUI before anything reaches the managers.
use chrono::NaiveTime;
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\d\s\-()]+$").expect("phone pattern"));

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_PHONE_DIGITS: usize = 10;
pub const MIN_NAME_LEN: usize = 2;

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone) && digits(phone).len() >= MIN_PHONE_DIGITS
}

pub fn is_valid_name(name: &str) -> bool {
    name.trim().chars().count() >= MIN_NAME_LEN
}

/// `HH:MM`, 24-hour clock.
pub fn is_valid_time_slot(time: &str) -> bool {
    time.len() == 5 && NaiveTime::parse_from_str(time, "%H:%M").is_ok()
}

fn digits(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Formats a Brazilian phone number as it is typed: `(11) 99999-9999` for
/// mobiles, `(11) 9999-9999` for landlines. Inputs with more than eleven
/// digits are returned unchanged.
pub fn format_phone(phone: &str) -> String {
    let digits = digits(phone);
    match digits.len() {
        11 => format!("({}) {}-{}", &digits[..2], &digits[2..7], &digits[7..]),
        10 => format!("({}) {}-{}", &digits[..2], &digits[2..6], &digits[6..]),
        n if n < 10 => digits,
        _ => phone.to_string(),
    }
}
