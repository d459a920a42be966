//! Request field validation helpers
//!
//! Validation failures collect human-readable messages that handlers return
//! as a 400 problem response with an `errors` array.

use regex::Regex;
use std::sync::OnceLock;

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap())
}

pub fn validate_email(email: &str, errors: &mut Vec<String>) {
    if !email_regex().is_match(email) {
        errors.push("email must be a valid email address".to_string());
    }
}

pub fn validate_password(password: &str, errors: &mut Vec<String>) {
    if password.len() < 8 || password.len() > 128 {
        errors.push("password must be between 8 and 128 characters".to_string());
    }
}

pub fn validate_name(name: &str, field: &str, errors: &mut Vec<String>) {
    let len = name.trim().chars().count();
    if !(2..=100).contains(&len) {
        errors.push(format!("{} must be between 2 and 100 characters", field));
    }
}

pub fn validate_company(company: &str, errors: &mut Vec<String>) {
    if company.chars().count() > 200 {
        errors.push("company must be at most 200 characters".to_string());
    }
}
