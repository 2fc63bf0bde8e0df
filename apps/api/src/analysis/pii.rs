//! Redacts contact details from CV text before it leaves the process.

use std::sync::OnceLock;

use regex::{Captures, Regex};

pub const EMAIL_PLACEHOLDER: &str = "[REDACTED_EMAIL]";
pub const PHONE_PLACEHOLDER: &str = "[REDACTED_PHONE]";

/// Digit runs shorter than this are dates, years or postcodes, not phone numbers.
const MIN_PHONE_DIGITS: usize = 9;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid email regex")
    })
}

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:\+\d{1,3}[-. ]?)?(?:\(\d{2,4}\)|\d{2,4})(?:[-. ]?\d{2,4}){2,4}")
            .expect("valid phone regex")
    })
}

pub fn scrub_pii(text: &str) -> String {
    let without_emails = email_regex().replace_all(text, EMAIL_PLACEHOLDER);
    phone_regex()
        .replace_all(&without_emails, |caps: &Captures| {
            let candidate = &caps[0];
            if candidate.chars().filter(|c| c.is_ascii_digit()).count() >= MIN_PHONE_DIGITS {
                PHONE_PLACEHOLDER.to_string()
            } else {
                candidate.to_string()
            }
        })
        .into_owned()
}
