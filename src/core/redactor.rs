//! Secret Redaction
//!
//! Keeps API keys and authorization values out of log output.

use regex_lite::Regex;
use std::sync::OnceLock;

/// Placeholder text for redacted secrets
pub const REDACTED: &str = "[REDACTED]";

/// Flags whose values must never be logged
const SENSITIVE_FLAGS: [&str; 2] = ["--api-key", "--auth-header"];

fn bearer_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"(?i)\b(bearer|basic|token)\s+[A-Za-z0-9._~+/=-]+").expect("Invalid bearer regex")
    })
}

fn url_userinfo_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"(?i)(https?://)[^/@\s]+@").expect("Invalid userinfo regex"))
}

/// Secret redactor for log lines
pub struct SecretRedactor;

impl SecretRedactor {
    /// Redact the values of sensitive CLI flags
    ///
    /// Handles both `--api-key value` and `--api-key=value`.
    pub fn redact_args(args: &[String]) -> Vec<String> {
        let mut result = Vec::with_capacity(args.len());
        let mut redact_next = false;
        for arg in args {
            if redact_next {
                result.push(REDACTED.to_string());
                redact_next = false;
            } else if let Some(flag) = SENSITIVE_FLAGS.iter().find(|f| arg.starts_with(*f)) {
                if arg.len() > flag.len() && arg[flag.len()..].starts_with('=') {
                    result.push(format!("{}={}", flag, REDACTED));
                } else {
                    result.push(arg.clone());
                    redact_next = arg.len() == flag.len();
                }
            } else {
                result.push(arg.clone());
            }
        }
        result
    }

    /// Redact authorization credentials and URL userinfo inside free text
    pub fn redact_text(text: &str) -> String {
        let text = bearer_regex().replace_all(text, format!("$1 {}", REDACTED).as_str());
        url_userinfo_regex()
            .replace_all(&text, format!("${{1}}{}@", REDACTED).as_str())
            .to_string()
    }

    /// Show only that an authorization value exists
    pub fn mask_authorization(value: &str) -> String {
        match value.split_once(' ') {
            Some((scheme, _)) => format!("{} {}", scheme, REDACTED),
            None => REDACTED.to_string(),
        }
    }
}
