use lazy_static::lazy_static;
use regex::Regex;

/// What kind of login handle an input is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    Username,
    Email,
}

/// Classifies a handle as an email iff it contains `@`.
///
/// Deliberately a syntactic heuristic, not RFC sniffing: a malformed string
/// with `@` stays classified as an email so the caller reports an
/// invalid-email error instead of silently reapplying the username rules.
pub fn classify_handle(input: &str) -> HandleKind {
    if input.contains('@') {
        HandleKind::Email
    } else {
        HandleKind::Username
    }
}

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn is_valid_username(username: &str) -> bool {
    lazy_static! {
        static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9._]{3,20}$").unwrap();
    }
    USERNAME_RE.is_match(username)
}

/// Registration-time password rules, checked in a fixed order; only the
/// first failing check's reason is surfaced.
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.chars().count() < 8 {
        return Err("Password is too short, at least 8 characters required");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err("Password must contain an uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err("Password must contain a lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("Password must contain a digit");
    }
    Ok(())
}

/// Legacy login-time length rule (>= 6, no composition checks).
///
/// Intentionally a separate path from [`validate_password`]: the two
/// thresholds diverge in the deployed behavior and are kept that way.
pub fn validate_login_password(password: &str) -> bool {
    password.chars().count() >= 6
}
