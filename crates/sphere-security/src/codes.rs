//! Human-shareable tenant and invitation codes
//!
//! Business codes look like `B4K7Q2Z`, invitation codes like `INV8D3KQ0ZA`.

use rand::Rng;
use regex::Regex;
use std::sync::OnceLock;

const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub const BUSINESS_CODE_PREFIX: &str = "B";
pub const BUSINESS_CODE_LEN: usize = 6;
pub const INVITATION_CODE_PREFIX: &str = "INV";
pub const INVITATION_CODE_LEN: usize = 8;

fn random_code(prefix: &str, len: usize) -> String {
    let mut rng = rand::rng();
    let mut code = String::with_capacity(prefix.len() + len);
    code.push_str(prefix);
    for _ in 0..len {
        let idx = rng.random_range(0..CODE_CHARSET.len());
        code.push(CODE_CHARSET[idx] as char);
    }
    code
}

pub fn generate_business_code() -> String {
    random_code(BUSINESS_CODE_PREFIX, BUSINESS_CODE_LEN)
}

pub fn generate_invitation_code() -> String {
    random_code(INVITATION_CODE_PREFIX, INVITATION_CODE_LEN)
}

/// Canonical form of a code typed by a user.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

fn business_code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^B[A-Z0-9]{6}$").expect("valid business code pattern"))
}

fn invitation_code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^INV[A-Z0-9]{8}$").expect("valid invitation code pattern"))
}

pub fn is_business_code(code: &str) -> bool {
    business_code_pattern().is_match(code)
}

pub fn is_invitation_code(code: &str) -> bool {
    invitation_code_pattern().is_match(code)
}
