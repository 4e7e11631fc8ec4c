//! Application-wide constants

pub const DEFAULT_TOKEN_EXPIRY_SECS: i64 = 86_400;
pub const DEFAULT_BCRYPT_COST: u32 = 10;
pub const DEFAULT_INVITATION_TTL_DAYS: i64 = 7;
pub const MIN_PASSWORD_LENGTH: usize = 8;
/// bcrypt ignores everything past its first 72 input bytes.
pub const MAX_PASSWORD_BYTES: usize = 72;
pub const MIN_USERNAME_LENGTH: u64 = 3;
pub const MAX_USERNAME_LENGTH: u64 = 50;
pub const MAX_BUSINESS_NAME_LENGTH: u64 = 100;
pub const MAX_CODE_ATTEMPTS: usize = 5;
pub const MAX_TOKEN_EXPIRY_SECS: i64 = 365 * 86_400;
pub const MAX_INVITATION_TTL_DAYS: i64 = 3_650;

/// Placeholder secret shipped in the defaults. Refused in production.
pub const DEV_JWT_SECRET: &str = "sphere_secret_key_change_in_production";
