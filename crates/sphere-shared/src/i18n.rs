//! Localized user-facing messages
//!
//! Every error or notice returned to API clients is named by a [`MessageKey`]
//! and rendered in the process-wide [`Locale`], which is set once at startup.

use serde::Deserialize;
use std::sync::OnceLock;

static LOCALE: OnceLock<Locale> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ja,
    En,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Ja => "ja",
            Locale::En => "en",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "ja" => Some(Locale::Ja),
            "en" => Some(Locale::En),
            _ => None,
        }
    }
}

/// Install the process-wide locale. Only the first call has an effect.
pub fn set_locale(locale: Locale) -> bool {
    LOCALE.set(locale).is_ok()
}

pub fn current_locale() -> Locale {
    LOCALE.get().copied().unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKey {
    AuthRequired,
    TokenRequired,
    AuthFailed,
    Forbidden,
    InvalidBusinessCode,
    InvalidCredentials,
    EmailInUse,
    InvitationInvalid,
    InvitationEmailMismatch,
    BusinessNotFound,
    UserNotFound,
    OwnerRoleImmutable,
    CannotRemoveSelf,
    CannotRemoveOwner,
    UserRemoved,
    PasswordPolicy,
    ValidationFailed,
    TooManyRequests,
    ServiceUnavailable,
    ServerError,
}

impl MessageKey {
    /// Stable machine-readable code sent alongside the localized text.
    pub fn code(&self) -> &'static str {
        match self {
            MessageKey::AuthRequired => "AUTH_REQUIRED",
            MessageKey::TokenRequired => "TOKEN_REQUIRED",
            MessageKey::AuthFailed => "AUTH_FAILED",
            MessageKey::Forbidden => "FORBIDDEN",
            MessageKey::InvalidBusinessCode => "INVALID_BUSINESS_CODE",
            MessageKey::InvalidCredentials => "INVALID_CREDENTIALS",
            MessageKey::EmailInUse => "EMAIL_IN_USE",
            MessageKey::InvitationInvalid => "INVITATION_INVALID",
            MessageKey::InvitationEmailMismatch => "INVITATION_EMAIL_MISMATCH",
            MessageKey::BusinessNotFound => "BUSINESS_NOT_FOUND",
            MessageKey::UserNotFound => "USER_NOT_FOUND",
            MessageKey::OwnerRoleImmutable => "OWNER_ROLE_IMMUTABLE",
            MessageKey::CannotRemoveSelf => "CANNOT_REMOVE_SELF",
            MessageKey::CannotRemoveOwner => "CANNOT_REMOVE_OWNER",
            MessageKey::UserRemoved => "USER_REMOVED",
            MessageKey::PasswordPolicy => "PASSWORD_POLICY",
            MessageKey::ValidationFailed => "VALIDATION_ERROR",
            MessageKey::TooManyRequests => "TOO_MANY_REQUESTS",
            MessageKey::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            MessageKey::ServerError => "SERVER_ERROR",
        }
    }
}

pub fn message(key: MessageKey, locale: Locale) -> &'static str {
    match locale {
        Locale::Ja => ja(key),
        Locale::En => en(key),
    }
}

/// Render `key` in the process-wide locale.
pub fn localize(key: MessageKey) -> &'static str {
    message(key, current_locale())
}

fn ja(key: MessageKey) -> &'static str {
    match key {
        MessageKey::AuthRequired => "認証が必要です",
        MessageKey::TokenRequired => "認証トークンが必要です",
        MessageKey::AuthFailed => "認証に失敗しました",
        MessageKey::Forbidden => "権限がありません",
        MessageKey::InvalidBusinessCode => "ビジネスコードが無効です",
        MessageKey::InvalidCredentials => "メールアドレスまたはパスワードが無効です",
        MessageKey::EmailInUse => "このメールアドレスは既に使用されています",
        MessageKey::InvitationInvalid => "招待コードが無効または期限切れです",
        MessageKey::InvitationEmailMismatch => "招待されたメールアドレスと一致しません",
        MessageKey::BusinessNotFound => "会社情報が見つかりません",
        MessageKey::UserNotFound => "ユーザーが見つかりません",
        MessageKey::OwnerRoleImmutable => "ビジネスオーナーの権限は変更できません",
        MessageKey::CannotRemoveSelf => "自分自身を削除することはできません",
        MessageKey::CannotRemoveOwner => "ビジネスオーナーを削除することはできません",
        MessageKey::UserRemoved => "ユーザーを削除しました",
        MessageKey::PasswordPolicy => {
            "パスワードは8文字以上で、大文字、小文字、数字、特殊文字をそれぞれ1つ以上含める必要があります"
        }
        MessageKey::ValidationFailed => "入力内容が正しくありません",
        MessageKey::TooManyRequests => "リクエストが多すぎます。しばらくしてから再試行してください",
        MessageKey::ServiceUnavailable => "サービスを利用できません",
        MessageKey::ServerError => "サーバーエラーが発生しました",
    }
}

fn en(key: MessageKey) -> &'static str {
    match key {
        MessageKey::AuthRequired => "Authentication required",
        MessageKey::TokenRequired => "Authentication token required",
        MessageKey::AuthFailed => "Authentication failed",
        MessageKey::Forbidden => "Permission denied",
        MessageKey::InvalidBusinessCode => "Invalid business code",
        MessageKey::InvalidCredentials => "Invalid email or password",
        MessageKey::EmailInUse => "This email address is already in use",
        MessageKey::InvitationInvalid => "Invitation code is invalid or expired",
        MessageKey::InvitationEmailMismatch => "Email does not match the invitation",
        MessageKey::BusinessNotFound => "Business not found",
        MessageKey::UserNotFound => "User not found",
        MessageKey::OwnerRoleImmutable => "The business owner's role cannot be changed",
        MessageKey::CannotRemoveSelf => "You cannot remove yourself",
        MessageKey::CannotRemoveOwner => "The business owner cannot be removed",
        MessageKey::UserRemoved => "User removed",
        MessageKey::PasswordPolicy => {
            "Password must be at least 8 characters and contain an uppercase letter, a lowercase letter, a digit and a special character"
        }
        MessageKey::ValidationFailed => "Invalid input",
        MessageKey::TooManyRequests => "Too many requests, please retry later",
        MessageKey::ServiceUnavailable => "Service unavailable",
        MessageKey::ServerError => "A server error occurred",
    }
}
