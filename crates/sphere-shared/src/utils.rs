//! Utility functions

/// Canonical form used for storing and comparing email addresses.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn mask_email(email: &str) -> String {
    if let Some(at_pos) = email.find('@') {
        let (local, domain) = email.split_at(at_pos);
        let visible: String = local.chars().take(2).collect();
        if local.chars().count() <= 2 {
            format!("{}***{}", visible.chars().next().unwrap_or('*'), domain)
        } else {
            format!("{}***{}", visible, domain)
        }
    } else {
        "***".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Taro.Yamada@Example.COM "), "taro.yamada@example.com");
    }

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("taro@example.com"), "ta***@example.com");
        assert_eq!(mask_email("ab@example.com"), "a***@example.com");
        assert_eq!(mask_email("not-an-email"), "***");
    }
}
