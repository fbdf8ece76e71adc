//! Client-side form checks. A failure here never reaches the network.

use std::sync::LazyLock;

use regex::Regex;

use crate::services::prompts::auth_messages as msg;

use super::{AuthError, ProfileUpdate};

const MIN_NAME_CHARS: usize = 3;
const MIN_PASSWORD_CHARS: usize = 8;

static EMAIL_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE
        .as_ref()
        .map(|re| re.is_match(email))
        .unwrap_or(false)
}

/// Every field problem in a signup form, in field order.
pub fn signup_errors(name: &str, email: &str, password: &str, confirm: &str) -> Vec<AuthError> {
    let mut errors = Vec::new();

    if name.is_empty() {
        errors.push(AuthError::validation("name", msg::NAME_REQUIRED));
    } else if name.chars().count() < MIN_NAME_CHARS {
        errors.push(AuthError::validation("name", msg::NAME_TOO_SHORT));
    }

    if email.is_empty() {
        errors.push(AuthError::validation("email", msg::EMAIL_REQUIRED));
    } else if !is_valid_email(email) {
        errors.push(AuthError::validation("email", msg::EMAIL_INVALID));
    }

    if password.is_empty() {
        errors.push(AuthError::validation("password", msg::PASSWORD_REQUIRED));
    } else if password.chars().count() < MIN_PASSWORD_CHARS {
        errors.push(AuthError::validation("password", msg::PASSWORD_TOO_SHORT));
    }

    if confirm.is_empty() {
        errors.push(AuthError::validation("confirmPassword", msg::CONFIRM_REQUIRED));
    } else if password != confirm {
        errors.push(AuthError::validation("confirmPassword", msg::PASSWORD_MISMATCH));
    }

    errors
}

pub fn validate_login(email: &str, password: &str) -> Result<(), AuthError> {
    if email.trim().is_empty() {
        return Err(AuthError::validation("email", msg::EMAIL_REQUIRED));
    }
    if password.is_empty() {
        return Err(AuthError::validation("password", msg::PASSWORD_REQUIRED));
    }
    Ok(())
}

/// Profile edits: name and email when present, then the password pair.
pub fn validate_profile(patch: &ProfileUpdate, confirm: Option<&str>) -> Result<(), AuthError> {
    if let Some(name) = &patch.name {
        if name.trim().is_empty() {
            return Err(AuthError::validation("name", msg::NAME_EMPTY));
        }
    }
    if let Some(email) = &patch.email {
        if !is_valid_email(email) {
            return Err(AuthError::validation("email", msg::EMAIL_INVALID));
        }
    }
    if let Some(new_password) = &patch.new_password {
        if new_password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(AuthError::validation(
                "newPassword",
                msg::NEW_PASSWORD_TOO_SHORT,
            ));
        }
        if confirm != Some(new_password.as_str()) {
            return Err(AuthError::validation(
                "confirmPassword",
                msg::NEW_PASSWORD_MISMATCH,
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_pattern() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last@bank.example.org"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.d"));
        assert!(!is_valid_email("@c.d"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_signup_valid_form() {
        assert!(signup_errors("Aisha", "aisha@example.com", "password1", "password1").is_empty());
    }

    #[test]
    fn test_signup_reports_every_field() {
        let errors = signup_errors("Al", "not-an-email", "short", "other");
        let messages: Vec<&str> = errors.iter().map(|e| e.message()).collect();
        assert_eq!(
            messages,
            vec![
                msg::NAME_TOO_SHORT,
                msg::EMAIL_INVALID,
                msg::PASSWORD_TOO_SHORT,
                msg::PASSWORD_MISMATCH,
            ]
        );
    }

    #[test]
    fn test_signup_required_fields() {
        let errors = signup_errors("", "", "", "");
        assert_eq!(errors.len(), 4);
        assert_eq!(errors[0].message(), msg::NAME_REQUIRED);
        assert_eq!(errors[3].message(), msg::CONFIRM_REQUIRED);
    }

    #[test]
    fn test_profile_validation() {
        let ok = ProfileUpdate {
            name: Some("Aisha".to_string()),
            email: Some("aisha@example.com".to_string()),
            ..Default::default()
        };
        assert!(validate_profile(&ok, None).is_ok());

        let blank_name = ProfileUpdate {
            name: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(
            validate_profile(&blank_name, None).unwrap_err().message(),
            msg::NAME_EMPTY
        );

        let password = ProfileUpdate {
            current_password: Some("old-password".to_string()),
            new_password: Some("new-password".to_string()),
            ..Default::default()
        };
        assert!(validate_profile(&password, Some("new-password")).is_ok());
        assert_eq!(
            validate_profile(&password, Some("typo")).unwrap_err().message(),
            msg::NEW_PASSWORD_MISMATCH
        );

        let weak = ProfileUpdate {
            new_password: Some("short".to_string()),
            ..Default::default()
        };
        assert_eq!(
            validate_profile(&weak, Some("short")).unwrap_err().message(),
            msg::NEW_PASSWORD_TOO_SHORT
        );
    }
}
