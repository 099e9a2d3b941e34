//! Server-side validation rules for user input.
//!
//! These mirror what the registration and post forms also enforce in the
//! browser; the server-side check is the authoritative one.

use crate::error::{Error, Result};

/// Minimum username length in characters.
pub const MIN_USERNAME_LEN: usize = 3;

/// Minimum password length in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Validate registration fields.
///
/// Collects every failing rule into a single [`Error::Validation`] message
/// so the form can show them all at once.
pub fn registration(username: &str, email: &str, password: &str) -> Result<()> {
    let mut problems = Vec::new();

    if username.chars().count() < MIN_USERNAME_LEN {
        problems.push(format!(
            "username must be at least {MIN_USERNAME_LEN} characters"
        ));
    }
    if !plausible_email(email) {
        problems.push("email address is not valid".to_string());
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        problems.push(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        ));
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation(problems.join("; ")))
    }
}

/// Validate post fields. Both title and content must be non-empty after
/// trimming.
pub fn post(title: &str, content: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(Error::Validation("title must not be empty".to_string()));
    }
    if content.trim().is_empty() {
        return Err(Error::Validation("content must not be empty".to_string()));
    }
    Ok(())
}

/// Cheap shape check: one `@` with non-empty local part and a domain
/// containing a dot. Deliverability is not our problem.
fn plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.contains(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_accepts_valid_fields() {
        assert!(registration("alice", "alice@example.com", "hunter22").is_ok());
    }

    #[test]
    fn registration_rejects_short_username() {
        let err = registration("al", "alice@example.com", "hunter22").unwrap_err();
        assert!(err.to_string().contains("username"));
    }

    #[test]
    fn registration_rejects_short_password() {
        let err = registration("alice", "alice@example.com", "pw").unwrap_err();
        assert!(err.to_string().contains("password"));
    }

    #[test]
    fn registration_rejects_bad_email() {
        for email in ["", "alice", "@example.com", "alice@", "alice@nodot", "a b@x.com"] {
            let err = registration("alice", email, "hunter22").unwrap_err();
            assert!(err.to_string().contains("email"), "accepted {email:?}");
        }
    }

    #[test]
    fn registration_collects_all_problems() {
        let err = registration("a", "nope", "x").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("username"));
        assert!(msg.contains("email"));
        assert!(msg.contains("password"));
    }

    #[test]
    fn post_accepts_valid_fields() {
        assert!(post("Hello", "Some *markdown* here").is_ok());
    }

    #[test]
    fn post_rejects_empty_title() {
        let err = post("   ", "content").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn post_rejects_empty_content() {
        let err = post("Title", "\n\t ").unwrap_err();
        assert!(err.to_string().contains("content"));
    }

    #[test]
    fn email_plausibility_edges() {
        assert!(plausible_email("a@b.co"));
        assert!(!plausible_email("a@.com"));
        assert!(!plausible_email("a@com."));
    }
}
