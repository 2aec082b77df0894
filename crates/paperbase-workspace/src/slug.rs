//! Workspace name and slug validation.
//!
//! Slugs are the human-facing routing key, so they are validated before the
//! registry is ever invoked: lowercase alphanumeric segments joined by
//! single hyphens, no leading/trailing hyphen.

use rand::Rng;
use thiserror::Error;

pub const WORKSPACE_NAME_MAX_LENGTH: usize = 50;
pub const WORKSPACE_SLUG_MAX_LENGTH: usize = 50;

const SUFFIX_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const SUFFIX_LENGTH: usize = 6;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("workspace name cannot be empty")]
    EmptyName,
    #[error("workspace name must be {WORKSPACE_NAME_MAX_LENGTH} characters or less")]
    NameTooLong,
    #[error("workspace slug cannot be empty")]
    EmptySlug,
    #[error("workspace slug must be {WORKSPACE_SLUG_MAX_LENGTH} characters or less")]
    SlugTooLong,
    #[error(
        "workspace slug must contain only lowercase letters, numbers, and hyphens (not at start/end)"
    )]
    InvalidSlug,
}

/// Validate a workspace name: 1–50 characters after trimming.
pub fn validate_workspace_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if trimmed.chars().count() > WORKSPACE_NAME_MAX_LENGTH {
        return Err(ValidationError::NameTooLong);
    }
    Ok(())
}

/// Validate a workspace slug: lowercase alphanumeric segments joined by
/// single hyphens, 1–50 characters.
pub fn validate_workspace_slug(slug: &str) -> Result<(), ValidationError> {
    if slug.is_empty() {
        return Err(ValidationError::EmptySlug);
    }
    if slug.len() > WORKSPACE_SLUG_MAX_LENGTH {
        return Err(ValidationError::SlugTooLong);
    }
    let valid = slug
        .split('-')
        .all(|seg| !seg.is_empty() && seg.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()));
    if !valid {
        return Err(ValidationError::InvalidSlug);
    }
    Ok(())
}

/// Sanitize a workspace name: trim, strip control characters, collapse
/// whitespace runs.
pub fn sanitize_workspace_name(name: &str) -> String {
    name.split_whitespace()
        .map(|word| word.chars().filter(|c| !c.is_control()).collect::<String>())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Derive a slug from a workspace name, with a random suffix so that
/// same-named workspaces don't collide.
pub fn slug_from_name(name: &str) -> String {
    let mut base = String::new();
    let mut last_hyphen = true; // suppress a leading hyphen
    for c in name.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            base.push(c);
            last_hyphen = false;
        } else if !last_hyphen {
            base.push('-');
            last_hyphen = true;
        }
    }
    let base = base.trim_matches('-');

    let mut rng = rand::rng();
    let suffix: String = (0..SUFFIX_LENGTH)
        .map(|_| char::from(SUFFIX_CHARSET[rng.random_range(0..SUFFIX_CHARSET.len())]))
        .collect();

    // Keep room for the suffix inside the slug length cap.
    let max_base = WORKSPACE_SLUG_MAX_LENGTH - SUFFIX_LENGTH - 1;
    let base = if base.len() > max_base {
        base[..max_base].trim_end_matches('-')
    } else {
        base
    };

    if base.is_empty() {
        suffix
    } else {
        format!("{base}-{suffix}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_names() {
        assert!(validate_workspace_name("Acme").is_ok());
        assert!(validate_workspace_name("  padded  ").is_ok());
        assert!(validate_workspace_name(&"x".repeat(50)).is_ok());
    }

    #[test]
    fn invalid_names() {
        assert_eq!(validate_workspace_name(""), Err(ValidationError::EmptyName));
        assert_eq!(
            validate_workspace_name("   "),
            Err(ValidationError::EmptyName)
        );
        assert_eq!(
            validate_workspace_name(&"x".repeat(51)),
            Err(ValidationError::NameTooLong)
        );
    }

    #[test]
    fn valid_slugs() {
        for slug in ["acme", "acme-inc", "a1-b2-c3", "42"] {
            assert!(validate_workspace_slug(slug).is_ok(), "{slug}");
        }
    }

    #[test]
    fn invalid_slugs() {
        assert_eq!(validate_workspace_slug(""), Err(ValidationError::EmptySlug));
        for slug in ["-acme", "acme-", "a--b", "Acme", "a_b", "a b", "émile"] {
            assert_eq!(
                validate_workspace_slug(slug),
                Err(ValidationError::InvalidSlug),
                "{slug}"
            );
        }
        assert_eq!(
            validate_workspace_slug(&"a".repeat(51)),
            Err(ValidationError::SlugTooLong)
        );
    }

    #[test]
    fn sanitize_collapses_whitespace_and_strips_controls() {
        assert_eq!(sanitize_workspace_name("  Acme   Inc  "), "Acme Inc");
        assert_eq!(sanitize_workspace_name("Ac\u{0000}me\u{0007}"), "Acme");
    }

    #[test]
    fn generated_slug_is_valid_and_unique() {
        let a = slug_from_name("Acme Inc.");
        let b = slug_from_name("Acme Inc.");
        assert!(validate_workspace_slug(&a).is_ok(), "{a}");
        assert!(a.starts_with("acme-inc-"));
        assert_ne!(a, b);
    }

    #[test]
    fn generated_slug_from_symbols_only_is_still_valid() {
        let slug = slug_from_name("!!!");
        assert!(validate_workspace_slug(&slug).is_ok(), "{slug}");
        assert_eq!(slug.len(), SUFFIX_LENGTH);
    }

    #[test]
    fn generated_slug_respects_length_cap() {
        let slug = slug_from_name(&"very long workspace name ".repeat(5));
        assert!(slug.len() <= WORKSPACE_SLUG_MAX_LENGTH);
        assert!(validate_workspace_slug(&slug).is_ok(), "{slug}");
    }
}
