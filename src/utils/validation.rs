use crate::error::{AppError, AppResult};

/// Rejects values whose length in characters is outside `min..=max`.
pub fn require_len(field: &str, value: &str, min: usize, max: usize) -> AppResult<()> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(AppError::validation(format!(
            "{field} must be between {min} and {max} characters"
        )));
    }
    Ok(())
}

pub fn optional_len(field: &str, value: Option<&str>, max: usize) -> AppResult<()> {
    match value {
        Some(v) if v.chars().count() > max => Err(AppError::validation(format!(
            "{field} must be at most {max} characters"
        ))),
        _ => Ok(()),
    }
}

/// Shape check only: `local@domain.tld`, no whitespace.
pub fn require_email(value: &str) -> AppResult<()> {
    require_len("email", value, 3, 100)?;

    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if !valid {
        return Err(AppError::validation("email is not a valid address"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("jane@example.com", true)]
    #[case("jane.doe+hr@mail.example.org", true)]
    #[case("jane@localhost", false)]
    #[case("@example.com", false)]
    #[case("jane@@example.com", false)]
    #[case("jane doe@example.com", false)]
    #[case("jane@example.", false)]
    fn email_shape(#[case] email: &str, #[case] ok: bool) {
        assert_eq!(require_email(email).is_ok(), ok);
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        assert!(require_len("name", "王经理", 1, 3).is_ok());
        assert!(require_len("name", "", 1, 3).is_err());
        assert!(optional_len("notes", Some(&"x".repeat(501)), 500).is_err());
        assert!(optional_len("notes", None, 500).is_ok());
    }
}
