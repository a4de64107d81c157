//! Shared utility functions.

/// Interpret a textual flag. `1`, `true`, `yes`, `y` and `on` are true
/// (case-insensitive, surrounding whitespace ignored); anything else is false.
pub fn parse_bool_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

/// Parse an environment variable as a boolean, returning `default` if unset.
pub fn env_var_bool(name: &str, default: bool) -> bool {
    std::env::var(name)
        .map(|v| parse_bool_flag(&v))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_flag_accepts_truthy_values() {
        for v in ["1", "true", "TRUE", " yes ", "y", "On"] {
            assert!(parse_bool_flag(v), "{} should be true", v);
        }
    }

    #[test]
    fn parse_bool_flag_rejects_other_values() {
        for v in ["0", "false", "", "nope"] {
            assert!(!parse_bool_flag(v), "{} should be false", v);
        }
    }

    #[test]
    fn env_var_bool_uses_default_when_unset() {
        assert!(env_var_bool("DQ_PIPELINE_TEST_UNSET_FLAG", true));
        assert!(!env_var_bool("DQ_PIPELINE_TEST_UNSET_FLAG", false));
    }
}
