use thiserror::Error;

/// An environment variable required by the feed client is not set (or empty).
#[derive(Debug, Error)]
#[error("Missing environment variable: {0}")]
pub struct MissingEnvVarError(pub String);

/// Reads a non-empty environment variable. Blank values count as unset.
pub fn get_env_var(name: &str) -> Result<String, MissingEnvVarError> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(MissingEnvVarError(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn reads_present_variable() {
        unsafe { std::env::set_var("CRYPTO_FEED_TEST_VAR", "abc") };
        assert_eq!(get_env_var("CRYPTO_FEED_TEST_VAR").unwrap(), "abc");
        unsafe { std::env::remove_var("CRYPTO_FEED_TEST_VAR") };
    }

    #[test]
    #[serial]
    fn blank_and_missing_are_errors() {
        unsafe { std::env::set_var("CRYPTO_FEED_TEST_VAR", "  ") };
        let err = get_env_var("CRYPTO_FEED_TEST_VAR").unwrap_err();
        assert_eq!(err.0, "CRYPTO_FEED_TEST_VAR");

        unsafe { std::env::remove_var("CRYPTO_FEED_TEST_VAR") };
        assert!(get_env_var("CRYPTO_FEED_TEST_VAR").is_err());
    }
}
