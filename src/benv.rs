//! Environment lookups

use std::env::{self, VarError};

use crate::{
    bog::Bog,
    ebog,
    error::{Error, Result},
    misc::convert_str_to_bool,
};

/// Get the value of a variable the cli cannot run without.
///
/// The value is returned untouched (not trimmed), but must be non-empty and not only whitespace.
/// Lookups which cannot be performed (malformed key, non-unicode value) are bogged and returned
/// as errors.
pub fn get_env_value_or_raise(key: &str, bog: &dyn Bog) -> Result<String> {
    if key.is_empty() || key.contains(|c: char| c == '=' || c == '\0') {
        let err = Error::InvalidEnvKey {
            key: key.to_string(),
        };
        ebog!(bog => "{err}");
        return Err(err);
    }

    match env::var(key) {
        Ok(value) if value.is_empty() => Err(Error::ConfigurationMissing {
            key: key.to_string(),
        }),
        Ok(value) if value.trim().is_empty() => Err(Error::ConfigurationInvalid {
            key: key.to_string(),
        }),
        Ok(value) => Ok(value),
        Err(VarError::NotPresent) => Err(Error::ConfigurationMissing {
            key: key.to_string(),
        }),
        Err(VarError::NotUnicode(_)) => {
            let err = Error::EnvNotUnicode {
                key: key.to_string(),
            };
            ebog!(bog => "{err}");
            Err(err)
        }
    }
}

/// Read a variable as a flag, see [`convert_str_to_bool`]. Unset is `false`.
pub fn env_flag(key: &str, bog: &dyn Bog) -> Result<bool> {
    convert_str_to_bool(env::var_os(key), bog)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bog::{BogBuffer, BogLevel};

    const KEY: &str = "CLI_HELPER_TEST_REQUIRED";

    #[test]
    fn missing_when_unset() {
        let bog = BogBuffer::new();
        temp_env::with_var_unset(KEY, || {
            let err = get_env_value_or_raise(KEY, &bog).unwrap_err();
            assert!(matches!(err, Error::ConfigurationMissing { ref key } if key == KEY));
            assert_eq!(err.to_string(), format!("'{KEY}' is missing."));
        });
    }

    #[test]
    fn missing_when_empty() {
        let bog = BogBuffer::new();
        temp_env::with_var(KEY, Some(""), || {
            let err = get_env_value_or_raise(KEY, &bog).unwrap_err();
            assert!(matches!(err, Error::ConfigurationMissing { .. }));
        });
    }

    #[test]
    fn invalid_when_whitespace() {
        let bog = BogBuffer::new();
        temp_env::with_var(KEY, Some("   "), || {
            let err = get_env_value_or_raise(KEY, &bog).unwrap_err();
            assert!(matches!(err, Error::ConfigurationInvalid { .. }));
            assert_eq!(err.to_string(), format!("'{KEY}' contains only white space."));
        });
    }

    #[test]
    fn returns_value_unchanged() {
        let bog = BogBuffer::new();
        temp_env::with_var(KEY, Some("abc"), || {
            assert_eq!(get_env_value_or_raise(KEY, &bog).unwrap(), "abc");
        });
        temp_env::with_var(KEY, Some(" padded "), || {
            assert_eq!(get_env_value_or_raise(KEY, &bog).unwrap(), " padded ");
        });
        assert!(bog.records().is_empty());
    }

    #[test]
    fn malformed_key_is_bogged_and_surfaced() {
        let bog = BogBuffer::new();
        for key in ["", "A=B", "NUL\0KEY"] {
            let err = get_env_value_or_raise(key, &bog).unwrap_err();
            assert!(matches!(err, Error::InvalidEnvKey { .. }));
        }
        let records = bog.records();
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.level == BogLevel::ERROR));
    }

    #[cfg(unix)]
    #[test]
    fn non_unicode_value_is_bogged_and_surfaced() {
        use std::ffi::OsString;
        use std::os::unix::ffi::OsStringExt;

        let bog = BogBuffer::new();
        let value = OsString::from_vec(vec![0x66, 0x6f, 0x80]);
        temp_env::with_var(KEY, Some(value), || {
            let err = get_env_value_or_raise(KEY, &bog).unwrap_err();
            assert!(matches!(err, Error::EnvNotUnicode { .. }));
        });
        assert!(bog.contains(BogLevel::ERROR, KEY));
    }

    #[test]
    fn flag_from_env() {
        let bog = BogBuffer::new();
        temp_env::with_var("CLI_HELPER_TEST_FLAG", Some("True"), || {
            assert!(env_flag("CLI_HELPER_TEST_FLAG", &bog).unwrap());
        });
        temp_env::with_var("CLI_HELPER_TEST_FLAG", Some("off"), || {
            assert!(!env_flag("CLI_HELPER_TEST_FLAG", &bog).unwrap());
        });
        temp_env::with_var_unset("CLI_HELPER_TEST_FLAG", || {
            assert!(!env_flag("CLI_HELPER_TEST_FLAG", &bog).unwrap());
        });
    }
}
