use std::ffi::OsStr;

use crate::{
    bog::{Bog, BogLevel},
    error::{Error, Result},
    ibog,
};

/// Tokens (compared lowercase) which [`convert_str_to_bool`] reads as `true`
pub const TRUTHY: [&str; 4] = ["yes", "true", "t", "1"];

/// Convert a flag-like token to a bool.
///
/// Absent or empty values are `false` (with an info note). Values which are not valid unicode
/// are a [`Error::TypeMismatch`]. Everything else is `true` only if it is one of [`TRUTHY`],
/// ignoring case.
///
/// # Example
/// ```rust
/// use cli_helper::{bog::BogBuffer, misc::convert_str_to_bool};
///
/// let bog = BogBuffer::new();
/// assert!(convert_str_to_bool(Some("Yes"), &bog).unwrap());
/// assert!(!convert_str_to_bool(std::env::var_os("SURELY_UNSET_FLAG"), &bog).unwrap());
/// ```
pub fn convert_str_to_bool<V: AsRef<OsStr>>(value: Option<V>, bog: &dyn Bog) -> Result<bool> {
    let Some(raw) = value.as_ref().map(|v| AsRef::<OsStr>::as_ref(v)) else {
        ibog!(bog => "'None' is empty!");
        return Ok(false);
    };
    if raw.is_empty() {
        ibog!(bog => "'' is empty!");
        return Ok(false);
    }

    let Some(text) = raw.to_str() else {
        return Err(Error::TypeMismatch {
            value: raw.to_string_lossy().into_owned(),
        });
    };

    let lowered = text.to_lowercase();
    Ok(TRUTHY.contains(&lowered.as_str()))
}

// this would be more useful if try blocks exposed their "other" type
#[easy_ext::ext(ResultExt)]
pub impl<T, E> Result<T, E> {
    /// Convert Err(e) to the string '{prefix}: {e}'
    fn prefix_err(self, prefix: &str) -> Result<T, String>
    where
        E: std::fmt::Display,
    {
        match self {
            Ok(val) => Ok(val),
            Err(e) => Err(format!("{prefix}: {e}")),
        }
    }
}

// -----------------------------------------
/// Minimum [`BogLevel`] requested through `RUST_LOG`, defaulting to info
pub fn level_from_env() -> BogLevel {
    match std::env::var("RUST_LOG")
        .ok()
        .map(|s| s.to_lowercase())
        .as_deref()
    {
        Some("trace") => BogLevel::ALL,
        Some("debug") => BogLevel::DEBUG,
        Some("info") => BogLevel::INFO,
        Some("warn") => BogLevel::WARN,
        Some("error") => BogLevel::ERROR,
        _ => BogLevel::INFO,
    }
}
