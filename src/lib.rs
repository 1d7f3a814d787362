//! Small, independent helpers for cli entry points
//!
//! Every helper takes a [`bog::Bog`] sink instead of reaching for a global logger,
//! so callers (and tests) decide where messages go.
//!
//! # Error handling strategies:
//! ### Raise
//! [`misc::convert_str_to_bool`], [`benv::get_env_value_or_raise`] and
//! [`release::get_latest_artifact`] return [`Result`]
//! ### Bog
//! [`bs::symlink_force`] never fails: errors are bogged and summarized in a [`bs::SymlinkOutcome`]
//! ### Macros
//! Unwrap errors from Result with [`get_or_bog`], bog and immediately return

pub mod benv; // Environment lookups
pub mod bog; // log
pub mod bs; // Filesystem symlinks
pub mod error;
pub mod macros;
pub mod misc;
pub mod release; // Hosting API downloads

pub use error::{Error, Result};
