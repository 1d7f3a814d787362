// BOG

/// Unwrap a `Result`, or bog the error (prefixed) to the given sink and return early.
///
/// `get_or_bog!(bog, expr, prefix)` returns `Default::default()`,
/// `get_or_bog!(bog, expr, prefix, ret)` returns `ret`.
#[macro_export]
macro_rules! get_or_bog {
    ($bog:expr, $expr:expr, $bog_prefix:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => {
                $crate::ebog!($bog => "{}: {e}", $bog_prefix);
                return Default::default();
            }
        }
    };

    ($bog:expr, $expr:expr, $bog_prefix:expr, $return:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => {
                $crate::ebog!($bog => "{}: {e}", $bog_prefix);
                return $return;
            }
        }
    };
}
