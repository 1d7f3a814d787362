//! Display colored log-style messages for CLI tools
//! Performance is no concern, (hence `bog`), only convenience and style.
//!
//! Helpers never log to a hidden global: they take a `&dyn Bog` and the caller picks the sink.
//! - [`Bogger`]: formatted lines on stdout/stderr, configured once with [`init_bogger`]
//! - [`LogBogger`]: forwards to the `log` facade
//! - [`BogBuffer`]: keeps records in memory, for test harnesses

use std::{
    borrow::Cow,
    fmt::Display,
    io::{Write, stderr, stdout},
    sync::Mutex,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BogLevel {
    NOTE,
    ERROR,
    WARN,
    INFO,
    DEBUG,
    ALL, // this is never shown due to having priority 0
}

impl BogLevel {
    pub fn priority(&self) -> u8 {
        match self {
            BogLevel::NOTE => 120,
            BogLevel::ERROR => 100,
            BogLevel::WARN => 80,
            BogLevel::INFO => 60,
            BogLevel::DEBUG => 40,
            BogLevel::ALL => 0, // don't change
        }
    }
}

/// The logging capability handed to every helper.
pub trait Bog {
    fn bog(&self, level: BogLevel, tag: &str, msg: &str);

    fn info(&self, msg: &str) {
        self.bog(BogLevel::INFO, "", msg);
    }

    fn warn(&self, msg: &str) {
        self.bog(BogLevel::WARN, "", msg);
    }

    fn error(&self, msg: &str) {
        self.bog(BogLevel::ERROR, "", msg);
    }

    fn debug(&self, msg: &str) {
        self.bog(BogLevel::DEBUG, "", msg);
    }
}

pub trait BogFmter {
    fn begin_tag(&self, level: BogLevel) -> String;
    fn end_tag(&self) -> &'static str {
        "\x1b[0m"
    }

    fn push_tag(&self, s: &mut String, tag: &str) {
        if !tag.is_empty() {
            s.push_str(": ");
            s.push_str(tag);
        }
    }

    fn format(&self, level: BogLevel, tag: &str, msg: &str) -> String {
        let mut s = self.begin_tag(level);
        self.push_tag(&mut s, tag);
        s.push_str(self.end_tag());

        if !msg.is_empty() {
            s.push(' ');
            s.push_str(msg);
        }

        s
    }
}

pub struct Fg {}
impl BogFmter for Fg {
    fn begin_tag(&self, level: BogLevel) -> String {
        let (code, level) = match level {
            BogLevel::NOTE => ("34", "NOTE"),  // blue foreground
            BogLevel::ERROR => ("31", "ERRO"), // red foreground
            BogLevel::WARN => ("33", "WARN"),  // yellow foreground
            BogLevel::INFO => ("32", "INFO"),  // green foreground
            BogLevel::DEBUG => ("35", "DBUG"), // purple/magenta foreground
            BogLevel::ALL => ("", ""),         // unreachable
        };
        format!("\x1b[{code}m[{level}")
    }
    fn end_tag(&self) -> &'static str {
        "]\x1b[0m"
    }
}

// --------  GLOBAL  ----------

struct GlobalBogger {
    formatter: Box<dyn BogFmter + Send + Sync>,
    writer: Box<dyn Write + Send + Sync>,
    min_level: u8,
}

impl GlobalBogger {
    fn bog(&mut self, level: BogLevel, tag: &str, msg: &str) {
        if level.priority() < self.min_level {
            return;
        }

        let mut formatted = self.formatter.format(level, tag, msg);
        formatted.push('\n');
        let _ = self.writer.write_all(formatted.as_bytes());
    }
}

// since stderr has an internal lock i guess this isn't a huge deal anyways
static GLOBAL_BOGGER: Mutex<Option<GlobalBogger>> = Mutex::new(None);

/// Writes formatted lines through the process-wide writer.
/// Messages are dropped until [`init_bogger`] is called.
#[derive(Clone, Copy, Debug, Default)]
pub struct Bogger;

impl Bogger {
    #[inline]
    pub fn filter_below(lvl: BogLevel) {
        if let Ok(mut guard) = GLOBAL_BOGGER.lock() {
            if let Some(b) = guard.as_mut() {
                b.min_level = lvl.priority();
            }
        }
    }
}

impl Bog for Bogger {
    // don't panic
    #[inline]
    fn bog(&self, level: BogLevel, tag: &str, msg: &str) {
        if let Ok(mut guard) = GLOBAL_BOGGER.lock() {
            if let Some(b) = guard.as_mut() {
                b.bog(level, tag, msg);
            }
        }
    }
}

pub fn init_bogger(output_stderr: bool) {
    let writer: Box<dyn Write + Send + Sync> = if output_stderr {
        Box::new(stderr())
    } else {
        Box::new(stdout())
    };

    let bogger = GlobalBogger {
        formatter: Box::new(Fg {}),
        writer,
        min_level: BogLevel::DEBUG.priority(),
    };
    if let Ok(mut guard) = GLOBAL_BOGGER.lock() {
        *guard = Some(bogger);
    }
}

/// Initialize the global log filter based on a numeric verbosity level.
///
/// - `0` → show `ERROR` messages only
/// - `1` → show `WARN` and above
/// - `2` → show `INFO` and above
/// - `> 2` → show all messages
pub fn init_filter(verbosity: u8) {
    match verbosity {
        0 => Bogger::filter_below(BogLevel::ERROR),
        1 => Bogger::filter_below(BogLevel::WARN),
        2 => Bogger::filter_below(BogLevel::INFO),
        _ => Bogger::filter_below(BogLevel::ALL),
    }
}

// -------- LOG FACADE ---------

/// Forwards to the `log` crate, for hosts that already install a logger.
#[derive(Clone, Copy, Debug)]
pub struct LogBogger {
    pub target: &'static str,
}

impl Default for LogBogger {
    fn default() -> Self {
        Self { target: "helper" }
    }
}

impl Bog for LogBogger {
    fn bog(&self, level: BogLevel, tag: &str, msg: &str) {
        let level = match level {
            BogLevel::ERROR => log::Level::Error,
            BogLevel::WARN => log::Level::Warn,
            BogLevel::INFO | BogLevel::NOTE => log::Level::Info,
            BogLevel::DEBUG => log::Level::Debug,
            BogLevel::ALL => log::Level::Trace,
        };
        if tag.is_empty() {
            log::log!(target: self.target, level, "{msg}");
        } else {
            log::log!(target: self.target, level, "{tag}: {msg}");
        }
    }
}

// -------- CAPTURE ---------

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BogRecord {
    pub level: BogLevel,
    pub tag: String,
    pub msg: String,
}

#[derive(Debug, Default)]
pub struct BogBuffer {
    records: Mutex<Vec<BogRecord>>,
}

impl BogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<BogRecord> {
        self.records
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Whether a record at `level` contains `needle`
    pub fn contains(&self, level: BogLevel, needle: &str) -> bool {
        self.records()
            .iter()
            .any(|r| r.level == level && r.msg.contains(needle))
    }
}

impl Bog for BogBuffer {
    fn bog(&self, level: BogLevel, tag: &str, msg: &str) {
        if let Ok(mut records) = self.records.lock() {
            records.push(BogRecord {
                level,
                tag: tag.to_string(),
                msg: msg.to_string(),
            });
        }
    }
}

// ----------- MACROS ------------------
// The sink comes first: `ibog!(bog => "msg {}", x)` or `ibog!(bog => "tag"; "msg")`

#[macro_export]
macro_rules! ibog {
    ($bog:expr => $($harg:expr),+ ; $($arg:expr),+) => {{
        $crate::bog::Bog::bog(
            $bog,
            $crate::bog::BogLevel::INFO,
            &format!($($harg),+),
            &format!($($arg),+),
        );
    }};
    ($bog:expr => $($arg:expr),+) => {{
        $crate::bog::Bog::bog($bog, $crate::bog::BogLevel::INFO, "", &format!($($arg),+));
    }};
}

#[macro_export]
macro_rules! dbog {
    ($bog:expr => $($harg:expr),+ ; $($arg:expr),+) => {{
        $crate::bog::Bog::bog(
            $bog,
            $crate::bog::BogLevel::DEBUG,
            &format!($($harg),+),
            &format!($($arg),+),
        );
    }};
    ($bog:expr => $($arg:expr),+) => {{
        $crate::bog::Bog::bog($bog, $crate::bog::BogLevel::DEBUG, "", &format!($($arg),+));
    }};
}

#[macro_export]
macro_rules! wbog {
    ($bog:expr => $($harg:expr),+ ; $($arg:expr),+) => {{
        $crate::bog::Bog::bog(
            $bog,
            $crate::bog::BogLevel::WARN,
            &format!($($harg),+),
            &format!($($arg),+),
        );
    }};
    ($bog:expr => $($arg:expr),+) => {{
        $crate::bog::Bog::bog($bog, $crate::bog::BogLevel::WARN, "", &format!($($arg),+));
    }};
}

#[macro_export]
macro_rules! ebog {
    ($bog:expr => $($harg:expr),+ ; $($arg:expr),+) => {{
        $crate::bog::Bog::bog(
            $bog,
            $crate::bog::BogLevel::ERROR,
            &format!($($harg),+),
            &format!($($arg),+),
        );
    }};
    ($bog:expr => $($arg:expr),+) => {{
        $crate::bog::Bog::bog($bog, $crate::bog::BogLevel::ERROR, "", &format!($($arg),+));
    }};
}

// ----------- RESULT -----------------

/// # Example
/// ```rust
/// use cli_helper::bog::{BogBuffer, BogOkExt};
///
/// let bog = BogBuffer::new();
/// let parsed = "42".parse::<i32>().or_err(&bog);
/// assert_eq!(parsed, Some(42));
/// ```
#[easy_ext::ext(BogOkExt)]
pub impl<T, E: Display> Result<T, E> {
    fn or_bog_tagged<'a>(
        self,
        bog: &dyn Bog,
        level: BogLevel,
        tag: impl Into<Cow<'a, str>>,
    ) -> Option<T> {
        match self {
            Ok(val) => Some(val),
            Err(e) => {
                bog.bog(level, &tag.into(), &e.to_string());
                None
            }
        }
    }

    fn or_err(self, bog: &dyn Bog) -> Option<T> {
        self.or_bog_tagged(bog, BogLevel::ERROR, "")
    }

    fn or_warn(self, bog: &dyn Bog) -> Option<T> {
        self.or_bog_tagged(bog, BogLevel::WARN, "")
    }
}
