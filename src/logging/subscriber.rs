//! Tracing subscriber setup: console formatter, file layer, and initialisation.
use std::fs;
use std::io::Write as _;
use std::sync::Mutex;

use super::logger::{STAGE_TARGET, STATUS_TARGET};
use super::types::Tag;
use super::utils::{format_utc_datetime, format_utc_time, log_file_path, strip_ansi};

/// Extracts the `message` and `tag` fields from a [`tracing::Event`].
#[derive(Default)]
struct FieldExtractor {
    message: String,
    tag: Option<String>,
}

impl tracing::field::Visit for FieldExtractor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{value:?}"),
            "tag" => self.tag = Some(format!("{value:?}").trim_matches('"').to_string()),
            _ => {}
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "tag" => self.tag = Some(value.to_string()),
            _ => {}
        }
    }
}

impl FieldExtractor {
    fn from_event(event: &tracing::Event<'_>) -> Self {
        let mut extractor = Self::default();
        event.record(&mut extractor);
        extractor
    }
}

/// A [`tracing_subscriber::Layer`] that appends all events to the persistent
/// log file with timestamps and ANSI codes stripped.
///
/// Always captures events at `DEBUG` level and above regardless of the
/// console verbosity setting.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Create the cache directory, truncate the log file for `command`, write
    /// a run header, and return a layer appending to it.
    ///
    /// Returns `None` if the cache directory cannot be created or the file
    /// cannot be opened.
    pub(super) fn new(command: &str) -> Option<Self> {
        let path = log_file_path(command)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).ok()?;
        }
        let version = option_env!("LINK_DOTFILES_VERSION")
            .unwrap_or(concat!("dev-", env!("CARGO_PKG_VERSION")));
        let header = format!(
            "==========================================\n\
             link-dotfiles {version} {command} {}\n\
             ==========================================\n",
            format_utc_datetime(),
        );
        fs::write(&path, header).ok()?;
        let file = fs::OpenOptions::new().append(true).open(&path).ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let metadata = event.metadata();
        let fields = FieldExtractor::from_event(event);
        let msg = strip_ansi(&fields.message);
        let ts = format_utc_time();

        let line = match (*metadata.level(), metadata.target(), fields.tag) {
            (_, STAGE_TARGET, _) => format!("[{ts}] ==> {msg}"),
            (_, STATUS_TARGET, Some(tag)) => format!("[{ts}]     {tag} {msg}"),
            (tracing::Level::DEBUG | tracing::Level::TRACE, _, _) => {
                format!("[{ts}]     [debug] {msg}")
            }
            _ => format!("[{ts}]     {msg}"),
        };

        if let Ok(mut f) = self.file.lock() {
            writeln!(f, "{line}").ok();
        }
    }
}

/// A [`tracing_subscriber::fmt::FormatEvent`] that renders tagged status
/// lines with a colored tag.
struct StatusFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for StatusFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();
        let fields = FieldExtractor::from_event(event);
        let msg = &fields.message;

        match (metadata.target(), fields.tag.as_deref()) {
            (STAGE_TARGET, _) => writeln!(writer, "\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m"),
            (STATUS_TARGET, Some(tag)) => {
                let color = Tag::from_bracketed(tag).map_or("", Tag::color);
                writeln!(writer, "{color}{tag}\x1b[0m {msg}")
            }
            _ if *metadata.level() == tracing::Level::DEBUG => {
                writeln!(writer, "\x1b[2m{msg}\x1b[0m")
            }
            _ => writeln!(writer, "{msg}"),
        }
    }
}

/// Initialise the global [`tracing`] subscriber.
///
/// Warnings and errors go to stderr, everything else to stdout. Debug lines
/// reach the console only when `verbose` is set but are always written to
/// `$XDG_CACHE_HOME/link-dotfiles/<command>.log`. `RUST_LOG` overrides the
/// console filter when present.
/// Must be called once at program startup, before any logging.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        EnvFilter, Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let console_filter = EnvFilter::builder()
        .with_default_directive(console_level.into())
        .from_env_lossy();

    let make_writer = std::io::stderr
        .with_max_level(tracing::Level::WARN)
        .or_else(std::io::stdout);

    let console_layer = fmt::layer()
        .event_format(StatusFormatter)
        .with_writer(make_writer)
        .with_filter(console_filter);

    let file_layer = FileLayer::new(command).map(|l| l.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}
