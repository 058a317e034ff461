use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;

use env_logger::{fmt::Formatter, Builder, Target, WriteStyle};
use log::{Level, LevelFilter};

use crate::error::OptimizerError;

/// Log line layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    /// Compact plus the log target
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            other => Err(format!("unknown log format '{other}', expected compact or pretty")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogOptions {
    pub level: LevelFilter,
    pub format: LogFormat,
    pub timestamp: bool,
    /// Log file; `None` logs to stderr
    pub output: Option<PathBuf>,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            level: LevelFilter::Info,
            format: LogFormat::Compact,
            timestamp: true,
            output: None,
        }
    }
}

pub fn init_logger(options: &LogOptions) -> Result<(), OptimizerError> {
    let log_format = options.format;
    let log_timestamp = options.timestamp;

    let mut builder = Builder::new();
    builder
        .filter_level(options.level)
        .write_style(WriteStyle::Never)
        .format(move |buf: &mut Formatter, record| {
            if log_timestamp {
                write!(buf, "{} ", buf.timestamp_millis())?;
            }

            match log_format {
                LogFormat::Compact => {
                    writeln!(buf, "{} {}", level_tag(record.level()), record.args())
                }
                LogFormat::Pretty => writeln!(
                    buf,
                    "{} [{}] {}",
                    level_tag(record.level()),
                    record.target(),
                    record.args()
                ),
            }
        });

    match &options.output {
        Some(path) => {
            let file = File::create(path).map_err(|e| OptimizerError::io(path.as_path(), e))?;
            builder.target(Target::Pipe(Box::new(file)));
        }
        None => {
            builder.target(Target::Stderr);
        }
    }

    builder
        .try_init()
        .map_err(|e| OptimizerError::Logger(e.to_string()))
}

fn level_tag(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}
