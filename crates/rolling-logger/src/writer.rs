//! Rolling file appender with a tee into the in-memory line buffer.

use std::io::{self, Write};
use std::path::PathBuf;

use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::fmt::MakeWriter;

use crate::buffer::LineBuffer;

/// Number of rotated files kept in the log directory
pub const DEFAULT_MAX_FILES: usize = 3;

#[derive(Debug, Clone)]
pub struct RollingConfig {
    pub dir: PathBuf,
    pub app_name: String,
    pub rotation: Rotation,
    pub max_files: usize,
}

impl RollingConfig {
    pub fn new(dir: PathBuf, app_name: &str) -> Self {
        Self {
            dir,
            app_name: app_name.to_string(),
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
        }
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }
}

/// Parse a rotation period; anything unrecognized rotates daily
pub fn parse_rotation(s: &str) -> Rotation {
    match s.to_lowercase().as_str() {
        "minutely" => Rotation::MINUTELY,
        "hourly" => Rotation::HOURLY,
        "never" => Rotation::NEVER,
        _ => Rotation::DAILY,
    }
}

/// `MakeWriter` that writes every line to the rolling file and the buffer
pub struct BufferedAppender {
    appender: RollingFileAppender,
    buffer: LineBuffer,
}

impl BufferedAppender {
    /// Files are named `<app>.<date>.log`, or `<app>.log` when rotation is `never`
    pub fn open(config: &RollingConfig, buffer: LineBuffer) -> Result<Self, InitError> {
        let appender = RollingFileAppender::builder()
            .rotation(config.rotation.clone())
            .filename_prefix(config.app_name.as_str())
            .filename_suffix("log")
            .max_log_files(config.max_files.max(1))
            .build(&config.dir)?;

        Ok(Self { appender, buffer })
    }
}

impl<'a> MakeWriter<'a> for BufferedAppender {
    type Writer = Tee<<RollingFileAppender as MakeWriter<'a>>::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        Tee {
            inner: self.appender.make_writer(),
            buffer: self.buffer.clone(),
        }
    }
}

/// Forwards writes to `inner` and copies what was written into the buffer
pub struct Tee<W> {
    inner: W,
    buffer: LineBuffer,
}

impl<W: Write> Write for Tee<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.buffer.push_bytes(&buf[..written]);
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
