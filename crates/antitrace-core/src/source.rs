//! # Status Sources
//!
//! Where the monitor reads the process status record from.
//!
//! On Linux and Android this is `/proc/<pid>/status`: read-only text made of
//! `key:\tvalue` lines. The [`StatusSource`] trait keeps the monitor
//! independent of procfs so scenarios can be driven from fixtures.
//!
//! Every line handed to the parser is capped at [`STATUS_LINE_MAX`] bytes.
//! Anything past the cap is skipped up to the next newline without being
//! buffered, so line numbering always matches the physical lines of the
//! source and memory stays bounded whatever the source holds.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

/// Upper bound on the bytes kept from a single status line.
pub const STATUS_LINE_MAX: usize = 256;

/// A readable process status record.
///
/// `open` is called once per monitor iteration; the returned reader is
/// dropped (closing the underlying file) before the monitor sleeps.
pub trait StatusSource: Send
{
    /// Name used in diagnostics, usually a path.
    fn describe(&self) -> String;

    /// Open the record for reading from its first line.
    ///
    /// ## Errors
    ///
    /// Any I/O error from opening the record. The monitor treats it as a
    /// permanent loss of the source.
    fn open(&self) -> io::Result<Box<dyn BufRead + Send>>;
}

/// Status record backed by a file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStatusSource
{
    path: PathBuf,
}

impl FileStatusSource
{
    /// Read status from an arbitrary path.
    pub fn new(path: impl Into<PathBuf>) -> Self
    {
        Self { path: path.into() }
    }

    /// `/proc/<pid>/status` for the given process.
    #[must_use]
    pub fn for_pid(pid: u32) -> Self
    {
        Self::new(format!("/proc/{pid}/status"))
    }

    /// `/proc/<pid>/status` for the calling process.
    #[must_use]
    pub fn current_process() -> Self
    {
        Self::for_pid(std::process::id())
    }

    /// Path this source reads from.
    #[must_use]
    pub fn path(&self) -> &Path
    {
        &self.path
    }
}

impl StatusSource for FileStatusSource
{
    fn describe(&self) -> String
    {
        self.path.display().to_string()
    }

    fn open(&self) -> io::Result<Box<dyn BufRead + Send>>
    {
        let file = File::open(&self.path)?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Iterator over the lines of a status record, each capped at
/// [`STATUS_LINE_MAX`] bytes, without their trailing newline.
///
/// Invalid UTF-8 is replaced rather than rejected; only digits and the
/// `key:` prefix matter downstream.
pub struct StatusLines<R>
{
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> StatusLines<R>
{
    pub fn new(reader: R) -> Self
    {
        Self {
            reader,
            buf: Vec::with_capacity(STATUS_LINE_MAX),
        }
    }
}

impl<R: BufRead> StatusLines<R>
{
    /// Consume input up to and including the next newline.
    fn skip_rest_of_line(&mut self) -> io::Result<()>
    {
        loop {
            let available = self.reader.fill_buf()?;
            if available.is_empty() {
                return Ok(());
            }
            let (used, done) = match available.iter().position(|&byte| byte == b'\n') {
                Some(newline) => (newline + 1, true),
                None => (available.len(), false),
            };
            self.reader.consume(used);
            if done {
                return Ok(());
            }
        }
    }
}

impl<R: BufRead> Iterator for StatusLines<R>
{
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item>
    {
        self.buf.clear();
        // One byte past the cap tells a full-length line from a longer one.
        let limit = STATUS_LINE_MAX as u64 + 1;
        match (&mut self.reader).take(limit).read_until(b'\n', &mut self.buf) {
            Ok(0) => return None,
            Ok(_) => {}
            Err(err) => return Some(Err(err)),
        }

        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
        } else if self.buf.len() > STATUS_LINE_MAX {
            self.buf.truncate(STATUS_LINE_MAX);
            if let Err(err) = self.skip_rest_of_line() {
                return Some(Err(err));
            }
        }
        Some(Ok(String::from_utf8_lossy(&self.buf).into_owned()))
    }
}

#[cfg(test)]
mod tests
{
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_for_pid_builds_procfs_path()
    {
        let source = FileStatusSource::for_pid(4242);
        assert_eq!(source.path(), Path::new("/proc/4242/status"));
        assert_eq!(source.describe(), "/proc/4242/status");
    }

    #[test]
    fn test_lines_strip_newline_and_keep_last_unterminated_line()
    {
        let lines: Vec<String> = StatusLines::new(Cursor::new("Name:\tapp\nTracerPid:\t0"))
            .collect::<io::Result<_>>()
            .unwrap();
        assert_eq!(lines, vec!["Name:\tapp".to_string(), "TracerPid:\t0".to_string()]);
    }

    #[test]
    fn test_long_lines_are_capped_without_shifting_numbering()
    {
        let long = "x".repeat(STATUS_LINE_MAX * 2);
        let text = format!("{long}\nnext\n");
        let lines: Vec<String> = StatusLines::new(Cursor::new(text)).collect::<io::Result<_>>().unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), STATUS_LINE_MAX);
        assert_eq!(lines[1], "next");
    }

    #[test]
    fn test_huge_line_does_not_grow_the_buffer()
    {
        let huge = "7".repeat(1 << 20);
        let text = format!("TracerPid:\t{huge}\nUid:\t0\n");
        let mut lines = StatusLines::new(Cursor::new(text));

        let first = lines.next().unwrap().unwrap();
        assert_eq!(first.len(), STATUS_LINE_MAX);
        assert!(lines.buf.capacity() <= 2 * STATUS_LINE_MAX, "{}", lines.buf.capacity());
        assert_eq!(lines.next().unwrap().unwrap(), "Uid:\t0");
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_lines_at_and_just_past_the_cap()
    {
        let exact = "a".repeat(STATUS_LINE_MAX);
        let over = "b".repeat(STATUS_LINE_MAX + 1);
        let text = format!("{exact}\n{over}\nlast");
        let lines: Vec<String> = StatusLines::new(Cursor::new(text)).collect::<io::Result<_>>().unwrap();
        assert_eq!(lines, vec![exact, "b".repeat(STATUS_LINE_MAX), "last".to_string()]);
    }

    #[test]
    fn test_open_missing_file_fails()
    {
        let source = FileStatusSource::new("/definitely/not/here/status");
        assert!(source.open().is_err());
    }
}
