//! A line-oriented reader shared by every tabular input.

use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::io::{self};
use std::iter;
use std::path::Path;
use std::string::FromUtf8Error;

use flate2::read::MultiGzDecoder;

/// The new line character.
const NEW_LINE: u8 = b'\n';

/// The carriage return character.
const CARRIAGE_RETURN: u8 = b'\r';

/// The file extension that marks a gzip-compressed input.
const GZIP_EXTENSION: &str = "gz";

/// A boxed, buffered reader as returned by [`open()`].
pub type BoxedBufRead = Box<dyn BufRead>;

/// A line as yielded by [`Reader::lines()`].
///
/// A line that is not valid UTF-8 is handed back as an error so that callers
/// can skip it as a malformed row without abandoning the rest of the stream.
pub type Line = std::result::Result<String, FromUtf8Error>;

/// A line-oriented reader over tabular text.
#[derive(Clone, Debug)]
pub struct Reader<T>(T)
where
    T: BufRead;

impl<T> Reader<T>
where
    T: BufRead,
{
    /// Creates a reader.
    ///
    /// # Examples
    ///
    /// ```
    /// let data = b"chr1\tsrc\tCDS\t1\t10\t.\t+\t0\tlocus_tag=g1";
    /// let reader = genebridge::Reader::new(&data[..]);
    /// ```
    pub fn new(inner: T) -> Self {
        Self::from(inner)
    }

    /// Gets a reference to the inner reader.
    pub fn inner(&self) -> &T {
        &self.0
    }

    /// Gets a mutable reference to the inner reader.
    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.0
    }

    /// Consumes self and returns the inner reader.
    pub fn into_inner(self) -> T {
        self.0
    }

    /// Reads a raw line of bytes from the underlying reader.
    ///
    /// The trailing line terminator (if any) is stripped from `buffer`. The
    /// returned value is the number of bytes consumed, so `0` signals the end
    /// of the stream.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io;
    ///
    /// let data = b"g1\t2.0\t0.001\r\ng2\t0.1\t0.5";
    /// let mut reader = genebridge::Reader::new(&data[..]);
    ///
    /// let mut buffer = Vec::new();
    ///
    /// assert_eq!(reader.read_line_raw(&mut buffer)?, 14);
    /// assert_eq!(buffer, b"g1\t2.0\t0.001");
    ///
    /// assert_eq!(reader.read_line_raw(&mut buffer)?, 10);
    /// assert_eq!(buffer, b"g2\t0.1\t0.5");
    ///
    /// assert_eq!(reader.read_line_raw(&mut buffer)?, 0);
    ///
    /// # Ok::<(), io::Error>(())
    /// ```
    pub fn read_line_raw(&mut self, buffer: &mut Vec<u8>) -> io::Result<usize> {
        read_line(self.inner_mut(), buffer)
    }

    /// Returns an iterator over the lines in the underlying reader.
    ///
    /// The outer [`Result`](io::Result) carries I/O failures, which end the
    /// stream. The inner [`Line`] is an error only for a line that is not
    /// valid UTF-8.
    ///
    /// # Examples
    ///
    /// ```
    /// let data = b"g1\t2.0\t0.001\n\xff\t0.1\t0.5\n";
    /// let mut reader = genebridge::Reader::new(&data[..]);
    ///
    /// let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;
    ///
    /// assert_eq!(lines.len(), 2);
    /// assert_eq!(lines[0], Ok(String::from("g1\t2.0\t0.001")));
    /// assert!(lines[1].is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn lines(&mut self) -> impl Iterator<Item = io::Result<Line>> + '_ {
        let mut buffer = Vec::new();

        iter::from_fn(move || match self.read_line_raw(&mut buffer) {
            Ok(0) => None,
            Ok(_) => Some(Ok(String::from_utf8(buffer.clone()))),
            Err(e) => Some(Err(e)),
        })
    }
}

impl<T> From<T> for Reader<T>
where
    T: BufRead,
{
    fn from(inner: T) -> Self {
        Self(inner)
    }
}

/// Opens the file at `path` as a [`Reader`].
///
/// Files ending in `.gz` are decompressed on the fly.
pub fn open(path: impl AsRef<Path>) -> io::Result<Reader<BoxedBufRead>> {
    let path = path.as_ref();
    let file = File::open(path)?;

    let inner: BoxedBufRead = match path.extension().and_then(|ext| ext.to_str()) {
        Some(GZIP_EXTENSION) => Box::new(BufReader::new(MultiGzDecoder::new(file))),
        _ => Box::new(BufReader::new(file)),
    };

    Ok(Reader::new(inner))
}

/// Returns whether a line carries no data (blank or a `#` comment).
pub(crate) fn is_skippable(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Reads a line of bytes from a buffered reader.
fn read_line<T>(reader: &mut T, buffer: &mut Vec<u8>) -> io::Result<usize>
where
    T: BufRead,
{
    buffer.clear();

    match reader.read_until(NEW_LINE, buffer) {
        Ok(0) => Ok(0),
        Ok(n) => {
            if buffer.last() == Some(&NEW_LINE) {
                buffer.pop();

                if buffer.last() == Some(&CARRIAGE_RETURN) {
                    buffer.pop();
                }
            }

            Ok(n)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::io::Write as _;

    use flate2::Compression;
    use flate2::write::GzEncoder;

    use super::*;

    #[test]
    fn test_read_line() {
        let data = b"hello\r\nworld!";
        let mut cursor = io::Cursor::new(data);

        let mut buffer = Vec::new();
        let len = read_line(&mut cursor, &mut buffer).unwrap();
        assert_eq!(buffer, b"hello");
        assert_eq!(len, 7);

        let len = read_line(&mut cursor, &mut buffer).unwrap();
        assert_eq!(buffer, b"world!");
        assert_eq!(len, 6);
    }

    #[test]
    fn test_skippable_lines() {
        assert!(is_skippable(""));
        assert!(is_skippable("   "));
        assert!(is_skippable("##gff-version 3"));
        assert!(!is_skippable("chr1\tsrc\tCDS"));
    }

    #[test]
    fn test_lines_keeps_empty_lines() -> Result<(), Box<dyn std::error::Error>> {
        let data = b"a\n\nb";
        let mut reader = Reader::new(&data[..]);
        let lines = reader
            .lines()
            .collect::<io::Result<Vec<_>>>()?
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?;
        assert_eq!(lines, vec!["a", "", "b"]);
        Ok(())
    }

    #[test]
    fn test_lines_survive_invalid_utf8() -> Result<(), Box<dyn std::error::Error>> {
        let data = b"g1\t2.0\n\xff\t1.0\ng2\t1.0\n";
        let mut reader = Reader::new(&data[..]);
        let lines = reader.lines().collect::<io::Result<Vec<_>>>()?;

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], Ok(String::from("g1\t2.0")));
        assert!(lines[1].is_err());
        assert_eq!(lines[2], Ok(String::from("g2\t1.0")));

        Ok(())
    }

    #[test]
    fn test_open_gzip() -> Result<(), Box<dyn std::error::Error>> {
        let path = std::env::temp_dir().join(format!(
            "genebridge-reader-{}.tsv.gz",
            std::process::id()
        ));

        let mut encoder = GzEncoder::new(File::create(&path)?, Compression::default());
        encoder.write_all(b"g1\t2.0\t0.001\ng2\t0.1\t0.5\n")?;
        encoder.finish()?;

        let mut reader = open(&path)?;
        let lines = reader
            .lines()
            .collect::<io::Result<Vec<_>>>()?
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?;
        std::fs::remove_file(&path)?;

        assert_eq!(lines, vec!["g1\t2.0\t0.001", "g2\t0.1\t0.5"]);
        Ok(())
    }
}
