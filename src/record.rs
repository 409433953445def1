//! Output rows of named fields and the sinks that accept them.

use std::io;
use std::io::Write;

/// The tab character.
const TAB: char = '\t';

/// An error related to writing rows.
#[derive(Debug)]
pub enum Error {
    /// An I/O error.
    Io(io::Error),

    /// A row's fields do not match the header written for the first row.
    InconsistentFields(Vec<String>, Vec<String>),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err) => write!(f, "i/o error: {err}"),
            Error::InconsistentFields(expected, found) => write!(
                f,
                "inconsistent fields: expected [{}], found [{}]",
                expected.join(", "),
                found.join(", ")
            ),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// An ordered list of named fields.
///
/// # Examples
///
/// ```
/// use splicekit::record::Row;
///
/// let row = Row::default()
///     .with("transcript_id", "tx0")
///     .with("t_start", 3);
///
/// assert_eq!(row.get("t_start"), Some("3"));
/// assert_eq!(row.names().collect::<Vec<_>>(), vec!["transcript_id", "t_start"]);
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Row(Vec<(String, String)>);

impl Row {
    /// Appends a field to the row.
    pub fn push(&mut self, name: impl Into<String>, value: impl ToString) {
        self.0.push((name.into(), value.to_string()));
    }

    /// Appends a field to the row and returns the row.
    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.push(name, value);
        self
    }

    /// Gets the value of the first field with the given name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    /// Iterates over the field names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    /// Iterates over the field values in order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(_, value)| value.as_str())
    }

    /// Gets the number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the row has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A consumer of rows.
pub trait Sink {
    /// Accepts a single row.
    fn write_row(&mut self, row: Row) -> Result<()>;
}

impl Sink for Vec<Row> {
    fn write_row(&mut self, row: Row) -> Result<()> {
        self.push(row);
        Ok(())
    }
}

/// A sink writing tab-separated rows.
///
/// A header line of field names is written before the first row. Every row
/// thereafter must carry the same field names in the same order.
///
/// # Examples
///
/// ```
/// use splicekit::record::Row;
/// use splicekit::record::Sink;
/// use splicekit::record::TsvWriter;
///
/// let mut writer = TsvWriter::new(Vec::new());
/// writer.write_row(Row::default().with("a", 1).with("b", "x"))?;
/// writer.write_row(Row::default().with("a", 2).with("b", "y"))?;
///
/// let output = String::from_utf8(writer.into_inner())?;
/// assert_eq!(output, "a\tb\n1\tx\n2\ty\n");
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct TsvWriter<W>
where
    W: Write,
{
    /// The inner writer.
    inner: W,

    /// The header, once written.
    header: Option<Vec<String>>,
}

impl<W> TsvWriter<W>
where
    W: Write,
{
    /// Creates a new TSV writer.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            header: None,
        }
    }

    /// Gets a reference to the inner writer.
    pub fn inner(&self) -> &W {
        &self.inner
    }

    /// Consumes self and returns the inner writer.
    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Flushes the inner writer.
    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush().map_err(Error::Io)
    }

    /// Writes a single tab-separated line.
    fn write_line<'a>(&mut self, fields: impl Iterator<Item = &'a str>) -> Result<()> {
        let line = fields.collect::<Vec<_>>().join(&TAB.to_string());
        writeln!(self.inner, "{line}").map_err(Error::Io)
    }
}

impl<W> Sink for TsvWriter<W>
where
    W: Write,
{
    fn write_row(&mut self, row: Row) -> Result<()> {
        let names = row.names().map(String::from).collect::<Vec<_>>();

        match &self.header {
            Some(header) => {
                if *header != names {
                    return Err(Error::InconsistentFields(header.clone(), names));
                }
            }
            None => {
                self.write_line(names.iter().map(String::as_str))?;
                self.header = Some(names);
            }
        }

        self.write_line(row.values())
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn test_row_accessors() {
        let mut row = Row::default();
        assert!(row.is_empty());

        row.push("gene_id", "g0");
        row.push("CDS_start", "NA");
        assert_eq!(row.len(), 2);
        assert_eq!(row.get("gene_id"), Some("g0"));
        assert_eq!(row.get("CDS_end"), None);
        assert_eq!(row.values().collect::<Vec<_>>(), vec!["g0", "NA"]);
    }

    #[test]
    fn test_vec_sink() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mut rows: Vec<Row> = Vec::new();
        rows.write_row(Row::default().with("a", 1))?;
        rows.write_row(Row::default().with("b", 2))?;
        assert_eq!(rows.len(), 2);

        Ok(())
    }

    #[test]
    fn test_tsv_writer_rejects_inconsistent_rows(
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mut writer = TsvWriter::new(Vec::new());
        writer.write_row(Row::default().with("a", 1).with("b", 2))?;

        let err = writer
            .write_row(Row::default().with("b", 2).with("a", 1))
            .unwrap_err();
        assert!(matches!(err, Error::InconsistentFields(_, _)));

        writer.flush()?;
        assert_eq!(writer.inner(), b"a\tb\n1\t2\n");

        Ok(())
    }
}
