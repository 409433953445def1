//! A reader for UCSC refFlat gene annotation files.
//!
//! Each line of a refFlat file describes one transcript with eleven
//! tab-delimited columns:
//!
//! ```text
//! geneName  name  chrom  strand  txStart  txEnd  cdsStart  cdsEnd  exonCount  exonStarts  exonEnds
//! ```
//!
//! Coordinates are 0-based and half-open. The exon lists are comma-separated
//! (usually with a trailing comma). A transcript with `cdsStart == cdsEnd` is
//! non-coding.

use std::fs::File;
use std::io;
use std::io::BufRead;
use std::io::BufReader;
use std::iter;
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::core::strand::ParseStrandError;
use crate::core::Position;
use crate::core::Strand;
use crate::transcript::Record;

/// The new line character.
const NEW_LINE: char = '\n';

/// The carriage return character.
const CARRIAGE_RETURN: char = '\r';

/// The field delimiter.
const DELIMITER: char = '\t';

/// The number of fields in a refFlat line.
const NUM_FIELDS: usize = 11;

/// The feature kind assigned to every refFlat record.
pub const KIND: &str = "transcript";

/// An error related to parsing a refFlat line.
#[derive(Debug, Eq, PartialEq)]
pub enum ParseError {
    /// The line has the wrong number of fields.
    IncorrectNumberOfFields(usize),

    /// The strand is invalid.
    InvalidStrand(ParseStrandError),

    /// A numeric field could not be parsed.
    InvalidNumber(&'static str, String),

    /// The exon count does not match the exon lists.
    ///
    /// The values are the declared count, the number of starts, and the
    /// number of ends.
    ExonCountMismatch(usize, usize, usize),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::IncorrectNumberOfFields(n) => write!(
                f,
                "incorrect number of fields: expected {NUM_FIELDS}, found {n}"
            ),
            ParseError::InvalidStrand(err) => write!(f, "{err}"),
            ParseError::InvalidNumber(field, value) => {
                write!(f, "invalid number for field {field}: {value}")
            }
            ParseError::ExonCountMismatch(count, starts, ends) => write!(
                f,
                "exon count ({count}) does not match the number of exon starts ({starts}) and \
                 exon ends ({ends})"
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// An error related to a refFlat [`Reader`].
#[derive(Debug)]
pub enum Error {
    /// An I/O error.
    Io(io::Error),

    /// A parse error on the given (1-based) line.
    Parse(usize, ParseError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err) => write!(f, "i/o error: {err}"),
            Error::Parse(line, err) => write!(f, "parse error on line {line}: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// Parses a single numeric field.
fn parse_number(field: &'static str, value: &str) -> Result<Position, ParseError> {
    value
        .trim()
        .parse::<Position>()
        .map_err(|_| ParseError::InvalidNumber(field, value.to_string()))
}

/// Parses a comma-separated list of positions.
fn parse_list(field: &'static str, value: &str) -> Result<Vec<Position>, ParseError> {
    value
        .split(',')
        .filter(|v| !v.trim().is_empty())
        .map(|v| parse_number(field, v))
        .collect()
}

/// Parses a single refFlat line into a transcript [`Record`].
///
/// # Examples
///
/// ```
/// use splicekit::core::Strand;
/// use splicekit::refflat;
///
/// let line = "GENE0\ttx0\tseq0\t-\t0\t30\t5\t25\t2\t0,20,\t10,30,";
/// let record = refflat::parse_line(line)?;
///
/// assert_eq!(record.id, "tx0");
/// assert_eq!(record.gene_id, "GENE0");
/// assert_eq!(record.strand, Some(Strand::Reverse));
/// assert_eq!(record.exons, vec![(0, 10), (20, 30)]);
/// assert_eq!(record.coding, Some((5, 25)));
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn parse_line(line: &str) -> Result<Record, ParseError> {
    let fields = line.split(DELIMITER).collect::<Vec<_>>();

    if fields.len() != NUM_FIELDS {
        return Err(ParseError::IncorrectNumberOfFields(fields.len()));
    }

    let strand = fields[3]
        .parse::<Strand>()
        .map_err(ParseError::InvalidStrand)?;

    let tx_start = parse_number("txStart", fields[4])?;
    let tx_end = parse_number("txEnd", fields[5])?;
    let cds_start = parse_number("cdsStart", fields[6])?;
    let cds_end = parse_number("cdsEnd", fields[7])?;
    let exon_count = parse_number("exonCount", fields[8])?;
    let starts = parse_list("exonStarts", fields[9])?;
    let ends = parse_list("exonEnds", fields[10])?;

    if starts.len() != exon_count || ends.len() != exon_count {
        return Err(ParseError::ExonCountMismatch(
            exon_count,
            starts.len(),
            ends.len(),
        ));
    }

    let coding = match cds_start == cds_end {
        true => None,
        false => Some((cds_start, cds_end)),
    };

    Ok(Record {
        id: fields[1].to_string(),
        gene_id: fields[0].to_string(),
        gene_name: fields[0].to_string(),
        contig: fields[2].to_string(),
        kind: KIND.to_string(),
        strand: Some(strand),
        span: Some((tx_start, tx_end)),
        exons: starts.into_iter().zip(ends).collect(),
        coding,
    })
}

/// A refFlat reader.
#[derive(Clone, Debug)]
pub struct Reader<T>(T)
where
    T: BufRead;

impl<T> Reader<T>
where
    T: BufRead,
{
    /// Creates a refFlat reader.
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    /// Gets a reference to the inner reader.
    pub fn inner(&self) -> &T {
        &self.0
    }

    /// Consumes self and returns the inner reader.
    pub fn into_inner(self) -> T {
        self.0
    }

    /// Returns an iterator over the records in the underlying reader.
    ///
    /// Empty lines and lines starting with `#` are skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// use splicekit::refflat;
    ///
    /// let data = b"#geneName\tname\n\
    ///     GENE0\ttx0\tseq0\t+\t0\t30\t0\t0\t2\t0,20,\t10,30,\n\
    ///     GENE1\ttx1\tseq1\t+\t0\t30\t0\t0\t1\t0,\t30,\n";
    ///
    /// let mut reader = refflat::Reader::new(&data[..]);
    /// let records = reader.records().collect::<Result<Vec<_>, _>>()?;
    ///
    /// assert_eq!(records.len(), 2);
    /// assert_eq!(records[0].coding, None);
    /// assert_eq!(records[1].contig, "seq1");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn records(&mut self) -> impl Iterator<Item = Result<Record, Error>> + '_ {
        let mut buffer = String::new();
        let mut line = 0;

        iter::from_fn(move || loop {
            line += 1;

            match read_line(&mut self.0, &mut buffer) {
                Ok(0) => return None,
                Ok(_) => {
                    if buffer.trim().is_empty() || buffer.starts_with('#') {
                        continue;
                    }

                    return Some(parse_line(&buffer).map_err(|e| Error::Parse(line, e)));
                }
                Err(e) => return Some(Err(Error::Io(e))),
            }
        })
    }
}

/// Opens a refFlat file, decompressing it when the path ends in `.gz`.
pub fn open<P>(path: P) -> io::Result<Reader<Box<dyn BufRead>>>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)?;

    let inner: Box<dyn BufRead> = match path.extension().is_some_and(|ext| ext == "gz") {
        true => Box::new(BufReader::new(MultiGzDecoder::new(file))),
        false => Box::new(BufReader::new(file)),
    };

    Ok(Reader::new(inner))
}

/// Reads a line from a buffered reader, stripping the line ending.
fn read_line<T>(reader: &mut T, buffer: &mut String) -> io::Result<usize>
where
    T: BufRead,
{
    buffer.clear();

    let n = reader.read_line(buffer)?;

    if buffer.ends_with(NEW_LINE) {
        buffer.pop();

        if buffer.ends_with(CARRIAGE_RETURN) {
            buffer.pop();
        }
    }

    Ok(n)
}
