//! Fetching subsequences from a reference genome.

use std::collections::HashMap;

use crate::core::Position;

/// An error related to fetching a subsequence.
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// The contig is not present in the reference.
    MissingContig(String),

    /// The requested range does not fall within the contig.
    ///
    /// The values are the contig, the start, the end, and the length of the
    /// contig.
    OutOfBounds(String, Position, Position, usize),

    /// The requested range holds a non-ASCII symbol.
    ///
    /// The values are the contig, the start, and the end.
    NonAscii(String, Position, Position),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::MissingContig(contig) => {
                write!(f, "missing contig sequence: {contig}")
            }
            Error::OutOfBounds(contig, start, end, len) => write!(
                f,
                "range {start}-{end} is out of bounds for contig {contig} of length {len}"
            ),
            Error::NonAscii(contig, start, end) => write!(
                f,
                "range {start}-{end} of contig {contig} holds a non-ASCII symbol"
            ),
        }
    }
}

impl std::error::Error for Error {}

/// A source of reference sequence.
pub trait Fetch {
    /// Fetches the 0-based, half-open subsequence `[start, end)` of a contig.
    fn fetch(&self, contig: &str, start: Position, end: Position) -> Result<String, Error>;

    /// Returns whether the reference holds a sequence for the contig.
    fn contains_contig(&self, contig: &str) -> bool;
}

/// An in-memory reference genome keyed by contig name.
///
/// # Examples
///
/// ```
/// use splicekit::sequence::Fetch;
/// use splicekit::sequence::Reference;
///
/// let mut reference = Reference::default();
/// reference.insert("seq0", "ACGTACGT");
///
/// assert_eq!(reference.fetch("seq0", 2, 5)?, "GTA");
/// assert!(reference.fetch("seq1", 0, 1).is_err());
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Reference(HashMap<String, String>);

impl Reference {
    /// Inserts (or replaces) the sequence for a contig.
    pub fn insert(&mut self, contig: impl Into<String>, sequence: impl Into<String>) {
        self.0.insert(contig.into(), sequence.into());
    }

    /// Gets the number of contigs in the reference.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the reference holds no contigs.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Reference
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl Fetch for Reference {
    fn fetch(&self, contig: &str, start: Position, end: Position) -> Result<String, Error> {
        let sequence = self
            .0
            .get(contig)
            .ok_or_else(|| Error::MissingContig(contig.to_string()))?;

        let bytes = sequence
            .as_bytes()
            .get(start..end)
            .ok_or_else(|| Error::OutOfBounds(contig.to_string(), start, end, sequence.len()))?;

        std::str::from_utf8(bytes)
            .ok()
            .filter(|s| s.is_ascii())
            .map(String::from)
            .ok_or_else(|| Error::NonAscii(contig.to_string(), start, end))
    }

    fn contains_contig(&self, contig: &str) -> bool {
        self.0.contains_key(contig)
    }
}
