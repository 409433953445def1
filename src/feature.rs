//! Sequence features located in transcript space and projected onto the
//! genome.
//!
//! Features are searched for in the assembled (and upper-cased) transcript
//! sequence by a [`Locator`]. Each hit is reported as a [`Feature`] carrying
//! both its transcript offsets and the genomic interval obtained through
//! [`CoordinateMap::project`](crate::mapping::CoordinateMap::project).

pub mod locator;

pub use locator::Locator;

use crate::codon;
use crate::codon::CodonSet;
use crate::core::Interval;
use crate::mapping;
use crate::sequence;

/// An error related to locating features.
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// A coding feature was requested for a non-coding transcript.
    NonCoding(String),

    /// A codon error.
    Codon(codon::Error),

    /// A mapping error.
    Mapping(mapping::Error),

    /// A sequence error.
    Sequence(sequence::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::NonCoding(id) => write!(f, "transcript {id} has no coding region"),
            Error::Codon(err) => write!(f, "codon error: {err}"),
            Error::Mapping(err) => write!(f, "mapping error: {err}"),
            Error::Sequence(err) => write!(f, "sequence error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A located feature.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Feature {
    /// The index of the feature among the hits for its transcript.
    pub index: usize,

    /// The transcript offset of the first base.
    pub t_start: usize,

    /// The transcript offset one past the last base.
    pub t_end: usize,

    /// The genomic interval covered by the feature.
    pub genomic: Interval,

    /// The sequence of the feature in transcript orientation.
    pub sequence: String,

    /// The translated amino acid, for codon features.
    pub amino_acid: Option<char>,
}

/// The kind of feature to search for.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Query {
    /// Every stop codon in the 3' UTR, overlapping matches included.
    UtrStop,

    /// In-frame occurrences of any codon in the set within the CDS.
    CdsCodon(CodonSet),

    /// Every in-frame codon of the CDS.
    CdsAllCodons,

    /// A fixed window around the stop codon: `[CDS_end - 3 + left, CDS_end +
    /// right)`.
    StopKmer {
        /// The offset of the window start relative to the stop codon start.
        left: isize,

        /// The offset of the window end relative to the CDS end.
        right: isize,
    },
}

/// Options applied to a [`Query`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Options {
    /// Keeps only the first `limit` hits per transcript. For
    /// [`Query::CdsAllCodons`], keeps the first `limit` occurrences of each
    /// distinct codon.
    pub limit: Option<usize>,
}

impl Options {
    /// Sets the limit.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }
}
