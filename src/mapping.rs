//! Strand-aware mapping between transcript offsets and genomic positions.
//!
//! A transcript offset counts bases along the mature (spliced) transcript in
//! its 5' to 3' direction. On the forward strand, offsets increase with the
//! genomic position exon by exon. On the reverse strand, offsets run over the
//! exons in reverse order and are mirrored within each exon, so offset `0` is
//! the last base of the last exon.
//!
//! ```text
//! exons (forward): [0, 10) [20, 30)
//!
//!   offset:   0 ... 9 | 10 ... 19
//!   genomic:  0 ... 9 | 20 ... 29
//!
//! exons (reverse): [0, 10) [20, 30)
//!
//!   offset:    0 ...  9 | 10 ... 19
//!   genomic:  29 ... 20 |  9 ...  0
//! ```

use crate::core::Interval;
use crate::core::Position;
use crate::core::Strand;
use crate::transcript::Transcript;

/// An error related to a coordinate mapping.
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// The transcript offset does not fall within `[0, length)`.
    ///
    /// The values are the offset and the length of the transcript.
    OutOfRange(usize, usize),

    /// A transcript range was empty or inverted.
    InvalidRange(usize, usize),

    /// The genomic position does not fall within any exon.
    NotExonic(Position),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::OutOfRange(offset, len) => write!(
                f,
                "transcript offset {offset} is out of range for a transcript of length {len}"
            ),
            Error::InvalidRange(start, end) => {
                write!(f, "invalid transcript range: {start}-{end}")
            }
            Error::NotExonic(position) => {
                write!(f, "genomic position {position} does not fall within an exon")
            }
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// A cached mapping from transcript offsets to genomic positions.
///
/// The map is built once from a [`Transcript`] and is immutable afterwards.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CoordinateMap {
    /// The strand of the transcript.
    strand: Strand,

    /// The genomic position of each transcript offset.
    positions: Vec<Position>,
}

impl CoordinateMap {
    /// Builds the coordinate map for a transcript.
    ///
    /// # Examples
    ///
    /// ```
    /// use splicekit::core::Strand;
    /// use splicekit::mapping::CoordinateMap;
    /// use splicekit::transcript::Record;
    /// use splicekit::transcript::Transcript;
    ///
    /// let transcript = Transcript::try_from(Record {
    ///     id: String::from("tx0"),
    ///     contig: String::from("seq0"),
    ///     strand: Some(Strand::Forward),
    ///     exons: vec![(0, 10), (20, 30)],
    ///     ..Default::default()
    /// })?;
    ///
    /// let map = CoordinateMap::new(&transcript);
    /// assert_eq!(map.len(), 20);
    /// assert_eq!(map.genomic_position(9)?, 9);
    /// assert_eq!(map.genomic_position(10)?, 20);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(transcript: &Transcript) -> Self {
        let strand = transcript.strand();
        let mut positions = Vec::with_capacity(transcript.spliced_len());

        match strand {
            Strand::Forward => {
                for exon in transcript.exons() {
                    positions.extend(exon.start()..exon.end());
                }
            }
            Strand::Reverse => {
                for exon in transcript.exons().iter().rev() {
                    positions.extend((exon.start()..exon.end()).rev());
                }
            }
        }

        Self { strand, positions }
    }

    /// Gets the strand of the mapped transcript.
    pub fn strand(&self) -> Strand {
        self.strand
    }

    /// Gets the length of the mapped transcript.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns whether the map is empty.
    ///
    /// Maps built from a validated transcript are never empty.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Gets the genomic position of a transcript offset.
    ///
    /// # Examples
    ///
    /// ```
    /// use splicekit::core::Strand;
    /// use splicekit::mapping::CoordinateMap;
    /// use splicekit::mapping::Error;
    /// use splicekit::transcript::Record;
    /// use splicekit::transcript::Transcript;
    ///
    /// let transcript = Transcript::try_from(Record {
    ///     id: String::from("tx0"),
    ///     contig: String::from("seq0"),
    ///     strand: Some(Strand::Reverse),
    ///     exons: vec![(0, 10), (20, 30)],
    ///     ..Default::default()
    /// })?;
    ///
    /// let map = CoordinateMap::new(&transcript);
    /// assert_eq!(map.genomic_position(0)?, 29);
    /// assert_eq!(map.genomic_position(19)?, 0);
    /// assert_eq!(map.genomic_position(20), Err(Error::OutOfRange(20, 20)));
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn genomic_position(&self, offset: usize) -> Result<Position> {
        self.positions
            .get(offset)
            .copied()
            .ok_or(Error::OutOfRange(offset, self.len()))
    }

    /// Gets the transcript offset of a genomic position.
    ///
    /// Positions falling within an intron or outside of the transcript are
    /// [`Error::NotExonic`].
    pub fn transcript_offset(&self, position: Position) -> Result<usize> {
        // Positions ascend on the forward strand and descend on the reverse
        // strand.
        let found = match self.strand {
            Strand::Forward => self.positions.binary_search(&position),
            Strand::Reverse => self
                .positions
                .binary_search_by(|probe| position.cmp(probe)),
        };

        found.map_err(|_| Error::NotExonic(position))
    }

    /// Projects a half-open transcript range onto the genome.
    ///
    /// The genomic positions of `start` and `end - 1` are ordered and one is
    /// added to the upper bound. Ranges that span an intron therefore produce
    /// an interval covering the intron too.
    ///
    /// # Examples
    ///
    /// ```
    /// use splicekit::core::Interval;
    /// use splicekit::core::Strand;
    /// use splicekit::mapping::CoordinateMap;
    /// use splicekit::transcript::Record;
    /// use splicekit::transcript::Transcript;
    ///
    /// let transcript = Transcript::try_from(Record {
    ///     id: String::from("tx0"),
    ///     contig: String::from("seq0"),
    ///     strand: Some(Strand::Reverse),
    ///     exons: vec![(0, 10), (20, 30)],
    ///     ..Default::default()
    /// })?;
    ///
    /// let map = CoordinateMap::new(&transcript);
    /// assert_eq!(map.project(0, 3)?, Interval::try_new(27, 30)?);
    /// assert_eq!(map.project(8, 11)?, Interval::try_new(9, 22)?);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn project(&self, start: usize, end: usize) -> Result<Interval> {
        if start >= end {
            return Err(Error::InvalidRange(start, end));
        }

        let a = self.genomic_position(start)?;
        let b = self.genomic_position(end - 1)?;

        Interval::try_new(a.min(b), a.max(b) + 1).map_err(|_| Error::InvalidRange(start, end))
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::transcript::tests::record;

    fn map(strand: Strand, exons: &[(Position, Position)]) -> CoordinateMap {
        let transcript = Transcript::try_from(record(strand, exons)).unwrap();
        CoordinateMap::new(&transcript)
    }

    #[test]
    fn test_forward_mapping() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let map = map(Strand::Forward, &[(0, 10), (20, 30)]);

        assert_eq!(map.len(), 20);
        assert!(!map.is_empty());
        assert_eq!(map.strand(), Strand::Forward);
        assert_eq!(map.genomic_position(0)?, 0);
        assert_eq!(map.genomic_position(9)?, 9);
        assert_eq!(map.genomic_position(10)?, 20);
        assert_eq!(map.genomic_position(19)?, 29);
        assert_eq!(map.genomic_position(20), Err(Error::OutOfRange(20, 20)));

        Ok(())
    }

    #[test]
    fn test_reverse_mapping() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let map = map(Strand::Reverse, &[(0, 10), (20, 30)]);

        assert_eq!(map.len(), 20);
        assert_eq!(map.genomic_position(0)?, 29);
        assert_eq!(map.genomic_position(9)?, 20);
        assert_eq!(map.genomic_position(10)?, 9);
        assert_eq!(map.genomic_position(19)?, 0);

        Ok(())
    }

    #[test]
    fn test_inverse_lookup() -> std::result::Result<(), Box<dyn std::error::Error>> {
        for strand in [Strand::Forward, Strand::Reverse] {
            let map = map(strand, &[(0, 10), (20, 30), (45, 50)]);

            for offset in 0..map.len() {
                let position = map.genomic_position(offset)?;
                assert_eq!(map.transcript_offset(position)?, offset);
            }

            assert_eq!(map.transcript_offset(15), Err(Error::NotExonic(15)));
            assert_eq!(map.transcript_offset(50), Err(Error::NotExonic(50)));
        }

        Ok(())
    }

    #[test]
    fn test_single_base_projection() -> std::result::Result<(), Box<dyn std::error::Error>> {
        for strand in [Strand::Forward, Strand::Reverse] {
            let map = map(strand, &[(3, 7), (12, 19)]);

            for offset in 0..map.len() {
                let interval = map.project(offset, offset + 1)?;
                assert_eq!(interval.distance(), 1);
                assert_eq!(interval.start(), map.genomic_position(offset)?);
            }
        }

        Ok(())
    }

    #[test]
    fn test_codon_projection() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let map = map(Strand::Forward, &[(0, 10), (20, 30)]);
        assert_eq!(map.project(0, 3)?, Interval::try_new(0, 3)?);
        assert_eq!(map.project(8, 11)?, Interval::try_new(8, 21)?);

        Ok(())
    }

    #[test]
    fn test_invalid_projections() {
        let map = map(Strand::Forward, &[(0, 10)]);
        assert_eq!(map.project(5, 5), Err(Error::InvalidRange(5, 5)));
        assert_eq!(map.project(6, 2), Err(Error::InvalidRange(6, 2)));
        assert_eq!(map.project(8, 11), Err(Error::OutOfRange(10, 10)));
    }
}
