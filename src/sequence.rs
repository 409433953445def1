//! Strand-aware assembly of transcript sequences.

pub mod fetch;

pub use fetch::Fetch;
pub use fetch::Reference;

use crate::core::Strand;
use crate::mapping;
use crate::mapping::CoordinateMap;
use crate::transcript::Transcript;

/// An error related to assembling a transcript sequence.
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// A fetch error.
    Fetch(fetch::Error),

    /// A mapping error.
    Mapping(mapping::Error),

    /// The sequence holds a non-ASCII symbol at the given byte offset.
    NonAscii(usize),

    /// The coding region does not fall within the sequence.
    ///
    /// The values are the start, the end, and the length of the sequence.
    CodingOutOfBounds(usize, usize, usize),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Fetch(err) => write!(f, "fetch error: {err}"),
            Error::Mapping(err) => write!(f, "mapping error: {err}"),
            Error::NonAscii(offset) => {
                write!(f, "non-ASCII symbol at sequence offset {offset}")
            }
            Error::CodingOutOfBounds(start, end, len) => write!(
                f,
                "coding region {start}-{end} does not fall within a sequence of length {len}"
            ),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// Complements a single nucleotide, preserving case.
///
/// Symbols other than `A`, `C`, `G`, and `T` are returned unchanged.
fn complement(base: char) -> char {
    match base {
        'A' => 'T',
        'T' => 'A',
        'C' => 'G',
        'G' => 'C',
        'a' => 't',
        't' => 'a',
        'c' => 'g',
        'g' => 'c',
        other => other,
    }
}

/// Reverse complements a nucleotide sequence.
///
/// Case is preserved and any symbol other than `A`, `C`, `G`, or `T` (such as
/// `N`) is carried over unchanged.
///
/// # Examples
///
/// ```
/// use splicekit::sequence::reverse_complement;
///
/// assert_eq!(reverse_complement("ACGTN"), "NACGT");
/// assert_eq!(reverse_complement("aaCg"), "cGtt");
/// ```
pub fn reverse_complement(sequence: &str) -> String {
    sequence.chars().rev().map(complement).collect()
}

/// Assembles the mature sequence of a transcript in its 5' to 3' direction.
///
/// Each exon is fetched and the pieces are concatenated. On the reverse strand,
/// the exons are visited in reverse order and each piece is reverse
/// complemented.
///
/// # Examples
///
/// ```
/// use splicekit::core::Strand;
/// use splicekit::sequence;
/// use splicekit::sequence::Reference;
/// use splicekit::transcript::Record;
/// use splicekit::transcript::Transcript;
///
/// let reference = Reference::from_iter([("seq0", "AAACCCGGGTTT")]);
///
/// let transcript = Transcript::try_from(Record {
///     id: String::from("tx0"),
///     contig: String::from("seq0"),
///     strand: Some(Strand::Reverse),
///     exons: vec![(0, 3), (6, 9)],
///     ..Default::default()
/// })?;
///
/// assert_eq!(sequence::assemble(&transcript, &reference)?, "CCCTTT");
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn assemble<F>(transcript: &Transcript, fetcher: &F) -> std::result::Result<String, fetch::Error>
where
    F: Fetch + ?Sized,
{
    let contig = transcript.contig();
    let mut result = String::with_capacity(transcript.spliced_len());

    match transcript.strand() {
        Strand::Forward => {
            for exon in transcript.exons() {
                result.push_str(&fetcher.fetch(contig, exon.start(), exon.end())?);
            }
        }
        Strand::Reverse => {
            for exon in transcript.exons().iter().rev() {
                let piece = fetcher.fetch(contig, exon.start(), exon.end())?;
                result.push_str(&reverse_complement(&piece));
            }
        }
    }

    Ok(result)
}

/// An assembled transcript sequence with its coding region, if any.
///
/// The coding region is held as transcript offsets `[cds_start, cds_end)`,
/// which split the sequence into the 5' UTR, the CDS, and the 3' UTR.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TranscriptSequence {
    /// The assembled sequence.
    sequence: String,

    /// The transcript offsets of the coding region.
    coding: Option<(usize, usize)>,
}

impl TranscriptSequence {
    /// Attempts to create a transcript sequence from an assembled sequence and
    /// an optional coding region in transcript offsets.
    ///
    /// The sequence must be ASCII, and the coding region must satisfy
    /// `start <= end <= len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splicekit::sequence::TranscriptSequence;
    ///
    /// let sequence = TranscriptSequence::try_new("ccATGAAATAAgg", Some((2, 11)))?;
    ///
    /// assert_eq!(sequence.utr5(), Some("cc"));
    /// assert_eq!(sequence.cds(), Some("ATGAAATAA"));
    /// assert_eq!(sequence.utr3(), Some("gg"));
    /// assert_eq!(sequence.coding(), Some((2, 11)));
    ///
    /// assert!(TranscriptSequence::try_new("ACGT", Some((2, 10))).is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_new(sequence: impl Into<String>, coding: Option<(usize, usize)>) -> Result<Self> {
        let sequence = sequence.into();

        if let Some(offset) = sequence.bytes().position(|b| !b.is_ascii()) {
            return Err(Error::NonAscii(offset));
        }

        if let Some((start, end)) = coding {
            if start > end || end > sequence.len() {
                return Err(Error::CodingOutOfBounds(start, end, sequence.len()));
            }
        }

        Ok(Self { sequence, coding })
    }

    /// Assembles the sequence of a transcript and places its coding region.
    ///
    /// The coding region of the transcript (a genomic span) is converted into
    /// transcript offsets through the coordinate map, so both ends of the
    /// coding span must fall within an exon.
    pub fn try_from_transcript<F>(
        transcript: &Transcript,
        map: &CoordinateMap,
        fetcher: &F,
    ) -> Result<Self>
    where
        F: Fetch + ?Sized,
    {
        let sequence = assemble(transcript, fetcher).map_err(Error::Fetch)?;

        let coding = match transcript.coding() {
            Some(span) => {
                let a = map
                    .transcript_offset(span.start())
                    .map_err(Error::Mapping)?;
                let b = map
                    .transcript_offset(span.end() - 1)
                    .map_err(Error::Mapping)?;
                Some((a.min(b), a.max(b) + 1))
            }
            None => None,
        };

        Self::try_new(sequence, coding)
    }

    /// Gets the full sequence.
    pub fn as_str(&self) -> &str {
        &self.sequence
    }

    /// Gets the length of the sequence.
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// Returns whether the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Gets the coding region as `(cds_start, cds_end)` transcript offsets.
    pub fn coding(&self) -> Option<(usize, usize)> {
        self.coding
    }

    /// Gets the 5' UTR.
    pub fn utr5(&self) -> Option<&str> {
        self.coding.and_then(|(start, _)| self.sequence.get(..start))
    }

    /// Gets the coding sequence.
    pub fn cds(&self) -> Option<&str> {
        self.coding
            .and_then(|(start, end)| self.sequence.get(start..end))
    }

    /// Gets the 3' UTR.
    pub fn utr3(&self) -> Option<&str> {
        self.coding.and_then(|(_, end)| self.sequence.get(end..))
    }

    /// Returns a copy with the sequence upper-cased.
    pub fn to_uppercase(&self) -> Self {
        Self {
            sequence: self.sequence.to_ascii_uppercase(),
            coding: self.coding,
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::transcript::tests::record;

    #[test]
    fn test_reverse_complement() {
        assert_eq!(reverse_complement(""), "");
        assert_eq!(reverse_complement("ACGT"), "ACGT");
        assert_eq!(reverse_complement("AAAC"), "GTTT");
        assert_eq!(reverse_complement("acgtRYN-"), "-NYRacgt");

        let sequence = "ATGcgtNNNtagCCA";
        assert_eq!(reverse_complement(&reverse_complement(sequence)), sequence);
    }

    #[test]
    fn test_assemble_both_strands() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let genome = "ACGTACGTAATTTTTTTTTTGGCCAACCTT";
        let reference = Reference::from_iter([("seq0", genome)]);

        let forward = Transcript::try_from(record(Strand::Forward, &[(0, 10), (20, 30)]))?;
        let reverse = Transcript::try_from(record(Strand::Reverse, &[(0, 10), (20, 30)]))?;

        let f = assemble(&forward, &reference)?;
        let r = assemble(&reverse, &reference)?;

        assert_eq!(f.len(), 20);
        assert_eq!(f, "ACGTACGTAAGGCCAACCTT");
        assert_eq!(r, reverse_complement(&f));

        Ok(())
    }

    #[test]
    fn test_assemble_missing_contig() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let reference = Reference::from_iter([("seq1", "ACGT")]);
        let transcript = Transcript::try_from(record(Strand::Forward, &[(0, 2)]))?;

        assert_eq!(
            assemble(&transcript, &reference),
            Err(fetch::Error::MissingContig(String::from("seq0")))
        );

        Ok(())
    }

    #[test]
    fn test_transcript_sequence_regions() -> std::result::Result<(), Box<dyn std::error::Error>>
    {
        //              0         1         2
        //              012345678901234567890123456789
        let genome = "ccATGAAAxxxxxxxxxxxxTAAggxxxxx";
        let reference = Reference::from_iter([("seq0", genome)]);

        let mut r = record(Strand::Forward, &[(0, 8), (20, 25)]);
        r.coding = Some((2, 23));
        let transcript = Transcript::try_from(r)?;
        let map = CoordinateMap::new(&transcript);

        let sequence = TranscriptSequence::try_from_transcript(&transcript, &map, &reference)?;
        assert_eq!(sequence.as_str(), "ccATGAAATAAgg");
        assert_eq!(sequence.coding(), Some((2, 11)));
        assert_eq!(sequence.utr5(), Some("cc"));
        assert_eq!(sequence.cds(), Some("ATGAAATAA"));
        assert_eq!(sequence.utr3(), Some("gg"));
        assert_eq!(sequence.to_uppercase().as_str(), "CCATGAAATAAGG");

        Ok(())
    }

    #[test]
    fn test_transcript_sequence_reverse() -> std::result::Result<(), Box<dyn std::error::Error>>
    {
        // The reverse complement of "ccATGAAATAAgg" laid out on the genome.
        let genome = "ccTTATTTCATgg";
        let reference = Reference::from_iter([("seq0", genome)]);

        let mut r = record(Strand::Reverse, &[(0, 13)]);
        r.coding = Some((2, 11));
        let transcript = Transcript::try_from(r)?;
        let map = CoordinateMap::new(&transcript);

        let sequence = TranscriptSequence::try_from_transcript(&transcript, &map, &reference)?;
        assert_eq!(sequence.as_str(), "ccATGAAATAAgg");
        assert_eq!(sequence.coding(), Some((2, 11)));
        assert_eq!(sequence.cds(), Some("ATGAAATAA"));

        Ok(())
    }

    #[test]
    fn test_non_coding_sequence() -> Result<()> {
        let sequence = TranscriptSequence::try_new("ACGT", None)?;
        assert_eq!(sequence.len(), 4);
        assert!(!sequence.is_empty());
        assert_eq!(sequence.coding(), None);
        assert_eq!(sequence.utr5(), None);
        assert_eq!(sequence.cds(), None);
        assert_eq!(sequence.utr3(), None);

        Ok(())
    }

    #[test]
    fn test_it_rejects_a_coding_region_past_the_end() {
        let err = TranscriptSequence::try_new("ACGT", Some((2, 10))).unwrap_err();
        assert_eq!(err, Error::CodingOutOfBounds(2, 10, 4));

        let err = TranscriptSequence::try_new("ACGT", Some((3, 2))).unwrap_err();
        assert_eq!(err, Error::CodingOutOfBounds(3, 2, 4));

        let sequence = TranscriptSequence::try_new("ACGT", Some((4, 4))).unwrap();
        assert_eq!(sequence.cds(), Some(""));
        assert_eq!(sequence.utr3(), Some(""));
    }

    #[test]
    fn test_it_rejects_non_ascii_sequences() {
        let err = TranscriptSequence::try_new("ATGAAATAA\u{e9}CCC", Some((0, 9))).unwrap_err();
        assert_eq!(err, Error::NonAscii(9));
    }

    /// A fetcher that hands back whatever it holds, without any checks.
    struct Unchecked(&'static str);

    impl Fetch for Unchecked {
        fn fetch(
            &self,
            _: &str,
            start: usize,
            end: usize,
        ) -> std::result::Result<String, fetch::Error> {
            Ok(self.0.chars().skip(start).take(end - start).collect())
        }

        fn contains_contig(&self, _: &str) -> bool {
            true
        }
    }

    #[test]
    fn test_assembled_non_ascii_sequences_are_rejected(
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mut r = record(Strand::Forward, &[(0, 13)]);
        r.coding = Some((0, 9));
        let transcript = Transcript::try_from(r)?;
        let map = CoordinateMap::new(&transcript);

        let err = TranscriptSequence::try_from_transcript(
            &transcript,
            &map,
            &Unchecked("ATGAAATAA\u{e9}CCC"),
        )
        .unwrap_err();
        assert_eq!(err, Error::NonAscii(9));

        Ok(())
    }
}
