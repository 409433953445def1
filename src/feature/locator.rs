//! Locating features within a single transcript.

use std::collections::HashMap;

use tracing::debug;

use crate::codon;
use crate::codon::CodonSet;
use crate::feature::Error;
use crate::feature::Feature;
use crate::feature::Options;
use crate::feature::Query;
use crate::mapping;
use crate::mapping::CoordinateMap;
use crate::sequence::Fetch;
use crate::sequence::TranscriptSequence;
use crate::transcript::Transcript;

/// The length of a codon.
const CODON_LEN: usize = 3;

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// Locates features within a single transcript.
///
/// A locator holds the transcript, its [`CoordinateMap`], and its upper-cased
/// [`TranscriptSequence`]. Every genomic interval it reports goes through the
/// coordinate map.
///
/// # Examples
///
/// ```
/// use splicekit::core::Strand;
/// use splicekit::feature::Locator;
/// use splicekit::sequence::Reference;
/// use splicekit::transcript::Record;
/// use splicekit::transcript::Transcript;
///
/// let reference = Reference::from_iter([("seq0", "ATGAAATAA")]);
/// let transcript = Transcript::try_from(Record {
///     id: String::from("tx0"),
///     contig: String::from("seq0"),
///     strand: Some(Strand::Forward),
///     exons: vec![(0, 9)],
///     coding: Some((0, 9)),
///     ..Default::default()
/// })?;
///
/// let locator = Locator::try_from_fetcher(&transcript, &reference)?;
/// let codons = locator.all_cds_codons(None)?;
///
/// let summary = codons
///     .iter()
///     .map(|f| (f.t_start, f.sequence.as_str(), f.amino_acid))
///     .collect::<Vec<_>>();
///
/// assert_eq!(
///     summary,
///     vec![(0, "ATG", Some('M')), (3, "AAA", Some('K')), (6, "TAA", Some('*'))]
/// );
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct Locator<'a> {
    /// The transcript.
    transcript: &'a Transcript,

    /// The coordinate map of the transcript.
    map: CoordinateMap,

    /// The upper-cased transcript sequence.
    sequence: TranscriptSequence,
}

impl<'a> Locator<'a> {
    /// Creates a locator from an already assembled sequence.
    pub fn new(
        transcript: &'a Transcript,
        map: CoordinateMap,
        sequence: &TranscriptSequence,
    ) -> Self {
        Self {
            transcript,
            map,
            sequence: sequence.to_uppercase(),
        }
    }

    /// Creates a locator by assembling the transcript sequence from a fetcher.
    pub fn try_from_fetcher<F>(transcript: &'a Transcript, fetcher: &F) -> Result<Self>
    where
        F: Fetch + ?Sized,
    {
        let map = CoordinateMap::new(transcript);
        let sequence = TranscriptSequence::try_from_transcript(transcript, &map, fetcher)
            .map_err(Error::Sequence)?;

        Ok(Self::new(transcript, map, &sequence))
    }

    /// Gets the transcript.
    pub fn transcript(&self) -> &Transcript {
        self.transcript
    }

    /// Gets the coordinate map.
    pub fn map(&self) -> &CoordinateMap {
        &self.map
    }

    /// Gets the upper-cased transcript sequence.
    pub fn sequence(&self) -> &TranscriptSequence {
        &self.sequence
    }

    /// Runs a query.
    pub fn locate(&self, query: &Query, options: &Options) -> Result<Vec<Feature>> {
        match query {
            Query::UtrStop => self.utr3_stop_codons(options.limit),
            Query::CdsCodon(codons) => self.cds_codons(codons, options.limit),
            Query::CdsAllCodons => self.all_cds_codons(options.limit),
            Query::StopKmer { left, right } => {
                Ok(self.stop_kmer(*left, *right)?.into_iter().collect())
            }
        }
    }

    /// Finds every stop codon starting within the 3' UTR.
    ///
    /// Matches are searched at every offset (not only in frame) and reported in
    /// increasing order, optionally only the first `limit`.
    pub fn utr3_stop_codons(&self, limit: Option<usize>) -> Result<Vec<Feature>> {
        let (_, cds_end) = self.coding()?;
        let stops = CodonSet::stop();

        let offsets = (cds_end..self.sequence.len().saturating_sub(CODON_LEN - 1))
            .filter(|&t| self.codon_at(t).is_some_and(|c| stops.contains(c)))
            .take(limit.unwrap_or(usize::MAX));

        offsets
            .enumerate()
            .map(|(i, t)| self.codon_feature(i, t))
            .collect()
    }

    /// Finds in-frame occurrences of any codon in `codons` within the CDS.
    pub fn cds_codons(&self, codons: &CodonSet, limit: Option<usize>) -> Result<Vec<Feature>> {
        let offsets = self
            .in_frame_offsets()?
            .filter(|&t| self.codon_at(t).is_some_and(|c| codons.contains(c)))
            .take(limit.unwrap_or(usize::MAX));

        offsets
            .enumerate()
            .map(|(i, t)| self.codon_feature(i, t))
            .collect()
    }

    /// Reports every in-frame codon of the CDS in transcript order.
    ///
    /// When `per_codon_limit` is given, only the first `per_codon_limit`
    /// occurrences of each distinct codon are kept.
    pub fn all_cds_codons(&self, per_codon_limit: Option<usize>) -> Result<Vec<Feature>> {
        let mut seen = HashMap::<&str, usize>::new();

        let offsets = self
            .in_frame_offsets()?
            .filter(|&t| match (per_codon_limit, self.codon_at(t)) {
                (Some(limit), Some(codon)) => {
                    let count = seen.entry(codon).or_default();
                    *count += 1;
                    *count <= limit
                }
                _ => true,
            });

        offsets
            .enumerate()
            .map(|(i, t)| self.codon_feature(i, t))
            .collect()
    }

    /// Extracts the window `[CDS_end - 3 + left, CDS_end + right)` around the
    /// stop codon.
    ///
    /// The window is clipped to the transcript. A window that is empty after
    /// clipping yields no feature.
    pub fn stop_kmer(&self, left: isize, right: isize) -> Result<Option<Feature>> {
        let (_, cds_end) = self.coding()?;
        let len = self.sequence.len() as isize;

        let start = (cds_end as isize - CODON_LEN as isize + left).clamp(0, len);
        let end = (cds_end as isize + right).clamp(0, len);

        if start >= end {
            debug!(
                "stop kmer window for {} is empty after clipping",
                self.transcript.id()
            );
            return Ok(None);
        }

        let (start, end) = (start as usize, end as usize);
        let genomic = self.map.project(start, end).map_err(Error::Mapping)?;
        let sequence = self
            .sequence
            .as_str()
            .get(start..end)
            .ok_or(Error::Mapping(mapping::Error::InvalidRange(start, end)))?;

        Ok(Some(Feature {
            index: 0,
            t_start: start,
            t_end: end,
            genomic,
            sequence: sequence.to_string(),
            amino_acid: None,
        }))
    }

    /// Gets the coding region or fails for non-coding transcripts.
    fn coding(&self) -> Result<(usize, usize)> {
        self.sequence
            .coding()
            .ok_or_else(|| Error::NonCoding(self.transcript.id().to_string()))
    }

    /// The transcript offsets of every complete in-frame codon of the CDS.
    fn in_frame_offsets(&self) -> Result<impl Iterator<Item = usize>> {
        let (cds_start, cds_end) = self.coding()?;
        let n = (cds_end - cds_start) / CODON_LEN;
        Ok((0..n).map(move |i| cds_start + i * CODON_LEN))
    }

    /// Gets the codon starting at transcript offset `t`, if one fits.
    fn codon_at(&self, t: usize) -> Option<&str> {
        self.sequence.as_str().get(t..t + CODON_LEN)
    }

    /// Builds the feature for the codon starting at transcript offset `t`.
    fn codon_feature(&self, index: usize, t: usize) -> Result<Feature> {
        let t_end = t + CODON_LEN;
        let sequence = self.codon_at(t).ok_or(Error::Mapping(mapping::Error::OutOfRange(
            t_end - 1,
            self.sequence.len(),
        )))?;

        let genomic = self.map.project(t, t_end).map_err(Error::Mapping)?;
        let amino_acid = codon::translate(sequence).map_err(Error::Codon)?;

        Ok(Feature {
            index,
            t_start: t,
            t_end,
            genomic,
            sequence: sequence.to_string(),
            amino_acid: Some(amino_acid),
        })
    }
}
