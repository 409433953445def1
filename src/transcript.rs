//! Transcript models: an ordered exon list with a strand and identifiers.

use nonempty::NonEmpty;

use crate::core::interval;
use crate::core::Contig;
use crate::core::Interval;
use crate::core::Position;
use crate::core::Strand;

/// An error related to a malformed transcript feature.
///
/// Every variant carries the identifier of the offending feature so the error
/// can be reported on its own when the feature is skipped.
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// The feature has no strand.
    MissingStrand(String),

    /// The feature has no exons.
    NoExons(String),

    /// An exon has an invalid interval (e.g., `start >= end`).
    InvalidExon(String, usize, interval::Error),

    /// Two consecutive exons are not ordered by increasing genomic position.
    UnsortedExons(String, Interval, Interval),

    /// Two consecutive exons overlap.
    OverlappingExons(String, Interval, Interval),

    /// The supplied genomic span of the feature is invalid.
    InvalidSpan(String, interval::Error),

    /// An exon falls outside of the supplied genomic span.
    ExonOutsideSpan(String, Interval, Interval),

    /// The supplied coding span of the feature is invalid.
    InvalidCodingSpan(String, interval::Error),

    /// The coding span falls outside of the genomic span.
    CodingSpanOutsideSpan(String, Interval, Interval),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::MissingStrand(id) => write!(f, "malformed feature `{id}`: no strand"),
            Error::NoExons(id) => write!(f, "malformed feature `{id}`: no exons"),
            Error::InvalidExon(id, index, err) => {
                write!(f, "malformed feature `{id}`: exon {index}: {err}")
            }
            Error::UnsortedExons(id, a, b) => write!(
                f,
                "malformed feature `{id}`: exons are not sorted by position ({a} before {b})"
            ),
            Error::OverlappingExons(id, a, b) => {
                write!(f, "malformed feature `{id}`: exons {a} and {b} overlap")
            }
            Error::InvalidSpan(id, err) => write!(f, "malformed feature `{id}`: span: {err}"),
            Error::ExonOutsideSpan(id, exon, span) => write!(
                f,
                "malformed feature `{id}`: exon {exon} falls outside of span {span}"
            ),
            Error::InvalidCodingSpan(id, err) => {
                write!(f, "malformed feature `{id}`: coding span: {err}")
            }
            Error::CodingSpanOutsideSpan(id, coding, span) => write!(
                f,
                "malformed feature `{id}`: coding span {coding} falls outside of span {span}"
            ),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// A raw, unvalidated transcript record as handed over by an annotation
/// source.
///
/// Coordinates are 0-based and half-open. Exons are expected in increasing
/// genomic order regardless of strand. Use [`Transcript::try_from`] to
/// validate a record.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Record {
    /// The feature identifier (the transcript ID).
    pub id: String,

    /// The gene identifier.
    pub gene_id: String,

    /// The gene name.
    pub gene_name: String,

    /// The contig upon which the feature is located.
    pub contig: Contig,

    /// The feature type (e.g., `mRNA` or `transcript`).
    pub kind: String,

    /// The strand, if one was given.
    ///
    /// A record without a strand fails validation.
    pub strand: Option<Strand>,

    /// The genomic span of the feature, if one was given.
    pub span: Option<(Position, Position)>,

    /// The genomic exon intervals as `(start, end)` pairs.
    pub exons: Vec<(Position, Position)>,

    /// The genomic coding span (including the stop codon), if the feature is
    /// coding.
    pub coding: Option<(Position, Position)>,
}

/// A validated transcript.
///
/// A transcript is constructed once from a [`Record`] and is read-only
/// thereafter.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Transcript {
    /// The feature identifier.
    id: String,

    /// The gene identifier.
    gene_id: String,

    /// The gene name.
    gene_name: String,

    /// The contig.
    contig: Contig,

    /// The feature type.
    kind: String,

    /// The strand.
    strand: Strand,

    /// The genomic span.
    span: Interval,

    /// The exons in increasing genomic order.
    exons: NonEmpty<Interval>,

    /// The genomic coding span, if any.
    coding: Option<Interval>,
}

impl Transcript {
    /// Gets the feature identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Gets the gene identifier.
    pub fn gene_id(&self) -> &str {
        &self.gene_id
    }

    /// Gets the gene name.
    pub fn gene_name(&self) -> &str {
        &self.gene_name
    }

    /// Gets the contig.
    pub fn contig(&self) -> &Contig {
        &self.contig
    }

    /// Gets the feature type.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Gets the strand.
    pub fn strand(&self) -> Strand {
        self.strand
    }

    /// Gets the genomic span.
    pub fn span(&self) -> &Interval {
        &self.span
    }

    /// Gets the exons in increasing genomic order.
    pub fn exons(&self) -> &NonEmpty<Interval> {
        &self.exons
    }

    /// Gets the genomic coding span, if the transcript is coding.
    pub fn coding(&self) -> Option<&Interval> {
        self.coding.as_ref()
    }

    /// Gets the length of the mature (spliced) transcript.
    ///
    /// # Examples
    ///
    /// ```
    /// use splicekit::core::Strand;
    /// use splicekit::transcript::Record;
    /// use splicekit::transcript::Transcript;
    ///
    /// let record = Record {
    ///     id: String::from("tx0"),
    ///     contig: String::from("seq0"),
    ///     strand: Some(Strand::Forward),
    ///     exons: vec![(0, 10), (20, 30)],
    ///     ..Default::default()
    /// };
    ///
    /// let transcript = Transcript::try_from(record)?;
    /// assert_eq!(transcript.spliced_len(), 20);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn spliced_len(&self) -> usize {
        self.exons.iter().map(|exon| exon.distance()).sum()
    }

    /// Gets the introns of the transcript: the gaps between consecutive exons.
    ///
    /// Exons that touch produce no intron.
    ///
    /// # Examples
    ///
    /// ```
    /// use splicekit::core::Interval;
    /// use splicekit::core::Strand;
    /// use splicekit::transcript::Record;
    /// use splicekit::transcript::Transcript;
    ///
    /// let record = Record {
    ///     id: String::from("tx0"),
    ///     contig: String::from("seq0"),
    ///     strand: Some(Strand::Reverse),
    ///     exons: vec![(0, 10), (20, 30), (30, 35), (50, 60)],
    ///     ..Default::default()
    /// };
    ///
    /// let transcript = Transcript::try_from(record)?;
    /// assert_eq!(
    ///     transcript.introns(),
    ///     vec![Interval::try_new(10, 20)?, Interval::try_new(35, 50)?]
    /// );
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn introns(&self) -> Vec<Interval> {
        self.exons
            .iter()
            .zip(self.exons.iter().skip(1))
            .filter_map(|(a, b)| Interval::try_new(a.end(), b.start()).ok())
            .collect()
    }
}

impl TryFrom<Record> for Transcript {
    type Error = Error;

    fn try_from(record: Record) -> Result<Self> {
        let Record {
            id,
            gene_id,
            gene_name,
            contig,
            kind,
            strand,
            span,
            exons,
            coding,
        } = record;

        let strand = match strand {
            Some(strand) => strand,
            None => return Err(Error::MissingStrand(id)),
        };

        // (1) Validate each exon individually.
        let mut validated = Vec::with_capacity(exons.len());
        for (i, exon) in exons.into_iter().enumerate() {
            let exon = Interval::try_from(exon).map_err(|e| Error::InvalidExon(id.clone(), i, e))?;
            validated.push(exon);
        }

        let exons = match NonEmpty::from_vec(validated) {
            Some(exons) => exons,
            None => return Err(Error::NoExons(id)),
        };

        // (2) Ensure the exons are ordered and non-overlapping.
        for (a, b) in exons.iter().zip(exons.iter().skip(1)) {
            if b.start() < a.start() {
                return Err(Error::UnsortedExons(id, *a, *b));
            }

            if a.overlaps(b) {
                return Err(Error::OverlappingExons(id, *a, *b));
            }
        }

        // (3) Resolve the span, deriving it from the exons when absent.
        let span = match span {
            Some(span) => {
                let span = Interval::try_from(span).map_err(|e| Error::InvalidSpan(id.clone(), e))?;

                if let Some(exon) = exons.iter().find(|exon| !span.encloses(exon)) {
                    return Err(Error::ExonOutsideSpan(id, *exon, span));
                }

                span
            }
            None => Interval::try_new(exons.first().start(), exons.last().end())
                .map_err(|e| Error::InvalidSpan(id.clone(), e))?,
        };

        // (4) Validate the coding span, if any.
        let coding = match coding {
            Some(coding) => {
                let coding = Interval::try_from(coding)
                    .map_err(|e| Error::InvalidCodingSpan(id.clone(), e))?;

                if !span.encloses(&coding) {
                    return Err(Error::CodingSpanOutsideSpan(id, coding, span));
                }

                Some(coding)
            }
            None => None,
        };

        Ok(Transcript {
            id,
            gene_id,
            gene_name,
            contig,
            kind,
            strand,
            span,
            exons,
            coding,
        })
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    pub(crate) fn record(strand: Strand, exons: &[(Position, Position)]) -> Record {
        Record {
            id: String::from("tx0"),
            gene_id: String::from("gene0"),
            gene_name: String::from("GENE0"),
            contig: String::from("seq0"),
            kind: String::from("mRNA"),
            strand: Some(strand),
            span: None,
            exons: exons.to_vec(),
            coding: None,
        }
    }

    #[test]
    fn test_valid_transcript() -> Result<()> {
        let transcript = Transcript::try_from(record(Strand::Forward, &[(0, 10), (20, 30)]))?;

        assert_eq!(transcript.id(), "tx0");
        assert_eq!(transcript.gene_id(), "gene0");
        assert_eq!(transcript.gene_name(), "GENE0");
        assert_eq!(transcript.contig(), "seq0");
        assert_eq!(transcript.kind(), "mRNA");
        assert_eq!(transcript.strand(), Strand::Forward);
        assert_eq!(transcript.exons().len(), 2);
        assert_eq!(transcript.span().start(), 0);
        assert_eq!(transcript.span().end(), 30);
        assert_eq!(transcript.spliced_len(), 20);
        assert!(transcript.coding().is_none());

        Ok(())
    }

    #[test]
    fn test_it_rejects_an_empty_exon_list() {
        let err = Transcript::try_from(record(Strand::Forward, &[])).unwrap_err();
        assert_eq!(err, Error::NoExons(String::from("tx0")));
        assert_eq!(err.to_string(), "malformed feature `tx0`: no exons");
    }

    #[test]
    fn test_it_rejects_a_missing_strand() {
        let mut r = record(Strand::Reverse, &[(0, 10), (20, 30)]);
        r.strand = None;

        let err = Transcript::try_from(r).unwrap_err();
        assert_eq!(err, Error::MissingStrand(String::from("tx0")));
        assert_eq!(err.to_string(), "malformed feature `tx0`: no strand");
    }

    #[test]
    fn test_it_rejects_an_inverted_exon() {
        let err = Transcript::try_from(record(Strand::Forward, &[(0, 10), (30, 20)])).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidExon(_, 1, interval::Error::StartGreaterThanEnd(30, 20))
        ));
    }

    #[test]
    fn test_it_rejects_a_zero_sized_exon() {
        let err = Transcript::try_from(record(Strand::Reverse, &[(5, 5)])).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidExon(_, 0, interval::Error::ZeroSizedInterval(5))
        ));
    }

    #[test]
    fn test_it_rejects_unsorted_exons() {
        let err = Transcript::try_from(record(Strand::Reverse, &[(20, 30), (0, 10)])).unwrap_err();
        assert!(matches!(err, Error::UnsortedExons(_, _, _)));
    }

    #[test]
    fn test_it_rejects_overlapping_exons() {
        let err = Transcript::try_from(record(Strand::Forward, &[(0, 10), (5, 30)])).unwrap_err();
        assert!(matches!(err, Error::OverlappingExons(_, _, _)));
    }

    #[test]
    fn test_it_validates_the_span() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mut r = record(Strand::Forward, &[(0, 10), (20, 30)]);
        r.span = Some((0, 25));
        let err = Transcript::try_from(r).unwrap_err();
        assert!(matches!(err, Error::ExonOutsideSpan(_, _, _)));

        let mut r = record(Strand::Forward, &[(10, 20)]);
        r.span = Some((0, 100));
        let transcript = Transcript::try_from(r)?;
        assert_eq!(transcript.span(), &Interval::try_new(0, 100)?);

        Ok(())
    }

    #[test]
    fn test_it_validates_the_coding_span() -> std::result::Result<(), Box<dyn std::error::Error>>
    {
        let mut r = record(Strand::Forward, &[(0, 10), (20, 30)]);
        r.coding = Some((5, 40));
        let err = Transcript::try_from(r).unwrap_err();
        assert!(matches!(err, Error::CodingSpanOutsideSpan(_, _, _)));

        let mut r = record(Strand::Forward, &[(0, 10), (20, 30)]);
        r.coding = Some((5, 25));
        let transcript = Transcript::try_from(r)?;
        assert_eq!(transcript.coding(), Some(&Interval::try_new(5, 25)?));

        Ok(())
    }

    #[test]
    fn test_introns() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let transcript = Transcript::try_from(record(Strand::Forward, &[(0, 10)]))?;
        assert!(transcript.introns().is_empty());

        let transcript =
            Transcript::try_from(record(Strand::Forward, &[(0, 10), (15, 20), (40, 50)]))?;
        assert_eq!(
            transcript.introns(),
            vec![Interval::try_new(10, 15)?, Interval::try_new(20, 40)?]
        );

        Ok(())
    }
}
