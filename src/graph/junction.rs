//! Extraction of the splice and exon-boundary edges of a single transcript.

use crate::core::Contig;
use crate::core::Position;
use crate::core::Strand;
use crate::transcript::Transcript;

/// The edges contributed by one transcript.
///
/// A delta is computed without touching any graph and is folded in later
/// with [`SpliceGraph::apply`](super::SpliceGraph::apply).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Delta {
    /// The contig of the transcript.
    pub contig: Contig,

    /// The strand of the transcript.
    pub strand: Strand,

    /// The splice edges (5' site → 3' site).
    pub splice: Vec<(Position, Position)>,

    /// The exon-boundary edges (5' boundary → 3' boundary).
    pub exon: Vec<(Position, Position)>,
}

/// Extracts the edges contributed by a transcript.
///
/// For every pair of consecutive exons `(e1, e2)`, a forward transcript
/// records the splice edge `e1.end → e2.start` and a reverse transcript records
/// `e2.start → e1.end`. Every exon records an exon-boundary edge, `start → end`
/// on the forward strand and `end → start` on the reverse strand.
///
/// # Examples
///
/// ```
/// use splicekit::core::Strand;
/// use splicekit::graph::junction;
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
/// let delta = junction::extract(&transcript);
/// assert_eq!(delta.splice, vec![(20, 10)]);
/// assert_eq!(delta.exon, vec![(10, 0), (30, 20)]);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn extract(transcript: &Transcript) -> Delta {
    let strand = transcript.strand();
    let exons = transcript.exons();

    let splice = exons
        .iter()
        .zip(exons.iter().skip(1))
        .map(|(e1, e2)| match strand {
            Strand::Forward => (e1.end(), e2.start()),
            Strand::Reverse => (e2.start(), e1.end()),
        })
        .collect();

    let exon = exons
        .iter()
        .map(|e| match strand {
            Strand::Forward => (e.start(), e.end()),
            Strand::Reverse => (e.end(), e.start()),
        })
        .collect();

    Delta {
        contig: transcript.contig().clone(),
        strand,
        splice,
        exon,
    }
}
