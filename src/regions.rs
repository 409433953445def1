//! Exon and intron region tables rendered as GTF.
//!
//! Every exon and intron of every transcript becomes a [`Region`] carrying a
//! synthetic identifier (`ex{n}` or `in{n}`). The counters producing these
//! identifiers are threaded through [`Counters`] rather than held globally, so
//! independent tables never interfere with each other.
//!
//! Regions are held in 0-based, half-open coordinates and written as GTF,
//! which is 1-based with an inclusive end: the start column is `start + 1`
//! and the end column is `end`. Tools that wrote the raw 0-based start into
//! the GTF start column produce lines that differ from these by one.
//!
//! ```
//! use splicekit::core::Strand;
//! use splicekit::regions;
//! use splicekit::transcript::Record;
//! use splicekit::transcript::Transcript;
//!
//! let transcript = Transcript::try_from(Record {
//!     id: String::from("tx0"),
//!     gene_id: String::from("gene0"),
//!     gene_name: String::from("GENE0"),
//!     contig: String::from("seq0"),
//!     strand: Some(Strand::Forward),
//!     exons: vec![(0, 10), (20, 30)],
//!     ..Default::default()
//! })?;
//!
//! let table = regions::table([&transcript]);
//! assert_eq!(table.len(), 3);
//! assert_eq!(
//!     table[2].to_string(),
//!     "seq0\tprotein_coding\tintron\t11\t20\t.\t+\t.\t\
//!      transcript_id \"in0\"; true_transcript_id \"tx0\"; gene_id \"gene0\"; gene_name \"GENE0\";"
//! );
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::collections::HashSet;

use crate::core::Contig;
use crate::core::Interval;
use crate::core::Strand;
use crate::transcript::Transcript;

/// The GTF source column.
const SOURCE: &str = "protein_coding";

/// The placeholder for an empty GTF column.
const EMPTY: &str = ".";

/// The kind of a region.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Kind {
    /// An exon.
    Exon,

    /// An intron.
    Intron,
}

impl Kind {
    /// The prefix of the synthetic identifiers for this kind.
    fn prefix(&self) -> &'static str {
        match self {
            Kind::Exon => "ex",
            Kind::Intron => "in",
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Kind::Exon => write!(f, "exon"),
            Kind::Intron => write!(f, "intron"),
        }
    }
}

/// The running counters for synthetic region identifiers.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Counters {
    /// The number of exons numbered so far.
    exons: usize,

    /// The number of introns numbered so far.
    introns: usize,
}

impl Counters {
    /// Takes the next identifier for a kind.
    fn next(&mut self, kind: Kind) -> String {
        let counter = match kind {
            Kind::Exon => &mut self.exons,
            Kind::Intron => &mut self.introns,
        };

        let id = format!("{}{}", kind.prefix(), counter);
        *counter += 1;
        id
    }
}

/// An exon or intron of a transcript.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Region {
    /// The synthetic identifier (e.g., `ex0`).
    pub id: String,

    /// The kind.
    pub kind: Kind,

    /// The contig.
    pub contig: Contig,

    /// The 0-based, half-open genomic interval.
    pub interval: Interval,

    /// The strand.
    pub strand: Strand,

    /// The identifier of the transcript the region belongs to.
    pub transcript_id: String,

    /// The gene identifier.
    pub gene_id: String,

    /// The gene name.
    pub gene_name: String,
}

impl std::fmt::Display for Region {
    /// Formats the region as a GTF line (1-based, inclusive coordinates).
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\t{SOURCE}\t{}\t{}\t{}\t{EMPTY}\t{}\t{EMPTY}\t\
             transcript_id \"{}\"; true_transcript_id \"{}\"; gene_id \"{}\"; gene_name \"{}\";",
            self.contig,
            self.kind,
            self.interval.start() + 1,
            self.interval.end(),
            self.strand,
            self.id,
            self.transcript_id,
            self.gene_id,
            self.gene_name,
        )
    }
}

/// Produces the exon and intron regions of a single transcript.
///
/// Exons are numbered before introns. The updated counters are returned
/// alongside the regions.
pub fn regions(transcript: &Transcript, mut counters: Counters) -> (Vec<Region>, Counters) {
    let region = |id: String, kind: Kind, interval: Interval| Region {
        id,
        kind,
        contig: transcript.contig().clone(),
        interval,
        strand: transcript.strand(),
        transcript_id: transcript.id().to_string(),
        gene_id: transcript.gene_id().to_string(),
        gene_name: transcript.gene_name().to_string(),
    };

    let mut result = Vec::new();

    for exon in transcript.exons() {
        result.push(region(counters.next(Kind::Exon), Kind::Exon, *exon));
    }

    for intron in transcript.introns() {
        result.push(region(counters.next(Kind::Intron), Kind::Intron, intron));
    }

    (result, counters)
}

/// Builds the region table for a collection of transcripts.
///
/// Regions are de-duplicated on `(contig, start, end)`: the first region seen
/// at a location wins, although the counters still advance for the discarded
/// ones.
pub fn table<'a, I>(transcripts: I) -> Vec<Region>
where
    I: IntoIterator<Item = &'a Transcript>,
{
    let mut seen = HashSet::new();
    let mut counters = Counters::default();
    let mut result = Vec::new();

    for transcript in transcripts {
        let (found, next) = regions(transcript, counters);
        counters = next;

        for region in found {
            if seen.insert((region.contig.clone(), region.interval)) {
                result.push(region);
            }
        }
    }

    result
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::transcript::tests::record;

    #[test]
    fn test_counters_are_threaded() -> Result<(), Box<dyn std::error::Error>> {
        let transcript = Transcript::try_from(record(Strand::Reverse, &[(0, 10), (20, 30)]))?;

        let (first, counters) = regions(&transcript, Counters::default());
        let (second, _) = regions(&transcript, counters);

        assert_eq!(
            first.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
            vec!["ex0", "ex1", "in0"]
        );
        assert_eq!(
            second.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
            vec!["ex2", "ex3", "in1"]
        );
        assert_eq!(first[2].kind, Kind::Intron);
        assert_eq!(first[2].interval, Interval::try_new(10, 20)?);

        Ok(())
    }

    #[test]
    fn test_table_deduplicates_locations() -> Result<(), Box<dyn std::error::Error>> {
        let mut a = record(Strand::Forward, &[(0, 10), (20, 30)]);
        a.id = String::from("txA");
        let mut b = record(Strand::Forward, &[(0, 10), (40, 50)]);
        b.id = String::from("txB");

        let a = Transcript::try_from(a)?;
        let b = Transcript::try_from(b)?;

        let table = table([&a, &b]);
        let summary = table
            .iter()
            .map(|r| (r.id.as_str(), r.transcript_id.as_str(), r.interval.start()))
            .collect::<Vec<_>>();

        // txB's first exon duplicates txA's and is dropped, but ex2 is still
        // consumed by it.
        assert_eq!(
            summary,
            vec![
                ("ex0", "txA", 0),
                ("ex1", "txA", 20),
                ("in0", "txA", 10),
                ("ex3", "txB", 40),
                ("in1", "txB", 10),
            ]
        );

        Ok(())
    }

    #[test]
    fn test_gtf_line() -> Result<(), Box<dyn std::error::Error>> {
        let transcript = Transcript::try_from(record(Strand::Reverse, &[(99, 200)]))?;
        let (regions, _) = regions(&transcript, Counters::default());

        assert_eq!(
            regions[0].to_string(),
            "seq0\tprotein_coding\texon\t100\t200\t.\t-\t.\ttranscript_id \"ex0\"; \
             true_transcript_id \"tx0\"; gene_id \"gene0\"; gene_name \"GENE0\";"
        );

        Ok(())
    }
}
