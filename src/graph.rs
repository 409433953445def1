//! Per-contig splice junction graphs.
//!
//! A [`SpliceGraph`] records, for each strand of one contig, the splice
//! adjacency (5' splice site → 3' splice sites) and the exon-boundary
//! adjacency (5' exon boundary → 3' exon boundaries) of every transcript folded
//! into it. Both adjacencies are sets kept together with their inverses (see
//! [`Adjacency`]), so folding the same transcript twice leaves the graph
//! unchanged.
//!
//! Graphs are usually built for a whole annotation at once with a
//! [`Builder`], which produces one graph per contig.
//!
//! ```
//! use splicekit::core::Strand;
//! use splicekit::graph::Builder;
//! use splicekit::transcript::Record;
//!
//! let records = vec![
//!     Record {
//!         id: String::from("tx0"),
//!         contig: String::from("seq0"),
//!         kind: String::from("mRNA"),
//!         strand: Some(Strand::Forward),
//!         exons: vec![(0, 10), (20, 30), (40, 50)],
//!         ..Default::default()
//!     },
//!     Record {
//!         id: String::from("tx1"),
//!         contig: String::from("seq0"),
//!         kind: String::from("mRNA"),
//!         strand: Some(Strand::Forward),
//!         exons: vec![(0, 10), (40, 50)],
//!         ..Default::default()
//!     },
//! ];
//!
//! let built = Builder::default().try_build_from(records)?;
//! let graph = built.graphs().get("seq0").unwrap();
//!
//! let targets = graph.forward().splice().targets(10).unwrap();
//! assert_eq!(targets.iter().copied().collect::<Vec<_>>(), vec![20, 40]);
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod adjacency;
pub mod builder;
pub mod dinucleotide;
pub mod junction;

pub use adjacency::Adjacency;
pub use builder::Builder;
pub use builder::Built;
pub use dinucleotide::DinucleotideTables;
pub use junction::Delta;

use crate::core::Contig;
use crate::core::Strand;
use crate::sequence::fetch;
use crate::sequence::Fetch;
use crate::transcript::Transcript;

/// An error related to a [`SpliceGraph`].
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// A transcript or delta from another contig was folded into the graph.
    ///
    /// The values are the contig of the graph and the offending contig.
    ContigMismatch(Contig, Contig),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::ContigMismatch(expected, found) => write!(
                f,
                "contig mismatch: graph is for {expected}, but received {found}"
            ),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// The adjacencies of one strand of a contig.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct StrandGraph {
    /// Splice donor → acceptor sites.
    splice: Adjacency,

    /// 5' exon boundary → 3' exon boundary.
    exon: Adjacency,
}

impl StrandGraph {
    /// Gets the splice adjacency.
    pub fn splice(&self) -> &Adjacency {
        &self.splice
    }

    /// Gets the exon-boundary adjacency.
    pub fn exon(&self) -> &Adjacency {
        &self.exon
    }

    /// Unions another strand graph into this one.
    fn merge(&mut self, other: StrandGraph) {
        self.splice.merge(other.splice);
        self.exon.merge(other.exon);
    }
}

/// A splice junction graph for a single contig.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SpliceGraph {
    /// The contig.
    contig: Contig,

    /// The forward strand.
    forward: StrandGraph,

    /// The reverse strand.
    reverse: StrandGraph,
}

impl SpliceGraph {
    /// Creates an empty graph for a contig.
    pub fn new(contig: impl Into<Contig>) -> Self {
        Self {
            contig: contig.into(),
            forward: StrandGraph::default(),
            reverse: StrandGraph::default(),
        }
    }

    /// Gets the contig.
    pub fn contig(&self) -> &Contig {
        &self.contig
    }

    /// Gets the forward strand adjacencies.
    pub fn forward(&self) -> &StrandGraph {
        &self.forward
    }

    /// Gets the reverse strand adjacencies.
    pub fn reverse(&self) -> &StrandGraph {
        &self.reverse
    }

    /// Gets the adjacencies of a strand.
    pub fn strand(&self, strand: Strand) -> &StrandGraph {
        match strand {
            Strand::Forward => &self.forward,
            Strand::Reverse => &self.reverse,
        }
    }

    /// Returns whether the graph holds no edges.
    pub fn is_empty(&self) -> bool {
        self.forward.exon.is_empty() && self.reverse.exon.is_empty()
    }

    /// Folds a transcript into the graph.
    ///
    /// Folding the same transcript more than once has no further effect.
    ///
    /// # Examples
    ///
    /// ```
    /// use splicekit::core::Strand;
    /// use splicekit::graph::SpliceGraph;
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
    /// let mut graph = SpliceGraph::new("seq0");
    /// graph.add_transcript(&transcript)?;
    ///
    /// let snapshot = graph.clone();
    /// graph.add_transcript(&transcript)?;
    /// assert_eq!(graph, snapshot);
    ///
    /// let mut other = SpliceGraph::new("seq1");
    /// assert!(other.add_transcript(&transcript).is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn add_transcript(&mut self, transcript: &Transcript) -> Result<()> {
        if transcript.contig() != &self.contig {
            return Err(Error::ContigMismatch(
                self.contig.clone(),
                transcript.contig().clone(),
            ));
        }

        self.apply(junction::extract(transcript))
    }

    /// Folds the edges of a [`Delta`] into the graph.
    pub fn apply(&mut self, delta: Delta) -> Result<()> {
        if delta.contig != self.contig {
            return Err(Error::ContigMismatch(self.contig.clone(), delta.contig));
        }

        let graph = match delta.strand {
            Strand::Forward => &mut self.forward,
            Strand::Reverse => &mut self.reverse,
        };

        for (donor, acceptor) in delta.splice {
            graph.splice.insert(donor, acceptor);
        }

        for (five, three) in delta.exon {
            graph.exon.insert(five, three);
        }

        Ok(())
    }

    /// Unions another graph for the same contig into this one.
    pub fn merge(&mut self, other: SpliceGraph) -> Result<()> {
        if other.contig != self.contig {
            return Err(Error::ContigMismatch(self.contig.clone(), other.contig));
        }

        self.forward.merge(other.forward);
        self.reverse.merge(other.reverse);

        Ok(())
    }

    /// Tallies the dinucleotides flanking every splice junction.
    ///
    /// On the forward strand, each distinct donor `d` contributes
    /// `seq[d..d + 2]` and each edge `d → a` contributes `seq[a - 2..a]`. On the
    /// reverse strand, each distinct donor `d` contributes the reverse
    /// complement of `seq[d - 2..d]` and each edge `d → a` contributes the
    /// reverse complement of `seq[a..a + 2]`. The graph is not altered.
    ///
    /// # Examples
    ///
    /// ```
    /// use splicekit::core::Strand;
    /// use splicekit::graph::SpliceGraph;
    /// use splicekit::sequence::Reference;
    /// use splicekit::transcript::Record;
    /// use splicekit::transcript::Transcript;
    ///
    /// //                                          0         1         2
    /// //                                          012345678901234567890123
    /// let reference = Reference::from_iter([("seq0", "AAAAAGTCCCCCCAGAAAAAAAAA")]);
    ///
    /// let transcript = Transcript::try_from(Record {
    ///     id: String::from("tx0"),
    ///     contig: String::from("seq0"),
    ///     strand: Some(Strand::Forward),
    ///     exons: vec![(0, 5), (15, 24)],
    ///     ..Default::default()
    /// })?;
    ///
    /// let mut graph = SpliceGraph::new("seq0");
    /// graph.add_transcript(&transcript)?;
    ///
    /// let tables = graph.enumerate_junction_dinucleotides(&reference)?;
    /// assert_eq!(tables.forward_donor.get("GT"), Some(&1));
    /// assert_eq!(tables.forward_acceptor.get("AG"), Some(&1));
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn enumerate_junction_dinucleotides<F>(
        &self,
        fetcher: &F,
    ) -> std::result::Result<DinucleotideTables, fetch::Error>
    where
        F: Fetch + ?Sized,
    {
        use dinucleotide::fetch_dinucleotide;
        use dinucleotide::tally;

        let contig = self.contig.as_str();
        let mut tables = DinucleotideTables::default();

        let splice = &self.forward.splice;
        for donor in splice.source_positions() {
            let motif = fetch_dinucleotide(fetcher, contig, Some(donor), false)?;
            tally(&mut tables.forward_donor, motif);

            for acceptor in splice.targets(donor).into_iter().flatten() {
                let motif = fetch_dinucleotide(fetcher, contig, acceptor.checked_sub(2), false)?;
                tally(&mut tables.forward_acceptor, motif);
            }
        }

        let splice = &self.reverse.splice;
        for donor in splice.source_positions() {
            let motif = fetch_dinucleotide(fetcher, contig, donor.checked_sub(2), true)?;
            tally(&mut tables.reverse_donor, motif);

            for acceptor in splice.targets(donor).into_iter().flatten() {
                let motif = fetch_dinucleotide(fetcher, contig, Some(*acceptor), true)?;
                tally(&mut tables.reverse_acceptor, motif);
            }
        }

        Ok(tables)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::sequence::Reference;
    use crate::transcript::tests::record;

    fn transcript(strand: Strand, exons: &[(usize, usize)]) -> Transcript {
        Transcript::try_from(record(strand, exons)).unwrap()
    }

    #[test]
    fn test_add_transcript_is_idempotent() -> std::result::Result<(), Box<dyn std::error::Error>>
    {
        let mut graph = SpliceGraph::new("seq0");
        assert!(graph.is_empty());

        let forward = transcript(Strand::Forward, &[(0, 10), (20, 30), (40, 50)]);
        let reverse = transcript(Strand::Reverse, &[(5, 15), (25, 35)]);

        graph.add_transcript(&forward)?;
        graph.add_transcript(&reverse)?;
        let snapshot = graph.clone();

        graph.add_transcript(&forward)?;
        graph.add_transcript(&reverse)?;
        assert_eq!(graph, snapshot);

        assert_eq!(graph.forward().splice().len(), 2);
        assert_eq!(graph.forward().exon().len(), 3);
        assert_eq!(graph.reverse().splice().len(), 1);
        assert_eq!(graph.reverse().exon().len(), 2);
        assert_eq!(
            graph
                .strand(Strand::Reverse)
                .splice()
                .edges()
                .collect::<Vec<_>>(),
            vec![(25, 15)]
        );

        Ok(())
    }

    #[test]
    fn test_every_edge_has_an_inverse() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mut graph = SpliceGraph::new("seq0");
        graph.add_transcript(&transcript(Strand::Forward, &[(0, 10), (20, 30)]))?;
        graph.add_transcript(&transcript(Strand::Forward, &[(0, 10), (25, 30)]))?;
        graph.add_transcript(&transcript(Strand::Reverse, &[(0, 10), (20, 30)]))?;

        for strand in [Strand::Forward, Strand::Reverse] {
            let g = graph.strand(strand);
            for adjacency in [g.splice(), g.exon()] {
                for (from, to) in adjacency.edges() {
                    assert!(adjacency.sources(to).is_some_and(|s| s.contains(&from)));
                }

                assert_eq!(adjacency.inverse_edges().count(), adjacency.len());
            }
        }

        Ok(())
    }

    #[test]
    fn test_contig_mismatch() {
        let mut graph = SpliceGraph::new("seq1");
        let transcript = transcript(Strand::Forward, &[(0, 10)]);

        let err = graph.add_transcript(&transcript).unwrap_err();
        assert_eq!(
            err,
            Error::ContigMismatch(String::from("seq1"), String::from("seq0"))
        );
        assert!(graph.apply(junction::extract(&transcript)).is_err());
        assert!(graph.merge(SpliceGraph::new("seq0")).is_err());
    }

    #[test]
    fn test_merge_matches_sequential_fold() -> std::result::Result<(), Box<dyn std::error::Error>>
    {
        let transcripts = [
            transcript(Strand::Forward, &[(0, 10), (20, 30)]),
            transcript(Strand::Forward, &[(0, 10), (40, 50)]),
            transcript(Strand::Reverse, &[(60, 70), (80, 90)]),
        ];

        let mut sequential = SpliceGraph::new("seq0");
        for t in &transcripts {
            sequential.add_transcript(t)?;
        }

        let mut a = SpliceGraph::new("seq0");
        a.add_transcript(&transcripts[0])?;
        a.add_transcript(&transcripts[1])?;

        let mut b = SpliceGraph::new("seq0");
        b.add_transcript(&transcripts[1])?;
        b.add_transcript(&transcripts[2])?;

        a.merge(b)?;
        assert_eq!(a, sequential);

        Ok(())
    }

    #[test]
    fn test_dinucleotides() -> std::result::Result<(), Box<dyn std::error::Error>> {
        // Forward: donor at 5 (GT), acceptors at 15 and 20 (AG, AC).
        //
        //            0         1         2         3
        //            0123456789012345678901234567890123456789
        let genome = "AAAAAGTCCCCCCAGAAAACAAAACTTTTCTAAAAAAAAA";
        let reference = Reference::from_iter([("seq0", genome)]);

        let mut graph = SpliceGraph::new("seq0");
        graph.add_transcript(&transcript(Strand::Forward, &[(0, 5), (15, 18)]))?;
        graph.add_transcript(&transcript(Strand::Forward, &[(0, 5), (20, 22)]))?;

        // Reverse transcript with exons [(20, 24), (30, 40)]: the donor is 30
        // and the acceptor is 24.
        graph.add_transcript(&transcript(Strand::Reverse, &[(20, 24), (30, 40)]))?;

        let tables = graph.enumerate_junction_dinucleotides(&reference)?;

        // The donor is counted once even though it has two acceptors.
        assert_eq!(tables.forward_donor.get("GT"), Some(&1));
        assert_eq!(tables.forward_donor.len(), 1);
        assert_eq!(tables.forward_acceptor.get("AG"), Some(&1));
        assert_eq!(tables.forward_acceptor.get("AC"), Some(&1));

        // seq[28..30] = "TC" → "GA"; seq[24..26] = "CT" → "AG".
        assert_eq!(tables.reverse_donor.get("GA"), Some(&1));
        assert_eq!(tables.reverse_acceptor.get("AG"), Some(&1));

        Ok(())
    }

    #[test]
    fn test_dinucleotides_missing_contig() -> std::result::Result<(), Box<dyn std::error::Error>>
    {
        let reference = Reference::from_iter([("seq1", "ACGT")]);
        let mut graph = SpliceGraph::new("seq0");
        graph.add_transcript(&transcript(Strand::Forward, &[(0, 1), (2, 3)]))?;

        assert_eq!(
            graph.enumerate_junction_dinucleotides(&reference),
            Err(fetch::Error::MissingContig(String::from("seq0")))
        );

        Ok(())
    }
}
