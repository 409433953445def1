//! `splicekit` is a crate for working with transcript models: mapping between
//! genomic and transcript coordinates, locating sequence features, and building
//! splice junction graphs.
//!
//! The crate provides two main points of entry:
//!
//! - Mapping a single transcript between genomic and transcript space and
//!   locating features (codons, stop codons, kmers) within it.
//! - Building one splice junction graph per contig from a whole annotation.
//!
//! ## Transcripts and coordinate maps
//!
//! A [`Transcript`] is validated from a raw [`transcript::Record`]: an ordered,
//! non-overlapping list of half-open exon intervals with a strand and a few
//! identifiers. Exons are always listed in increasing genomic order, even for
//! transcripts on the reverse strand.
//!
//! A [`CoordinateMap`] is derived from a transcript and maps every offset of
//! the mature (spliced) transcript to its genomic position. On the reverse
//! strand, transcript offset `0` is the last base of the last exon. The
//! mapping is the only way the crate moves between the two coordinate spaces:
//! every genomic interval reported by a [`feature::Locator`] goes through
//! [`CoordinateMap::project()`].
//!
//! Transcript sequences are assembled through the [`sequence::Fetch`] trait,
//! which any reference genome can implement. An in-memory
//! [`sequence::Reference`] is provided.
//!
//! ```
//! use splicekit::core::Strand;
//! use splicekit::feature::Locator;
//! use splicekit::mapping::CoordinateMap;
//! use splicekit::sequence::Reference;
//! use splicekit::transcript::Record;
//! use splicekit::Transcript;
//!
//! let reference = Reference::from_iter([("seq0", "TTATTTCATnnnnn")]);
//!
//! let transcript = Transcript::try_from(Record {
//!     id: String::from("tx0"),
//!     contig: String::from("seq0"),
//!     strand: Some(Strand::Reverse),
//!     exons: vec![(0, 9)],
//!     coding: Some((0, 9)),
//!     ..Default::default()
//! })?;
//!
//! let map = CoordinateMap::new(&transcript);
//! assert_eq!(map.genomic_position(0)?, 8);
//!
//! let locator = Locator::try_from_fetcher(&transcript, &reference)?;
//! assert_eq!(locator.sequence().as_str(), "ATGAAATAA");
//!
//! for feature in locator.all_cds_codons(None)? {
//!     println!(
//!         "{} ({:?}) at {}-{} -> {}",
//!         feature.sequence, feature.amino_acid, feature.t_start, feature.t_end, feature.genomic
//!     );
//! }
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Splice graphs
//!
//! A [`graph::SpliceGraph`] holds, for each strand of a contig, the set of
//! splice edges (donor → acceptor) and exon-boundary edges (5' → 3') of every
//! transcript folded into it. Most users will build the graphs of an entire
//! annotation with a [`graph::Builder`] and then inspect the edges or tally the
//! dinucleotides flanking each junction with
//! [`graph::SpliceGraph::enumerate_junction_dinucleotides()`].
//!
//! ```
//! use splicekit::graph;
//! use splicekit::refflat;
//!
//! let data = b"GENE0\ttx0\tseq0\t+\t0\t50\t0\t0\t3\t0,20,40,\t10,30,50,\n\
//!              GENE0\ttx1\tseq0\t+\t0\t50\t0\t0\t2\t0,40,\t10,50,\n";
//!
//! let mut reader = refflat::Reader::new(&data[..]);
//! let records = reader.records().collect::<Result<Vec<_>, _>>()?;
//!
//! let built = graph::Builder::default().try_build_from(records)?;
//! let graph = built.graphs().get("seq0").unwrap();
//!
//! for (donor, acceptor) in graph.forward().splice().edges() {
//!     println!("{donor} -> {acceptor}");
//! }
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![warn(missing_debug_implementations)]
#![warn(clippy::missing_docs_in_private_items)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod batch;
pub mod codon;
pub mod core;
pub mod feature;
pub mod graph;
pub mod mapping;
pub mod record;
pub mod refflat;
pub mod regions;
pub mod sequence;
pub mod transcript;

pub use mapping::CoordinateMap;
pub use transcript::Transcript;
