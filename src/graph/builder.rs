//! A builder for per-contig [`SpliceGraph`]s.

use std::collections::HashMap;

use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::core::Contig;
use crate::graph;
use crate::graph::SpliceGraph;
use crate::transcript::Record;
use crate::transcript::Transcript;

/// The feature kinds folded into the graphs by default.
pub const DEFAULT_KINDS: [&str; 2] = ["transcript", "mRNA"];

/// An error related to building splice graphs.
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// The feature kind filter is empty, so no record could ever be folded.
    EmptyKindFilter,

    /// A graph error.
    Graph(graph::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::EmptyKindFilter => write!(f, "the feature kind filter is empty"),
            Error::Graph(err) => write!(f, "graph error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// The splice graphs built from an annotation.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Built {
    /// One graph per contig.
    graphs: HashMap<Contig, SpliceGraph>,

    /// The number of records that passed the kind filter and were folded.
    folded: usize,

    /// The number of records skipped as malformed.
    skipped: usize,
}

impl Built {
    /// Gets the graphs keyed by contig.
    pub fn graphs(&self) -> &HashMap<Contig, SpliceGraph> {
        &self.graphs
    }

    /// Consumes self and returns the graphs keyed by contig.
    pub fn into_graphs(self) -> HashMap<Contig, SpliceGraph> {
        self.graphs
    }

    /// Gets the number of records folded into the graphs.
    pub fn folded(&self) -> usize {
        self.folded
    }

    /// Gets the number of malformed records that were skipped.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

/// A builder for per-contig [`SpliceGraph`]s.
#[derive(Clone, Debug)]
pub struct Builder {
    /// The feature kinds to fold.
    kinds: Vec<String>,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            kinds: DEFAULT_KINDS.iter().map(|kind| kind.to_string()).collect(),
        }
    }
}

impl Builder {
    /// Sets the feature kinds to fold into the graphs.
    ///
    /// # Examples
    ///
    /// ```
    /// use splicekit::core::Strand;
    /// use splicekit::graph::Builder;
    /// use splicekit::transcript::Record;
    ///
    /// let records = vec![Record {
    ///     id: String::from("tx0"),
    ///     contig: String::from("seq0"),
    ///     kind: String::from("lnc_RNA"),
    ///     strand: Some(Strand::Forward),
    ///     exons: vec![(0, 10), (20, 30)],
    ///     ..Default::default()
    /// }];
    ///
    /// let built = Builder::default().try_build_from(records.clone())?;
    /// assert!(built.graphs().is_empty());
    ///
    /// let built = Builder::default()
    ///     .kinds(["lnc_RNA"])
    ///     .try_build_from(records)?;
    /// assert_eq!(built.graphs().len(), 1);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn kinds<I, S>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.kinds = kinds.into_iter().map(Into::into).collect();
        self
    }

    /// Builds one graph per contig from the records, in supply order.
    ///
    /// Records whose kind is not in the filter are ignored. Malformed records
    /// are logged and skipped.
    pub fn try_build_from<I>(&self, records: I) -> Result<Built>
    where
        I: IntoIterator<Item = Record>,
    {
        if self.kinds.is_empty() {
            return Err(Error::EmptyKindFilter);
        }

        let mut built = Built::default();

        for record in records {
            if !self.kinds.iter().any(|kind| kind == &record.kind) {
                continue;
            }

            let transcript = match Transcript::try_from(record) {
                Ok(transcript) => transcript,
                Err(err) => {
                    warn!("skipping transcript: {err}");
                    built.skipped += 1;
                    continue;
                }
            };

            let graph = built
                .graphs
                .entry(transcript.contig().clone())
                .or_insert_with(|| {
                    debug!("creating splice graph for {}", transcript.contig());
                    SpliceGraph::new(transcript.contig().clone())
                });

            graph.add_transcript(&transcript).map_err(Error::Graph)?;
            built.folded += 1;
        }

        info!(
            "built splice graphs for {} contig(s) from {} transcript(s) ({} skipped)",
            built.graphs.len(),
            built.folded,
            built.skipped
        );

        Ok(built)
    }
}
