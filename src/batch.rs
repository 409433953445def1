//! Batch processing of a whole annotation.
//!
//! An [`Annotation`] groups validated transcripts by contig. The batch
//! operations walk it contig by contig and stream [`Row`]s into a [`Sink`],
//! applying a fixed failure policy:
//!
//! - malformed transcripts are logged and skipped;
//! - a contig missing from the reference is logged and skipped entirely;
//! - an unknown codon or an out-of-range coordinate aborts the batch, since
//!   either means the coordinates being emitted cannot be trusted.

use std::collections::BTreeMap;

use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::core::Contig;
use crate::feature;
use crate::feature::Feature;
use crate::feature::Locator;
use crate::feature::Options;
use crate::feature::Query;
use crate::mapping::CoordinateMap;
use crate::record;
use crate::record::Row;
use crate::record::Sink;
use crate::regions;
use crate::regions::Region;
use crate::sequence;
use crate::sequence::Fetch;
use crate::sequence::TranscriptSequence;
use crate::transcript::Record;
use crate::transcript::Transcript;

/// The value written for fields that do not apply (e.g., the CDS of a
/// non-coding transcript).
pub const MISSING: &str = "NA";

/// An error that aborts a batch.
#[derive(Debug)]
pub enum Error {
    /// A feature could not be located.
    Feature(String, feature::Error),

    /// A row could not be written.
    Sink(record::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Feature(id, err) => write!(f, "feature error for transcript {id}: {err}"),
            Error::Sink(err) => write!(f, "sink error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// Counts describing a finished batch.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Summary {
    /// The number of transcripts processed.
    pub transcripts: usize,

    /// The number of rows written.
    pub rows: usize,

    /// The number of transcripts skipped.
    pub skipped_transcripts: usize,

    /// The number of contigs skipped for lack of a reference sequence.
    pub skipped_contigs: usize,
}

/// Validated transcripts grouped by contig.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Annotation {
    /// The transcripts of each contig, in supply order.
    contigs: BTreeMap<Contig, Vec<Transcript>>,

    /// The number of malformed records that were skipped.
    skipped: usize,
}

impl Annotation {
    /// Validates and groups records by contig.
    ///
    /// Only records whose kind is in `kinds` are kept (every record is kept
    /// when `kinds` is empty). Malformed records are logged and skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// use splicekit::batch::Annotation;
    /// use splicekit::core::Strand;
    /// use splicekit::transcript::Record;
    ///
    /// let record = |id: &str, contig: &str, exons: Vec<(usize, usize)>| Record {
    ///     id: id.to_string(),
    ///     contig: contig.to_string(),
    ///     kind: String::from("transcript"),
    ///     strand: Some(Strand::Forward),
    ///     exons,
    ///     ..Default::default()
    /// };
    ///
    /// let annotation = Annotation::from_records(
    ///     vec![
    ///         record("tx0", "seq1", vec![(0, 10)]),
    ///         record("tx1", "seq0", vec![(0, 10)]),
    ///         record("tx2", "seq0", vec![]),
    ///     ],
    ///     &[],
    /// );
    ///
    /// assert_eq!(annotation.len(), 2);
    /// assert_eq!(annotation.skipped(), 1);
    /// assert_eq!(annotation.contigs().collect::<Vec<_>>(), vec!["seq0", "seq1"]);
    /// ```
    pub fn from_records<I>(records: I, kinds: &[&str]) -> Self
    where
        I: IntoIterator<Item = Record>,
    {
        let mut annotation = Self::default();

        for record in records {
            if !kinds.is_empty() && !kinds.contains(&record.kind.as_str()) {
                continue;
            }

            match Transcript::try_from(record) {
                Ok(transcript) => annotation
                    .contigs
                    .entry(transcript.contig().clone())
                    .or_default()
                    .push(transcript),
                Err(err) => {
                    warn!("skipping transcript: {err}");
                    annotation.skipped += 1;
                }
            }
        }

        annotation
    }

    /// Gets the number of transcripts.
    pub fn len(&self) -> usize {
        self.contigs.values().map(Vec::len).sum()
    }

    /// Returns whether there are no transcripts.
    pub fn is_empty(&self) -> bool {
        self.contigs.is_empty()
    }

    /// Gets the number of malformed records skipped during construction.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Iterates over the contigs in lexicographical order.
    pub fn contigs(&self) -> impl Iterator<Item = &str> {
        self.contigs.keys().map(String::as_str)
    }

    /// Gets the transcripts of a contig.
    pub fn transcripts(&self, contig: &str) -> Option<&[Transcript]> {
        self.contigs.get(contig).map(Vec::as_slice)
    }

    /// Iterates over every transcript, contig by contig.
    pub fn iter(&self) -> impl Iterator<Item = &Transcript> {
        self.contigs.values().flatten()
    }

    /// Writes one sequence row per transcript.
    ///
    /// Each row carries the assembled sequence, its CDS and UTRs, the
    /// transcript offsets of the CDS, and the exon count. The coding fields
    /// of non-coding transcripts are [`MISSING`].
    pub fn sequences<F, S>(&self, fetcher: &F, sink: &mut S) -> Result<Summary>
    where
        F: Fetch + ?Sized,
        S: Sink + ?Sized,
    {
        let mut summary = Summary {
            skipped_transcripts: self.skipped,
            ..Default::default()
        };

        for (contig, transcripts) in self.present_contigs(fetcher, &mut summary) {
            debug!("assembling {} transcript(s) on {contig}", transcripts.len());

            for transcript in transcripts {
                let (_, sequence) = match assemble(transcript, fetcher) {
                    Some(assembled) => assembled,
                    None => {
                        summary.skipped_transcripts += 1;
                        continue;
                    }
                };

                sink.write_row(sequence_row(transcript, &sequence))
                    .map_err(Error::Sink)?;
                summary.transcripts += 1;
                summary.rows += 1;
            }
        }

        info!(
            "wrote {} sequence row(s) ({} transcript(s) skipped, {} contig(s) skipped)",
            summary.rows, summary.skipped_transcripts, summary.skipped_contigs
        );

        Ok(summary)
    }

    /// Locates features in every coding transcript and writes one row per
    /// feature.
    ///
    /// Non-coding transcripts are skipped.
    pub fn features<F, S>(
        &self,
        fetcher: &F,
        query: &Query,
        options: &Options,
        sink: &mut S,
    ) -> Result<Summary>
    where
        F: Fetch + ?Sized,
        S: Sink + ?Sized,
    {
        let mut summary = Summary {
            skipped_transcripts: self.skipped,
            ..Default::default()
        };

        for (contig, transcripts) in self.present_contigs(fetcher, &mut summary) {
            debug!("locating features in {} transcript(s) on {contig}", transcripts.len());

            for transcript in transcripts {
                if transcript.coding().is_none() {
                    debug!("skipping non-coding transcript {}", transcript.id());
                    summary.skipped_transcripts += 1;
                    continue;
                }

                let (map, sequence) = match assemble(transcript, fetcher) {
                    Some(assembled) => assembled,
                    None => {
                        summary.skipped_transcripts += 1;
                        continue;
                    }
                };

                let locator = Locator::new(transcript, map, &sequence);
                let features = locator
                    .locate(query, options)
                    .map_err(|e| Error::Feature(transcript.id().to_string(), e))?;

                for feature in &features {
                    sink.write_row(feature_row(&locator, feature))
                        .map_err(Error::Sink)?;
                }

                summary.transcripts += 1;
                summary.rows += features.len();
            }
        }

        info!(
            "wrote {} feature row(s) from {} transcript(s) ({} transcript(s) skipped, {} \
             contig(s) skipped)",
            summary.rows, summary.transcripts, summary.skipped_transcripts, summary.skipped_contigs
        );

        Ok(summary)
    }

    /// Builds the de-duplicated exon and intron region table.
    pub fn regions(&self) -> Vec<Region> {
        regions::table(self.iter())
    }

    /// Gets the contigs that have a reference sequence, logging and counting
    /// the ones that do not.
    fn present_contigs<'a, F>(
        &'a self,
        fetcher: &F,
        summary: &mut Summary,
    ) -> Vec<(&'a Contig, &'a [Transcript])>
    where
        F: Fetch + ?Sized,
    {
        let mut present = Vec::new();

        for (contig, transcripts) in &self.contigs {
            if fetcher.contains_contig(contig) {
                present.push((contig, transcripts.as_slice()));
                continue;
            }

            warn!(
                "skipping {} transcript(s) on {contig}: {}",
                transcripts.len(),
                sequence::fetch::Error::MissingContig(contig.clone())
            );
            summary.skipped_contigs += 1;
        }

        present
    }
}

/// Assembles the coordinate map and sequence of a transcript, logging and
/// returning `None` when the transcript cannot be assembled.
fn assemble<F>(transcript: &Transcript, fetcher: &F) -> Option<(CoordinateMap, TranscriptSequence)>
where
    F: Fetch + ?Sized,
{
    let map = CoordinateMap::new(transcript);

    match TranscriptSequence::try_from_transcript(transcript, &map, fetcher) {
        Ok(sequence) => Some((map, sequence)),
        Err(err) => {
            warn!("skipping transcript {}: {err}", transcript.id());
            None
        }
    }
}

/// Formats an optional value, falling back to [`MISSING`].
fn or_missing<T: ToString>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| MISSING.to_string())
}

/// Builds the sequence row of a transcript.
fn sequence_row(transcript: &Transcript, sequence: &TranscriptSequence) -> Row {
    let coding = sequence.coding();

    Row::default()
        .with("gene_id", transcript.gene_id())
        .with("gene_name", transcript.gene_name())
        .with("transcript_id", transcript.id())
        .with("contig", transcript.contig())
        .with("strand", transcript.strand())
        .with("seq", sequence.as_str())
        .with("CDS_seq", or_missing(sequence.cds()))
        .with("UTR_3p_seq", or_missing(sequence.utr3()))
        .with("UTR_5p_seq", or_missing(sequence.utr5()))
        .with("CDS_start", or_missing(coding.map(|(start, _)| start)))
        .with("CDS_end", or_missing(coding.map(|(_, end)| end)))
        .with("n_exons", transcript.exons().len())
}

/// Builds the row of a located feature.
fn feature_row(locator: &Locator<'_>, feature: &Feature) -> Row {
    let transcript = locator.transcript();
    let coding = locator.sequence().coding();

    let mut row = Row::default()
        .with("gene_id", transcript.gene_id())
        .with("gene_name", transcript.gene_name())
        .with("transcript_id", transcript.id())
        .with("contig", transcript.contig())
        .with("t_start", feature.t_start)
        .with("t_end", feature.t_end)
        .with("g_start", feature.genomic.start())
        .with("g_end", feature.genomic.end())
        .with("feature_idx", feature.index)
        .with("feature_seq", &feature.sequence);

    if let Some(amino_acid) = feature.amino_acid {
        row.push("feature_AA", amino_acid);
    }

    row.with("strand", transcript.strand())
        .with("CDS_start", or_missing(coding.map(|(start, _)| start)))
        .with("CDS_end", or_missing(coding.map(|(_, end)| end)))
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::codon;
    use crate::core::Strand;
    use crate::mapping;
    use crate::sequence::Reference;

    fn record(id: &str, contig: &str, strand: Strand, exons: &[(usize, usize)]) -> Record {
        Record {
            id: id.to_string(),
            gene_id: format!("{id}-gene"),
            gene_name: format!("{id}-name"),
            contig: contig.to_string(),
            kind: String::from("transcript"),
            strand: Some(strand),
            span: None,
            exons: exons.to_vec(),
            coding: None,
        }
    }

    fn annotation() -> Annotation {
        let mut coding = record("tx0", "seq0", Strand::Forward, &[(0, 10), (15, 27)]);
        coding.coding = Some((2, 19));

        let non_coding = record("tx1", "seq0", Strand::Reverse, &[(0, 5)]);
        let missing = record("tx2", "chrZ", Strand::Forward, &[(0, 5)]);
        let malformed = record("tx3", "seq0", Strand::Forward, &[(10, 5)]);

        let mut lnc = record("tx4", "seq0", Strand::Forward, &[(0, 5)]);
        lnc.kind = String::from("lnc_RNA");

        Annotation::from_records(
            vec![coding, non_coding, missing, malformed, lnc],
            &["transcript", "mRNA"],
        )
    }

    fn reference() -> Reference {
        Reference::from_iter([("seq0", "GGATGAAATGnnnnnGTAACTGATAGC")])
    }

    #[test]
    fn test_annotation_grouping() {
        let annotation = annotation();

        assert_eq!(annotation.len(), 3);
        assert_eq!(annotation.skipped(), 1);
        assert_eq!(annotation.contigs().collect::<Vec<_>>(), vec!["chrZ", "seq0"]);
        assert_eq!(annotation.transcripts("seq0").map(|t| t.len()), Some(2));
        assert!(annotation.transcripts("seq9").is_none());
    }

    #[test]
    fn test_sequences() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let annotation = annotation();
        let mut rows: Vec<Row> = Vec::new();

        let summary = annotation.sequences(&reference(), &mut rows)?;
        assert_eq!(summary.rows, 2);
        assert_eq!(summary.skipped_contigs, 1);
        assert_eq!(summary.skipped_transcripts, 1);

        let coding = &rows[0];
        assert_eq!(coding.get("transcript_id"), Some("tx0"));
        assert_eq!(coding.get("seq"), Some("GGATGAAATGGTAACTGATAGC"));
        assert_eq!(coding.get("CDS_seq"), Some("ATGAAATGGTAA"));
        assert_eq!(coding.get("UTR_5p_seq"), Some("GG"));
        assert_eq!(coding.get("UTR_3p_seq"), Some("CTGATAGC"));
        assert_eq!(coding.get("CDS_start"), Some("2"));
        assert_eq!(coding.get("CDS_end"), Some("14"));
        assert_eq!(coding.get("n_exons"), Some("2"));
        assert_eq!(coding.get("strand"), Some("+"));

        let non_coding = &rows[1];
        assert_eq!(non_coding.get("seq"), Some("CATCC"));
        assert_eq!(non_coding.get("CDS_seq"), Some(MISSING));
        assert_eq!(non_coding.get("CDS_start"), Some(MISSING));
        assert_eq!(non_coding.get("strand"), Some("-"));

        Ok(())
    }

    #[test]
    fn test_features() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let annotation = annotation();
        let mut rows: Vec<Row> = Vec::new();

        let summary = annotation.features(
            &reference(),
            &Query::CdsAllCodons,
            &Options::default(),
            &mut rows,
        )?;

        assert_eq!(summary.transcripts, 1);
        assert_eq!(summary.rows, 4);

        let names = rows[0].names().collect::<Vec<_>>();
        assert_eq!(
            names,
            vec![
                "gene_id",
                "gene_name",
                "transcript_id",
                "contig",
                "t_start",
                "t_end",
                "g_start",
                "g_end",
                "feature_idx",
                "feature_seq",
                "feature_AA",
                "strand",
                "CDS_start",
                "CDS_end",
            ]
        );

        let last = &rows[3];
        assert_eq!(last.get("feature_seq"), Some("TAA"));
        assert_eq!(last.get("feature_AA"), Some("*"));
        assert_eq!(last.get("t_start"), Some("11"));
        assert_eq!(last.get("g_start"), Some("16"));
        assert_eq!(last.get("g_end"), Some("19"));

        let mut rows: Vec<Row> = Vec::new();
        annotation.features(
            &reference(),
            &Query::StopKmer { left: 0, right: 3 },
            &Options::default(),
            &mut rows,
        )?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("feature_seq"), Some("TAACTG"));
        assert_eq!(rows[0].get("feature_AA"), None);

        Ok(())
    }

    #[test]
    fn test_unknown_codons_abort_the_batch() {
        let mut r = record("tx0", "seq0", Strand::Forward, &[(0, 9)]);
        r.coding = Some((0, 9));
        let annotation = Annotation::from_records(vec![r], &[]);
        let reference = Reference::from_iter([("seq0", "ATGNNNTAA")]);

        let err = annotation
            .features(
                &reference,
                &Query::CdsAllCodons,
                &Options::default(),
                &mut Vec::<Row>::new(),
            )
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Feature(_, feature::Error::Codon(codon::Error::UnknownCodon(_)))
        ));
    }

    #[test]
    fn test_coding_span_outside_exons_is_skipped() -> std::result::Result<(), Box<dyn std::error::Error>>
    {
        // The coding span starts inside the intron.
        let mut r = record("tx0", "seq0", Strand::Forward, &[(0, 10), (15, 27)]);
        r.coding = Some((12, 19));
        let annotation = Annotation::from_records(vec![r], &[]);

        let mut rows: Vec<Row> = Vec::new();
        let summary = annotation.sequences(&reference(), &mut rows)?;
        assert_eq!(summary.rows, 0);
        assert_eq!(summary.skipped_transcripts, 1);

        // Sanity check that the skip came from the mapping.
        let transcript = annotation.iter().next().unwrap();
        let map = CoordinateMap::new(transcript);
        assert_eq!(map.transcript_offset(12), Err(mapping::Error::NotExonic(12)));

        Ok(())
    }

    #[test]
    fn test_regions() {
        let regions = annotation().regions();
        assert_eq!(
            regions.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
            vec!["ex0", "ex1", "ex2", "in0", "ex3"]
        );
    }
}
