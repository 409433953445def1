//! A command line interface to `splicekit`.
//!
//! ```shell
//! cargo run --release --bin=splicekit --features=binaries -- \
//!     features --annotation refFlat.txt.gz --reference hg38.fa.gz \
//!     --feature-type cds-codon --feature-args TGG --output tgg.tsv.gz
//! ```
//!
//! Annotations are read from refFlat files and reference sequences from FASTA
//! files. Either may be gzipped. Tabular outputs are written as TSV to standard
//! output or, when a path is given, to a file (gzipped if the path ends in
//! `.gz`).

use std::fs::File;
use std::io;
use std::io::BufRead;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use clap_verbosity_flag::Verbosity;
use flate2::Compression;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use noodles::fasta;
use splicekit::batch::Annotation;
use splicekit::batch::Summary;
use splicekit::codon::CodonSet;
use splicekit::feature::Options;
use splicekit::feature::Query;
use splicekit::graph;
use splicekit::graph::DinucleotideTables;
use splicekit::graph::SpliceGraph;
use splicekit::record::TsvWriter;
use splicekit::refflat;
use splicekit::sequence::Reference;
use splicekit::transcript::Record;
use tabled::builder::Builder;
use tabled::settings::Alignment;
use tabled::settings::Style;
use tabled::settings::object::Rows;
use tracing::info;
use tracing::warn;
use tracing_log::AsTrace as _;
use tracing_subscriber::EnvFilter;

////////////////////////////////////////////////////////////////////////////////////////
// Inputs and outputs
////////////////////////////////////////////////////////////////////////////////////////

/// Returns whether a path names a gzipped file.
fn is_gzipped(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

/// Reads the records of a refFlat annotation.
fn read_annotation(path: &Path) -> Result<Vec<Record>> {
    let mut reader = refflat::open(path)
        .with_context(|| format!("opening annotation: {}", path.display()))?;

    let records = reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("reading annotation: {}", path.display()))?;

    info!("read {} record(s) from {}", records.len(), path.display());

    Ok(records)
}

/// Reads a FASTA file into an in-memory reference.
fn read_reference(path: &Path) -> Result<Reference> {
    let file =
        File::open(path).with_context(|| format!("opening reference: {}", path.display()))?;

    let inner: Box<dyn BufRead> = match is_gzipped(path) {
        true => Box::new(BufReader::new(MultiGzDecoder::new(file))),
        false => Box::new(BufReader::new(file)),
    };

    let mut reader = fasta::Reader::new(inner);
    let mut reference = Reference::default();

    for result in reader.records() {
        let record =
            result.with_context(|| format!("reading reference: {}", path.display()))?;
        let name = std::str::from_utf8(record.name())
            .with_context(|| format!("reading reference: {}", path.display()))?;

        let bases: &[u8] = record.sequence().as_ref();
        if let Some(offset) = bases.iter().position(|b| !b.is_ascii()) {
            bail!("non-ASCII symbol in sequence {name} at offset {offset}");
        }

        let sequence = String::from_utf8(bases.to_vec())
            .with_context(|| format!("reading sequence {name}"))?;
        reference.insert(name, sequence);
    }

    info!("read {} contig(s) from {}", reference.len(), path.display());

    Ok(reference)
}

/// A destination for tabular output.
enum Output {
    /// Standard output.
    Stdout(BufWriter<io::StdoutLock<'static>>),

    /// An uncompressed file.
    File(BufWriter<File>),

    /// A gzip-compressed file.
    Gzip(GzEncoder<BufWriter<File>>),
}

impl Output {
    /// Opens the output, gzipping it when the path ends in `.gz`.
    fn open(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => return Ok(Self::Stdout(BufWriter::new(io::stdout().lock()))),
        };

        let file =
            File::create(path).with_context(|| format!("creating output: {}", path.display()))?;

        match is_gzipped(path) {
            true => Ok(Self::Gzip(GzEncoder::new(
                BufWriter::new(file),
                Compression::default(),
            ))),
            false => Ok(Self::File(BufWriter::new(file))),
        }
    }

    /// Flushes the output and, for gzip, writes the trailer.
    fn finish(self) -> io::Result<()> {
        match self {
            Self::Stdout(mut writer) => writer.flush(),
            Self::File(mut writer) => writer.flush(),
            Self::Gzip(encoder) => encoder.finish()?.flush(),
        }
    }
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Stdout(writer) => writer.write(buf),
            Self::File(writer) => writer.write(buf),
            Self::Gzip(encoder) => encoder.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Stdout(writer) => writer.flush(),
            Self::File(writer) => writer.flush(),
            Self::Gzip(encoder) => encoder.flush(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Arguments
////////////////////////////////////////////////////////////////////////////////////////

/// The annotation and reference inputs shared by most subcommands.
#[derive(Args, Debug)]
struct Inputs {
    /// The refFlat annotation (optionally gzipped).
    #[arg(short, long)]
    annotation: PathBuf,

    /// The reference FASTA (optionally gzipped).
    #[arg(short, long)]
    reference: PathBuf,

    /// The output path (standard output if omitted; gzipped if it ends in
    /// `.gz`).
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// The kind of feature to locate.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum FeatureType {
    /// Every stop codon in the 3' UTR.
    UtrStop,

    /// In-frame occurrences of the codons given with `--feature-args`.
    CdsCodon,

    /// Every in-frame codon of the CDS.
    CdsAllCodons,

    /// The window around the stop codon given by two offsets in
    /// `--feature-args`.
    StopKmer,
}

/// Arguments for the `features` subcommand.
#[derive(Args, Debug)]
struct FeatureArgs {
    #[command(flatten)]
    inputs: Inputs,

    /// The kind of feature to locate.
    #[arg(long, value_enum)]
    feature_type: FeatureType,

    /// The codons for `cds-codon` or the left and right offsets for
    /// `stop-kmer`.
    #[arg(long, num_args = 1.., allow_negative_numbers = true)]
    feature_args: Vec<String>,

    /// Keeps only the first N hits per transcript (per distinct codon for
    /// `cds-all-codons`).
    #[arg(long)]
    feature_n: Option<usize>,
}

impl FeatureArgs {
    /// Builds the query described by the arguments.
    fn query(&self) -> Result<Query> {
        match self.feature_type {
            FeatureType::UtrStop => Ok(Query::UtrStop),
            FeatureType::CdsAllCodons => Ok(Query::CdsAllCodons),
            FeatureType::CdsCodon => {
                let codons = CodonSet::try_from_tokens(&self.feature_args)
                    .context("parsing `--feature-args` as codons")?;
                Ok(Query::CdsCodon(codons))
            }
            FeatureType::StopKmer => {
                let (left, right) = match self.feature_args.as_slice() {
                    [left, right] => (left, right),
                    _ => bail!(
                        "`stop-kmer` requires exactly two `--feature-args` (the left and right \
                         offsets), found {}",
                        self.feature_args.len()
                    ),
                };

                Ok(Query::StopKmer {
                    left: left
                        .parse()
                        .with_context(|| format!("parsing left offset: {left}"))?,
                    right: right
                        .parse()
                        .with_context(|| format!("parsing right offset: {right}"))?,
                })
            }
        }
    }
}

/// Arguments for the `junctions` subcommand.
#[derive(Args, Debug)]
struct JunctionArgs {
    /// The refFlat annotation (optionally gzipped).
    #[arg(short, long)]
    annotation: PathBuf,

    /// The reference FASTA (optionally gzipped). When given, the dinucleotides
    /// flanking every junction are tallied.
    #[arg(short, long)]
    reference: Option<PathBuf>,

    /// The feature kinds to fold into the graphs.
    #[arg(long = "kind", default_values_t = graph::builder::DEFAULT_KINDS.map(String::from))]
    kinds: Vec<String>,
}

/// Arguments for the `regions` subcommand.
#[derive(Args, Debug)]
struct RegionArgs {
    /// The refFlat annotation (optionally gzipped).
    #[arg(short, long)]
    annotation: PathBuf,

    /// The output path (standard output if omitted; gzipped if it ends in
    /// `.gz`).
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// A subcommand.
#[derive(Debug, Subcommand)]
enum Command {
    /// Writes the assembled sequence, CDS, and UTRs of every transcript.
    Sequence(Inputs),

    /// Writes the features located in every coding transcript.
    Features(FeatureArgs),

    /// Builds the splice graphs and summarizes them.
    Junctions(JunctionArgs),

    /// Writes every exon and intron as GTF.
    Regions(RegionArgs),
}

/// Transcript coordinate mapping, feature extraction, and splice graphs.
#[derive(Debug, Parser)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbose: Verbosity,
}

////////////////////////////////////////////////////////////////////////////////////////
// Subcommands
////////////////////////////////////////////////////////////////////////////////////////

/// Loads the annotation of the default transcript kinds.
fn load_annotation(path: &Path) -> Result<Annotation> {
    let records = read_annotation(path)?;
    Ok(Annotation::from_records(
        records,
        &graph::builder::DEFAULT_KINDS,
    ))
}

/// Logs the outcome of a batch run.
fn log_summary(summary: &Summary) {
    info!(
        "wrote {} row(s) from {} transcript(s); skipped {} transcript(s) and {} contig(s)",
        summary.rows, summary.transcripts, summary.skipped_transcripts, summary.skipped_contigs
    );
}

fn sequence(args: &Inputs) -> Result<()> {
    let annotation = load_annotation(&args.annotation)?;
    let reference = read_reference(&args.reference)?;

    let mut writer = TsvWriter::new(Output::open(args.output.as_deref())?);
    let summary = annotation
        .sequences(&reference, &mut writer)
        .context("writing sequences")?;
    log_summary(&summary);
    writer.into_inner().finish().context("finishing output")?;

    Ok(())
}

fn features(args: &FeatureArgs) -> Result<()> {
    let query = args.query()?;
    let options = Options::default().with_limit(args.feature_n);

    let annotation = load_annotation(&args.inputs.annotation)?;
    let reference = read_reference(&args.inputs.reference)?;

    let mut writer = TsvWriter::new(Output::open(args.inputs.output.as_deref())?);
    let summary = annotation
        .features(&reference, &query, &options, &mut writer)
        .context("writing features")?;
    log_summary(&summary);
    writer.into_inner().finish().context("finishing output")?;

    Ok(())
}

/// Renders a table with rounded borders and left-aligned rows.
fn render(builder: Builder) -> String {
    builder
        .build()
        .with(Style::rounded())
        .modify(Rows::new(1..), Alignment::left())
        .to_string()
}

/// Renders the four dinucleotide tables side by side, one row per motif.
fn render_dinucleotides(tables: &DinucleotideTables) -> String {
    let mut motifs = tables
        .forward_donor
        .keys()
        .chain(tables.forward_acceptor.keys())
        .chain(tables.reverse_donor.keys())
        .chain(tables.reverse_acceptor.keys())
        .collect::<Vec<_>>();
    motifs.sort();
    motifs.dedup();

    let count = |table: &graph::dinucleotide::Table, motif: &str| {
        table.get(motif).copied().unwrap_or_default().to_string()
    };

    let mut builder = Builder::default();
    builder.push_record([
        "Motif",
        "Forward donor",
        "Forward acceptor",
        "Reverse donor",
        "Reverse acceptor",
    ]);

    for motif in motifs {
        builder.push_record([
            motif.clone(),
            count(&tables.forward_donor, motif),
            count(&tables.forward_acceptor, motif),
            count(&tables.reverse_donor, motif),
            count(&tables.reverse_acceptor, motif),
        ]);
    }

    render(builder)
}

fn junctions(args: &JunctionArgs) -> Result<()> {
    let records = read_annotation(&args.annotation)?;
    let built = graph::Builder::default()
        .kinds(args.kinds.iter().cloned())
        .try_build_from(records)
        .context("building splice graphs")?;

    let mut graphs = built.graphs().values().collect::<Vec<&SpliceGraph>>();
    graphs.sort_by(|a, b| a.contig().cmp(b.contig()));

    let mut builder = Builder::default();
    builder.push_record(["Contig", "Strand", "Donors", "Junctions", "Exons"]);

    for graph in &graphs {
        for (strand, g) in [("+", graph.forward()), ("-", graph.reverse())] {
            builder.push_record([
                graph.contig().clone(),
                strand.to_string(),
                g.splice().source_positions().count().to_string(),
                g.splice().len().to_string(),
                g.exon().len().to_string(),
            ]);
        }
    }

    println!("{}", render(builder));
    println!(
        "{} transcript(s) folded, {} skipped",
        built.folded(),
        built.skipped()
    );

    let path = match &args.reference {
        Some(path) => path,
        None => return Ok(()),
    };

    let reference = read_reference(path)?;
    let mut tables = DinucleotideTables::default();

    for graph in graphs {
        match graph.enumerate_junction_dinucleotides(&reference) {
            Ok(t) => tables.merge(t),
            Err(err) => {
                warn!("skipping dinucleotides for {}: {err}", graph.contig());
            }
        }
    }

    println!("{}", render_dinucleotides(&tables));

    Ok(())
}

fn regions(args: &RegionArgs) -> Result<()> {
    let annotation = load_annotation(&args.annotation)?;
    let mut output = Output::open(args.output.as_deref())?;

    for region in annotation.regions() {
        writeln!(output, "{region}").context("writing regions")?;
    }

    output.finish().context("finishing output")?;

    Ok(())
}

////////////////////////////////////////////////////////////////////////////////////////
// Main
////////////////////////////////////////////////////////////////////////////////////////

fn main() -> Result<()> {
    let cli = Cli::parse();

    match std::env::var("RUST_LOG") {
        Ok(_) => tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(io::stderr)
            .init(),
        Err(_) => tracing_subscriber::fmt()
            .with_max_level(cli.verbose.log_level_filter().as_trace())
            .with_writer(io::stderr)
            .init(),
    };

    match &cli.command {
        Command::Sequence(args) => sequence(args),
        Command::Features(args) => features(args),
        Command::Junctions(args) => junctions(args),
        Command::Regions(args) => regions(args),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;

    #[test]
    fn test_gzipped_output_is_finished() -> Result<()> {
        let dir = std::env::temp_dir().join(format!("splicekit-output-{}", std::process::id()));
        std::fs::create_dir_all(&dir)?;
        let path = dir.join("rows.tsv.gz");

        let mut output = Output::open(Some(path.as_path()))?;
        assert!(matches!(output, Output::Gzip(_)));
        writeln!(output, "a\tb")?;
        writeln!(output, "1\t2")?;
        output.finish()?;

        let mut contents = String::new();
        MultiGzDecoder::new(File::open(&path)?).read_to_string(&mut contents)?;
        assert_eq!(contents, "a\tb\n1\t2\n");

        std::fs::remove_dir_all(&dir)?;

        Ok(())
    }

    #[test]
    fn test_plain_output() -> Result<()> {
        let dir = std::env::temp_dir().join(format!("splicekit-plain-{}", std::process::id()));
        std::fs::create_dir_all(&dir)?;
        let path = dir.join("rows.tsv");

        let mut output = Output::open(Some(path.as_path()))?;
        assert!(matches!(output, Output::File(_)));
        writeln!(output, "a")?;
        output.finish()?;

        assert_eq!(std::fs::read_to_string(&path)?, "a\n");

        std::fs::remove_dir_all(&dir)?;

        Ok(())
    }
}
