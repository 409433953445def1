//! Frequency tables of the dinucleotides flanking splice sites.

use std::collections::BTreeMap;

use tracing::debug;

use crate::core::Position;
use crate::sequence::fetch;
use crate::sequence::reverse_complement;
use crate::sequence::Fetch;

/// A frequency table of dinucleotides.
pub type Table = BTreeMap<String, usize>;

/// The four dinucleotide frequency tables of a splice graph.
///
/// The motifs are reported in transcript orientation, so a canonical intron
/// shows up as `GT` in the donor tables and `AG` in the acceptor tables on
/// both strands.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DinucleotideTables {
    /// Dinucleotides at forward-strand donor sites.
    pub forward_donor: Table,

    /// Dinucleotides at forward-strand acceptor sites.
    pub forward_acceptor: Table,

    /// Dinucleotides at reverse-strand donor sites.
    pub reverse_donor: Table,

    /// Dinucleotides at reverse-strand acceptor sites.
    pub reverse_acceptor: Table,
}

impl DinucleotideTables {
    /// Adds the counts of another set of tables into this one.
    pub fn merge(&mut self, other: DinucleotideTables) {
        for (ours, theirs) in [
            (&mut self.forward_donor, other.forward_donor),
            (&mut self.forward_acceptor, other.forward_acceptor),
            (&mut self.reverse_donor, other.reverse_donor),
            (&mut self.reverse_acceptor, other.reverse_acceptor),
        ] {
            for (motif, count) in theirs {
                *ours.entry(motif).or_default() += count;
            }
        }
    }
}

/// Fetches the dinucleotide at `[start, start + 2)`, upper-cased and
/// optionally reverse complemented.
///
/// Returns `None` for windows starting before the beginning of the contig.
pub(crate) fn fetch_dinucleotide<F>(
    fetcher: &F,
    contig: &str,
    start: Option<Position>,
    reverse: bool,
) -> Result<Option<String>, fetch::Error>
where
    F: Fetch + ?Sized,
{
    let start = match start {
        Some(start) => start,
        None => {
            debug!("skipping a splice site dinucleotide before the start of {contig}");
            return Ok(None);
        }
    };

    let motif = fetcher.fetch(contig, start, start + 2)?.to_ascii_uppercase();

    match reverse {
        true => Ok(Some(reverse_complement(&motif))),
        false => Ok(Some(motif)),
    }
}

/// Increments the count of a motif.
pub(crate) fn tally(table: &mut Table, motif: Option<String>) {
    if let Some(motif) = motif {
        *table.entry(motif).or_default() += 1;
    }
}
