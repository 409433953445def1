//! The standard genetic code and caller-supplied codon sets.

use std::collections::BTreeSet;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

/// The codons that terminate translation.
pub const STOP_CODONS: [&str; 3] = ["TAA", "TAG", "TGA"];

/// The one-letter symbol for a stop codon.
pub const STOP: char = '*';

/// The standard genetic code.
///
/// The codons are listed in `TCAG` order of their first, second, and third
/// bases, so the index of a codon is `16 * b1 + 4 * b2 + b3` where `T = 0`,
/// `C = 1`, `A = 2`, and `G = 3`.
#[rustfmt::skip]
pub const STANDARD: [(&str, char); 64] = [
    ("TTT", 'F'), ("TTC", 'F'), ("TTA", 'L'), ("TTG", 'L'),
    ("TCT", 'S'), ("TCC", 'S'), ("TCA", 'S'), ("TCG", 'S'),
    ("TAT", 'Y'), ("TAC", 'Y'), ("TAA", '*'), ("TAG", '*'),
    ("TGT", 'C'), ("TGC", 'C'), ("TGA", '*'), ("TGG", 'W'),
    ("CTT", 'L'), ("CTC", 'L'), ("CTA", 'L'), ("CTG", 'L'),
    ("CCT", 'P'), ("CCC", 'P'), ("CCA", 'P'), ("CCG", 'P'),
    ("CAT", 'H'), ("CAC", 'H'), ("CAA", 'Q'), ("CAG", 'Q'),
    ("CGT", 'R'), ("CGC", 'R'), ("CGA", 'R'), ("CGG", 'R'),
    ("ATT", 'I'), ("ATC", 'I'), ("ATA", 'I'), ("ATG", 'M'),
    ("ACT", 'T'), ("ACC", 'T'), ("ACA", 'T'), ("ACG", 'T'),
    ("AAT", 'N'), ("AAC", 'N'), ("AAA", 'K'), ("AAG", 'K'),
    ("AGT", 'S'), ("AGC", 'S'), ("AGA", 'R'), ("AGG", 'R'),
    ("GTT", 'V'), ("GTC", 'V'), ("GTA", 'V'), ("GTG", 'V'),
    ("GCT", 'A'), ("GCC", 'A'), ("GCA", 'A'), ("GCG", 'A'),
    ("GAT", 'D'), ("GAC", 'D'), ("GAA", 'E'), ("GAG", 'E'),
    ("GGT", 'G'), ("GGC", 'G'), ("GGA", 'G'), ("GGG", 'G'),
];

/// A single codon made up of `A`, `C`, `G`, and `T` (in any case).
static CODON_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[ACGTacgt]{3}$").unwrap());

/// An error related to codons.
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// The triplet is not a codon in the table (e.g., it contains an `N`).
    UnknownCodon(String),

    /// A token could not be parsed as a codon.
    InvalidCodon(String),

    /// A codon set was given no codons.
    EmptyCodonSet,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::UnknownCodon(codon) => write!(f, "unknown codon: {codon}"),
            Error::InvalidCodon(token) => write!(f, "invalid codon: {token}"),
            Error::EmptyCodonSet => write!(f, "a codon set must contain at least one codon"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// The index of a base in [`STANDARD`].
fn base_index(base: u8) -> Option<usize> {
    match base.to_ascii_uppercase() {
        b'T' => Some(0),
        b'C' => Some(1),
        b'A' => Some(2),
        b'G' => Some(3),
        _ => None,
    }
}

/// Translates a codon into its one-letter amino acid symbol.
///
/// Lookup is case insensitive. Stop codons translate to [`STOP`].
///
/// # Examples
///
/// ```
/// use splicekit::codon;
/// use splicekit::codon::Error;
///
/// assert_eq!(codon::translate("ATG")?, 'M');
/// assert_eq!(codon::translate("tga")?, '*');
/// assert_eq!(
///     codon::translate("ANG"),
///     Err(Error::UnknownCodon(String::from("ANG")))
/// );
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn translate(codon: &str) -> Result<char> {
    let unknown = || Error::UnknownCodon(codon.to_string());

    let bytes = codon.as_bytes();
    if bytes.len() != 3 {
        return Err(unknown());
    }

    let mut index = 0;
    for &base in bytes {
        index = index * 4 + base_index(base).ok_or_else(unknown)?;
    }

    Ok(STANDARD[index].1)
}

/// A non-empty set of upper-cased codons.
///
/// # Examples
///
/// ```
/// use splicekit::codon::CodonSet;
///
/// let set = "taa, TGA".parse::<CodonSet>()?;
/// assert_eq!(set.len(), 2);
/// assert!(set.contains("TAA"));
/// assert!(!set.contains("TAG"));
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CodonSet(BTreeSet<String>);

impl CodonSet {
    /// Attempts to create a codon set from a list of tokens.
    pub fn try_from_tokens<I, S>(tokens: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut codons = BTreeSet::new();

        for token in tokens {
            let token = token.as_ref().trim();

            if !CODON_REGEX.is_match(token) {
                return Err(Error::InvalidCodon(token.to_string()));
            }

            codons.insert(token.to_ascii_uppercase());
        }

        if codons.is_empty() {
            return Err(Error::EmptyCodonSet);
        }

        Ok(Self(codons))
    }

    /// The set of stop codons.
    pub fn stop() -> Self {
        Self(STOP_CODONS.iter().map(|codon| codon.to_string()).collect())
    }

    /// Returns whether a (case sensitive, upper-cased) codon is in the set.
    pub fn contains(&self, codon: &str) -> bool {
        self.0.contains(codon)
    }

    /// Gets the number of codons in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`: codon sets cannot be empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the codons in lexicographical order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl FromStr for CodonSet {
    type Err = Error;

    /// Parses codons separated by commas and/or whitespace.
    fn from_str(s: &str) -> Result<Self> {
        Self::try_from_tokens(
            s.split(|c: char| c == ',' || c.is_whitespace())
                .filter(|token| !token.is_empty()),
        )
    }
}

impl std::fmt::Display for CodonSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.iter().collect::<Vec<_>>().join(","))
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn test_every_codon_translates() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let bases = ['T', 'C', 'A', 'G'];
        let mut seen = BTreeSet::new();

        for (i, a) in bases.iter().enumerate() {
            for (j, b) in bases.iter().enumerate() {
                for (k, c) in bases.iter().enumerate() {
                    let codon = format!("{a}{b}{c}");
                    let (entry, symbol) = STANDARD[i * 16 + j * 4 + k];

                    assert_eq!(entry, codon);
                    assert_eq!(translate(&codon)?, symbol);
                    assert_eq!(translate(&codon.to_lowercase())?, symbol);
                    seen.insert(codon);
                }
            }
        }

        assert_eq!(seen.len(), 64);

        Ok(())
    }

    #[test]
    fn test_stop_codons() -> std::result::Result<(), Box<dyn std::error::Error>> {
        for codon in STOP_CODONS {
            assert_eq!(translate(codon)?, STOP);
        }

        let stops = STANDARD
            .iter()
            .filter(|(_, symbol)| *symbol == STOP)
            .count();
        assert_eq!(stops, 3);

        Ok(())
    }

    #[test]
    fn test_unknown_codons() {
        assert_eq!(translate("NNN"), Err(Error::UnknownCodon(String::from("NNN"))));
        assert_eq!(translate("AT"), Err(Error::UnknownCodon(String::from("AT"))));
        assert_eq!(translate("ATGA"), Err(Error::UnknownCodon(String::from("ATGA"))));
    }

    #[test]
    fn test_codon_sets() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let set = CodonSet::try_from_tokens(["atg", "TGG", "ATG"])?;
        assert_eq!(set.len(), 2);
        assert_eq!(set.to_string(), "ATG,TGG");

        let set = "TAA TAG,TGA".parse::<CodonSet>()?;
        assert_eq!(set, CodonSet::stop());

        assert_eq!(
            "TAA,XYZ".parse::<CodonSet>(),
            Err(Error::InvalidCodon(String::from("XYZ")))
        );
        assert_eq!(
            "ATGC".parse::<CodonSet>(),
            Err(Error::InvalidCodon(String::from("ATGC")))
        );
        assert_eq!(" , ".parse::<CodonSet>(), Err(Error::EmptyCodonSet));

        Ok(())
    }
}
