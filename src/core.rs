//! Core functionality used across the crate.

pub mod interval;
pub mod strand;

pub use interval::Interval;
pub use strand::Strand;

/// The name of a contiguous molecule (e.g., a chromosome) upon which a
/// feature is located.
pub type Contig = String;

/// An exact, 0-based position upon a contig.
pub type Position = usize;
