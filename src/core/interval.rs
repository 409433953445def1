//! A 0-based, half-open interval consisting of a start and end position.
//!
//! Intervals here are always expressed in raw genomic orientation: the start
//! is the smaller position and the end is the larger position, regardless of
//! the strand of the feature the interval belongs to.
//!
//! ```text
//! ================ seq0 ===============
//!
//! | 0 | 1 | 2 | 3 | 4 | 5 | 6 | 7 | 8 |
//! -------------------------------------
//! |   |   | X | X | X | X | O |   |   |  <= 2-6
//! ```

use crate::core::Position;

/// An error related to an interval.
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// The start position cannot equal the end position, which would result in
    /// a zero-sized interval.
    ZeroSizedInterval(Position),
    /// The start position is greater than the end position.
    StartGreaterThanEnd(Position, Position),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::ZeroSizedInterval(position) => write!(
                f,
                "start position equals end position ({position}), which is a zero-sized interval"
            ),
            Error::StartGreaterThanEnd(start, end) => write!(
                f,
                "start position ({start}) cannot be greater than the end position ({end})"
            ),
        }
    }
}

impl std::error::Error for Error {}

/// A half-open genomic interval consisting of a start and end position.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Interval(Position, Position);

impl Interval {
    /// Attempts to create a new [`Interval`].
    ///
    /// # Examples
    ///
    /// ```
    /// use splicekit::core::Interval;
    /// use splicekit::core::interval::Error;
    ///
    /// let interval = Interval::try_new(0, 1000)?;
    /// assert_eq!(interval.distance(), 1000);
    ///
    /// assert_eq!(Interval::try_new(10, 10), Err(Error::ZeroSizedInterval(10)));
    /// assert_eq!(
    ///     Interval::try_new(10, 5),
    ///     Err(Error::StartGreaterThanEnd(10, 5))
    /// );
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_new(start: Position, end: Position) -> Result<Interval, Error> {
        if start == end {
            return Err(Error::ZeroSizedInterval(start));
        }

        if start > end {
            return Err(Error::StartGreaterThanEnd(start, end));
        }

        Ok(Interval(start, end))
    }

    /// Gets the start position of the interval.
    ///
    /// # Examples
    ///
    /// ```
    /// use splicekit::core::Interval;
    ///
    /// let interval = Interval::try_new(10, 20)?;
    /// assert_eq!(interval.start(), 10);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn start(&self) -> Position {
        self.0
    }

    /// Gets the (exclusive) end position of the interval.
    ///
    /// # Examples
    ///
    /// ```
    /// use splicekit::core::Interval;
    ///
    /// let interval = Interval::try_new(10, 20)?;
    /// assert_eq!(interval.end(), 20);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn end(&self) -> Position {
        self.1
    }

    /// Gets the number of positions covered by the interval.
    pub fn distance(&self) -> usize {
        self.1 - self.0
    }

    /// Indicates whether `other` falls completely within the interval.
    pub fn encloses(&self, other: &Interval) -> bool {
        self.0 <= other.0 && other.1 <= self.1
    }

    /// Indicates whether two intervals share at least one position.
    ///
    /// Intervals that merely touch (`a.end() == b.start()`) do not overlap.
    ///
    /// # Examples
    ///
    /// ```
    /// use splicekit::core::Interval;
    ///
    /// let a = Interval::try_new(10, 20)?;
    ///
    /// assert!(a.overlaps(&Interval::try_new(19, 30)?));
    /// assert!(!a.overlaps(&Interval::try_new(20, 30)?));
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.0 < other.1 && other.0 < self.1
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.0, self.1)
    }
}

impl TryFrom<(Position, Position)> for Interval {
    type Error = Error;

    fn try_from((start, end): (Position, Position)) -> Result<Self, Self::Error> {
        Interval::try_new(start, end)
    }
}
