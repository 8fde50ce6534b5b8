//! Error types for the sounding-skewt crate.
use thiserror::Error;

/// Error type for the crate.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum SkewtError {
    /// The bulletin has fewer than two station markers, so no complete record can be windowed
    /// out of it.
    #[error("bulletin has fewer than two station markers")]
    BulletinTooShort,
    /// The requested station identifier does not appear in the bulletin.
    #[error("no records for station {0}")]
    UnknownStation(String),
    /// A required column is missing from a profile block header.
    #[error("profile block header is missing the {0} column")]
    MissingColumn(&'static str),
    /// A data row does not line up with the header.
    #[error("row {row} has {found} fields but the header has {expected}")]
    RowLengthMismatch {
        /// One based row number within the block, not counting the header.
        row: usize,
        /// Number of fields named by the header.
        expected: usize,
        /// Number of fields found in the row.
        found: usize,
    },
    /// A data row holds a field that does not parse as a number.
    #[error("row {0} contains an unparseable number")]
    InvalidNumber(usize),
    /// A value (surface value, origin level, etc) that is required is not available.
    #[error("missing value required for analysis")]
    MissingValue,
    /// A profile that is required for this analysis is missing.
    #[error("missing profile required for the analysis")]
    MissingProfile,
    /// There is no data available that meets the requirements.
    #[error("profile is full of missing values, cannot do analysis")]
    NoDataProfile,
    /// Not enough data available for analysis.
    #[error("not enough data available for analysis")]
    NotEnoughData,
    /// Forward an error from the metfor crate.
    #[error("error bubbled up from metfor crate")]
    MetForError,
}

/// Shorthand for results.
pub type Result<T> = std::result::Result<T, SkewtError>;
