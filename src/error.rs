use core::fmt;

/// Result alias for `equisize`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the balancing core and its collaborator glue.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Input was empty.
    EmptyInput,

    /// Vector dimension mismatch.
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Found dimension.
        found: usize,
    },

    /// A coordinate was NaN or infinite.
    NonFiniteValue {
        /// Row (point index).
        row: usize,
        /// Column (coordinate index).
        col: usize,
    },

    /// Invalid number of clusters requested.
    InvalidClusterCount {
        /// Requested count.
        requested: usize,
        /// Number of items.
        n_items: usize,
    },

    /// Invalid parameter value.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },

    /// A cluster is too small or too large for the router.
    RouteInfeasible {
        /// Cluster label.
        cluster: usize,
        /// Number of stops in the cluster.
        size: usize,
        /// Smallest routable cluster.
        min: usize,
        /// Largest routable cluster.
        max: usize,
    },

    /// The routing collaborator failed.
    Router(String),

    /// Generic error with message.
    Other(String),
}

impl Error {
    /// True for errors raised while validating a call, before any clustering work.
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(
            self,
            Error::EmptyInput
                | Error::DimensionMismatch { .. }
                | Error::NonFiniteValue { .. }
                | Error::InvalidClusterCount { .. }
                | Error::InvalidParameter { .. }
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyInput => write!(f, "empty input provided"),
            Error::DimensionMismatch { expected, found } => {
                write!(f, "dimension mismatch: expected {expected}, found {found}")
            }
            Error::NonFiniteValue { row, col } => {
                write!(f, "non-finite coordinate at point {row}, column {col}")
            }
            Error::InvalidClusterCount { requested, n_items } => {
                write!(f, "cannot create {requested} clusters from {n_items} items")
            }
            Error::InvalidParameter { name, message } => {
                write!(f, "invalid parameter '{name}': {message}")
            }
            Error::RouteInfeasible {
                cluster,
                size,
                min,
                max,
            } => write!(
                f,
                "cluster {cluster} has {size} stops; routing needs {min}..={max}"
            ),
            Error::Router(msg) => write!(f, "router failed: {msg}"),
            Error::Other(msg) => write!(f, "{msg}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
