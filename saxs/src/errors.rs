#[non_exhaustive]
#[derive(Debug)]
pub enum Error {
    /// Got an invalid parameter value in a function
    InvalidParameter(String),
    /// The input data (atoms, cell, form factors) is inconsistent with the
    /// parameters of the calculation
    InvalidInput(String),
    /// Error while serializing/deserializing data
    Json(serde_json::Error),
    /// Error related to reading structure files
    Chemfiles(String),
    /// Some internal invariant of the calculation was violated
    Internal(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidParameter(e) => write!(f, "invalid parameter: {}", e),
            Error::InvalidInput(e) => write!(f, "invalid input: {}", e),
            Error::Json(e) => write!(f, "json error: {}", e),
            Error::Chemfiles(e) => write!(f, "chemfiles error: {}", e),
            Error::Internal(e) => write!(f, "internal error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidParameter(_) |
            Error::InvalidInput(_) |
            Error::Internal(_) |
            Error::Chemfiles(_) => None,
            Error::Json(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Error {
        Error::Json(error)
    }
}
