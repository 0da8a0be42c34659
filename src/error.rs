use thiserror::Error;

/// Error type for filter operations exposed to the host application.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("filter entry {index} out of range ({len} entries)")]
    IndexOutOfRange { index: u32, len: u32 },

    #[error("unknown dive: {0}")]
    UnknownDive(u32),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<figment::Error> for FilterError {
    fn from(err: figment::Error) -> Self {
        FilterError::Config(err.to_string())
    }
}
