use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("datum is missing required field `{field}`")]
    MissingField { field: String },

    #[error("category `{category}` is not part of the band scale domain")]
    UnknownCategory { category: String },

    #[error("value `{value}` cannot be used as a number")]
    NonNumericValue { value: String },

    #[error("stacked bar geometry requires a [baseline, top] pair")]
    MissingStackPair,

    #[error("grouped bar geometry requires a layer ordinal scale")]
    MissingLayerScale,
}
