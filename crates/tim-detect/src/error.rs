use thiserror::Error;

/// Why a string was left unannotated.
///
/// These never reach callers of
/// [`convert_price_to_time_string`](crate::convert::convert_price_to_time_string);
/// they are logged at debug level and the input is returned as-is.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConversionError {
    #[error("input text is empty")]
    EmptyInput,

    #[error("no number format supplied")]
    MissingFormatters,

    #[error("no wage configuration supplied")]
    MissingWage,

    #[error("wage amount {amount:?} does not give a usable hourly rate")]
    InvalidWage { amount: String },

    #[error("no price found in {text:?}")]
    NoPrice { text: String },

    #[error("price {price} at hourly rate {rate} gives a non-finite duration")]
    NonFiniteTime { price: f64, rate: f64 },

    #[error("price is already followed by a time annotation")]
    AlreadyAnnotated,
}
