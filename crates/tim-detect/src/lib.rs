pub mod convert;
pub mod dom;
pub mod error;
pub mod normalize;
pub mod patterns;
pub mod scan;
pub mod select;

pub use convert::{
    calculate_hourly_wage, convert_price_to_time_string, convert_price_to_time_string_with_format,
    convert_to_time, format_price_with_time, format_time_compact, format_time_snippet, try_convert,
    Annotated,
};
pub use dom::analyze_element;
pub use error::ConversionError;
pub use patterns::{extract_prices, first_price, PatternKind, PATTERNS};
pub use scan::{scan_document, Annotation};
pub use select::{merge_and_select, select_candidates, Selection, MIN_CONFIDENCE};
