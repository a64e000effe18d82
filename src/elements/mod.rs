mod error;
mod loader;
mod record;

pub use error::{LoadError, ParseError};
pub use loader::{parse_tle_text, LoadedElements, RejectedRecord, TleLoader, DEFAULT_MAX_SATELLITES};
pub use record::{checksum, ElementRecord, LINE_LENGTH};
