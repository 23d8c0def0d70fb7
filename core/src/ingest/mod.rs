pub mod columns;
pub mod loader;
pub mod parser;
pub mod record;
pub mod value;

pub use loader::{FetchError, Loader, ResourceRef, StaticLoader};
pub use parser::{parse_records, ParseError};
pub use record::Record;
