//! Domain types for DebutLab

pub mod raw;
pub mod record;
pub mod table;

pub use raw::{RawTable, RawTableError};
pub use record::Record;
pub use table::CanonicalTable;
