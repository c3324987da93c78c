pub mod record;
pub mod tables;
pub mod types;

pub use record::{merge_localised, ProjectedRow, ReferenceDirective, SqlValue};
pub use types::{FieldKind, FieldMap, Projection};
