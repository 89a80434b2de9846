/// Referential-integrity and hierarchy-cycle validation.
pub mod relationships;
/// Declarative per-table schemas and the generic validation routine.
pub mod schema;

pub use schema::{ValidationError, ValidationKind, ValidationProfile};
