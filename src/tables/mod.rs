/// Eligibility configuration: ordered categories of role-eligible group names.
pub mod config;
/// CSV ingestion of the four required input tables.
pub mod csv_reader;
/// Population of derivable fields before validation.
pub mod defaults;
/// In-memory string-table representation with preserved column order.
pub mod model;
