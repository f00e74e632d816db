/// Database access layer
///
/// The hoot aggregate maps to one row: the embedded comment sequence is a
/// JSONB column, so every comment mutation rewrites the parent row and the
/// aggregate stays the unit of persistence. Author profiles live in a local
/// `users` snapshot table and are joined back in on read.
pub mod hoot_store;
pub mod schema;

pub use hoot_store::{HootStore, PgHootStore};
pub use schema::ensure_schema;
