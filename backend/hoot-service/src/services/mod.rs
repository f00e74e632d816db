/// Business logic layer for the hoot service
///
/// - `hoots`: the mutation service orchestrating validation, existence
///   checks, ownership checks, and store calls
/// - `authz`: the ownership guard shared by hoot and comment paths
pub mod authz;
pub mod hoots;

pub use authz::{authorize, Access};
pub use hoots::HootService;
