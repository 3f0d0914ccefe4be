pub mod models;
pub mod store;

pub use models::{Authenticatable, GenericUser};
pub use store::{Document, DocumentStore, WhereClause};
