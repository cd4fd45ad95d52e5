pub mod catalog;
pub mod loader;
pub mod normalizer;
pub mod schema_walker;
pub mod session;

pub use catalog::{collate, Catalog, SortKey};
pub use loader::{loader_for_source, DocumentLoader, FileLoader, HttpLoader, StaticLoader};
pub use normalizer::SpecNormalizer;
pub use schema_walker::SchemaWalker;
pub use session::{DetailTab, ExplorerSession, SessionSnapshot};
