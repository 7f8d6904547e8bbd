pub mod errors;
pub mod load;
pub mod metadata;
pub mod migrate;
pub mod repository;
pub mod save;

pub use errors::{LoadError, RepositoryError, SaveError};
pub use load::load_document;
pub use metadata::DocumentMetadata;
pub use repository::{DocumentRepository, FileRepository, MemoryRepository};
pub use save::{save_document, FORMAT_ID, FORMAT_VERSION};
