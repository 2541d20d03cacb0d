pub mod file;
pub mod traits;

// Re-export
pub use file::{FileEntryRepository, StoredRecord};
pub use traits::EntryRepository;
