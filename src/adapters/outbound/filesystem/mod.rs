/// Filesystem adapters for file I/O operations
mod file_reader;
mod file_writer;
mod json_cache_store;

pub use file_reader::GoModReader;
pub use file_writer::{FileSystemWriter, StdoutPresenter};
pub use json_cache_store::{FileSystemCacheStore, DEFAULT_STORE_DIR};
