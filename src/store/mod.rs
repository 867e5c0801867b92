pub mod backend;
mod models;
mod store;

pub use backend::{keys, Backend, FileBackend, MemoryBackend};
pub use models::*;
pub use store::{IdGen, Result, Store, StoreError};
