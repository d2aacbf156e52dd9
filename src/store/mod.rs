//! Persistence adapters for saved forms

mod file;
mod memory;
mod traits;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use traits::{FormStore, StoredId};

#[cfg(test)]
pub use traits::MockFormStore;
