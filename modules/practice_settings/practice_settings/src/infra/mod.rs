pub mod storage;

pub use storage::{FileStorage, InMemoryStorage};
