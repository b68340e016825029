mod mem;

pub use mem::MemStore;
