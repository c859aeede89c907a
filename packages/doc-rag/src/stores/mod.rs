//! Similarity index implementations.
//!
//! Available backends:
//! - `MemoryIndex` - exact brute-force inner-product search held in memory

pub mod memory;

pub use memory::MemoryIndex;
