//! Fixed-size splitting of file content and its inverse.

pub mod splitter;
pub mod merger;

pub use merger::merge;
pub use splitter::{split, CHUNK_SIZE};
