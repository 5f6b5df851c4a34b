//! Sheet storage: the .grd text format and a file-backed cell store.

mod file_store;
mod parser;
mod writer;

pub use file_store::FileStore;
pub use parser::{RawCells, parse_grd, parse_grd_content};
pub use writer::write_grd_content;
