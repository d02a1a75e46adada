// File I/O - maFile discovery, roster loading, trim modes

pub mod discover;
pub mod trim;

pub use discover::{expand_inputs, list_mafiles, read_roster};
pub use trim::{trim_folder, TrimMode, TrimReport};
