pub mod line_reader;

pub use line_reader::{read_lines, spawn_line_reader};
