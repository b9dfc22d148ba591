pub mod file_format;
pub mod log_setup;

pub use file_format::{read_file, write_file, FileFormat, FileFormatError, FileFormatResult};
pub use log_setup::setup_logging;
