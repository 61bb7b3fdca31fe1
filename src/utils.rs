pub mod helpers;

pub use helpers::{
    ensure_directory_exists,
    python_title_case,
    sanitize_file_name,
    truncate_chars,
    write_to_file,
};
