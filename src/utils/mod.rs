pub mod env;
pub mod file_operations;

pub use file_operations::{
    copy_file_safe, copy_tree, ensure_output_dir, list_files_recursive, replace_in_file,
};
