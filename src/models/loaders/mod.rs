pub mod json_loader;
pub mod toml_loader;

pub use json_loader::{load_all_page_dumps, load_page_dump, LoadedPages, PageLoadFailure};
pub use toml_loader::load_answer_key;
