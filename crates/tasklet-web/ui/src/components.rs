mod alert;
mod filter_bar;
mod header;
mod pagination;
mod search_bar;
mod task_form;
mod task_tile;

pub use alert::{
  ErrorAlert,
  Spinner
};
pub use filter_bar::FilterBar;
pub use header::Header;
pub use pagination::Pagination;
pub use search_bar::SearchBar;
pub use task_form::{
  TaskForm,
  TaskFormValues
};
pub use task_tile::TaskTile;
