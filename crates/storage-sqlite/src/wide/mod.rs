//! Wide-column store emulation: source reader and profile store.

pub mod model;
pub mod repository;

pub use model::{WideCellDB, WideRowDB};
pub use repository::WideColumnRepository;
