//! Record store: loading, holding, and sharing the dataset table.

mod cache;
pub mod csv_store;
mod table;

pub use cache::{DatasetCache, Snapshot};
pub use csv_store::load;
pub use table::Table;
