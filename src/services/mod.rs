//! Dashboard logic separated from UI concerns.
//!
//! These services are pure functions over the loaded table and a session
//! struct, so the web server and the CLI share them.

pub mod filter;
pub mod pagination;
pub mod selection;
pub mod session;
pub mod stats;

pub use filter::{apply, FilterCriteria, FilterOptions, YearRange};
pub use pagination::{paginate, Page, PageLink, PageSize};
pub use selection::{detail, DatasetDetail, Selection};
pub use session::{recompute, DashboardView, SessionState, Tab};
pub use stats::Statistics;
