//! View-model layer for the admin frontend.
//!
//! The server renders resource collections and dashboard metrics into
//! plain serializable view-models; the frontend only lays them out.
//! Nothing in this crate touches storage.

pub mod cards;
pub mod page;
pub mod table;

pub use cards::{SummaryCard, Trend};
pub use page::{PageLoader, PageState};
pub use table::{Column, ResourceRecord, ResourceRow, ResourceTable, RowAction, RowHandlers};
