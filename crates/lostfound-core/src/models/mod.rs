//! Domain models for the lost-and-found catalog.

pub mod category;
pub mod item;
pub mod lost_request;
pub mod query;
pub mod report;

pub use category::{Category, CreateCategoryRequest};
pub use item::{CreateItemRequest, ItemStatus, LostItem, UpdateItemRequest};
pub use lost_request::{CreateLostRequestRequest, LostRequest};
pub use query::{ItemQuery, Page, SortOrder, StatusFilter};
pub use report::{CreateReportRequest, ItemReport, ReportStatus};
