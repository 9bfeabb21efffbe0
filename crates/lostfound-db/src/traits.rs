//! Repository trait abstractions
//!
//! The minimal interface the catalog needs from persistence. Implementations own
//! ordering so that a database backend can push it into its queries.

use async_trait::async_trait;
use lostfound_core::models::{
    Category, ItemQuery, ItemReport, ItemStatus, LostItem, LostRequest, ReportStatus,
};
use lostfound_core::AppError;
use uuid::Uuid;

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Insert a category. Fails with `Conflict` if the name is taken.
    async fn insert_category(&self, category: Category) -> Result<Category, AppError>;

    async fn get_category(&self, id: Uuid) -> Result<Option<Category>, AppError>;

    /// All categories ordered by name
    async fn list_categories(&self) -> Result<Vec<Category>, AppError>;

    /// Delete a category. Fails with `Conflict` while items still reference it.
    async fn delete_category(&self, id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
pub trait ItemRepository: Send + Sync {
    async fn insert_item(&self, item: LostItem) -> Result<LostItem, AppError>;

    async fn get_item(&self, id: Uuid) -> Result<Option<LostItem>, AppError>;

    /// Replace a stored item. Returns `false` if it does not exist.
    async fn update_item(&self, item: LostItem) -> Result<bool, AppError>;

    /// Remove an item, returning it if it existed
    async fn delete_item(&self, id: Uuid) -> Result<Option<LostItem>, AppError>;

    /// Items matching the query's keyword, category and status filters, in the
    /// query's order. Pagination is left to the caller.
    async fn search_items(&self, query: &ItemQuery) -> Result<Vec<LostItem>, AppError>;

    /// Most recently created items
    async fn recent_items(&self, limit: usize) -> Result<Vec<LostItem>, AppError>;

    /// Items with `status`, newest `date_found` first
    async fn items_with_status(
        &self,
        status: ItemStatus,
        limit: usize,
    ) -> Result<Vec<LostItem>, AppError>;
}

#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn insert_report(&self, report: ItemReport) -> Result<ItemReport, AppError>;

    async fn get_report(&self, id: Uuid) -> Result<Option<ItemReport>, AppError>;

    /// Reports newest first, optionally restricted to one status
    async fn list_reports(&self, status: Option<ReportStatus>)
        -> Result<Vec<ItemReport>, AppError>;

    /// Reports filed by `user_id`, newest first
    async fn reports_by_user(&self, user_id: Uuid) -> Result<Vec<ItemReport>, AppError>;

    async fn set_report_status(
        &self,
        id: Uuid,
        status: ReportStatus,
    ) -> Result<Option<ItemReport>, AppError>;

    /// Remove every report about `item_id`, returning how many were removed
    async fn delete_reports_for_item(&self, item_id: Uuid) -> Result<usize, AppError>;
}

#[async_trait]
pub trait LostRequestRepository: Send + Sync {
    async fn insert_lost_request(&self, request: LostRequest) -> Result<LostRequest, AppError>;

    /// Lost requests newest first
    async fn list_lost_requests(&self) -> Result<Vec<LostRequest>, AppError>;
}
