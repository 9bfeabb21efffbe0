//! Catalog operations over the repository traits
//!
//! Listing, search, claiming, user reports and the staff review queue. Photo files
//! are not touched here: deleting an item hands the removed record back so the
//! caller can discard its `image_path` from storage.

use std::sync::Arc;

use chrono::Utc;
use lostfound_core::constants::{DASHBOARD_ITEMS_LIMIT, ITEMS_PER_PAGE};
use lostfound_core::models::{
    Category, CreateCategoryRequest, CreateItemRequest, CreateLostRequestRequest,
    CreateReportRequest, ItemQuery, ItemReport, ItemStatus, LostItem, LostRequest, Page,
    ReportStatus, UpdateItemRequest,
};
use lostfound_core::AppError;
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::traits::{CategoryRepository, ItemRepository, LostRequestRepository, ReportRepository};

/// A user's overview page.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub my_reports: Vec<ItemReport>,
    pub recent_unclaimed: Vec<LostItem>,
    pub recent_claimed: Vec<LostItem>,
}

#[derive(Clone)]
pub struct CatalogService {
    categories: Arc<dyn CategoryRepository>,
    items: Arc<dyn ItemRepository>,
    reports: Arc<dyn ReportRepository>,
    lost_requests: Arc<dyn LostRequestRepository>,
    items_per_page: usize,
}

impl CatalogService {
    pub fn new(
        categories: Arc<dyn CategoryRepository>,
        items: Arc<dyn ItemRepository>,
        reports: Arc<dyn ReportRepository>,
        lost_requests: Arc<dyn LostRequestRepository>,
    ) -> Self {
        Self {
            categories,
            items,
            reports,
            lost_requests,
            items_per_page: ITEMS_PER_PAGE,
        }
    }

    /// Service backed by one store implementing every repository
    pub fn with_store<S>(store: Arc<S>) -> Self
    where
        S: CategoryRepository + ItemRepository + ReportRepository + LostRequestRepository + 'static,
    {
        Self::new(store.clone(), store.clone(), store.clone(), store)
    }

    pub fn with_items_per_page(mut self, items_per_page: usize) -> Self {
        self.items_per_page = items_per_page.max(1);
        self
    }

    pub async fn create_category(&self, request: CreateCategoryRequest) -> Result<Category, AppError> {
        request.validate()?;
        let category = Category {
            id: Uuid::new_v4(),
            name: request.name.trim().to_string(),
        };
        self.categories.insert_category(category).await
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        self.categories.list_categories().await
    }

    /// Refused with `Conflict` while any item still belongs to the category.
    #[tracing::instrument(skip(self), fields(db.table = "categories", db.operation = "delete"))]
    pub async fn delete_category(&self, id: Uuid) -> Result<(), AppError> {
        if !self.categories.delete_category(id).await? {
            return Err(AppError::NotFound(format!("Category {}", id)));
        }
        Ok(())
    }

    /// One page of the public catalog.
    #[tracing::instrument(skip(self), fields(db.table = "lost_items", db.operation = "select"))]
    pub async fn search(&self, query: &ItemQuery) -> Result<Page<LostItem>, AppError> {
        let matches = self.items.search_items(query).await?;
        let page = Page::paginate(matches, self.items_per_page, query.page.as_deref());

        tracing::debug!(
            total_count = page.total_count,
            page = page.number,
            num_pages = page.num_pages,
            "Catalog search"
        );

        Ok(page)
    }

    /// Most recently listed items, for the home page
    pub async fn recent(&self, limit: usize) -> Result<Vec<LostItem>, AppError> {
        self.items.recent_items(limit).await
    }

    pub async fn get_item(&self, id: Uuid) -> Result<LostItem, AppError> {
        self.items
            .get_item(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Item {}", id)))
    }

    async fn require_category(&self, id: Uuid) -> Result<(), AppError> {
        match self.categories.get_category(id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::InvalidInput(format!("Unknown category: {}", id))),
        }
    }

    #[tracing::instrument(skip(self, request), fields(db.table = "lost_items", db.operation = "insert"))]
    pub async fn create_item(&self, request: CreateItemRequest) -> Result<LostItem, AppError> {
        request.validate()?;
        self.require_category(request.category_id).await?;

        let now = Utc::now();
        let item = LostItem {
            id: Uuid::new_v4(),
            title: request.title,
            description: request.description,
            category_id: request.category_id,
            image_path: request.image_path,
            location_found: request.location_found,
            date_found: request.date_found.unwrap_or_else(|| now.date_naive()),
            status: ItemStatus::Found,
            created_at: now,
        };

        let item = self.items.insert_item(item).await?;
        tracing::info!(item_id = %item.id, "Item listed");
        Ok(item)
    }

    /// Apply an edit. Returns the updated item and the photo it replaced, if any.
    #[tracing::instrument(skip(self, request), fields(db.table = "lost_items", db.operation = "update"))]
    pub async fn update_item(
        &self,
        id: Uuid,
        request: UpdateItemRequest,
    ) -> Result<(LostItem, Option<String>), AppError> {
        request.validate()?;
        let mut item = self.get_item(id).await?;

        if let Some(category_id) = request.category_id {
            self.require_category(category_id).await?;
            item.category_id = category_id;
        }
        if let Some(title) = request.title {
            item.title = title;
        }
        if let Some(description) = request.description {
            item.description = description;
        }
        if let Some(location) = request.location_found {
            item.location_found = location;
        }
        if let Some(date_found) = request.date_found {
            item.date_found = date_found;
        }

        let replaced_image = match request.image_path {
            Some(new_path) if new_path != item.image_path => {
                std::mem::replace(&mut item.image_path, new_path)
            }
            _ => None,
        };

        if !self.items.update_item(item.clone()).await? {
            return Err(AppError::NotFound(format!("Item {}", id)));
        }
        Ok((item, replaced_image))
    }

    /// Remove an item together with its reports.
    #[tracing::instrument(skip(self), fields(db.table = "lost_items", db.operation = "delete"))]
    pub async fn delete_item(&self, id: Uuid) -> Result<LostItem, AppError> {
        let item = self
            .items
            .delete_item(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Item {}", id)))?;
        let removed_reports = self.reports.delete_reports_for_item(id).await?;

        tracing::info!(item_id = %id, removed_reports, "Item deleted");
        Ok(item)
    }

    /// Mark an item as returned to its owner. Claiming twice is a no-op.
    pub async fn mark_claimed(&self, id: Uuid) -> Result<LostItem, AppError> {
        let mut item = self.get_item(id).await?;
        if item.is_claimed() {
            return Ok(item);
        }

        item.status = ItemStatus::Claimed;
        if !self.items.update_item(item.clone()).await? {
            return Err(AppError::NotFound(format!("Item {}", id)));
        }
        tracing::info!(item_id = %id, "Item claimed");
        Ok(item)
    }

    /// File a report about a listing. New reports start in the `new` state.
    #[tracing::instrument(skip(self, request), fields(db.table = "item_reports", db.operation = "insert"))]
    pub async fn report_item(
        &self,
        item_id: Uuid,
        request: CreateReportRequest,
        reporter: Option<Uuid>,
    ) -> Result<ItemReport, AppError> {
        request.validate()?;
        self.get_item(item_id).await?;

        let report = ItemReport {
            id: Uuid::new_v4(),
            item_id,
            reason: request.reason,
            reported_by: reporter,
            status: ReportStatus::New,
            created_at: Utc::now(),
        };
        self.reports.insert_report(report).await
    }

    /// Staff review queue, newest first. An unrecognised filter lists every report.
    pub async fn list_reports(&self, status: Option<&str>) -> Result<Vec<ItemReport>, AppError> {
        let status = status.and_then(|s| s.trim().parse::<ReportStatus>().ok());
        self.reports.list_reports(status).await
    }

    pub async fn set_report_status(
        &self,
        report_id: Uuid,
        status: ReportStatus,
    ) -> Result<ItemReport, AppError> {
        let report = self
            .reports
            .set_report_status(report_id, status)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Report {}", report_id)))?;

        tracing::info!(report_id = %report_id, status = %status, "Report status updated");
        Ok(report)
    }

    pub async fn dashboard(&self, user_id: Uuid) -> Result<Dashboard, AppError> {
        Ok(Dashboard {
            my_reports: self.reports.reports_by_user(user_id).await?,
            recent_unclaimed: self
                .items
                .items_with_status(ItemStatus::Found, DASHBOARD_ITEMS_LIMIT)
                .await?,
            recent_claimed: self
                .items
                .items_with_status(ItemStatus::Claimed, DASHBOARD_ITEMS_LIMIT)
                .await?,
        })
    }

    pub async fn file_lost_request(
        &self,
        request: CreateLostRequestRequest,
        created_by: Option<Uuid>,
    ) -> Result<LostRequest, AppError> {
        request.validate()?;
        self.require_category(request.category_id).await?;

        let now = Utc::now();
        let lost_request = LostRequest {
            id: Uuid::new_v4(),
            title: request.title,
            description: request.description,
            category_id: request.category_id,
            location_lost: request.location_lost,
            date_lost: request.date_lost.unwrap_or_else(|| now.date_naive()),
            contact_email: request.contact_email,
            created_by,
            created_at: now,
        };
        self.lost_requests.insert_lost_request(lost_request).await
    }

    pub async fn list_lost_requests(&self) -> Result<Vec<LostRequest>, AppError> {
        self.lost_requests.list_lost_requests().await
    }
}
