//! In-memory repositories
//!
//! A single [`MemoryStore`] backs every repository trait. State lives behind one
//! `RwLock` so the category-in-use check and the delete happen under the same lock.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use lostfound_core::models::{
    Category, ItemQuery, ItemReport, ItemStatus, LostItem, LostRequest, ReportStatus, SortOrder,
};
use lostfound_core::AppError;
use serde::Deserialize;
use uuid::Uuid;

use crate::traits::{CategoryRepository, ItemRepository, LostRequestRepository, ReportRepository};

/// Initial catalog contents, e.g. loaded from a JSON fixture.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub items: Vec<LostItem>,
    #[serde(default)]
    pub reports: Vec<ItemReport>,
    #[serde(default)]
    pub lost_requests: Vec<LostRequest>,
}

#[derive(Debug, Default)]
struct State {
    categories: HashMap<Uuid, Category>,
    items: HashMap<Uuid, LostItem>,
    reports: HashMap<Uuid, ItemReport>,
    lost_requests: HashMap<Uuid, LostRequest>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from seed data. Items must reference a seeded category and
    /// reports a seeded item.
    pub fn from_seed(seed: Seed) -> Result<Self, AppError> {
        let mut state = State::default();

        for category in seed.categories {
            if state.categories.values().any(|c| c.name == category.name) {
                return Err(AppError::Conflict(format!(
                    "Duplicate category name: {}",
                    category.name
                )));
            }
            state.categories.insert(category.id, category);
        }

        for item in seed.items {
            if !state.categories.contains_key(&item.category_id) {
                return Err(AppError::InvalidInput(format!(
                    "Item {} references unknown category {}",
                    item.id, item.category_id
                )));
            }
            state.items.insert(item.id, item);
        }

        for report in seed.reports {
            if !state.items.contains_key(&report.item_id) {
                return Err(AppError::InvalidInput(format!(
                    "Report {} references unknown item {}",
                    report.id, report.item_id
                )));
            }
            state.reports.insert(report.id, report);
        }

        for request in seed.lost_requests {
            state.lost_requests.insert(request.id, request);
        }

        tracing::debug!(
            categories = state.categories.len(),
            items = state.items.len(),
            reports = state.reports.len(),
            "Memory store seeded"
        );

        Ok(Self {
            state: RwLock::new(state),
        })
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>, AppError> {
        self.state
            .read()
            .map_err(|_| AppError::Internal("Memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, AppError> {
        self.state
            .write()
            .map_err(|_| AppError::Internal("Memory store lock poisoned".to_string()))
    }
}

fn sort_by_date_found(items: &mut [LostItem], order: SortOrder) {
    // Ties fall back to creation time so paging is stable
    match order {
        SortOrder::Newest => items.sort_by(|a, b| {
            b.date_found
                .cmp(&a.date_found)
                .then(b.created_at.cmp(&a.created_at))
        }),
        SortOrder::Oldest => items.sort_by(|a, b| {
            a.date_found
                .cmp(&b.date_found)
                .then(a.created_at.cmp(&b.created_at))
        }),
    }
}

fn newest_reports_first(reports: &mut [ItemReport]) {
    reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn insert_category(&self, category: Category) -> Result<Category, AppError> {
        let mut state = self.write()?;
        if state.categories.values().any(|c| c.name == category.name) {
            return Err(AppError::Conflict(format!(
                "Category '{}' already exists",
                category.name
            )));
        }
        state.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn get_category(&self, id: Uuid) -> Result<Option<Category>, AppError> {
        Ok(self.read()?.categories.get(&id).cloned())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        let mut categories: Vec<Category> = self.read()?.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn delete_category(&self, id: Uuid) -> Result<bool, AppError> {
        let mut state = self.write()?;
        let in_use = state.items.values().filter(|i| i.category_id == id).count();
        if in_use > 0 {
            return Err(AppError::Conflict(format!(
                "Category is still used by {} item(s)",
                in_use
            )));
        }
        Ok(state.categories.remove(&id).is_some())
    }
}

#[async_trait]
impl ItemRepository for MemoryStore {
    async fn insert_item(&self, item: LostItem) -> Result<LostItem, AppError> {
        self.write()?.items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn get_item(&self, id: Uuid) -> Result<Option<LostItem>, AppError> {
        Ok(self.read()?.items.get(&id).cloned())
    }

    async fn update_item(&self, item: LostItem) -> Result<bool, AppError> {
        let mut state = self.write()?;
        match state.items.get_mut(&item.id) {
            Some(existing) => {
                *existing = item;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_item(&self, id: Uuid) -> Result<Option<LostItem>, AppError> {
        Ok(self.write()?.items.remove(&id))
    }

    async fn search_items(&self, query: &ItemQuery) -> Result<Vec<LostItem>, AppError> {
        let state = self.read()?;
        let mut items: Vec<LostItem> = state
            .items
            .values()
            .filter(|item| {
                query.matches_keyword(&[&item.title, &item.description, &item.location_found])
            })
            .filter(|item| query.category_id.map_or(true, |c| item.category_id == c))
            .filter(|item| query.status.matches(item.status))
            .cloned()
            .collect();
        drop(state);

        sort_by_date_found(&mut items, query.order);
        Ok(items)
    }

    async fn recent_items(&self, limit: usize) -> Result<Vec<LostItem>, AppError> {
        let mut items: Vec<LostItem> = self.read()?.items.values().cloned().collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        items.truncate(limit);
        Ok(items)
    }

    async fn items_with_status(
        &self,
        status: ItemStatus,
        limit: usize,
    ) -> Result<Vec<LostItem>, AppError> {
        let mut items: Vec<LostItem> = self
            .read()?
            .items
            .values()
            .filter(|item| item.status == status)
            .cloned()
            .collect();
        sort_by_date_found(&mut items, SortOrder::Newest);
        items.truncate(limit);
        Ok(items)
    }
}

#[async_trait]
impl ReportRepository for MemoryStore {
    async fn insert_report(&self, report: ItemReport) -> Result<ItemReport, AppError> {
        let mut state = self.write()?;
        if !state.items.contains_key(&report.item_id) {
            return Err(AppError::NotFound(format!("Item {}", report.item_id)));
        }
        state.reports.insert(report.id, report.clone());
        Ok(report)
    }

    async fn get_report(&self, id: Uuid) -> Result<Option<ItemReport>, AppError> {
        Ok(self.read()?.reports.get(&id).cloned())
    }

    async fn list_reports(
        &self,
        status: Option<ReportStatus>,
    ) -> Result<Vec<ItemReport>, AppError> {
        let mut reports: Vec<ItemReport> = self
            .read()?
            .reports
            .values()
            .filter(|r| status.map_or(true, |s| r.status == s))
            .cloned()
            .collect();
        newest_reports_first(&mut reports);
        Ok(reports)
    }

    async fn reports_by_user(&self, user_id: Uuid) -> Result<Vec<ItemReport>, AppError> {
        let mut reports: Vec<ItemReport> = self
            .read()?
            .reports
            .values()
            .filter(|r| r.reported_by == Some(user_id))
            .cloned()
            .collect();
        newest_reports_first(&mut reports);
        Ok(reports)
    }

    async fn set_report_status(
        &self,
        id: Uuid,
        status: ReportStatus,
    ) -> Result<Option<ItemReport>, AppError> {
        let mut state = self.write()?;
        Ok(state.reports.get_mut(&id).map(|report| {
            report.status = status;
            report.clone()
        }))
    }

    async fn delete_reports_for_item(&self, item_id: Uuid) -> Result<usize, AppError> {
        let mut state = self.write()?;
        let before = state.reports.len();
        state.reports.retain(|_, r| r.item_id != item_id);
        Ok(before - state.reports.len())
    }
}

#[async_trait]
impl LostRequestRepository for MemoryStore {
    async fn insert_lost_request(&self, request: LostRequest) -> Result<LostRequest, AppError> {
        self.write()?
            .lost_requests
            .insert(request.id, request.clone());
        Ok(request)
    }

    async fn list_lost_requests(&self) -> Result<Vec<LostRequest>, AppError> {
        let mut requests: Vec<LostRequest> =
            self.read()?.lost_requests.values().cloned().collect();
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(requests)
    }
}
