//! Repository collaborator traits.
//!
//! The storage engine is out of scope: services talk to these traits with
//! storage-agnostic [`FilterDescriptor`] values and the repository translates
//! them into actual query syntax. Every implementation must treat the
//! descriptor's alternation as an OR over its predicates.

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use orderdesk_core::{AppError, Customer, NewOrder, Order, Product};
use orderdesk_query::{total_pages, FilterDescriptor, PageSpec, SortSpec};

/// One page of records plus the total matching count.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u64,
}

/// Pagination block included in list responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub total: u64,
    pub total_pages: u64,
    pub current_page: u64,
    pub page_size: u64,
}

impl PageInfo {
    pub fn new(total: u64, current_page: u64, page: &PageSpec) -> Self {
        Self {
            total,
            total_pages: total_pages(total, page.limit),
            current_page,
            page_size: page.limit,
        }
    }
}

/// Product catalog. `all_products` must hit the authoritative store every
/// call; order validation depends on never seeing cached prices.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn all_products(&self) -> Result<Vec<Product>, AppError>;

    /// Ids of products whose title matches the given literal pattern.
    async fn find_ids_by_title_pattern(&self, pattern: &str) -> Result<Vec<Uuid>, AppError>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn find_page(
        &self,
        filter: &FilterDescriptor,
        sort: &SortSpec,
        page: &PageSpec,
    ) -> Result<Page<Order>, AppError>;

    async fn find_by_number(&self, order_number: i64) -> Result<Option<Order>, AppError>;

    /// Ids of orders whose delivery address matches the given literal pattern.
    async fn find_ids_by_address_pattern(&self, pattern: &str) -> Result<Vec<Uuid>, AppError>;

    async fn insert(&self, order: NewOrder) -> Result<Order, AppError>;
}

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn find_page(
        &self,
        filter: &FilterDescriptor,
        sort: &SortSpec,
        page: &PageSpec,
    ) -> Result<Page<Customer>, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_info_arithmetic() {
        let page = PageSpec { skip: 0, limit: 10 };
        assert_eq!(PageInfo::new(95, 1, &page).total_pages, 10);
        assert_eq!(PageInfo::new(100, 1, &page).total_pages, 10);
        assert_eq!(PageInfo::new(0, 1, &page).total_pages, 0);
        assert_eq!(PageInfo::new(95, 3, &page).current_page, 3);
    }
}
