//! In-memory repository fakes for service tests.
//!
//! The fakes record the descriptors they are handed so tests can assert on
//! what the services actually send to the storage collaborator, and return
//! canned pages so pagination shaping can be checked without a real engine.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use orderdesk_core::{AppError, Customer, NewOrder, Order, OrderStatus, Product};
use orderdesk_query::{FilterDescriptor, PageSpec, SortSpec};
use orderdesk_services::{
    CatalogRepository, CustomerRepository, OrderRepository, Page,
};

pub fn product(title: &str, price: Option<f64>) -> Product {
    Product {
        id: Uuid::new_v4(),
        title: title.to_string(),
        price,
        category: "test".to_string(),
        created_at: Utc::now(),
    }
}

pub fn order(order_number: i64, customer_id: Uuid) -> Order {
    Order {
        id: Uuid::new_v4(),
        order_number,
        status: OrderStatus::New,
        total_amount: 100.0,
        items: Vec::new(),
        customer_id,
        delivery_address: "Test street 1".to_string(),
        created_at: Utc::now(),
    }
}

pub fn customer(name: &str) -> Customer {
    Customer {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: format!("{}@example.com", name),
        created_at: Utc::now(),
        last_order_date: None,
        last_order: None,
        total_amount: 0.0,
        order_count: 0,
    }
}

#[derive(Default)]
pub struct FakeCatalog {
    pub products: Vec<Product>,
    pub title_matches: Vec<Uuid>,
    pub searched_patterns: Mutex<Vec<String>>,
}

#[async_trait]
impl CatalogRepository for FakeCatalog {
    async fn all_products(&self) -> Result<Vec<Product>, AppError> {
        Ok(self.products.clone())
    }

    async fn find_ids_by_title_pattern(&self, pattern: &str) -> Result<Vec<Uuid>, AppError> {
        self.searched_patterns
            .lock()
            .unwrap()
            .push(pattern.to_string());
        Ok(self.title_matches.clone())
    }
}

#[derive(Default)]
pub struct FakeOrders {
    pub page_items: Vec<Order>,
    pub total_count: u64,
    pub by_number: HashMap<i64, Order>,
    pub address_matches: Vec<Uuid>,
    pub last_query: Mutex<Option<(FilterDescriptor, SortSpec, PageSpec)>>,
    pub searched_patterns: Mutex<Vec<String>>,
    pub inserted: Mutex<Vec<NewOrder>>,
}

#[async_trait]
impl OrderRepository for FakeOrders {
    async fn find_page(
        &self,
        filter: &FilterDescriptor,
        sort: &SortSpec,
        page: &PageSpec,
    ) -> Result<Page<Order>, AppError> {
        *self.last_query.lock().unwrap() = Some((filter.clone(), sort.clone(), *page));
        Ok(Page {
            items: self.page_items.clone(),
            total_count: self.total_count,
        })
    }

    async fn find_by_number(&self, order_number: i64) -> Result<Option<Order>, AppError> {
        Ok(self.by_number.get(&order_number).cloned())
    }

    async fn find_ids_by_address_pattern(&self, pattern: &str) -> Result<Vec<Uuid>, AppError> {
        self.searched_patterns
            .lock()
            .unwrap()
            .push(pattern.to_string());
        Ok(self.address_matches.clone())
    }

    async fn insert(&self, new_order: NewOrder) -> Result<Order, AppError> {
        let stored = Order {
            id: Uuid::new_v4(),
            order_number: 1,
            status: OrderStatus::New,
            total_amount: new_order.total_amount,
            items: new_order.items.clone(),
            customer_id: new_order.customer_id,
            delivery_address: new_order.delivery_address.clone(),
            created_at: Utc::now(),
        };
        self.inserted.lock().unwrap().push(new_order);
        Ok(stored)
    }
}

#[derive(Default)]
pub struct FakeCustomers {
    pub page_items: Vec<Customer>,
    pub total_count: u64,
    pub last_query: Mutex<Option<(FilterDescriptor, SortSpec, PageSpec)>>,
}

#[async_trait]
impl CustomerRepository for FakeCustomers {
    async fn find_page(
        &self,
        filter: &FilterDescriptor,
        sort: &SortSpec,
        page: &PageSpec,
    ) -> Result<Page<Customer>, AppError> {
        *self.last_query.lock().unwrap() = Some((filter.clone(), sort.clone(), *page));
        Ok(Page {
            items: self.page_items.clone(),
            total_count: self.total_count,
        })
    }
}
