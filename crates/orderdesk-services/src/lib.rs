//! Orderdesk service layer
//!
//! Business services for the admin API: order validation and listing,
//! customer listing. Services own the two-step cross-collection search
//! (resolve related ids, fold them into the filter's alternation) and the
//! order-total verification against a catalog fetched fresh per request.
//! Persistence stays behind the repository traits.

pub mod customers;
pub mod orders;
pub mod repository;

pub use customers::{CustomerPage, CustomerService};
pub use orders::{OrderPage, OrderService};
pub use repository::{CatalogRepository, CustomerRepository, OrderRepository, Page, PageInfo};
