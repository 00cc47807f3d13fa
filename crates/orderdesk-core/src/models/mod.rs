//! Domain models

pub mod customer;
pub mod identity;
pub mod order;
pub mod product;

pub use customer::Customer;
pub use identity::{require_role, Identity, Role};
pub use order::{NewOrder, Order, OrderDraft, OrderStatus};
pub use product::Product;
