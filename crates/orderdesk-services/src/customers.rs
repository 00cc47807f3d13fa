//! Customer listing for the admin API.
//!
//! Search here crosses collections: the term is matched against customer
//! names directly and against the delivery addresses of orders, whose ids are
//! resolved first and folded into the alternation as a last-order membership
//! test.

use std::sync::Arc;

use orderdesk_core::{AppConfig, AppError, Customer};
use orderdesk_query::{
    build_filter, normalize_list_params, FieldPolicy, FilterValue, ListQuerySpec, Predicate,
    QueryInput,
};

use crate::repository::{CustomerRepository, OrderRepository, PageInfo};

/// Query parameters accepted by the customer listing.
pub const CUSTOMER_LIST_SPEC: ListQuerySpec = ListQuerySpec {
    date_range_fields: &[
        ("registrationDate", "createdAt"),
        ("lastOrderDate", "lastOrderDate"),
    ],
    numeric_range_fields: &[
        ("totalAmount", "totalAmount"),
        ("orderCount", "orderCount"),
    ],
    exact_fields: &[],
};

const CUSTOMER_FIELD_POLICY: FieldPolicy = FieldPolicy {
    sortable: &[
        "createdAt",
        "lastOrderDate",
        "totalAmount",
        "orderCount",
        "name",
    ],
    default_sort: "createdAt",
};

#[derive(Debug, Clone, serde::Serialize)]
pub struct CustomerPage {
    pub customers: Vec<Customer>,
    pub pagination: PageInfo,
}

pub struct CustomerService {
    customers: Arc<dyn CustomerRepository>,
    orders: Arc<dyn OrderRepository>,
    config: AppConfig,
}

impl CustomerService {
    pub fn new(
        customers: Arc<dyn CustomerRepository>,
        orders: Arc<dyn OrderRepository>,
        config: AppConfig,
    ) -> Self {
        Self {
            customers,
            orders,
            config,
        }
    }

    #[tracing::instrument(skip(self, query))]
    pub async fn list_customers(&self, query: &QueryInput) -> Result<CustomerPage, AppError> {
        let params =
            normalize_list_params(query, &CUSTOMER_LIST_SPEC, self.config.list.default_limit)?;
        let (mut filter, sort, page) = build_filter(&params, &CUSTOMER_FIELD_POLICY);

        if let Some(term) = &params.search {
            let order_ids = self
                .orders
                .find_ids_by_address_pattern(&term.pattern)
                .await?;
            filter = filter.with_alternation(vec![
                Predicate::Matches {
                    field: "name".to_string(),
                    pattern: term.pattern.clone(),
                    case_insensitive: true,
                },
                Predicate::In {
                    field: "lastOrder".to_string(),
                    values: order_ids.into_iter().map(FilterValue::Id).collect(),
                },
            ]);
        }

        let result = self.customers.find_page(&filter, &sort, &page).await?;
        Ok(CustomerPage {
            pagination: PageInfo::new(result.total_count, params.page, &page),
            customers: result.items,
        })
    }
}
