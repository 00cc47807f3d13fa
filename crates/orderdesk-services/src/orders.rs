//! Order operations: admin listing with cross-collection search, per-user
//! retrieval with existence masking, and order creation with total
//! verification against the live catalog.

use std::sync::Arc;

use validator::Validate;

use orderdesk_core::sanitize::{
    sanitize_text, ADDRESS_MAX_CHARS, COMMENT_MAX_CHARS, EMAIL_MAX_CHARS, PAYMENT_MAX_CHARS,
};
use orderdesk_core::{
    normalize_phone, AppConfig, AppError, Identity, NewOrder, Order, OrderDraft, Role,
};
use orderdesk_query::{
    build_filter, normalize_list_params, FieldPolicy, FilterValue, ListQuerySpec, Predicate,
    QueryInput, SearchTerm,
};

use crate::repository::{CatalogRepository, OrderRepository, PageInfo};

/// Query parameters accepted by the admin order listing.
pub const ORDER_LIST_SPEC: ListQuerySpec = ListQuerySpec {
    date_range_fields: &[("orderDate", "createdAt")],
    numeric_range_fields: &[("totalAmount", "totalAmount")],
    exact_fields: &["status"],
};

const ORDER_FIELD_POLICY: FieldPolicy = FieldPolicy {
    sortable: &["createdAt", "totalAmount", "orderNumber", "status"],
    default_sort: "createdAt",
};

#[derive(Debug, Clone, serde::Serialize)]
pub struct OrderPage {
    pub orders: Vec<Order>,
    pub pagination: PageInfo,
}

pub struct OrderService {
    catalog: Arc<dyn CatalogRepository>,
    orders: Arc<dyn OrderRepository>,
    config: AppConfig,
}

impl OrderService {
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        orders: Arc<dyn OrderRepository>,
        config: AppConfig,
    ) -> Self {
        Self {
            catalog,
            orders,
            config,
        }
    }

    /// Resolve a search term into the listing alternation: product-title
    /// membership OR'd with an order-number match when the term is numeric.
    async fn search_alternation(&self, term: &SearchTerm) -> Result<Vec<Predicate>, AppError> {
        let product_ids = self.catalog.find_ids_by_title_pattern(&term.pattern).await?;
        let mut alternation = vec![Predicate::In {
            field: "products".to_string(),
            values: product_ids.into_iter().map(FilterValue::Id).collect(),
        }];
        if let Ok(number) = term.text.parse::<i64>() {
            alternation.push(Predicate::Eq {
                field: "orderNumber".to_string(),
                value: FilterValue::Int(number),
            });
        }
        Ok(alternation)
    }

    /// Admin listing across all orders.
    #[tracing::instrument(skip(self, query))]
    pub async fn list_orders(&self, query: &QueryInput) -> Result<OrderPage, AppError> {
        let params = normalize_list_params(query, &ORDER_LIST_SPEC, self.config.list.default_limit)?;
        let (mut filter, sort, page) = build_filter(&params, &ORDER_FIELD_POLICY);

        if let Some(term) = &params.search {
            filter = filter.with_alternation(self.search_alternation(term).await?);
        }

        let result = self.orders.find_page(&filter, &sort, &page).await?;
        Ok(OrderPage {
            pagination: PageInfo::new(result.total_count, params.page, &page),
            orders: result.items,
        })
    }

    /// Listing scoped to the caller's own orders: same normalization, search,
    /// and pagination shaping as the admin listing, with the caller's id
    /// pinned into the filter so other customers' orders can never leak in.
    #[tracing::instrument(skip(self, query), fields(customer_id = %identity.user_id))]
    pub async fn list_orders_for(
        &self,
        identity: &Identity,
        query: &QueryInput,
    ) -> Result<OrderPage, AppError> {
        let params = normalize_list_params(query, &ORDER_LIST_SPEC, self.config.list.default_limit)?;
        let (mut filter, sort, page) = build_filter(&params, &ORDER_FIELD_POLICY);

        filter.predicates.push(Predicate::Eq {
            field: "customerId".to_string(),
            value: FilterValue::Id(identity.user_id),
        });
        if let Some(term) = &params.search {
            filter = filter.with_alternation(self.search_alternation(term).await?);
        }

        let result = self.orders.find_page(&filter, &sort, &page).await?;
        Ok(OrderPage {
            pagination: PageInfo::new(result.total_count, params.page, &page),
            orders: result.items,
        })
    }

    /// Fetch one order on behalf of a caller. A non-admin asking for someone
    /// else's order gets the same not-found as for a missing one; existence
    /// is never confirmed to unauthorized callers.
    pub async fn get_order_for(
        &self,
        identity: &Identity,
        order_number: i64,
    ) -> Result<Order, AppError> {
        let not_found = || AppError::NotFound("order not found".to_string());
        let order = self
            .orders
            .find_by_number(order_number)
            .await?
            .ok_or_else(not_found)?;
        if identity.role != Role::Admin && order.customer_id != identity.user_id {
            return Err(not_found());
        }
        Ok(order)
    }

    /// Verify a client-submitted order draft and produce the persistable
    /// shape. The catalog is fetched fresh every call; client-side or cached
    /// prices are never trusted.
    #[tracing::instrument(skip(self, draft), fields(customer_id = %identity.user_id))]
    pub async fn validate_order(
        &self,
        draft: OrderDraft,
        identity: &Identity,
    ) -> Result<NewOrder, AppError> {
        draft.validate()?;

        let products = self.catalog.all_products().await?;
        let mut recomputed = 0.0_f64;
        for id in &draft.items {
            let product = products
                .iter()
                .find(|p| p.id == *id)
                .ok_or_else(|| AppError::BadRequest(format!("product {} not found", id)))?;
            let price = product
                .price
                .ok_or_else(|| AppError::BadRequest(format!("product {} is not for sale", id)))?;
            recomputed += price;
        }
        if recomputed != draft.total {
            return Err(AppError::BadRequest("order total mismatch".to_string()));
        }

        let phone = normalize_phone(&draft.phone, &self.config.phone_region)
            .ok_or_else(|| AppError::BadRequest("invalid phone number".to_string()))?;

        Ok(NewOrder {
            customer_id: identity.user_id,
            items: draft.items,
            total_amount: draft.total,
            payment: sanitize_text(&draft.payment, PAYMENT_MAX_CHARS),
            email: sanitize_text(&draft.email, EMAIL_MAX_CHARS),
            phone,
            delivery_address: sanitize_text(&draft.address, ADDRESS_MAX_CHARS),
            comment: sanitize_text(&draft.comment, COMMENT_MAX_CHARS),
        })
    }

    /// Validate and persist in one step.
    pub async fn submit_order(
        &self,
        draft: OrderDraft,
        identity: &Identity,
    ) -> Result<Order, AppError> {
        let new_order = self.validate_order(draft, identity).await?;
        self.orders.insert(new_order).await
    }
}
