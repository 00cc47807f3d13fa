mod helpers;

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use orderdesk_core::{AppConfig, AppError, Identity, OrderDraft, Role};
use orderdesk_query::{FilterValue, Predicate, QueryInput};
use orderdesk_services::OrderService;

use helpers::{order, product, FakeCatalog, FakeOrders};

fn service(catalog: FakeCatalog, orders: FakeOrders) -> (OrderService, Arc<FakeOrders>) {
    let orders = Arc::new(orders);
    let service = OrderService::new(
        Arc::new(catalog),
        Arc::clone(&orders) as Arc<dyn orderdesk_services::OrderRepository>,
        AppConfig::default(),
    );
    (service, orders)
}

fn draft(items: Vec<Uuid>, total: f64) -> OrderDraft {
    OrderDraft {
        items,
        total,
        email: "buyer@example.com".to_string(),
        phone: "+79991234567".to_string(),
        address: "Arbat 1".to_string(),
        payment: "card".to_string(),
        comment: String::new(),
    }
}

fn customer_identity() -> Identity {
    Identity {
        user_id: Uuid::new_v4(),
        role: Role::Customer,
    }
}

#[tokio::test]
async fn test_validate_order_accepts_matching_total() {
    let a = product("Mug", Some(100.0));
    let b = product("Teapot", Some(250.0));
    let items = vec![a.id, b.id];
    let catalog = FakeCatalog {
        products: vec![a, b],
        ..Default::default()
    };
    let (service, _) = service(catalog, FakeOrders::default());

    let identity = customer_identity();
    let new_order = service
        .validate_order(draft(items.clone(), 350.0), &identity)
        .await
        .unwrap();
    assert_eq!(new_order.items, items);
    assert_eq!(new_order.total_amount, 350.0);
    assert_eq!(new_order.customer_id, identity.user_id);
}

#[tokio::test]
async fn test_validate_order_rejects_total_mismatch() {
    let a = product("Mug", Some(100.0));
    let b = product("Teapot", Some(250.0));
    let items = vec![a.id, b.id];
    let catalog = FakeCatalog {
        products: vec![a, b],
        ..Default::default()
    };
    let (service, _) = service(catalog, FakeOrders::default());

    let err = service
        .validate_order(draft(items, 300.0), &customer_identity())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    assert!(err.to_string().contains("total mismatch"));
}

#[tokio::test]
async fn test_validate_order_names_unknown_product() {
    let a = product("Mug", Some(100.0));
    let catalog = FakeCatalog {
        products: vec![a],
        ..Default::default()
    };
    let (service, _) = service(catalog, FakeOrders::default());

    let unknown = Uuid::new_v4();
    let err = service
        .validate_order(draft(vec![unknown], 100.0), &customer_identity())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    assert!(err.to_string().contains(&unknown.to_string()));
}

#[tokio::test]
async fn test_validate_order_rejects_unpriced_product() {
    let discontinued = product("Old mug", None);
    let id = discontinued.id;
    let catalog = FakeCatalog {
        products: vec![discontinued],
        ..Default::default()
    };
    let (service, _) = service(catalog, FakeOrders::default());

    let err = service
        .validate_order(draft(vec![id], 0.0), &customer_identity())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("not for sale"));
}

#[tokio::test]
async fn test_validate_order_counts_duplicates_per_occurrence() {
    let a = product("Mug", Some(100.0));
    let items = vec![a.id, a.id];
    let catalog = FakeCatalog {
        products: vec![a],
        ..Default::default()
    };
    let (service, _) = service(catalog, FakeOrders::default());

    assert!(service
        .validate_order(draft(items, 200.0), &customer_identity())
        .await
        .is_ok());
}

#[tokio::test]
async fn test_validate_order_rejects_empty_items() {
    let (service, _) = service(FakeCatalog::default(), FakeOrders::default());
    let err = service
        .validate_order(draft(Vec::new(), 0.0), &customer_identity())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_validate_order_rejects_bad_phone() {
    let a = product("Mug", Some(100.0));
    let items = vec![a.id];
    let catalog = FakeCatalog {
        products: vec![a],
        ..Default::default()
    };
    let (service, _) = service(catalog, FakeOrders::default());

    let mut body = draft(items, 100.0);
    body.phone = "call me maybe".to_string();
    let err = service
        .validate_order(body, &customer_identity())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("invalid phone number"));
}

#[tokio::test]
async fn test_validate_order_sanitizes_free_text() {
    let a = product("Mug", Some(100.0));
    let items = vec![a.id];
    let catalog = FakeCatalog {
        products: vec![a],
        ..Default::default()
    };
    let (service, _) = service(catalog, FakeOrders::default());

    let mut body = draft(items, 100.0);
    body.address = "<script>alert(1)</script> Arbat 1".to_string();
    body.comment = "x".repeat(2000);
    let new_order = service
        .validate_order(body, &customer_identity())
        .await
        .unwrap();
    assert!(!new_order.delivery_address.contains('<'));
    assert!(new_order.delivery_address.contains("&lt;script&gt;"));
    assert_eq!(new_order.comment.chars().count(), 1000);
    assert_eq!(new_order.phone, "+79991234567");
}

#[tokio::test]
async fn test_submit_order_persists_validated_shape() {
    let a = product("Mug", Some(100.0));
    let items = vec![a.id];
    let catalog = FakeCatalog {
        products: vec![a],
        ..Default::default()
    };
    let (service, orders) = service(catalog, FakeOrders::default());

    let identity = customer_identity();
    let stored = service
        .submit_order(draft(items, 100.0), &identity)
        .await
        .unwrap();
    assert_eq!(stored.customer_id, identity.user_id);
    let inserted = orders.inserted.lock().unwrap();
    assert_eq!(inserted.len(), 1);
    assert_eq!(inserted[0].total_amount, 100.0);
}

#[tokio::test]
async fn test_get_order_masks_foreign_order_for_customers() {
    let owner = Uuid::new_v4();
    let stored = order(42, owner);
    let orders = FakeOrders {
        by_number: HashMap::from([(42, stored)]),
        ..Default::default()
    };
    let (service, _) = service(FakeCatalog::default(), orders);

    let stranger = customer_identity();
    let err = service.get_order_for(&stranger, 42).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let missing = service.get_order_for(&stranger, 43).await.unwrap_err();
    assert_eq!(err.to_string(), missing.to_string());

    let owner_identity = Identity {
        user_id: owner,
        role: Role::Customer,
    };
    assert!(service.get_order_for(&owner_identity, 42).await.is_ok());

    let admin = Identity {
        user_id: Uuid::new_v4(),
        role: Role::Admin,
    };
    assert!(service.get_order_for(&admin, 42).await.is_ok());
}

#[tokio::test]
async fn test_list_orders_search_builds_product_alternation() {
    let match_id = Uuid::new_v4();
    let catalog = FakeCatalog {
        title_matches: vec![match_id],
        ..Default::default()
    };
    let (service, orders) = service(catalog, FakeOrders::default());

    let query = QueryInput::from_pairs([("search", "mug")]);
    service.list_orders(&query).await.unwrap();

    let captured = orders.last_query.lock().unwrap();
    let (filter, _, _) = captured.as_ref().unwrap();
    assert_eq!(
        filter.alternation,
        vec![Predicate::In {
            field: "products".to_string(),
            values: vec![FilterValue::Id(match_id)],
        }]
    );
}

#[tokio::test]
async fn test_list_orders_numeric_search_adds_order_number_branch() {
    let (service, orders) = service(FakeCatalog::default(), FakeOrders::default());

    let query = QueryInput::from_pairs([("search", "1234")]);
    service.list_orders(&query).await.unwrap();

    let captured = orders.last_query.lock().unwrap();
    let (filter, _, _) = captured.as_ref().unwrap();
    assert_eq!(filter.alternation.len(), 2);
    assert!(filter.alternation.contains(&Predicate::Eq {
        field: "orderNumber".to_string(),
        value: FilterValue::Int(1234),
    }));
}

#[tokio::test]
async fn test_list_my_orders_pins_caller_id_into_filter() {
    let (service, orders) = service(FakeCatalog::default(), FakeOrders::default());

    let identity = customer_identity();
    service
        .list_orders_for(&identity, &QueryInput::new())
        .await
        .unwrap();

    let captured = orders.last_query.lock().unwrap();
    let (filter, _, _) = captured.as_ref().unwrap();
    assert!(filter.predicates.contains(&Predicate::Eq {
        field: "customerId".to_string(),
        value: FilterValue::Id(identity.user_id),
    }));
}

#[tokio::test]
async fn test_list_my_orders_combines_scoping_with_search() {
    let match_id = Uuid::new_v4();
    let catalog = FakeCatalog {
        title_matches: vec![match_id],
        ..Default::default()
    };
    let (service, orders) = service(catalog, FakeOrders::default());

    let identity = customer_identity();
    let query = QueryInput::from_pairs([("search", "42")]);
    service.list_orders_for(&identity, &query).await.unwrap();

    let captured = orders.last_query.lock().unwrap();
    let (filter, _, _) = captured.as_ref().unwrap();
    // The caller scope is a conjunct; the search branches stay an OR.
    assert!(filter.predicates.contains(&Predicate::Eq {
        field: "customerId".to_string(),
        value: FilterValue::Id(identity.user_id),
    }));
    assert_eq!(filter.alternation.len(), 2);
    assert!(filter.alternation.contains(&Predicate::In {
        field: "products".to_string(),
        values: vec![FilterValue::Id(match_id)],
    }));
    assert!(filter.alternation.contains(&Predicate::Eq {
        field: "orderNumber".to_string(),
        value: FilterValue::Int(42),
    }));
}

#[tokio::test]
async fn test_list_orders_rejects_hostile_search() {
    let (service, orders) = service(FakeCatalog::default(), FakeOrders::default());

    let query = QueryInput::from_pairs([("search", "(select*from)")]);
    let err = service.list_orders(&query).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(orders.last_query.lock().unwrap().is_none());
}

#[tokio::test]
async fn test_list_orders_pagination_shape() {
    let orders = FakeOrders {
        total_count: 95,
        ..Default::default()
    };
    let (service, _) = service(FakeCatalog::default(), orders);

    let query = QueryInput::from_pairs([("page", "3"), ("limit", "10")]);
    let page = service.list_orders(&query).await.unwrap();
    assert_eq!(page.pagination.total, 95);
    assert_eq!(page.pagination.total_pages, 10);
    assert_eq!(page.pagination.current_page, 3);
    assert_eq!(page.pagination.page_size, 10);
}

#[tokio::test]
async fn test_list_orders_bad_page_fails_but_bad_limit_falls_back() {
    let (service, orders) = service(FakeCatalog::default(), FakeOrders::default());

    let query = QueryInput::from_pairs([("page", "zero")]);
    assert!(matches!(
        service.list_orders(&query).await.unwrap_err(),
        AppError::Validation(_)
    ));

    let query = QueryInput::from_pairs([("limit", "banana")]);
    service.list_orders(&query).await.unwrap();
    let captured = orders.last_query.lock().unwrap();
    let (_, _, page) = captured.as_ref().unwrap();
    assert_eq!(page.limit, AppConfig::default().list.default_limit);
}
