use chrono::{Duration, TimeZone, Utc};
use order_common::Money;
use order_engine::{
    db_types::{NewOrderItem, OptionMap, OptionValue, OrderId, OrderStatusType, OrderType},
    test_utils::{
        prepare_env::{prepare_test_env, random_db_path, seed_menu, tear_down},
        sample_item,
        sample_order,
    },
    OrderStore,
    OrderStoreError,
    SqliteDatabase,
};

async fn setup() -> SqliteDatabase {
    let url = random_db_path();
    prepare_test_env(&url).await
}

async fn set_created_at(db: &SqliteDatabase, id: &OrderId, minutes: i64) {
    let ts = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap() + Duration::minutes(minutes);
    sqlx::query("UPDATE orders SET created_at = $1 WHERE id = $2")
        .bind(ts)
        .bind(id.as_str())
        .execute(db.pool())
        .await
        .expect("Error setting created_at");
}

#[tokio::test]
async fn empty_store_lists_nothing() {
    let db = setup().await;
    let orders = db.fetch_orders_with_items().await.unwrap();
    assert!(orders.is_empty());
    tear_down(db).await;
}

#[tokio::test]
async fn orders_are_listed_newest_first() {
    let db = setup().await;
    let a = db.insert_order(sample_order("A-1", 1000)).await.unwrap();
    let b = db.insert_order(sample_order("B-2", 2000)).await.unwrap();
    let c = db.insert_order(sample_order("C-3", 3000)).await.unwrap();
    // Insertion order deliberately differs from creation time order
    set_created_at(&db, &a.id, 10).await;
    set_created_at(&db, &b.id, 30).await;
    set_created_at(&db, &c.id, 20).await;

    let orders = db.fetch_orders_with_items().await.unwrap();
    let numbers = orders.iter().map(|o| o.order.order_number.as_str()).collect::<Vec<_>>();
    assert_eq!(numbers, ["B-2", "C-3", "A-1"]);
    assert!(orders.windows(2).all(|w| w[0].order.created_at >= w[1].order.created_at));
    assert!(orders.iter().all(|o| o.order_items.is_empty()));
    tear_down(db).await;
}

#[tokio::test]
async fn inserted_order_is_returned_as_stored() {
    let db = setup().await;
    let new_order = sample_order("1042", 2450).with_phone("+1 555 0100").with_notes("No onions");
    let order = db.insert_order(new_order.clone()).await.unwrap();
    assert!(!order.id.as_str().is_empty());
    assert!(new_order.is_equivalent(&order));
    assert_eq!(order.status, OrderStatusType::New);
    assert_eq!(order.order_type, OrderType::DineIn);
    assert_eq!(order.total_amount, Money::from(2450));
    assert_eq!(order.created_at, order.updated_at);

    let stored = db.fetch_order(&order.id).await.unwrap().expect("order should exist");
    assert_eq!(stored, order);
    tear_down(db).await;
}

#[tokio::test]
async fn status_can_be_set_to_every_value() {
    let db = setup().await;
    let order = db.insert_order(sample_order("7", 500)).await.unwrap();
    let mut last_updated = order.updated_at;
    for status in OrderStatusType::ALL {
        let updated = db.update_order_status(&order.id, status).await.unwrap();
        assert_eq!(updated.id, order.id);
        assert_eq!(updated.status, status);
        assert_eq!(updated.created_at, order.created_at);
        assert!(updated.updated_at >= last_updated);
        last_updated = updated.updated_at;
    }
    let stored = db.fetch_order(&order.id).await.unwrap().unwrap();
    assert_eq!(stored.status, OrderStatusType::Cancelled);
    tear_down(db).await;
}

#[tokio::test]
async fn updating_unknown_order_fails() {
    let db = setup().await;
    let id = OrderId::from("no-such-order");
    let err = db.update_order_status(&id, OrderStatusType::Ready).await.unwrap_err();
    assert!(matches!(err, OrderStoreError::OrderNotFound(ref missing) if missing == &id), "{err:?}");
    tear_down(db).await;
}

#[tokio::test]
async fn items_are_nested_under_their_order_with_menu_details() {
    let db = setup().await;
    let menu = seed_menu(&db).await;
    let first = db.insert_order(sample_order("1", 1200)).await.unwrap();
    let second = db.insert_order(sample_order("2", 900)).await.unwrap();
    set_created_at(&db, &first.id, 1).await;
    set_created_at(&db, &second.id, 2).await;

    let mut options = OptionMap::new();
    options.insert("size".into(), "large".into());
    options.insert("sauces".into(), vec!["ketchup", "mayo"].into());
    let items = vec![
        sample_item(&menu[0], 1, 850).with_options(options.clone()),
        NewOrderItem::new(menu[1].as_str(), 2, Money::from(175)),
    ];
    let inserted = db.insert_order_items(&first.id, items).await.unwrap();
    assert_eq!(inserted.len(), 2);
    assert!(inserted.iter().all(|i| i.order_id == first.id));
    assert_eq!(inserted[0].selected_options, options);
    assert!(inserted[0].selected_add_ons.is_empty());
    assert!(inserted[1].selected_options.is_empty());

    db.insert_order_items(&second.id, vec![sample_item(&menu[2], 1, 900)]).await.unwrap();

    let orders = db.fetch_orders_with_items().await.unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].order.id, second.id);
    assert_eq!(orders[0].item_count(), 1);
    let shake = &orders[0].order_items[0];
    assert_eq!(shake.menu_items.as_ref().map(|m| m.name.as_str()), Some("Milkshake"));

    assert_eq!(orders[1].order.id, first.id);
    let names = orders[1]
        .order_items
        .iter()
        .map(|i| i.menu_items.as_ref().map(|m| m.name.clone()).unwrap_or_default())
        .collect::<Vec<_>>();
    assert_eq!(names, ["Burger", "Fries"]);
    assert_eq!(orders[1].order_items[1].menu_items.as_ref().unwrap().description, None);
    assert_eq!(orders[1].order_items[0].selected_options.get("sauces"), Some(&OptionValue::from(vec!["ketchup", "mayo"])));
    let total: Money = orders[1].order_items.iter().map(|i| i.line_total()).sum();
    assert_eq!(total, Money::from(1200));
    tear_down(db).await;
}

#[tokio::test]
async fn null_option_columns_are_listed_as_empty() {
    let db = setup().await;
    let menu = seed_menu(&db).await;
    let order = db.insert_order(sample_order("1", 850)).await.unwrap();
    let item = sample_item(&menu[0], 1, 850).with_add_ons(OptionMap::from([("cheese".to_string(), true.into())]));
    db.insert_order_items(&order.id, vec![item]).await.unwrap();
    // Rows written by other clients may hold a JSON null
    sqlx::query("UPDATE order_items SET selected_options = 'null', selected_add_ons = 'null'")
        .execute(db.pool())
        .await
        .expect("Error clearing options");

    let orders = db.fetch_orders_with_items().await.unwrap();
    assert_eq!(orders[0].item_count(), 1);
    assert!(orders[0].order_items[0].selected_options.is_empty());
    assert!(orders[0].order_items[0].selected_add_ons.is_empty());
    tear_down(db).await;
}

#[tokio::test]
async fn item_batch_with_unknown_menu_item_is_rejected_as_a_whole() {
    let db = setup().await;
    let menu = seed_menu(&db).await;
    let order = db.insert_order(sample_order("99", 1000)).await.unwrap();
    let items = vec![sample_item(&menu[0], 1, 500), sample_item("not-on-the-menu", 1, 500)];
    let err = db.insert_order_items(&order.id, items).await.unwrap_err();
    assert!(matches!(err, OrderStoreError::DatabaseError(_)), "{err:?}");

    let orders = db.fetch_orders_with_items().await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].order.id, order.id);
    assert!(orders[0].order_items.is_empty());
    tear_down(db).await;
}

#[tokio::test]
async fn items_for_unknown_order_are_rejected() {
    let db = setup().await;
    let menu = seed_menu(&db).await;
    let err = db.insert_order_items(&OrderId::from("ghost"), vec![sample_item(&menu[1], 1, 175)]).await.unwrap_err();
    assert!(matches!(err, OrderStoreError::DatabaseError(_)), "{err:?}");
    tear_down(db).await;
}

#[tokio::test]
async fn database_is_only_created_once() {
    let url = random_db_path();
    assert!(SqliteDatabase::create_if_missing(&url).await.unwrap());
    assert!(!SqliteDatabase::create_if_missing(&url).await.unwrap());
    let db = SqliteDatabase::new_with_url(&url, 1).await.unwrap();
    db.migrate().await.unwrap();
    assert!(db.fetch_orders_with_items().await.unwrap().is_empty());
    tear_down(db).await;
}
