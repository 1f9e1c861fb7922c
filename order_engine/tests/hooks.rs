use std::sync::{atomic::AtomicI32, Arc};

use futures_util::FutureExt;
use log::*;
use order_engine::{
    cache::QueryCache,
    db_types::{OrderId, OrderStatusType},
    events::{EventHandlers, EventHooks},
    test_utils::{
        prepare_env::{prepare_test_env, random_db_path, seed_menu, tear_down},
        sample_item,
        sample_order,
    },
    OrdersApi,
    SqliteDatabase,
};
use tokio::runtime::Runtime;

async fn setup(hooks: EventHooks) -> (OrdersApi<SqliteDatabase>, Vec<String>, EventHandlers) {
    let url = random_db_path();
    let db = prepare_test_env(&url).await;
    let menu = seed_menu(&db).await;
    let handlers = EventHandlers::new(10, hooks);
    let api = OrdersApi::new(db, Arc::new(QueryCache::default()), handlers.producers());
    (api, menu, handlers)
}

#[derive(Default, Clone)]
struct HookCalled {
    called: Arc<AtomicI32>,
}

impl HookCalled {
    pub fn called(&self) {
        let _ = self.called.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
    }

    pub fn count(&self) -> i32 {
        self.called.load(std::sync::atomic::Ordering::Relaxed)
    }
}

#[test]
fn on_order_created() {
    let rt = Runtime::new().unwrap();
    let event = HookCalled::default();
    let event_copy = event.clone();
    rt.block_on(async move {
        let mut hooks = EventHooks::default();
        hooks.on_order_created(move |ev| {
            info!("🪝️ {} created with {} item(s)", ev.order.order_number, ev.item_count);
            event_copy.called();
            async {}.boxed()
        });
        let (api, menu, handlers) = setup(hooks).await;
        let running = handlers.start_handlers();
        assert_eq!(running.len(), 1);

        let _ = api
            .create_order(sample_order("1001", 850), vec![sample_item(&menu[0], 1, 850)])
            .await
            .expect("Error creating order");
        let _ = api.create_order(sample_order("1002", 0), vec![]).await.expect("Error creating order");

        let db = api.db().clone();
        drop(api);
        for handle in running {
            handle.await.unwrap();
        }
        tear_down(db).await;
    });
    assert_eq!(event.count(), 2);
    info!("🪝️ test complete");
}

#[test]
fn on_order_status_changed() {
    let rt = Runtime::new().unwrap();
    let event = HookCalled::default();
    let toasts = HookCalled::default();
    let event_copy = event.clone();
    let toasts_copy = toasts.clone();
    rt.block_on(async move {
        let mut hooks = EventHooks::default();
        hooks
            .on_order_status_changed(move |ev| {
                info!("🪝️ {} is now {}", ev.order.id, ev.order.status);
                event_copy.called();
                async {}.boxed()
            })
            .on_toast(move |toast| {
                info!("🪝️ {}: {}", toast.title, toast.description);
                toasts_copy.called();
                async {}.boxed()
            });
        let (api, _, handlers) = setup(hooks).await;
        let order = api.create_order(sample_order("1003", 500), vec![]).await.expect("Error creating order");
        let db = api.db().clone();
        // Events published before the handlers start wait in the channel
        let running = handlers.start_handlers();

        for status in [OrderStatusType::Preparing, OrderStatusType::Ready, OrderStatusType::Served] {
            api.update_order_status(&order.id, status).await.expect("Error updating order");
        }
        // A missing order produces an error toast, but no status change event
        let missing = OrderId::from("no-such-order");
        assert!(api.update_order_status(&missing, OrderStatusType::Cancelled).await.is_err());

        drop(api);
        for handle in running {
            handle.await.unwrap();
        }
        tear_down(db).await;
    });
    assert_eq!(event.count(), 3);
    // One for the creation, three for the updates and one error
    assert_eq!(toasts.count(), 5);
}
