use std::path::Path;

use log::*;
use sqlx::{migrate::MigrateDatabase, Sqlite};

use crate::{db_types::MenuItemSummary, store::OrderStore, SqliteDatabase};

/// Creates a fresh database at `url`, runs the migrations, and returns a handle to it.
pub async fn prepare_test_env(url: &str) -> SqliteDatabase {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    debug!("🚀️ Logging initialised");
    create_database(url).await;
    let db = SqliteDatabase::new_with_url(url, 5).await.expect("Error creating connection to database");
    db.migrate().await.expect("Error running DB migrations");
    db
}

pub fn random_db_path() -> String {
    let dir = std::env::temp_dir();
    format!("sqlite://{}/orders_test_{}.db", dir.display(), rand::random::<u64>())
}

pub async fn create_database<P: AsRef<Path>>(path: P) {
    let p = path.as_ref().as_os_str().to_str().unwrap();
    if let Err(e) = Sqlite::drop_database(p).await {
        trace!("Could not drop database {p}: {e:?}");
    }
    Sqlite::create_database(p).await.expect("Error creating database");
    info!("Created Sqlite database {p}");
}

/// Closes the pool and deletes the database file.
pub async fn tear_down(mut db: SqliteDatabase) {
    if let Err(e) = db.close().await {
        error!("🚀️ Failed to close database: {e}");
    }
    let url = db.url().to_string();
    if let Err(e) = Sqlite::drop_database(&url).await {
        warn!("🚀️ Failed to remove test database {url}: {e}");
    }
}

/// Adds a burger, fries and a milkshake to the menu and returns their ids in that order.
pub async fn seed_menu(db: &SqliteDatabase) -> Vec<String> {
    let menu = [
        ("Burger", Some("Beef patty, cheddar, pickles")),
        ("Fries", None),
        ("Milkshake", Some("Vanilla, chocolate or strawberry")),
    ];
    let mut ids = Vec::with_capacity(menu.len());
    for (name, description) in menu {
        let item = MenuItemSummary { name: name.to_string(), description: description.map(String::from) };
        ids.push(db.add_menu_item(&item).await.expect("Error adding menu item"));
    }
    ids
}
