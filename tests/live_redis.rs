//! Contract checks against a running Redis instance.
//!
//! Ignored by default; run with a local server on the standard port:
//!
//! ```text
//! cargo test --test live_redis -- --ignored
//! ```
//!
//! The suite uses database 15 and flushes it, so point it at a disposable
//! instance only.

use std::time::Duration;

use redcache::{Config, Error, Expiry, RedisStore, Service};

fn live_store() -> RedisStore {
    let config = Config {
        database: 15,
        ..Config::default()
    };
    RedisStore::connect(&config).expect("pool construction should not need the server yet")
}

#[tokio::test]
#[ignore = "requires a running redis on 127.0.0.1:6379"]
async fn live_round_trip_and_miss() {
    let store = live_store();
    store.flush().await.unwrap();

    store
        .set("greeting", "hello", Expiry::After(Duration::from_secs(30)))
        .await
        .unwrap();
    let value: String = store.get("greeting").await.unwrap();
    assert_eq!(value, "hello");

    let missing: Result<String, _> = store.get("absent").await;
    assert!(matches!(missing, Err(Error::CacheMiss)));
}

#[tokio::test]
#[ignore = "requires a running redis on 127.0.0.1:6379"]
async fn live_counter_contract() {
    let store = live_store();
    store.flush().await.unwrap();

    assert!(matches!(
        store.increment("hits", 1).await,
        Err(Error::CacheMiss)
    ));

    store.set("hits", &10i64, Expiry::Forever).await.unwrap();
    assert_eq!(store.increment("hits", 5).await.unwrap(), 15);
    assert_eq!(store.decrement("hits", 100).await.unwrap(), 0);
}

#[tokio::test]
#[ignore = "requires a running redis on 127.0.0.1:6379"]
async fn live_service_prefixing() {
    let store = live_store();
    store.flush().await.unwrap();

    let sessions = Service::new(store.clone(), "sessions");
    sessions.set("u1", "token", Expiry::Forever).await.unwrap();

    // The raw store sees the prefixed key, not the caller's.
    assert!(store.exists("sessions:u1").await);
    assert!(!store.exists("u1").await);
}
