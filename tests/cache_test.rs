//! TTL cache behaviour with a manual clock

use fcl_quality::cache::{ManualClock, TtlCache, DESPACHO_IMAGES_TTL, EVALUATION_IMAGES_TTL};
use fcl_quality::error::QcError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Two caches on one clock expire on their own TTLs
#[test]
fn test_image_ttls_on_shared_clock() {
    let clock = Arc::new(ManualClock::new());
    let evaluation: TtlCache<Vec<String>> = TtlCache::with_clock(EVALUATION_IMAGES_TTL, clock.clone());
    let despacho: TtlCache<Vec<String>> = TtlCache::with_clock(DESPACHO_IMAGES_TTL, clock.clone());

    evaluation.insert("EXC045", vec!["img".into()]);
    despacho.insert("EXC045%", vec!["img".into()]);

    clock.advance(Duration::from_secs(61));
    assert!(evaluation.get("EXC045").is_none());
    assert!(despacho.get("EXC045%").is_some());

    clock.advance(Duration::from_secs(3600));
    assert!(despacho.get("EXC045%").is_none());
}

/// Failed fetches are not stored
#[tokio::test]
async fn test_errors_are_not_cached() {
    let clock = Arc::new(ManualClock::new());
    let cache: TtlCache<String> = TtlCache::with_clock(Duration::from_secs(300), clock);
    let calls = AtomicUsize::new(0);

    let first: Result<String, QcError> = cache
        .get_or_try_fetch("token", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(QcError::Auth("401".into()))
        })
        .await;
    assert!(matches!(first, Err(QcError::Auth(_))));
    assert!(cache.is_empty());

    let second: Result<String, QcError> = cache
        .get_or_try_fetch("token", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok("abc".to_string())
        })
        .await;
    assert_eq!(second.unwrap(), "abc");
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    let third: Result<String, QcError> = cache
        .get_or_try_fetch("token", || async { Err(QcError::Auth("no debe llamarse".into())) })
        .await;
    assert_eq!(third.unwrap(), "abc");
}
