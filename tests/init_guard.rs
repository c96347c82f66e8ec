//! Initialization guard behavior under contention and failure.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use proxy_container::config::ContainerConfig;
use proxy_container::{
    get_handler, ContainerHandler, ContextMetadata, HandlerCell, InitializationError,
    ProxyRequest, RouteError, RouteTable,
};

mod common;

fn build() -> Result<ContainerHandler, InitializationError> {
    let routes = common::test_routes(RouteTable::new())?;
    ContainerHandler::new(routes, ContainerConfig::default())
}

#[test]
fn racing_callers_share_one_initialization() {
    const CALLERS: usize = 32;
    let cell = Arc::new(HandlerCell::new());
    let calls = Arc::new(AtomicUsize::new(0));
    let barrier = Arc::new(Barrier::new(CALLERS));

    let handles: Vec<_> = (0..CALLERS)
        .map(|_| {
            let cell = Arc::clone(&cell);
            let calls = Arc::clone(&calls);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                cell.get_or_init(|| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    // Hold the initializer long enough for every caller to pile up.
                    thread::sleep(Duration::from_millis(50));
                    build()
                })
                .unwrap()
            })
        })
        .collect();

    let handlers: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(handlers.iter().all(|h| Arc::ptr_eq(h, &handlers[0])));

    let response = handlers[0].proxy(common::get("/hello"), ContextMetadata::default());
    assert_eq!(response.status_code, 200);
}

#[test]
fn failed_initialization_can_be_retried() {
    let cell = HandlerCell::new();

    let err = cell
        .get_or_init(|| {
            let routes = RouteTable::new()
                .get("/dup", || async { "a" })
                .get("/dup", || async { "b" });
            ContainerHandler::new(routes, ContainerConfig::default())
        })
        .unwrap_err();

    match err {
        InitializationError::Registration(errors) => {
            assert_eq!(errors.len(), 1);
            assert!(matches!(&errors[0], RouteError::Duplicate { path, .. } if path == "/dup"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!cell.is_initialized());

    let handler = cell.get_or_init(build).unwrap();
    assert!(cell.is_initialized());
    assert!(Arc::ptr_eq(&handler, &cell.get().unwrap()));
}

#[test]
fn panicking_initializer_leaves_the_guard_usable() {
    let cell = Arc::new(HandlerCell::new());

    let poisoned = Arc::clone(&cell);
    let result = thread::spawn(move || {
        let _ = poisoned.get_or_init(|| panic!("startup blew up"));
    })
    .join();
    assert!(result.is_err());
    assert!(!cell.is_initialized());

    assert!(cell.get_or_init(build).is_ok());
}

#[test]
fn global_guard_reports_errors_then_initializes() {
    let err = get_handler(|_| Err(InitializationError::startup("config store unreachable")))
        .unwrap_err();
    assert!(err.to_string().contains("config store unreachable"));

    let handler = get_handler(common::test_routes).unwrap();
    let again = get_handler(|_| panic!("registration must not run twice")).unwrap();
    assert!(Arc::ptr_eq(&handler, &again));

    let request = ProxyRequest::builder().path("/").build();
    assert_eq!(handler.proxy(request, ContextMetadata::default()).body, "root");
}
