//! Initialization guard.
//!
//! # Responsibilities
//! - Build the `ContainerHandler` exactly once per process
//! - Hand every caller the same instance
//! - Leave the guard empty when initialization fails
//!
//! # Design Decisions
//! - Fast path is a lock-free `OnceLock` read
//! - The slow path serializes initializers behind a mutex and re-checks,
//!   so racing first callers never run two initializers

use std::sync::{Arc, Mutex, OnceLock};
use std::time::Instant;

use crate::config::ContainerConfig;
use crate::container::ContainerHandler;
use crate::error::InitializationError;
use crate::routing::RouteTable;

/// Once-only slot for a shared `ContainerHandler`.
pub struct HandlerCell {
    handler: OnceLock<Arc<ContainerHandler>>,
    init_lock: Mutex<()>,
}

impl HandlerCell {
    pub const fn new() -> Self {
        Self {
            handler: OnceLock::new(),
            init_lock: Mutex::new(()),
        }
    }

    /// The published handler, if initialization has succeeded.
    pub fn get(&self) -> Option<Arc<ContainerHandler>> {
        self.handler.get().cloned()
    }

    pub fn is_initialized(&self) -> bool {
        self.handler.get().is_some()
    }

    /// Return the handler, running `init` if nothing is published yet.
    ///
    /// At most one `init` runs at a time. On `Err` the cell stays empty and
    /// the error goes to the caller whose `init` failed.
    pub fn get_or_init<F>(&self, init: F) -> Result<Arc<ContainerHandler>, InitializationError>
    where
        F: FnOnce() -> Result<ContainerHandler, InitializationError>,
    {
        if let Some(handler) = self.handler.get() {
            return Ok(Arc::clone(handler));
        }

        // A panicking initializer poisons the lock but publishes nothing.
        let _guard = self
            .init_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(handler) = self.handler.get() {
            return Ok(Arc::clone(handler));
        }

        let start = Instant::now();
        match init() {
            Ok(handler) => {
                let handler = Arc::new(handler);
                let published = Arc::clone(self.handler.get_or_init(|| handler));
                tracing::info!(
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Container handler initialized"
                );
                Ok(published)
            }
            Err(e) => {
                tracing::error!(error = %e, "Container handler initialization failed");
                Err(e)
            }
        }
    }
}

impl Default for HandlerCell {
    fn default() -> Self {
        Self::new()
    }
}

static HANDLER: HandlerCell = HandlerCell::new();

/// Process-wide handler with the default configuration.
///
/// `register` receives an empty table and returns it populated. It runs only
/// while no handler has been published.
pub fn get_handler<F>(register: F) -> Result<Arc<ContainerHandler>, InitializationError>
where
    F: FnOnce(RouteTable) -> Result<RouteTable, InitializationError>,
{
    get_handler_with_config(ContainerConfig::default(), register)
}

/// Process-wide handler with an explicit configuration.
///
/// Once a handler is published, later calls return it and ignore both
/// arguments.
pub fn get_handler_with_config<F>(
    config: ContainerConfig,
    register: F,
) -> Result<Arc<ContainerHandler>, InitializationError>
where
    F: FnOnce(RouteTable) -> Result<RouteTable, InitializationError>,
{
    HANDLER.get_or_init(move || {
        let routes = register(RouteTable::new())?;
        ContainerHandler::new(routes, config)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn ok() -> &'static str {
        "ok"
    }

    fn build() -> Result<ContainerHandler, InitializationError> {
        ContainerHandler::new(RouteTable::new().get("/", ok), ContainerConfig::default())
    }

    #[test]
    fn second_call_reuses_the_handler() {
        let cell = HandlerCell::new();
        let calls = AtomicUsize::new(0);

        let first = cell
            .get_or_init(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                build()
            })
            .unwrap();
        let second = cell
            .get_or_init(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                build()
            })
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failure_leaves_the_cell_empty() {
        let cell = HandlerCell::new();
        let err = cell
            .get_or_init(|| Err(InitializationError::startup("database unavailable")))
            .unwrap_err();
        assert!(matches!(err, InitializationError::Startup(_)));
        assert!(!cell.is_initialized());
        assert!(cell.get().is_none());

        assert!(cell.get_or_init(build).is_ok());
        assert!(cell.is_initialized());
    }
}
