// src/host.rs

use axum::Router;
use std::collections::HashSet;
use tracing::debug;

type ApplyLayer = Box<dyn FnOnce(Router) -> Router + Send>;

struct MiddlewareEntry {
    name: String,
    apply: ApplyLayer,
}

/// The host application the actuator attaches to.
///
/// Exposes a router attachment point ([`HostApp::attach_router`]) and a
/// middleware attachment point ([`HostApp::add_middleware`]). Middleware is
/// applied in [`HostApp::into_router`], after every route is known, so it
/// wraps routes attached later too. Marker flags record what has already been
/// registered on this instance.
#[derive(Default)]
pub struct HostApp {
    router: Router,
    attached: Vec<String>,
    middleware: Vec<MiddlewareEntry>,
    markers: HashSet<String>,
}

impl HostApp {
    pub fn new(router: Router) -> Self {
        Self {
            router,
            ..Self::default()
        }
    }

    /// Merges `router` into the application, recording it under `label`.
    pub fn attach_router(&mut self, label: impl Into<String>, router: Router) {
        let label = label.into();
        debug!(router = %label, "Attaching router");
        self.router = std::mem::take(&mut self.router).merge(router);
        self.attached.push(label);
    }

    /// Registers middleware wrapping every route of the final router.
    pub fn add_middleware<F>(&mut self, name: impl Into<String>, apply: F)
    where
        F: FnOnce(Router) -> Router + Send + 'static,
    {
        let name = name.into();
        debug!(middleware = %name, "Registering middleware");
        self.middleware.push(MiddlewareEntry {
            name,
            apply: Box::new(apply),
        });
    }

    /// Sets `marker`. Returns `false` when it was already set.
    pub fn mark(&mut self, marker: impl Into<String>) -> bool {
        self.markers.insert(marker.into())
    }

    pub fn has_marker(&self, marker: &str) -> bool {
        self.markers.contains(marker)
    }

    pub fn attached_routers(&self) -> &[String] {
        &self.attached
    }

    pub fn middleware_names(&self) -> Vec<&str> {
        self.middleware.iter().map(|m| m.name.as_str()).collect()
    }

    /// Finishes the application, applying middleware in registration order.
    pub fn into_router(self) -> Router {
        self.middleware
            .into_iter()
            .fold(self.router, |router, entry| (entry.apply)(router))
    }
}

impl From<Router> for HostApp {
    fn from(router: Router) -> Self {
        Self::new(router)
    }
}

impl std::fmt::Debug for HostApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostApp")
            .field("attached", &self.attached)
            .field("middleware", &self.middleware_names())
            .field("markers", &self.markers)
            .finish_non_exhaustive()
    }
}
