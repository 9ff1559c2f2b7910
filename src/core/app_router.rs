//! # App Router (registry)
//!
//! Single source of truth mapping router ids to live routers.
//!
//! ```text
//! AppRouter
//! ├── routers: HashMap<String, Rc<dyn ManagedRouter>>
//! ├── main_tab_router          // base, never evicted by bulk reset
//! ├── main_base_routers        // base, never evicted by bulk reset
//! ├── presented_routers: Vec   // ids, last = topmost modal
//! └── recorder: Option<DebugRecorder>
//! ```
//!
//! The registry never builds routers. Feature code creates them, hands them
//! to [`AppRouter::register`], and the registry wires two things into each:
//!
//! 1. a weak back-reference, so the router (and views holding it) can reach
//!    sibling routers without keeping the registry alive;
//! 2. a dismiss callback that removes whatever id it is called with.
//!
//! `AppRouter` is a cheap `Rc` handle. Clones share the same registry.
//! Everything here runs on one thread; `RefCell` borrows are released before
//! calling into any router.

use std::any::type_name;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use log::{debug, error, info, warn};

use crate::core::error::RouterError;
use crate::core::router::{ManagedRouter, Routable, RouterSnapshot, TabRoutable};
use crate::core::stack::StackRouter;
use crate::core::tab::TabRouter;
use crate::debug::{DebugRecorder, LogKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryOptions {
    /// Refuse duplicate ids in `register()` instead of overwriting.
    pub strict_registration: bool,
}

struct Inner {
    routers: RefCell<HashMap<String, Rc<dyn ManagedRouter>>>,
    main_tab_router: Rc<dyn ManagedRouter>,
    main_base_routers: Vec<Rc<dyn ManagedRouter>>,
    presented_routers: RefCell<Vec<String>>,
    recorder: Option<DebugRecorder>,
    options: RegistryOptions,
}

#[derive(Clone)]
pub struct AppRouter {
    inner: Rc<Inner>,
}

/// Non-owning handle held by routers. Upgrading fails once the last
/// `AppRouter` is dropped.
#[derive(Clone)]
pub struct WeakAppRouter(Weak<Inner>);

impl WeakAppRouter {
    pub fn upgrade(&self) -> Option<AppRouter> {
        self.0.upgrade().map(|inner| AppRouter { inner })
    }
}

/// Collects the fixed routers before the registry exists, since
/// construction registers them.
pub struct AppRouterBuilder {
    tab_router: Rc<dyn ManagedRouter>,
    base_routers: Vec<Rc<dyn ManagedRouter>>,
    recorder: Option<DebugRecorder>,
    options: RegistryOptions,
}

impl AppRouterBuilder {
    pub fn base_router<T: ManagedRouter>(mut self, router: Rc<T>) -> Self {
        self.base_routers.push(router);
        self
    }

    pub fn recorder(mut self, recorder: DebugRecorder) -> Self {
        self.recorder = Some(recorder);
        self
    }

    pub fn strict_registration(mut self, strict: bool) -> Self {
        self.options.strict_registration = strict;
        self
    }

    pub fn build(self) -> AppRouter {
        let app = AppRouter {
            inner: Rc::new(Inner {
                routers: RefCell::new(HashMap::new()),
                main_tab_router: self.tab_router,
                main_base_routers: self.base_routers,
                presented_routers: RefCell::new(Vec::new()),
                recorder: self.recorder,
                options: self.options,
            }),
        };
        app.insert(app.inner.main_tab_router.clone());
        for router in app.inner.main_base_routers.clone() {
            app.insert(router);
        }
        info!(
            "AppRouter ready: tab router '{}', {} base routers",
            app.inner.main_tab_router.id(),
            app.inner.main_base_routers.len()
        );
        app
    }
}

impl AppRouter {
    pub fn new<T: ManagedRouter>(
        tab_router: Rc<T>,
        base_routers: Vec<Rc<dyn ManagedRouter>>,
    ) -> Self {
        let mut builder = Self::builder(tab_router);
        builder.base_routers = base_routers;
        builder.build()
    }

    pub fn with_options<T: ManagedRouter>(
        tab_router: Rc<T>,
        base_routers: Vec<Rc<dyn ManagedRouter>>,
        options: RegistryOptions,
        recorder: Option<DebugRecorder>,
    ) -> Self {
        let mut builder = Self::builder(tab_router);
        builder.base_routers = base_routers;
        builder.options = options;
        builder.recorder = recorder;
        builder.build()
    }

    pub fn builder<T: ManagedRouter>(tab_router: Rc<T>) -> AppRouterBuilder {
        AppRouterBuilder {
            tab_router,
            base_routers: Vec::new(),
            recorder: None,
            options: RegistryOptions::default(),
        }
    }

    pub fn downgrade(&self) -> WeakAppRouter {
        WeakAppRouter(Rc::downgrade(&self.inner))
    }

    pub fn options(&self) -> RegistryOptions {
        self.inner.options
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Adds `router` under its id.
    ///
    /// An existing router with the same id is replaced; the registry does not
    /// detect collisions, so callers keep ids unique. With
    /// `strict_registration` the duplicate is refused and logged instead.
    pub fn register<T: ManagedRouter>(&self, router: Rc<T>) {
        if self.inner.options.strict_registration {
            if let Err(e) = self.try_register(router) {
                error!("Registration refused: {}", e);
                self.record(LogKind::Error, format!("Registration refused: {e}"), &key_of(&e));
            }
            return;
        }
        self.insert(router);
    }

    /// Like `register()`, but never overwrites.
    pub fn try_register<T: ManagedRouter>(&self, router: Rc<T>) -> Result<(), RouterError> {
        if self.contains(router.id()) {
            return Err(RouterError::DuplicateId {
                key: router.id().to_string(),
            });
        }
        self.insert(router);
        Ok(())
    }

    fn insert(&self, router: Rc<dyn ManagedRouter>) {
        router.attach(self.downgrade());

        let registry = Rc::downgrade(&self.inner);
        router.set_dismiss_callback(Rc::new(move |dismissed_id: &str| {
            match registry.upgrade() {
                Some(inner) => AppRouter { inner }.unregister(dismissed_id),
                None => debug!("Dismiss of '{}' after registry drop ignored", dismissed_id),
            }
        }));

        let id = router.id().to_string();
        let replaced = self.inner.routers.borrow_mut().insert(id.clone(), router);
        if replaced.is_some() {
            warn!("Router '{}' replaced an existing registration", id);
            self.record(
                LogKind::Warning,
                format!("Router '{id}' replaced an existing registration"),
                &id,
            );
        } else {
            info!("Router registered: {}", id);
        }
        self.record(LogKind::Registration, format!("Router registered: {id}"), &id);
    }

    /// Only reachable through a dismiss callback. Base routers are removed
    /// from the map too; the base list keeps serving them through
    /// `base_router()`, but lookups by id no longer find them.
    fn unregister(&self, key: &str) {
        let removed = self.inner.routers.borrow_mut().remove(key);
        self.forget_presented(key);
        match removed {
            Some(_) => {
                info!("Router unregistered: {}", key);
                self.record(LogKind::Dismissal, format!("Router unregistered: {key}"), key);
            }
            None => debug!("Unregister of unknown router '{}' ignored", key),
        }
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// The router of type `T` under `key`, or under `T`'s type key when
    /// `key` is `None`. Missing and wrong-type entries both give `None`.
    pub fn router<T: ManagedRouter>(&self, key: Option<&str>) -> Option<Rc<T>> {
        self.try_router(key).ok()
    }

    /// Like `router()`, but says why the lookup failed.
    pub fn try_router<T: ManagedRouter>(&self, key: Option<&str>) -> Result<Rc<T>, RouterError> {
        let key = key.unwrap_or(T::type_key());
        let router = self.get(key).ok_or_else(|| RouterError::NotFound {
            key: key.to_string(),
        })?;
        router
            .as_any()
            .downcast::<T>()
            .map_err(|_| RouterError::TypeMismatch {
                key: key.to_string(),
                expected: type_name::<T>(),
            })
    }

    /// Type-erased lookup.
    pub fn get(&self, key: &str) -> Option<Rc<dyn ManagedRouter>> {
        self.inner.routers.borrow().get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.routers.borrow().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.routers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.routers.borrow().is_empty()
    }

    /// Registered ids, sorted.
    pub fn registered_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.inner.routers.borrow().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Snapshots of every registered router, sorted by id.
    pub fn snapshot(&self) -> Vec<RouterSnapshot> {
        let routers: Vec<Rc<dyn ManagedRouter>> =
            self.inner.routers.borrow().values().cloned().collect();
        let mut snapshots: Vec<RouterSnapshot> = routers.iter().map(|r| r.snapshot()).collect();
        snapshots.sort_by(|a, b| a.id.cmp(&b.id));
        snapshots
    }

    // ========================================================================
    // Base routers
    // ========================================================================

    /// The main tab router.
    ///
    /// # Panics
    ///
    /// Panics if the tab router was built for a different tab family. The
    /// tab router is fixed when the app is wired together, so a mismatch is
    /// a setup bug rather than a runtime condition. Use
    /// [`try_tab_router`](Self::try_tab_router) to check instead.
    pub fn tab_router<T: TabRoutable>(&self) -> Rc<TabRouter<T>> {
        match self.try_tab_router() {
            Ok(router) => router,
            Err(e) => panic!("main tab router precondition violated: {e}"),
        }
    }

    pub fn try_tab_router<T: TabRoutable>(&self) -> Result<Rc<TabRouter<T>>, RouterError> {
        let router = self.inner.main_tab_router.clone();
        let key = router.id().to_string();
        router
            .as_any()
            .downcast::<TabRouter<T>>()
            .map_err(|_| RouterError::TypeMismatch {
                key,
                expected: type_name::<TabRouter<T>>(),
            })
    }

    /// The base stack router at `index`, if it exists and routes `R`.
    pub fn base_router_at<R: Routable>(&self, index: usize) -> Option<Rc<StackRouter<R>>> {
        let router = self.inner.main_base_routers.get(index)?.clone();
        router.as_any().downcast::<StackRouter<R>>().ok()
    }

    /// The base stack router with id `key` (default `R::KEY`).
    pub fn base_router<R: Routable>(&self, key: Option<&str>) -> Option<Rc<StackRouter<R>>> {
        let key = key.unwrap_or(R::KEY);
        let router = self
            .inner
            .main_base_routers
            .iter()
            .find(|r| r.id() == key)?
            .clone();
        router.as_any().downcast::<StackRouter<R>>().ok()
    }

    /// Every base stack router routing `R`, in configuration order.
    pub fn base_routers<R: Routable>(&self) -> Vec<Rc<StackRouter<R>>> {
        self.inner
            .main_base_routers
            .iter()
            .filter_map(|r| r.clone().as_any().downcast::<StackRouter<R>>().ok())
            .collect()
    }

    /// True for the main tab router and the base routers.
    pub fn is_base(&self, key: &str) -> bool {
        self.inner.main_tab_router.id() == key
            || self.inner.main_base_routers.iter().any(|r| r.id() == key)
    }

    // ========================================================================
    // Global operations
    // ========================================================================

    /// Forgets every router that is not a base router. Evicted routers are
    /// not reset; tearing down their screens is up to the rendering side.
    pub fn reset_all_navigation(&self) {
        let evicted: Vec<Rc<dyn ManagedRouter>> = {
            let mut routers = self.inner.routers.borrow_mut();
            let keys: Vec<String> = routers
                .keys()
                .filter(|key| !self.is_base(key))
                .cloned()
                .collect();
            keys.iter().filter_map(|key| routers.remove(key)).collect()
        };
        self.inner
            .presented_routers
            .borrow_mut()
            .retain(|id| !evicted.iter().any(|r| r.id() == id));

        info!("Reset all navigation: {} routers evicted", evicted.len());
        self.record(
            LogKind::Info,
            format!("Reset all navigation ({} routers evicted)", evicted.len()),
            "AppRouter",
        );
    }

    /// Resets the router under `key`. Silent when nothing is registered there.
    pub fn reset_navigation(&self, key: &str) {
        match self.get(key) {
            Some(router) => {
                debug!("Reset navigation for '{}'", key);
                router.reset();
            }
            None => debug!("Reset navigation for unknown router '{}' ignored", key),
        }
    }

    /// True if any base or registered router shows stacked or modal content.
    pub fn is_presenting(&self) -> bool {
        self.inner.main_base_routers.iter().any(|r| r.is_presenting())
            || self.inner.routers.borrow().values().any(|r| r.is_presenting())
    }

    pub fn is_presenting_key(&self, key: &str) -> bool {
        self.get(key).is_some_and(|router| router.is_presenting())
    }

    /// Closes the modal content of the topmost presenting router.
    pub fn dismiss_top(&self) {
        let top = self.inner.presented_routers.borrow_mut().pop();
        let Some(id) = top else {
            debug!("Dismiss top with no presented routers ignored");
            return;
        };
        match self.get(&id) {
            Some(router) => {
                info!("Dismiss top: {}", id);
                router.dismiss_presented();
            }
            None => {
                warn!("Dismiss top: router '{}' is no longer registered", id);
                self.record(
                    LogKind::Warning,
                    format!("Dismiss top skipped, '{id}' is no longer registered"),
                    &id,
                );
            }
        }
    }

    /// Ids of presenting routers, bottom first.
    pub fn presented_routers(&self) -> Vec<String> {
        self.inner.presented_routers.borrow().clone()
    }

    /// Moves `id` to the top of the presented list.
    pub fn note_presented(&self, id: &str) {
        let mut presented = self.inner.presented_routers.borrow_mut();
        presented.retain(|existing| existing != id);
        presented.push(id.to_string());
    }

    pub fn forget_presented(&self, id: &str) {
        self.inner
            .presented_routers
            .borrow_mut()
            .retain(|existing| existing != id);
    }

    // ========================================================================
    // Debug recording
    // ========================================================================

    pub fn recorder(&self) -> Option<DebugRecorder> {
        self.inner.recorder.clone()
    }

    pub fn record(&self, kind: LogKind, message: String, router_id: &str) {
        if let Some(recorder) = &self.inner.recorder {
            recorder.record(kind, message, router_id);
        }
    }
}

impl fmt::Debug for AppRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppRouter")
            .field("routers", &self.registered_ids())
            .field("presented_routers", &self.presented_routers())
            .finish_non_exhaustive()
    }
}

fn key_of(error: &RouterError) -> String {
    match error {
        RouterError::NotFound { key }
        | RouterError::TypeMismatch { key, .. }
        | RouterError::DuplicateId { key } => key.clone(),
    }
}
