//! # Tab Router
//!
//! Holds the selected tab of a closed tab set. There is always exactly one
//! selected tab; `select()` replaces it without further checks because the
//! type already limits the possible values.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use log::debug;

use crate::core::app_router::{AppRouter, WeakAppRouter};
use crate::core::router::{
    DismissCallback, ManagedRouter, RouterKind, RouterSnapshot, TabRoutable,
};
use crate::debug::LogKind;

pub struct TabRouter<T: TabRoutable> {
    id: String,
    selected_tab: RefCell<T>,
    /// Kept for interface uniformity. Tab routers never ask to be removed.
    dismiss_callback: RefCell<Option<DismissCallback>>,
    app_router: RefCell<Option<WeakAppRouter>>,
}

impl<T: TabRoutable> TabRouter<T> {
    pub fn new(selected_tab: T) -> Rc<Self> {
        Self::with_id(selected_tab, T::KEY)
    }

    pub fn with_id(selected_tab: T, id: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            id: id.into(),
            selected_tab: RefCell::new(selected_tab),
            dismiss_callback: RefCell::new(None),
            app_router: RefCell::new(None),
        })
    }

    pub fn selected_tab(&self) -> T {
        self.selected_tab.borrow().clone()
    }

    pub fn select(&self, tab: T) {
        let message = format!("Select tab {tab:?}");
        *self.selected_tab.borrow_mut() = tab;
        debug!("[{}] {}", self.id, message);
        if let Some(app) = self.app_router() {
            app.record(LogKind::Navigation, message, &self.id);
        }
    }

    pub fn app_router(&self) -> Option<AppRouter> {
        self.app_router.borrow().as_ref().and_then(WeakAppRouter::upgrade)
    }

    /// Back to the first tab of the set. An empty set leaves the selection alone.
    fn select_first(&self) {
        if let Some(first) = T::all().first() {
            self.select(first.clone());
        }
    }
}

impl<T: TabRoutable> ManagedRouter for TabRouter<T> {
    fn type_key() -> &'static str {
        T::KEY
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> RouterKind {
        RouterKind::Tab
    }

    /// A tab router has no stacked or modal content of its own.
    fn is_presenting(&self) -> bool {
        false
    }

    fn reset(&self) {
        self.select_first();
    }

    /// Same as `reset()`. The main tab router is never unregistered, so the
    /// dismiss callback is not invoked.
    fn dismiss(&self) {
        self.select_first();
    }

    fn set_dismiss_callback(&self, callback: DismissCallback) {
        *self.dismiss_callback.borrow_mut() = Some(callback);
    }

    fn dismiss_callback(&self) -> Option<DismissCallback> {
        self.dismiss_callback.borrow().clone()
    }

    fn attach(&self, app_router: WeakAppRouter) {
        *self.app_router.borrow_mut() = Some(app_router);
    }

    fn snapshot(&self) -> RouterSnapshot {
        RouterSnapshot {
            id: self.id.clone(),
            kind: RouterKind::Tab,
            stack: Vec::new(),
            sheet: None,
            full_screen: None,
            selected_tab: Some(format!("{:?}", self.selected_tab.borrow())),
            is_presenting: false,
        }
    }

    fn as_any(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}
