//! # Stack Router
//!
//! Push navigation plus two modal slots for one route family.
//!
//! ```text
//! StackRouter<R>
//! ├── stack: Vec<R>                  // push/pop at the tail only
//! ├── presenting_sheet: Option<R>    // swipe-dismissible modal
//! ├── presenting_full_screen: Option<R>
//! ├── dismiss_callback               // injected by AppRouter::register
//! └── app_router: WeakAppRouter      // back-reference, never owning
//! ```
//!
//! The three slots are independent state machines. Only `reset()` touches
//! more than one of them.
//!
//! Fields sit behind `RefCell` because routers are shared (`Rc`) between the
//! registry, the surface and feature code on a single thread. No borrow is
//! held while calling out to the registry or a callback.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use log::debug;

use crate::core::action::NavigationAction;
use crate::core::app_router::{AppRouter, WeakAppRouter};
use crate::core::router::{
    DismissCallback, ManagedRouter, Routable, RouterKind, RouterSnapshot,
};
use crate::debug::LogKind;

pub struct StackRouter<R: Routable> {
    id: String,
    stack: RefCell<Vec<R>>,
    presenting_sheet: RefCell<Option<R>>,
    presenting_full_screen: RefCell<Option<R>>,
    dismiss_callback: RefCell<Option<DismissCallback>>,
    app_router: RefCell<Option<WeakAppRouter>>,
}

impl<R: Routable> StackRouter<R> {
    /// A router registered under the route family's key.
    pub fn new() -> Rc<Self> {
        Self::with_id(R::KEY)
    }

    /// A router with a custom id, for running several instances of one
    /// route family side by side.
    pub fn with_id(id: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            id: id.into(),
            stack: RefCell::new(Vec::new()),
            presenting_sheet: RefCell::new(None),
            presenting_full_screen: RefCell::new(None),
            dismiss_callback: RefCell::new(None),
            app_router: RefCell::new(None),
        })
    }

    // ── Stack ───────────────────────────────────────────────────────────────

    pub fn navigate(&self, route: R) {
        let message = format!("Navigate to {}", route.id());
        let depth = {
            let mut stack = self.stack.borrow_mut();
            stack.push(route);
            stack.len()
        };
        debug!("[{}] {} (depth={})", self.id, message, depth);
        self.record(LogKind::Navigation, message);
    }

    /// Pops the top route. No-op on an empty stack.
    pub fn navigate_back(&self) {
        let popped = self.stack.borrow_mut().pop();
        match popped {
            Some(route) => {
                debug!("[{}] Navigate back from {}", self.id, route.id());
                self.record(LogKind::Navigation, format!("Navigate back from {}", route.id()));
            }
            None => debug!("[{}] Navigate back on empty stack ignored", self.id),
        }
    }

    pub fn navigate_to_root(&self) {
        let cleared = std::mem::take(&mut *self.stack.borrow_mut());
        if !cleared.is_empty() {
            debug!("[{}] Navigate to root ({} routes cleared)", self.id, cleared.len());
            self.record(LogKind::Navigation, "Navigate to root".to_string());
        }
    }

    // ── Presentation ────────────────────────────────────────────────────────

    /// Shows `route` as a sheet, replacing any sheet already shown.
    pub fn present_sheet(&self, route: R) {
        let message = format!("Present sheet {}", route.id());
        *self.presenting_sheet.borrow_mut() = Some(route);
        debug!("[{}] {}", self.id, message);
        self.record(LogKind::Presentation, message);
        self.track_presentation();
    }

    /// Shows `route` full screen, replacing any full-screen route already shown.
    pub fn present_full_screen(&self, route: R) {
        let message = format!("Present full screen {}", route.id());
        *self.presenting_full_screen.borrow_mut() = Some(route);
        debug!("[{}] {}", self.id, message);
        self.record(LogKind::Presentation, message);
        self.track_presentation();
    }

    /// Clears both modal slots. No-op when nothing is presented.
    pub fn dismiss_presented(&self) {
        let sheet = self.presenting_sheet.borrow_mut().take();
        let full_screen = self.presenting_full_screen.borrow_mut().take();
        if sheet.is_none() && full_screen.is_none() {
            debug!("[{}] Dismiss presented with nothing presented ignored", self.id);
            return;
        }
        for route in sheet.iter().chain(full_screen.iter()) {
            debug!("[{}] Dismiss presented {}", self.id, route.id());
            self.record(LogKind::Dismissal, format!("Dismiss presented {}", route.id()));
        }
        self.track_presentation();
    }

    /// Runs one action against this router.
    pub fn apply(&self, action: NavigationAction<R>) {
        match action {
            NavigationAction::Navigate(route) => self.navigate(route),
            NavigationAction::Back => self.navigate_back(),
            NavigationAction::ToRoot => self.navigate_to_root(),
            NavigationAction::PresentSheet(route) => self.present_sheet(route),
            NavigationAction::PresentFullScreen(route) => self.present_full_screen(route),
            NavigationAction::DismissPresented => self.dismiss_presented(),
            NavigationAction::Reset => ManagedRouter::reset(self),
            NavigationAction::Dismiss => ManagedRouter::dismiss(self),
        }
    }

    // ── Bindings ────────────────────────────────────────────────────────────
    //
    // Read/write access for the rendering side. Setters do not fire the
    // dismiss callback; the surface does that when it observes the change.

    pub fn stack(&self) -> Vec<R> {
        self.stack.borrow().clone()
    }

    pub fn depth(&self) -> usize {
        self.stack.borrow().len()
    }

    pub fn presenting_sheet(&self) -> Option<R> {
        self.presenting_sheet.borrow().clone()
    }

    pub fn presenting_full_screen(&self) -> Option<R> {
        self.presenting_full_screen.borrow().clone()
    }

    pub fn set_stack(&self, stack: Vec<R>) {
        *self.stack.borrow_mut() = stack;
    }

    pub fn set_presenting_sheet(&self, route: Option<R>) {
        *self.presenting_sheet.borrow_mut() = route;
        self.track_presentation();
    }

    pub fn set_presenting_full_screen(&self, route: Option<R>) {
        *self.presenting_full_screen.borrow_mut() = route;
        self.track_presentation();
    }

    /// The registry this router was registered with, if it is still alive.
    pub fn app_router(&self) -> Option<AppRouter> {
        self.app_router.borrow().as_ref().and_then(WeakAppRouter::upgrade)
    }

    fn record(&self, kind: LogKind, message: String) {
        if let Some(app) = self.app_router() {
            app.record(kind, message, &self.id);
        }
    }

    /// Keeps the registry's presented-router list in step with the modal
    /// slots: a shown modal moves this router on top, none removes it.
    fn track_presentation(&self) {
        let Some(app) = self.app_router() else {
            return;
        };
        let presenting = self.presenting_sheet.borrow().is_some()
            || self.presenting_full_screen.borrow().is_some();
        if presenting {
            app.note_presented(&self.id);
        } else {
            app.forget_presented(&self.id);
        }
    }
}

impl<R: Routable> ManagedRouter for StackRouter<R> {
    fn type_key() -> &'static str {
        R::KEY
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> RouterKind {
        RouterKind::Stack
    }

    fn is_presenting(&self) -> bool {
        self.presenting_sheet.borrow().is_some()
            || self.presenting_full_screen.borrow().is_some()
            || !self.stack.borrow().is_empty()
    }

    fn reset(&self) {
        self.navigate_to_root();
        StackRouter::dismiss_presented(self);
    }

    fn dismiss(&self) {
        self.navigate_to_root();
        let callback = self.dismiss_callback.borrow().clone();
        match callback {
            Some(callback) => callback(&self.id),
            None => debug!("[{}] Dismiss without a registry, nothing to notify", self.id),
        }
    }

    fn dismiss_presented(&self) {
        StackRouter::dismiss_presented(self);
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
            kind: RouterKind::Stack,
            stack: self.stack.borrow().iter().map(Routable::id).collect(),
            sheet: self.presenting_sheet.borrow().as_ref().map(Routable::id),
            full_screen: self.presenting_full_screen.borrow().as_ref().map(Routable::id),
            selected_tab: None,
            is_presenting: self.is_presenting(),
        }
    }

    fn as_any(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}
