//! # Router Capability
//!
//! The contract every router satisfies to live inside the [`AppRouter`]
//! registry. Stack routers and tab routers are different concrete types,
//! so the registry stores them as `Rc<dyn ManagedRouter>` and recovers the
//! concrete type with a checked downcast on lookup.
//!
//! ```text
//! ManagedRouter
//! ├── id()                    // unique within the registry
//! ├── is_presenting()         // stacked or modal content on screen
//! ├── reset()                 // back to baseline, stays registered
//! ├── dismiss()               // back to baseline + ask to be forgotten
//! ├── set_dismiss_callback()  // slot filled by AppRouter::register
//! └── attach()                // non-owning back-reference to the registry
//! ```
//!
//! [`AppRouter`]: crate::core::app_router::AppRouter

use std::any::Any;
use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;

use serde::Serialize;

use crate::core::app_router::WeakAppRouter;

/// Injected by the registry at registration time. Called with the id of the
/// router that should be removed from the registry.
pub type DismissCallback = Rc<dyn Fn(&str)>;

/// A destination for a [`StackRouter`](crate::core::stack::StackRouter).
///
/// `KEY` names the route family and doubles as the default router id.
/// `id()` identifies a single value; for modal routes it is the id of the
/// router that drives the presented screen, which is how the surface knows
/// what to unregister when the modal closes.
pub trait Routable: Clone + Eq + Hash + Debug + 'static {
    const KEY: &'static str;

    fn id(&self) -> String;
}

/// A tab family for a [`TabRouter`](crate::core::tab::TabRouter).
///
/// The set of tabs is closed; `all()` lists it in display order.
pub trait TabRoutable: Clone + Eq + Hash + Debug + 'static {
    const KEY: &'static str;

    fn all() -> &'static [Self];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RouterKind {
    Stack,
    Tab,
}

impl RouterKind {
    pub fn label(&self) -> &'static str {
        match self {
            RouterKind::Stack => "stack",
            RouterKind::Tab => "tab",
        }
    }
}

/// Point-in-time view of a router, used by the debug tooling.
///
/// Route values are reduced to their ids so snapshots of different route
/// families can sit in one list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouterSnapshot {
    pub id: String,
    pub kind: RouterKind,
    pub stack: Vec<String>,
    pub sheet: Option<String>,
    pub full_screen: Option<String>,
    pub selected_tab: Option<String>,
    pub is_presenting: bool,
}

impl RouterSnapshot {
    /// Ids of the routes this router currently shows modally.
    pub fn presented_ids(&self) -> impl Iterator<Item = &str> {
        self.sheet
            .iter()
            .chain(self.full_screen.iter())
            .map(String::as_str)
    }
}

pub trait ManagedRouter: Any {
    /// Default id for routers of this type: the route family's key.
    fn type_key() -> &'static str
    where
        Self: Sized;

    fn id(&self) -> &str;

    fn kind(&self) -> RouterKind;

    /// True while the router shows stacked or modal content.
    fn is_presenting(&self) -> bool;

    /// Clears navigation state. Does not unregister.
    fn reset(&self);

    /// Clears navigation state and asks the registry to forget this router.
    fn dismiss(&self);

    /// Closes whatever modal content the router shows. Routers without
    /// modal slots ignore it.
    fn dismiss_presented(&self) {}

    fn set_dismiss_callback(&self, callback: DismissCallback);

    fn dismiss_callback(&self) -> Option<DismissCallback>;

    /// Stores a non-owning handle to the registry the router was added to.
    fn attach(&self, _app_router: WeakAppRouter) {}

    fn snapshot(&self) -> RouterSnapshot;

    fn as_any(self: Rc<Self>) -> Rc<dyn Any>;
}
