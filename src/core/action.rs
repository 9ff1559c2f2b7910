//! # Navigation Actions
//!
//! Everything a stack router can be asked to do, as a value.
//! Feature code usually calls the router methods directly; actions exist so
//! scripted flows and the surface can describe a step before running it,
//! and so every step can be logged the same way.
//!
//! ```text
//! StackRouter + NavigationAction  →  apply()  →  new router state
//! ```

use std::fmt;

use crate::core::router::Routable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationAction<R: Routable> {
    Navigate(R),
    Back,
    ToRoot,
    PresentSheet(R),
    PresentFullScreen(R),
    DismissPresented,
    Reset,
    Dismiss,
}

impl<R: Routable> fmt::Display for NavigationAction<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationAction::Navigate(route) => write!(f, "navigate to {}", route.id()),
            NavigationAction::Back => write!(f, "navigate back"),
            NavigationAction::ToRoot => write!(f, "navigate to root"),
            NavigationAction::PresentSheet(route) => write!(f, "present sheet {}", route.id()),
            NavigationAction::PresentFullScreen(route) => {
                write!(f, "present full screen {}", route.id())
            }
            NavigationAction::DismissPresented => write!(f, "dismiss presented"),
            NavigationAction::Reset => write!(f, "reset"),
            NavigationAction::Dismiss => write!(f, "dismiss"),
        }
    }
}
