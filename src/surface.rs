//! # Navigation Surface
//!
//! The rendering-side binding for one [`StackRouter`]. A real front end
//! reads the router's fields to decide what to draw and writes them back
//! when the user navigates with gestures (back swipe, sheet swipe-down).
//!
//! The surface remembers the last values it saw. `sync()` compares them with
//! the router's current state, like a view reacting to a changed binding,
//! and when a sheet or full-screen route goes from shown to absent it calls
//! the router's dismiss callback with **that route's id**. Modal routes carry
//! the id of the router that drives the presented screen, so this is what
//! unregisters child routers.
//!
//! Closing a modal through `dismiss_presented()` and then syncing, or through
//! `user_dismissed_sheet()`, ends in the same registry state.

use std::rc::Rc;

use log::debug;

use crate::core::{ManagedRouter, Routable, StackRouter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceChange<R: Routable> {
    StackChanged { from: usize, to: usize },
    SheetPresented(R),
    SheetDismissed(R),
    FullScreenPresented(R),
    FullScreenDismissed(R),
}

pub struct NavigationSurface<R: Routable> {
    router: Rc<StackRouter<R>>,
    observed_depth: usize,
    observed_sheet: Option<R>,
    observed_full_screen: Option<R>,
}

impl<R: Routable> NavigationSurface<R> {
    pub fn new(router: Rc<StackRouter<R>>) -> Self {
        Self {
            observed_depth: router.depth(),
            observed_sheet: router.presenting_sheet(),
            observed_full_screen: router.presenting_full_screen(),
            router,
        }
    }

    pub fn router(&self) -> &Rc<StackRouter<R>> {
        &self.router
    }

    /// Reacts to everything that changed since the last sync.
    pub fn sync(&mut self) -> Vec<SurfaceChange<R>> {
        let mut changes = Vec::new();

        let depth = self.router.depth();
        if depth != self.observed_depth {
            changes.push(SurfaceChange::StackChanged {
                from: self.observed_depth,
                to: depth,
            });
            self.observed_depth = depth;
        }

        let sheet = self.router.presenting_sheet();
        if sheet != self.observed_sheet {
            let previous = std::mem::replace(&mut self.observed_sheet, sheet.clone());
            match (previous, sheet) {
                (_, Some(route)) => changes.push(SurfaceChange::SheetPresented(route)),
                (Some(route), None) => {
                    self.notify_dismissed(&route);
                    changes.push(SurfaceChange::SheetDismissed(route));
                }
                (None, None) => {}
            }
        }

        let full_screen = self.router.presenting_full_screen();
        if full_screen != self.observed_full_screen {
            let previous = std::mem::replace(&mut self.observed_full_screen, full_screen.clone());
            match (previous, full_screen) {
                (_, Some(route)) => changes.push(SurfaceChange::FullScreenPresented(route)),
                (Some(route), None) => {
                    self.notify_dismissed(&route);
                    changes.push(SurfaceChange::FullScreenDismissed(route));
                }
                (None, None) => {}
            }
        }

        changes
    }

    /// The user swiped the sheet away.
    pub fn user_dismissed_sheet(&mut self) -> Vec<SurfaceChange<R>> {
        self.router.set_presenting_sheet(None);
        self.sync()
    }

    /// The full-screen cover was closed from inside its own screen.
    pub fn user_dismissed_full_screen(&mut self) -> Vec<SurfaceChange<R>> {
        self.router.set_presenting_full_screen(None);
        self.sync()
    }

    /// Back gesture or back button to `depth` routes.
    pub fn pop_to(&mut self, depth: usize) -> Vec<SurfaceChange<R>> {
        let mut stack = self.router.stack();
        stack.truncate(depth);
        self.router.set_stack(stack);
        self.sync()
    }

    fn notify_dismissed(&self, route: &R) {
        let id = route.id();
        match self.router.dismiss_callback() {
            Some(callback) => {
                debug!("[{}] Presented route {} closed", self.router.id(), id);
                callback(&id);
            }
            None => debug!(
                "[{}] Presented route {} closed, router not registered",
                self.router.id(),
                id
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{TestRoute, test_app};

    #[test]
    fn test_sync_reports_changes() {
        let (_, _, home) = test_app();
        let mut surface = NavigationSurface::new(home.clone());
        assert!(surface.sync().is_empty());

        home.navigate(TestRoute::Detail(1));
        home.present_sheet(TestRoute::Settings);
        assert_eq!(
            surface.sync(),
            vec![
                SurfaceChange::StackChanged { from: 0, to: 1 },
                SurfaceChange::SheetPresented(TestRoute::Settings),
            ]
        );
        assert!(surface.sync().is_empty());
    }

    #[test]
    fn test_user_dismiss_unregisters_child() {
        let (app, _, home) = test_app();
        app.register(StackRouter::<TestRoute>::with_id("child"));
        app.register(StackRouter::<TestRoute>::with_id("sibling"));
        home.present_sheet(TestRoute::Child("child".into()));
        let mut surface = NavigationSurface::new(home.clone());

        let changes = surface.user_dismissed_sheet();

        assert_eq!(
            changes,
            vec![SurfaceChange::SheetDismissed(TestRoute::Child("child".into()))]
        );
        assert!(!app.contains("child"));
        assert!(app.contains("sibling"));
        assert!(app.contains("home"));
        assert!(app.presented_routers().is_empty());
    }

    #[test]
    fn test_api_and_surface_dismissal_agree() {
        let run = |use_surface: bool| {
            let (app, _, home) = test_app();
            app.register(StackRouter::<TestRoute>::with_id("child"));
            home.present_full_screen(TestRoute::Child("child".into()));
            let mut surface = NavigationSurface::new(home.clone());
            if use_surface {
                surface.user_dismissed_full_screen();
            } else {
                home.dismiss_presented();
                surface.sync();
            }
            (app.registered_ids(), app.presented_routers(), home.is_presenting())
        };
        assert_eq!(run(true), run(false));
        assert_eq!(run(true).0, vec!["TestTab".to_string(), "home".to_string()]);
    }

    #[test]
    fn test_replacing_sheet_does_not_fire_callback() {
        let (app, _, home) = test_app();
        app.register(StackRouter::<TestRoute>::with_id("first"));
        home.present_sheet(TestRoute::Child("first".into()));
        let mut surface = NavigationSurface::new(home.clone());

        home.present_sheet(TestRoute::Child("second".into()));
        surface.sync();

        assert!(app.contains("first"));
    }

    #[test]
    fn test_pop_to_truncates_stack() {
        let (_, _, home) = test_app();
        for n in 0..4 {
            home.navigate(TestRoute::Detail(n));
        }
        let mut surface = NavigationSurface::new(home.clone());
        let changes = surface.pop_to(1);
        assert_eq!(changes, vec![SurfaceChange::StackChanged { from: 4, to: 1 }]);
        assert_eq!(home.stack(), vec![TestRoute::Detail(0)]);
    }

    #[test]
    fn test_unregistered_router_dismiss_is_quiet() {
        let router = StackRouter::<TestRoute>::new();
        router.present_sheet(TestRoute::Settings);
        let mut surface = NavigationSurface::new(router.clone());
        let changes = surface.user_dismissed_sheet();
        assert_eq!(changes, vec![SurfaceChange::SheetDismissed(TestRoute::Settings)]);
    }
}
