//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::rc::Rc;

use crate::core::{AppRouter, Routable, StackRouter, TabRoutable, TabRouter};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TestRoute {
    Detail(u32),
    Settings,
    /// A modal screen driven by the router registered under this id.
    Child(String),
}

impl Routable for TestRoute {
    const KEY: &'static str = "TestRoute";

    fn id(&self) -> String {
        match self {
            TestRoute::Detail(n) => format!("detail-{n}"),
            TestRoute::Settings => "settings".to_string(),
            TestRoute::Child(id) => id.clone(),
        }
    }
}

/// A second route family, for type-mismatch lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OtherRoute {
    Page,
}

impl Routable for OtherRoute {
    const KEY: &'static str = "OtherRoute";

    fn id(&self) -> String {
        "page".to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestTab {
    Home,
    Search,
    Profile,
}

impl TabRoutable for TestTab {
    const KEY: &'static str = "TestTab";

    fn all() -> &'static [Self] {
        &[TestTab::Home, TestTab::Search, TestTab::Profile]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OtherTab {
    Only,
}

impl TabRoutable for OtherTab {
    const KEY: &'static str = "OtherTab";

    fn all() -> &'static [Self] {
        &[OtherTab::Only]
    }
}

/// Creates a registry with a `TestTab` tab router and one base stack router
/// registered as `"home"`.
pub fn test_app() -> (AppRouter, Rc<TabRouter<TestTab>>, Rc<StackRouter<TestRoute>>) {
    let tabs = TabRouter::new(TestTab::Home);
    let home = StackRouter::<TestRoute>::with_id("home");
    let app = AppRouter::builder(tabs.clone())
        .base_router(home.clone())
        .build();
    (app, tabs, home)
}
