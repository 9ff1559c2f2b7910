//! # Debug Routes
//!
//! Two synthetic features used to exercise the registry from the debug
//! tooling. Each route carries the id of the router that drives its screen,
//! the id of the router that opened it, and its nesting level.

use std::fmt;
use std::rc::Rc;

use log::debug;

use crate::core::{AppRouter, Routable, StackRouter};

/// Id of the router the debug tooling presents its flows from.
pub const DEBUG_ROUTER_ID: &str = "routerDebug";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    A,
    B,
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feature::A => write!(f, "Feature A"),
            Feature::B => write!(f, "Feature B"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DebugRoute {
    FeatureA {
        id: String,
        previous_id: String,
        level: u32,
    },
    FeatureB {
        id: String,
        previous_id: String,
        level: u32,
    },
}

impl DebugRoute {
    pub fn new(feature: Feature, id: &str, previous_id: &str, level: u32) -> Self {
        let (id, previous_id) = (id.to_string(), previous_id.to_string());
        match feature {
            Feature::A => DebugRoute::FeatureA {
                id,
                previous_id,
                level,
            },
            Feature::B => DebugRoute::FeatureB {
                id,
                previous_id,
                level,
            },
        }
    }

    pub fn feature(&self) -> Feature {
        match self {
            DebugRoute::FeatureA { .. } => Feature::A,
            DebugRoute::FeatureB { .. } => Feature::B,
        }
    }

    pub fn previous_id(&self) -> &str {
        match self {
            DebugRoute::FeatureA { previous_id, .. } | DebugRoute::FeatureB { previous_id, .. } => {
                previous_id
            }
        }
    }

    pub fn level(&self) -> u32 {
        match self {
            DebugRoute::FeatureA { level, .. } | DebugRoute::FeatureB { level, .. } => *level,
        }
    }
}

impl Routable for DebugRoute {
    const KEY: &'static str = "RouterDebugRoute";

    fn id(&self) -> String {
        match self {
            DebugRoute::FeatureA { id, .. } | DebugRoute::FeatureB { id, .. } => id.clone(),
        }
    }
}

/// Returns the debug router, registering it first if needed.
pub fn ensure_debug_router(app: &AppRouter) -> Rc<StackRouter<DebugRoute>> {
    if let Some(router) = app.router::<StackRouter<DebugRoute>>(Some(DEBUG_ROUTER_ID)) {
        debug!("Debug router already registered");
        return router;
    }
    let router = StackRouter::<DebugRoute>::with_id(DEBUG_ROUTER_ID);
    app.register(router.clone());
    debug!("Debug router registered");
    router
}
