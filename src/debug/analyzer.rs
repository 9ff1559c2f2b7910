//! # Registry Analyzer
//!
//! Health checks over the live registry, for the debug dashboard.
//!
//! - **Orphaned router**: a non-base stack router that shows nothing and
//!   whose id is not the id of any route another router presents. Usually a
//!   modal closed without the surface firing the dismiss callback.
//! - **Stale presentation**: the presented-router list names an id that is
//!   no longer registered.
//! - **Too many routers**: more registered routers than the configured limit.

use std::collections::HashSet;

use log::debug;
use serde::Serialize;

use crate::core::{AppRouter, RouterKind};
use crate::debug::route::DEBUG_ROUTER_ID;

pub const DEFAULT_MAX_ACTIVE_ROUTERS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouterIssue {
    pub severity: IssueSeverity,
    pub title: String,
    pub description: String,
    pub recommendation: String,
}

pub struct Analyzer {
    max_active_routers: usize,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ACTIVE_ROUTERS)
    }
}

impl Analyzer {
    pub fn new(max_active_routers: usize) -> Self {
        Self { max_active_routers }
    }

    /// Runs every check. An empty result is reported as a single info issue.
    pub fn analyze(&self, app: &AppRouter) -> Vec<RouterIssue> {
        let snapshots = app.snapshot();
        let presented: HashSet<&str> = snapshots
            .iter()
            .flat_map(|snapshot| snapshot.presented_ids())
            .collect();

        let mut issues = Vec::new();

        for snapshot in &snapshots {
            let orphaned = snapshot.kind == RouterKind::Stack
                && !app.is_base(&snapshot.id)
                && snapshot.id != DEBUG_ROUTER_ID
                && !snapshot.is_presenting
                && !presented.contains(snapshot.id.as_str());
            if orphaned {
                issues.push(RouterIssue {
                    severity: IssueSeverity::Warning,
                    title: format!("Potential orphaned router: {}", snapshot.id),
                    description: "No router presents this one and it shows nothing itself."
                        .to_string(),
                    recommendation: "Dismiss it, or make sure the surface fires the dismiss \
                                     callback when its modal closes."
                        .to_string(),
                });
            }
        }

        for id in app.presented_routers() {
            if !app.contains(&id) {
                issues.push(RouterIssue {
                    severity: IssueSeverity::Error,
                    title: format!("Stale presentation entry: {id}"),
                    description: "The presented-router list names a router that is no longer \
                                  registered."
                        .to_string(),
                    recommendation: "Dismiss its modal content before unregistering it."
                        .to_string(),
                });
            }
        }

        if snapshots.len() > self.max_active_routers {
            issues.push(RouterIssue {
                severity: IssueSeverity::Warning,
                title: format!("High number of active routers: {}", snapshots.len()),
                description: "Many live routers make navigation state hard to follow."
                    .to_string(),
                recommendation: "Clean up routers that are no longer needed.".to_string(),
            });
        }

        if issues.is_empty() {
            issues.push(RouterIssue {
                severity: IssueSeverity::Info,
                title: "No issues found".to_string(),
                description: "The navigation system appears to be in good health.".to_string(),
                recommendation: String::new(),
            });
        }

        debug!("Analyzer found {} issues", issues.len());
        issues
    }
}
