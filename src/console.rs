//! # Console Dashboard
//!
//! Drives the demo binary: builds an app with a main tab router and a home
//! stack router, runs the selected scripted flow against it, then prints
//! what the debug dashboard would show.

use std::fs;
use std::path::{Path, PathBuf};

use log::{error, info};

use crate::Flow;
use crate::core::config::ResolvedConfig;
use crate::core::{AppRouter, Routable, StackRouter, TabRoutable, TabRouter};
use crate::debug::flow::{self, FlowIds, FlowRunner, FlowTiming, registered_routers_report};
use crate::debug::visualizer::{hierarchy, render_tree};
use crate::debug::{Analyzer, DebugRecorder, Feature, ensure_debug_router};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DemoTab {
    Home,
    Library,
    Settings,
}

impl TabRoutable for DemoTab {
    const KEY: &'static str = "DemoTab";

    fn all() -> &'static [Self] {
        &[DemoTab::Home, DemoTab::Library, DemoTab::Settings]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HomeRoute {
    Detail(u32),
    Profile,
}

impl Routable for HomeRoute {
    const KEY: &'static str = "HomeRoute";

    fn id(&self) -> String {
        match self {
            HomeRoute::Detail(n) => format!("detail-{n}"),
            HomeRoute::Profile => "profile".to_string(),
        }
    }
}

pub const HOME_ROUTER_ID: &str = "home";

const RECENT_EVENTS: usize = 10;

/// The registry the demo runs against, with the debug router registered.
pub fn build_app(config: &ResolvedConfig) -> AppRouter {
    let recorder = DebugRecorder::new(config.log_capacity);
    if !config.debug_enabled {
        recorder.disable();
    }

    let app = AppRouter::builder(TabRouter::new(DemoTab::Home))
        .base_router(StackRouter::<HomeRoute>::with_id(HOME_ROUTER_ID))
        .recorder(recorder)
        .strict_registration(config.strict_registration)
        .build();
    ensure_debug_router(&app);
    app
}

fn flows_for(selected: Flow, ids: &FlowIds, timing: FlowTiming) -> Vec<Vec<flow::FlowStep>> {
    match selected {
        Flow::Complex => vec![flow::complex_flow(ids, timing)],
        Flow::Reset => vec![flow::complex_flow(ids, timing), flow::reset_flow(timing)],
        Flow::Dismiss => vec![flow::complex_flow(ids, timing), flow::dismiss_flow(ids, timing)],
        Flow::All => vec![
            flow::complex_flow(ids, timing),
            flow::dismiss_flow(ids, timing),
            flow::reset_flow(timing),
        ],
        Flow::FeatureA => vec![flow::present_feature_flow(Feature::A)],
        Flow::FeatureB => vec![flow::present_feature_flow(Feature::B)],
    }
}

/// Runs `flow` and returns the runner, whose messages are newest first.
pub async fn run_flow(app: &AppRouter, selected: Flow, timing: FlowTiming) -> FlowRunner {
    let ids = FlowIds::random();
    info!(
        "Running {:?} flow with routers {} and {}",
        selected, ids.feature_a, ids.feature_b
    );

    let mut runner = FlowRunner::new(app.clone());
    for steps in flows_for(selected, &ids, timing) {
        runner.run(steps).await;
    }
    runner
}

/// The dashboard text: flow messages, registry contents, hierarchy and
/// analyzer findings.
pub fn report(app: &AppRouter, runner: &FlowRunner, max_active_routers: usize) -> String {
    let mut out = String::new();

    out.push_str("Flow\n");
    for message in runner.messages().iter().rev() {
        out.push_str(&format!("  {message}\n"));
    }

    out.push('\n');
    for line in registered_routers_report(app) {
        out.push_str(&line);
        out.push('\n');
    }

    out.push_str("\nHierarchy\n");
    out.push_str(&render_tree(&hierarchy(app)));

    out.push_str("\nAnalysis\n");
    for issue in Analyzer::new(max_active_routers).analyze(app) {
        out.push_str(&format!(
            "  [{:?}] {}: {}\n",
            issue.severity, issue.title, issue.description
        ));
        if !issue.recommendation.is_empty() {
            out.push_str(&format!("      {}\n", issue.recommendation));
        }
    }

    if let Some(recorder) = app.recorder() {
        out.push_str(&format!("\nRecent events ({} recorded)\n", recorder.len()));
        for entry in recorder.entries().iter().take(RECENT_EVENTS).rev() {
            out.push_str(&format!(
                "  {} {} {:<12} {}: {}\n",
                entry.formatted_timestamp(),
                entry.kind.icon(),
                entry.kind.label(),
                entry.router_id,
                entry.message
            ));
        }
    }
    out
}

/// Writes the recorder's entries as JSON.
pub fn export_log(app: &AppRouter, path: &Path) -> std::io::Result<()> {
    let Some(recorder) = app.recorder() else {
        return Ok(());
    };
    let json = recorder
        .export_json()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    fs::write(path, json)?;
    info!("Exported {} log entries to {}", recorder.len(), path.display());
    Ok(())
}

pub async fn run(
    selected: Flow,
    config: ResolvedConfig,
    export: Option<PathBuf>,
) -> std::io::Result<()> {
    let app = build_app(&config);
    let timing = FlowTiming::from_step_delay_ms(config.step_delay_ms);

    let runner = run_flow(&app, selected, timing).await;
    println!("{}", report(&app, &runner, config.max_active_routers));

    if let Some(path) = export {
        if let Err(e) = export_log(&app, &path) {
            error!("Failed to export log to {}: {}", path.display(), e);
            return Err(e);
        }
        println!("Log exported to {}", path.display());
    }

    info!("Demo finished with {} registered routers", app.len());
    Ok(())
}
