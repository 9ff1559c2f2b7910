//! # Scripted Flows
//!
//! Multi-step navigation scripts used to exercise the registry by hand.
//!
//! A flow is a list of [`FlowStep`]s. The runner waits each step's delay on
//! the current (single) thread, then runs it. Steps capture router *ids*,
//! never routers: each step looks its routers up again when it fires and is
//! skipped, with a warning, if one has been torn down in the meantime.
//!
//! ```text
//! step 1 ──delay──▶ step 2 ──delay──▶ step 3 ...
//!   │                 │
//!   └─ lookup ids ────┴─ missing? → Skipped + LogKind::Warning
//! ```

use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use log::{info, warn};

use crate::core::{AppRouter, ManagedRouter, NavigationAction, StackRouter};
use crate::debug::LogKind;
use crate::debug::route::{DEBUG_ROUTER_ID, DebugRoute, Feature};
use crate::surface::NavigationSurface;

/// Lines kept by a runner's on-screen message list.
const MAX_FLOW_MESSAGES: usize = 100;

pub const DEFAULT_STEP_DELAY_MS: u64 = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Completed(Vec<String>),
    Skipped(String),
}

type StepAction = Box<dyn FnOnce(&AppRouter) -> StepOutcome>;

pub struct FlowStep {
    pub delay: Duration,
    action: StepAction,
}

impl FlowStep {
    pub fn new(delay: Duration, action: impl FnOnce(&AppRouter) -> StepOutcome + 'static) -> Self {
        Self {
            delay,
            action: Box::new(action),
        }
    }
}

/// Delay units for flows. `short` separates setup steps, `long` separates
/// visible navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowTiming {
    pub short: Duration,
    pub long: Duration,
}

impl FlowTiming {
    pub fn from_step_delay_ms(step_delay_ms: u64) -> Self {
        Self {
            short: Duration::from_millis(step_delay_ms),
            long: Duration::from_millis(step_delay_ms.saturating_mul(2)),
        }
    }

    pub fn immediate() -> Self {
        Self::from_step_delay_ms(0)
    }
}

impl Default for FlowTiming {
    fn default() -> Self {
        Self::from_step_delay_ms(DEFAULT_STEP_DELAY_MS)
    }
}

/// Ids used by the feature flows. `base_id` keeps concurrent runs apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowIds {
    pub feature_a: String,
    pub feature_b: String,
}

impl FlowIds {
    pub fn new(base_id: &str) -> Self {
        Self {
            feature_a: format!("routerFeatureA-{base_id}-1"),
            feature_b: format!("routerFeatureB-{base_id}-1"),
        }
    }

    /// Four characters of a fresh UUID.
    pub fn random() -> Self {
        Self::new(&short_uuid())
    }
}

fn short_uuid() -> String {
    let mut uuid = uuid::Uuid::new_v4().simple().to_string().to_uppercase();
    uuid.truncate(4);
    uuid
}

pub struct FlowRunner {
    app: AppRouter,
    messages: VecDeque<String>,
}

impl FlowRunner {
    pub fn new(app: AppRouter) -> Self {
        Self {
            app,
            messages: VecDeque::new(),
        }
    }

    /// Runs the steps in order, sleeping before each one.
    pub async fn run(&mut self, steps: Vec<FlowStep>) {
        for (index, step) in steps.into_iter().enumerate() {
            if !step.delay.is_zero() {
                tokio::time::sleep(step.delay).await;
            }
            self.execute(index + 1, step);
        }
    }

    /// Runs the steps in order without waiting.
    pub fn run_now(&mut self, steps: Vec<FlowStep>) {
        for (index, step) in steps.into_iter().enumerate() {
            self.execute(index + 1, step);
        }
    }

    fn execute(&mut self, number: usize, step: FlowStep) {
        match (step.action)(&self.app) {
            StepOutcome::Completed(lines) => {
                for line in lines {
                    info!("Flow step {}: {}", number, line);
                    self.app.record(LogKind::Info, line.clone(), DEBUG_ROUTER_ID);
                    self.push_message(line);
                }
            }
            StepOutcome::Skipped(reason) => {
                let line = format!("Step {number} skipped: {reason}");
                warn!("{}", line);
                self.app.record(LogKind::Warning, line.clone(), DEBUG_ROUTER_ID);
                self.push_message(line);
            }
        }
    }

    fn push_message(&mut self, message: String) {
        self.messages.push_front(message);
        self.messages.truncate(MAX_FLOW_MESSAGES);
    }

    /// Messages, newest first.
    pub fn messages(&self) -> Vec<String> {
        self.messages.iter().cloned().collect()
    }

    pub fn app(&self) -> &AppRouter {
        &self.app
    }
}

// ============================================================================
// Step helpers
// ============================================================================

fn lookup(app: &AppRouter, id: &str) -> Result<Rc<StackRouter<DebugRoute>>, String> {
    app.router::<StackRouter<DebugRoute>>(Some(id))
        .ok_or_else(|| format!("router {id} is no longer registered"))
}

fn register_step(delay: Duration, id: String, feature: Feature, number: usize) -> FlowStep {
    FlowStep::new(delay, move |app| {
        app.register(StackRouter::<DebugRoute>::with_id(id.clone()));
        StepOutcome::Completed(vec![format!(
            "Flow: Step {number} - Router for {feature} created ({id})"
        )])
    })
}

fn action_step(
    delay: Duration,
    router_id: String,
    action: NavigationAction<DebugRoute>,
    message: String,
) -> FlowStep {
    FlowStep::new(delay, move |app| match lookup(app, &router_id) {
        Ok(router) => {
            router.apply(action);
            StepOutcome::Completed(vec![message])
        }
        Err(reason) => StepOutcome::Skipped(reason),
    })
}

/// A step that logs the registered routers.
pub fn list_routers_step(delay: Duration) -> FlowStep {
    FlowStep::new(delay, |app| StepOutcome::Completed(registered_routers_report(app)))
}

pub fn registered_routers_report(app: &AppRouter) -> Vec<String> {
    let ids = app.registered_ids();
    let mut lines = vec![format!("=== Registered Routers ({}) ===", ids.len())];
    lines.extend(ids.into_iter().map(|id| format!("- {id}")));
    lines.push("===================================".to_string());
    lines
}

// ============================================================================
// Flows
// ============================================================================

/// Two nested features, each driven by its own router:
/// the debug router presents A, A navigates twice, A presents B, B
/// navigates twice.
pub fn complex_flow(ids: &FlowIds, timing: FlowTiming) -> Vec<FlowStep> {
    let a = ids.feature_a.clone();
    let b = ids.feature_b.clone();
    let feature_a = |level| DebugRoute::new(Feature::A, &a, DEBUG_ROUTER_ID, level);
    let feature_b = |level| DebugRoute::new(Feature::B, &b, &a, level);

    vec![
        register_step(Duration::ZERO, a.clone(), Feature::A, 1),
        action_step(
            timing.short,
            DEBUG_ROUTER_ID.to_string(),
            NavigationAction::PresentSheet(feature_a(1)),
            "Flow: Step 2 - Feature A presented as sheet".to_string(),
        ),
        action_step(
            timing.long,
            a.clone(),
            NavigationAction::Navigate(feature_a(2)),
            "Flow: Step 3 - Navigation within Feature A (Level 2)".to_string(),
        ),
        action_step(
            timing.long,
            a.clone(),
            NavigationAction::Navigate(feature_a(3)),
            "Flow: Step 4 - Navigation within Feature A (Level 3)".to_string(),
        ),
        register_step(timing.long, b.clone(), Feature::B, 5),
        action_step(
            timing.short,
            a.clone(),
            NavigationAction::PresentSheet(feature_b(1)),
            "Flow: Step 6 - Feature B presented as sheet".to_string(),
        ),
        action_step(
            timing.long,
            b.clone(),
            NavigationAction::Navigate(feature_b(2)),
            "Flow: Step 7 - Navigation within Feature B (Level 2)".to_string(),
        ),
        action_step(
            timing.long,
            b.clone(),
            NavigationAction::Navigate(feature_b(3)),
            "Flow: Step 8 - Navigation within Feature B (Level 3)".to_string(),
        ),
        FlowStep::new(Duration::ZERO, |_| {
            StepOutcome::Completed(vec!["Complex flow with multiple routers completed".to_string()])
        }),
        list_routers_step(timing.short),
    ]
}

/// A single feature sheet presented straight from the debug router, backed
/// by a freshly registered `routerFeatureX-XXXX` router.
pub fn present_feature_flow(feature: Feature) -> Vec<FlowStep> {
    let id = match feature {
        Feature::A => format!("routerFeatureA-{}", short_uuid()),
        Feature::B => format!("routerFeatureB-{}", short_uuid()),
    };

    vec![FlowStep::new(Duration::ZERO, move |app| {
        let debug_router = match lookup(app, DEBUG_ROUTER_ID) {
            Ok(router) => router,
            Err(reason) => return StepOutcome::Skipped(reason),
        };
        app.register(StackRouter::<DebugRoute>::with_id(id.clone()));
        debug_router.present_sheet(DebugRoute::new(feature, &id, DEBUG_ROUTER_ID, 1));
        StepOutcome::Completed(vec![format!(
            "Presenting {feature} as sheet with dedicated router ({id})"
        )])
    })]
}

/// Closes B the way a user would (swipe on A's sheet), then dismisses A
/// through the router API and closes the debug router's sheet.
pub fn dismiss_flow(ids: &FlowIds, timing: FlowTiming) -> Vec<FlowStep> {
    let a = ids.feature_a.clone();
    let a_for_dismiss = a.clone();
    let b = ids.feature_b.clone();

    vec![
        FlowStep::new(timing.short, move |app| {
            let router = match lookup(app, &a) {
                Ok(router) => router,
                Err(reason) => return StepOutcome::Skipped(reason),
            };
            let mut surface = NavigationSurface::new(router);
            surface.user_dismissed_sheet();
            StepOutcome::Completed(vec![format!(
                "Flow: Step 1 - Feature B sheet closed by the user ({b} registered: {})",
                app.contains(&b)
            )])
        }),
        FlowStep::new(timing.long, move |app| {
            let router = match lookup(app, &a_for_dismiss) {
                Ok(router) => router,
                Err(reason) => return StepOutcome::Skipped(reason),
            };
            router.dismiss();
            if let Ok(debug_router) = lookup(app, DEBUG_ROUTER_ID) {
                debug_router.dismiss_presented();
            }
            StepOutcome::Completed(vec![format!(
                "Flow: Step 2 - Feature A dismissed ({a_for_dismiss} registered: {})",
                app.contains(&a_for_dismiss)
            )])
        }),
        list_routers_step(timing.short),
    ]
}

/// Bulk reset followed by a router listing.
pub fn reset_flow(timing: FlowTiming) -> Vec<FlowStep> {
    vec![
        FlowStep::new(Duration::ZERO, |app| {
            app.reset_all_navigation();
            StepOutcome::Completed(vec!["Navigation reset, secondary routers removed".to_string()])
        }),
        list_routers_step(timing.short),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Routable, TabRouter};
    use crate::debug::{DebugRecorder, ensure_debug_router};
    use crate::test_support::{TestTab, test_app};

    fn debug_app() -> (AppRouter, DebugRecorder) {
        let recorder = DebugRecorder::new(500);
        let app = AppRouter::builder(TabRouter::new(TestTab::Home))
            .recorder(recorder.clone())
            .build();
        ensure_debug_router(&app);
        (app, recorder)
    }

    #[test]
    fn test_complex_flow_builds_nested_routers() {
        let (app, _) = debug_app();
        let ids = FlowIds::new("T1");
        let mut runner = FlowRunner::new(app.clone());
        runner.run_now(complex_flow(&ids, FlowTiming::immediate()));

        let a = app.router::<StackRouter<DebugRoute>>(Some(&ids.feature_a)).unwrap();
        let b = app.router::<StackRouter<DebugRoute>>(Some(&ids.feature_b)).unwrap();
        assert_eq!(a.depth(), 2);
        assert_eq!(b.depth(), 2);
        assert_eq!(a.presenting_sheet().map(|r| r.id()), Some(ids.feature_b.clone()));
        assert_eq!(b.stack()[1].level(), 3);
        assert_eq!(b.stack()[1].previous_id(), ids.feature_a);

        let messages = runner.messages();
        assert_eq!(messages[0], "===================================");
        assert!(messages.contains(&format!("- {}", ids.feature_b)));
        assert!(messages.contains(&"Flow: Step 2 - Feature A presented as sheet".to_string()));
    }

    #[test]
    fn test_step_skipped_when_router_torn_down() {
        let (app, recorder) = debug_app();
        let ids = FlowIds::new("T2");
        let mut steps = complex_flow(&ids, FlowTiming::immediate());
        let tail = steps.split_off(2);

        let mut runner = FlowRunner::new(app.clone());
        runner.run_now(steps);
        // Feature A goes away before its navigation steps fire
        app.router::<StackRouter<DebugRoute>>(Some(&ids.feature_a))
            .unwrap()
            .dismiss();
        runner.run_now(tail);

        let skipped: Vec<String> = runner
            .messages()
            .into_iter()
            .filter(|m| m.contains("skipped"))
            .collect();
        // Steps 3, 4 and 6 use Feature A's router
        assert_eq!(skipped.len(), 3);
        assert!(!recorder.entries_of_kind(LogKind::Warning).is_empty());
        // Feature B was still created and navigated
        let b = app.router::<StackRouter<DebugRoute>>(Some(&ids.feature_b)).unwrap();
        assert_eq!(b.depth(), 2);
    }

    #[test]
    fn test_dismiss_flow_unregisters_features() {
        let (app, _) = debug_app();
        let ids = FlowIds::new("T3");
        let mut runner = FlowRunner::new(app.clone());
        runner.run_now(complex_flow(&ids, FlowTiming::immediate()));
        runner.run_now(dismiss_flow(&ids, FlowTiming::immediate()));

        assert!(!app.contains(&ids.feature_a));
        assert!(!app.contains(&ids.feature_b));
        assert!(app.contains(DEBUG_ROUTER_ID));
        assert!(!app.is_presenting());
        assert!(app.presented_routers().is_empty());
    }

    #[test]
    fn test_reset_flow_leaves_base_routers() {
        let (app, _, _) = test_app();
        ensure_debug_router(&app);
        let ids = FlowIds::new("T4");
        let mut runner = FlowRunner::new(app.clone());
        runner.run_now(complex_flow(&ids, FlowTiming::immediate()));
        runner.run_now(reset_flow(FlowTiming::immediate()));

        assert_eq!(app.registered_ids(), vec!["TestTab".to_string(), "home".to_string()]);
        assert_eq!(runner.messages()[1], "- home");
    }

    #[test]
    fn test_messages_are_bounded() {
        let (app, _, _) = test_app();
        let mut runner = FlowRunner::new(app);
        let steps = (0..150)
            .map(|n| FlowStep::new(Duration::ZERO, move |_| StepOutcome::Completed(vec![format!("m{n}")])))
            .collect();
        runner.run_now(steps);
        let messages = runner.messages();
        assert_eq!(messages.len(), MAX_FLOW_MESSAGES);
        assert_eq!(messages[0], "m149");
    }

    #[test]
    fn test_present_feature_registers_and_presents() {
        let (app, _) = debug_app();
        let mut runner = FlowRunner::new(app.clone());
        runner.run_now(present_feature_flow(Feature::B));

        let debug_router = app
            .router::<StackRouter<DebugRoute>>(Some(DEBUG_ROUTER_ID))
            .unwrap();
        let sheet = debug_router.presenting_sheet().unwrap();
        assert_eq!(sheet.feature(), Feature::B);
        assert_eq!(sheet.level(), 1);
        assert_eq!(sheet.previous_id(), DEBUG_ROUTER_ID);
        assert!(sheet.id().starts_with("routerFeatureB-"));
        assert_eq!(sheet.id().len(), "routerFeatureB-XXXX".len());
        assert!(app.contains(&sheet.id()));
        assert_eq!(app.presented_routers(), vec![DEBUG_ROUTER_ID.to_string()]);
        assert!(runner.messages()[0].starts_with("Presenting Feature B as sheet"));
    }

    #[test]
    fn test_present_feature_skipped_without_debug_router() {
        let (app, _, _) = test_app();
        let mut runner = FlowRunner::new(app.clone());
        runner.run_now(present_feature_flow(Feature::A));
        assert_eq!(app.len(), 2);
        assert!(runner.messages()[0].contains("skipped"));
    }

    #[test]
    fn test_timing_saturates_on_huge_delay() {
        let timing = FlowTiming::from_step_delay_ms(u64::MAX);
        assert_eq!(timing.short, Duration::from_millis(u64::MAX));
        assert_eq!(timing.long, Duration::from_millis(u64::MAX));
        assert_eq!(FlowTiming::from_step_delay_ms(250).long, Duration::from_millis(500));
    }

    #[test]
    fn test_flow_ids_shape() {
        let ids = FlowIds::random();
        assert!(ids.feature_a.starts_with("routerFeatureA-"));
        assert!(ids.feature_a.ends_with("-1"));
        assert_eq!(ids.feature_a.len(), "routerFeatureA-XXXX-1".len());
    }

    #[tokio::test]
    async fn test_async_run_executes_in_order() {
        let (app, _) = debug_app();
        let ids = FlowIds::new("T5");
        let mut runner = FlowRunner::new(app.clone());
        runner.run(complex_flow(&ids, FlowTiming::from_step_delay_ms(1))).await;
        assert!(app.contains(&ids.feature_b));
        assert_eq!(app.presented_routers(), vec![DEBUG_ROUTER_ID.to_string(), ids.feature_a.clone()]);
    }

    #[test]
    fn test_run_blocks_to_completion() {
        let (app, _) = debug_app();
        let mut runner = FlowRunner::new(app.clone());
        tokio_test::block_on(runner.run(reset_flow(FlowTiming::immediate())));
        assert!(!app.contains(DEBUG_ROUTER_ID));
        assert_eq!(runner.messages().len(), 4);
    }
}
