//! # Core Navigation Logic
//!
//! Routers, the registry that tracks them, and the contract between the two.
//! Knows nothing about how screens are drawn.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • AppRouter (registry) │
//!                    │  • StackRouter          │
//!                    │  • TabRouter            │
//!                    │                         │
//!                    │  No rendering.          │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │  Surface   │      │   Debug    │      │  Console   │
//!     │ (bindings) │      │ (recorder) │      │   (CLI)    │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`router`]: `ManagedRouter`, `Routable`, `TabRoutable`
//! - [`stack`]: `StackRouter`, push navigation plus sheet/full-screen slots
//! - [`tab`]: `TabRouter`, the selected tab
//! - [`app_router`]: `AppRouter`, the registry
//! - [`action`]: `NavigationAction`, stack router operations as values
//! - [`config`]: layered configuration

pub mod action;
pub mod app_router;
pub mod config;
pub mod error;
pub mod router;
pub mod stack;
pub mod tab;

pub use action::NavigationAction;
pub use app_router::{AppRouter, AppRouterBuilder, RegistryOptions, WeakAppRouter};
pub use error::RouterError;
pub use router::{
    DismissCallback, ManagedRouter, Routable, RouterKind, RouterSnapshot, TabRoutable,
};
pub use stack::StackRouter;
pub use tab::TabRouter;
