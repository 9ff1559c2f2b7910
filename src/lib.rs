//! AppRouter library exports for testing

use clap::ValueEnum;

pub mod console;
pub mod core;
pub mod debug;
pub mod surface;

#[cfg(test)]
pub mod test_support;

/// Which scripted flow the demo binary runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Flow {
    /// Two nested feature routers presented as sheets
    #[default]
    Complex,
    /// Complex flow, then a bulk navigation reset
    Reset,
    /// Complex flow, then user and API dismissal
    Dismiss,
    /// Complex, dismiss and reset in sequence
    All,
    /// Feature A sheet presented from the debug router
    FeatureA,
    /// Feature B sheet presented from the debug router
    FeatureB,
}
