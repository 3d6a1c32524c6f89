//! Scenario registry shared by the integration tests.
//!
//! Each scenario is a plain function registered by name. A scenario passes
//! only if it returns `Ok` *and* has called [`ScenarioContext::end`]; an error,
//! a panic or a missing `end()` fails the whole run, after every scenario has
//! had its turn.

use std::error::Error;
use std::panic::{self, AssertUnwindSafe};

use dualmesh::prelude::*;

/// Outcome type of a scenario.
pub type ScenarioResult = std::result::Result<(), Box<dyn Error>>;

/// A registered scenario.
pub type Scenario = fn(&mut ScenarioContext) -> ScenarioResult;

/// Per-scenario state handed to each scenario function.
#[derive(Debug)]
pub struct ScenarioContext {
    name: &'static str,
    ended: bool,
}

impl ScenarioContext {
    fn new(name: &'static str) -> Self {
        Self { name, ended: false }
    }

    /// Name the scenario was registered under.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Mark the scenario as complete.
    pub fn end(&mut self) {
        self.ended = true;
    }
}

/// An explicit list of scenarios.
#[derive(Default)]
pub struct ScenarioRegistry {
    scenarios: Vec<(&'static str, Scenario)>,
}

impl ScenarioRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: &'static str, scenario: Scenario) -> &mut Self {
        self.scenarios.push((name, scenario));
        self
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// Run every scenario and return the names and reasons of the failures.
    pub fn run(&self) -> Vec<(&'static str, String)> {
        let mut failures = Vec::new();

        for &(registered, scenario) in &self.scenarios {
            let mut ctx = ScenarioContext::new(registered);
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| scenario(&mut ctx)));

            let failure = match outcome {
                Ok(Ok(())) if ctx.ended => None,
                Ok(Ok(())) => Some("scenario never called end()".to_string()),
                Ok(Err(e)) => Some(format!("error: {}", e)),
                Err(payload) => Some(format!("panicked: {}", panic_message(&payload))),
            };

            match failure {
                Some(reason) => {
                    log::error!("scenario {} failed: {}", ctx.name(), reason);
                    failures.push((ctx.name(), format!("{}: {}", ctx.name(), reason)));
                }
                None => log::info!("scenario {} passed", ctx.name()),
            }
        }

        failures
    }

    /// Run every scenario, panicking with a summary if any failed.
    pub fn run_all(&self) {
        let failures = self.run();
        assert!(
            failures.is_empty(),
            "{} of {} scenarios failed: {:?}",
            failures.len(),
            self.len(),
            failures
        );
    }
}

fn panic_message(payload: &Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Install a test logger once per process.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A small generated mesh used by several scenarios.
pub fn small_options() -> MeshOptions {
    MeshOptions::default()
        .with_size(400.0, 300.0)
        .with_spacing(10.0)
}
