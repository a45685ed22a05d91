//! Landing dispatch
//!
//! This module decides which runway a due flight lands on, or why it
//! cannot land yet.
//!
//! # Modes
//!
//! - **Automatic**: the allocator's first eligible runway (registration order)
//! - **Manual**: the eligible list is handed to a [`RunwaySelector`]; its
//!   answer is validated and anything unusable falls back to automatic
//!
//! # Selector Interface
//!
//! Any external decision source implements [`RunwaySelector`]:
//! ```rust
//! use airport_simulator_core_rs::dispatch::{RunwayChoice, RunwaySelector};
//! use airport_simulator_core_rs::models::{Flight, Runway};
//!
//! struct AlwaysHold;
//!
//! impl RunwaySelector for AlwaysHold {
//!     fn choose_runway(&mut self, _flight: &Flight, _candidates: &[&Runway]) -> RunwayChoice {
//!         RunwayChoice::Delay
//!     }
//! }
//! ```
//!
//! Closures with the same signature implement it too.

pub mod dispatcher;

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::models::{Flight, Runway};

pub use dispatcher::{
    DispatchConfig, DispatchContext, DispatchError, DispatchOutcome, DispatchPhase,
    LandingDispatcher, LandingReport,
};

/// How due flights are matched to runways
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    #[default]
    Automatic,
    Manual,
}

/// Answer from a manual-dispatch collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunwayChoice {
    /// Land on this runway id
    Runway(String),
    /// Hold the flight (delays it by the manual delay)
    Delay,
    /// Unusable answer; the raw text is kept for the log
    Invalid(String),
}

impl RunwayChoice {
    /// Interpret free-form operator input.
    ///
    /// Empty input or `none`/`delay`/`hold` means delay; a 1-based index
    /// picks from `candidates`; anything else is treated as a runway id.
    ///
    /// # Example
    /// ```
    /// use airport_simulator_core_rs::dispatch::RunwayChoice;
    ///
    /// let ids = vec!["09L".to_string(), "27R".to_string()];
    /// assert_eq!(RunwayChoice::parse("2", &ids), RunwayChoice::Runway("27R".to_string()));
    /// assert_eq!(RunwayChoice::parse("", &ids), RunwayChoice::Delay);
    /// assert_eq!(RunwayChoice::parse("7", &ids), RunwayChoice::Invalid("7".to_string()));
    /// ```
    pub fn parse(input: &str, candidates: &[String]) -> Self {
        let trimmed = input.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "" | "none" | "delay" | "hold" => return RunwayChoice::Delay,
            _ => {}
        }
        if let Ok(index) = trimmed.parse::<usize>() {
            return match index.checked_sub(1).and_then(|i| candidates.get(i)) {
                Some(id) => RunwayChoice::Runway(id.clone()),
                None => RunwayChoice::Invalid(trimmed.to_string()),
            };
        }
        RunwayChoice::Runway(trimmed.to_string())
    }
}

/// External decision source for manual dispatch
///
/// Called with the flight and every runway that could take it right now,
/// in registration order. The list is never empty.
pub trait RunwaySelector {
    fn choose_runway(&mut self, flight: &Flight, candidates: &[&Runway]) -> RunwayChoice;
}

impl<F> RunwaySelector for F
where
    F: FnMut(&Flight, &[&Runway]) -> RunwayChoice,
{
    fn choose_runway(&mut self, flight: &Flight, candidates: &[&Runway]) -> RunwayChoice {
        self(flight, candidates)
    }
}

/// Replays a fixed queue of answers
///
/// Once the queue runs dry every answer is `Invalid`, which makes the
/// dispatcher fall back to automatic selection.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSelector {
    responses: VecDeque<RunwayChoice>,
    requests: Vec<(String, Vec<String>)>,
}

impl ScriptedSelector {
    pub fn new(responses: impl IntoIterator<Item = RunwayChoice>) -> Self {
        Self {
            responses: responses.into_iter().collect(),
            requests: Vec::new(),
        }
    }

    pub fn push(&mut self, choice: RunwayChoice) {
        self.responses.push_back(choice);
    }

    /// `(flight_number, candidate ids)` for every request seen so far
    pub fn requests(&self) -> &[(String, Vec<String>)] {
        &self.requests
    }

    pub fn remaining(&self) -> usize {
        self.responses.len()
    }
}

impl RunwaySelector for ScriptedSelector {
    fn choose_runway(&mut self, flight: &Flight, candidates: &[&Runway]) -> RunwayChoice {
        self.requests.push((
            flight.flight_number().to_string(),
            candidates.iter().map(|r| r.id().to_string()).collect(),
        ));
        self.responses
            .pop_front()
            .unwrap_or_else(|| RunwayChoice::Invalid("script exhausted".to_string()))
    }
}

/// Picks the least-worn candidate; ties go to registration order
#[derive(Debug, Clone, Copy, Default)]
pub struct LeastWornSelector;

impl RunwaySelector for LeastWornSelector {
    fn choose_runway(&mut self, _flight: &Flight, candidates: &[&Runway]) -> RunwayChoice {
        candidates
            .iter()
            .min_by_key(|r| r.wear())
            .map(|r| RunwayChoice::Runway(r.id().to_string()))
            .unwrap_or(RunwayChoice::Delay)
    }
}
