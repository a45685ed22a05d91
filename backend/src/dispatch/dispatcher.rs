//! Landing dispatcher
//!
//! Runs one landing attempt for one flight at one tick:
//!
//! ```text
//! Evaluate ──► NoRunway ─────────────────────────► LandingFailed (delay)
//!    │
//!    └──────► RunwayFound ──► commit ──► LandingSucceeded
//!                                 └────► LandingFailed (delay)
//! ```
//!
//! The dispatcher is the only writer of a flight's status while it is being
//! landed. Contention never surfaces as an error: every failed branch delays
//! the flight and logs why. `Err` is reserved for broken invariants such as
//! dispatching a flight that is already terminal.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dispatch::{DispatchMode, RunwayChoice, RunwaySelector};
use crate::models::{
    Account, DelayReason, Event, EventLog, Flight, FlightCategory, FlightError, OccupancyReason,
    RunwayError, TransactionKind, TransactionRecord,
};
use crate::revenue::{ModifierSet, RevenueBreakdown, RevenueInput, RevenuePipeline};
use crate::rng::RngManager;
use crate::runways::{RunwayAllocator, RunwayRegistry, WearOutcome};

#[derive(Debug, Error, PartialEq)]
pub enum DispatchError {
    #[error(transparent)]
    Flight(#[from] FlightError),

    #[error(transparent)]
    Runway(#[from] RunwayError),
}

/// Timing knobs for dispatch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Delay applied when no runway can take the aircraft, or the chosen
    /// runway was taken at commit
    pub retry_delay: usize,
    /// Delay applied when the manual collaborator holds a flight
    pub manual_delay: usize,
    /// Ticks a landing occupies its runway before reductions
    pub landing_duration: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            retry_delay: 5,
            manual_delay: 5,
            landing_duration: 3,
        }
    }
}

/// States of one landing attempt, in the order they were visited
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchPhase {
    Evaluate,
    NoRunway,
    RunwayFound { runway_id: String },
    LandingSucceeded,
    LandingFailed,
}

/// Everything learned from a committed landing
#[derive(Debug, Clone, PartialEq)]
pub struct LandingReport {
    pub flight_number: String,
    pub category: FlightCategory,
    pub runway_id: String,
    pub tick: usize,
    pub on_time: bool,
    pub delay_ticks: usize,
    /// On time and landed on a runway in near-perfect condition
    pub perfect: bool,
    pub occupancy_ticks: usize,
    pub wear: WearOutcome,
    pub revenue: RevenueBreakdown,
    pub transaction: TransactionRecord,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Landed(Box<LandingReport>),
    Delayed {
        reason: DelayReason,
        added_ticks: usize,
    },
}

impl DispatchOutcome {
    pub fn is_landed(&self) -> bool {
        matches!(self, DispatchOutcome::Landed(_))
    }
}

/// Borrowed view of the airport for one dispatch call
///
/// Built by the orchestrator from its own fields for each flight.
pub struct DispatchContext<'a> {
    pub tick: usize,
    pub mode: DispatchMode,
    pub registry: &'a mut RunwayRegistry,
    pub allocator: &'a RunwayAllocator,
    pub pipeline: &'a RevenuePipeline,
    pub modifiers: &'a ModifierSet,
    pub account: &'a mut Account,
    pub rng: &'a mut RngManager,
    pub events: &'a mut EventLog,
    pub selector: Option<&'a mut dyn RunwaySelector>,
    pub weather_impact: f64,
    pub weather_resistance: f64,
    /// Flights airborne this tick; feeds the wear formula
    pub traffic_volume: u32,
    /// Ticks shaved off every landing's occupancy by upgrades
    pub landing_duration_reduction: usize,
}

/// Runs landing attempts
///
/// # Example
/// ```
/// use airport_simulator_core_rs::dispatch::{DispatchContext, DispatchMode, LandingDispatcher};
/// use airport_simulator_core_rs::models::{Account, Aircraft, EventLog, Flight, FlightCategory, Runway, RunwayTier, SizeClass};
/// use airport_simulator_core_rs::revenue::{ModifierSet, RevenuePipeline};
/// use airport_simulator_core_rs::rng::RngManager;
/// use airport_simulator_core_rs::runways::{RunwayAllocator, RunwayRegistry};
///
/// let mut registry = RunwayRegistry::new();
/// registry.add(Runway::new("09L", RunwayTier::Medium)).unwrap();
/// let allocator = RunwayAllocator::default();
/// let pipeline = RevenuePipeline::default();
/// let modifiers = ModifierSet::new();
/// let mut account = Account::new(0);
/// let mut rng = RngManager::new(7);
/// let mut events = EventLog::new();
///
/// let mut flight = Flight::new(
///     "AS1",
///     Aircraft::new("A320", SizeClass::Medium, 70),
///     FlightCategory::Commercial,
///     100,
///     4,
/// );
/// let mut ctx = DispatchContext {
///     tick: 4,
///     mode: DispatchMode::Automatic,
///     registry: &mut registry,
///     allocator: &allocator,
///     pipeline: &pipeline,
///     modifiers: &modifiers,
///     account: &mut account,
///     rng: &mut rng,
///     events: &mut events,
///     selector: None,
///     weather_impact: 0.0,
///     weather_resistance: 0.0,
///     traffic_volume: 1,
///     landing_duration_reduction: 0,
/// };
///
/// let (outcome, _) = LandingDispatcher::default().dispatch(&mut flight, &mut ctx).unwrap();
/// assert!(outcome.is_landed());
/// assert_eq!(account.balance(), 1_000);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LandingDispatcher {
    config: DispatchConfig,
}

impl LandingDispatcher {
    pub fn new(config: DispatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Occupancy ticks for a landing after reductions (never below 1)
    pub fn landing_duration(&self, reduction: usize) -> usize {
        self.config.landing_duration.saturating_sub(reduction).max(1)
    }

    /// Attempt to land `flight` at `ctx.tick`.
    ///
    /// Returns the outcome plus the phases visited.
    pub fn dispatch(
        &self,
        flight: &mut Flight,
        ctx: &mut DispatchContext<'_>,
    ) -> Result<(DispatchOutcome, Vec<DispatchPhase>), DispatchError> {
        let tick = ctx.tick;
        let mut phases = vec![DispatchPhase::Evaluate];

        if flight.is_overdue(tick) {
            ctx.events.log(Event::FlightOverdue {
                tick,
                flight_number: flight.flight_number().to_string(),
                overdue_by: tick - flight.scheduled_tick(),
            });
        }

        if !ctx.allocator.can_land(ctx.registry, flight.aircraft()) {
            phases.push(DispatchPhase::NoRunway);
            phases.push(DispatchPhase::LandingFailed);
            let outcome = self.delay(
                flight,
                ctx,
                self.config.retry_delay,
                DelayReason::NoRunwayAvailable,
            )?;
            return Ok((outcome, phases));
        }

        let runway_id = match ctx.mode {
            DispatchMode::Automatic => self.automatic_choice(flight, ctx),
            DispatchMode::Manual => match self.manual_choice(flight, ctx) {
                Some(id) => Some(id),
                None => {
                    phases.push(DispatchPhase::LandingFailed);
                    let outcome =
                        self.delay(flight, ctx, self.config.manual_delay, DelayReason::ManualDelay)?;
                    return Ok((outcome, phases));
                }
            },
        };

        // can_land held above, so automatic selection always finds one
        let Some(runway_id) = runway_id else {
            phases.push(DispatchPhase::NoRunway);
            phases.push(DispatchPhase::LandingFailed);
            let outcome = self.delay(
                flight,
                ctx,
                self.config.retry_delay,
                DelayReason::NoRunwayAvailable,
            )?;
            return Ok((outcome, phases));
        };

        phases.push(DispatchPhase::RunwayFound {
            runway_id: runway_id.clone(),
        });

        let runway_free = ctx
            .registry
            .get(&runway_id)
            .map(|r| !r.is_occupied())
            .unwrap_or(false);
        if !runway_free {
            phases.push(DispatchPhase::LandingFailed);
            let outcome = self.delay(
                flight,
                ctx,
                self.config.retry_delay,
                DelayReason::RunwayOccupiedAtCommit { runway_id },
            )?;
            return Ok((outcome, phases));
        }

        let report = self.commit(flight, ctx, runway_id)?;
        phases.push(DispatchPhase::LandingSucceeded);
        Ok((DispatchOutcome::Landed(Box::new(report)), phases))
    }

    fn automatic_choice(&self, flight: &Flight, ctx: &DispatchContext<'_>) -> Option<String> {
        ctx.allocator
            .available_runway(ctx.registry, flight.aircraft())
            .map(|r| r.id().to_string())
    }

    /// `Some(id)` to land, `None` to hold the flight
    fn manual_choice(&self, flight: &Flight, ctx: &mut DispatchContext<'_>) -> Option<String> {
        let tick = ctx.tick;
        let candidates = ctx
            .allocator
            .available_runways(ctx.registry, flight.aircraft());
        ctx.events.log(Event::ManualSelectionRequested {
            tick,
            flight_number: flight.flight_number().to_string(),
            candidates: candidates.iter().map(|r| r.id().to_string()).collect(),
        });

        let choice = match ctx.selector.as_deref_mut() {
            Some(selector) => selector.choose_runway(flight, &candidates),
            None => RunwayChoice::Invalid("no selector attached".to_string()),
        };

        let rejection = match choice {
            RunwayChoice::Delay => return None,
            RunwayChoice::Runway(id) => match ctx.registry.get(&id) {
                None => format!("unknown runway {}", id),
                // Occupied at commit is a failure, not a fallback
                Some(runway) if runway.is_occupied() => return Some(id),
                Some(runway) if !ctx.allocator.is_eligible(runway, flight.aircraft()) => {
                    format!("runway {} cannot take {}", id, flight.aircraft().type_code())
                }
                Some(_) => return Some(id),
            },
            RunwayChoice::Invalid(raw) => format!("invalid response {:?}", raw),
        };

        tracing::debug!(
            flight = flight.flight_number(),
            reason = %rejection,
            "manual selection fell back to automatic"
        );
        ctx.events.log(Event::ManualSelectionFallback {
            tick,
            flight_number: flight.flight_number().to_string(),
            reason: rejection,
        });
        self.automatic_choice(flight, ctx)
    }

    fn commit(
        &self,
        flight: &mut Flight,
        ctx: &mut DispatchContext<'_>,
        runway_id: String,
    ) -> Result<LandingReport, DispatchError> {
        let tick = ctx.tick;
        let wear_before = ctx
            .registry
            .get(&runway_id)
            .map(|r| r.wear())
            .ok_or_else(|| RunwayError::NotFound(runway_id.clone()))?;

        let delay_ticks = flight.delay_ticks(tick);
        let on_time = delay_ticks == 0;
        let perfect = on_time && wear_before < ctx.allocator.config().perfect_landing_max_wear;
        let occupancy_ticks = self.landing_duration(ctx.landing_duration_reduction);

        flight.land(runway_id.clone(), tick)?;
        ctx.registry.require_mut(&runway_id)?.occupy(
            OccupancyReason::Landing,
            occupancy_ticks,
            Some(flight.flight_number().to_string()),
        )?;

        let wear = ctx.allocator.apply_wear(
            ctx.registry,
            &runway_id,
            ctx.weather_impact,
            ctx.traffic_volume,
            ctx.weather_resistance,
            ctx.rng,
        )?;
        ctx.events.log(Event::RunwayWear {
            tick,
            runway_id: runway_id.clone(),
            added: wear.added,
            wear: wear.wear,
        });
        if wear.newly_degraded {
            ctx.events.log(Event::RunwayClosed {
                tick,
                runway_id: runway_id.clone(),
            });
        }

        let revenue = ctx.pipeline.compute(
            &RevenueInput {
                category: flight.category(),
                passengers: flight.passengers(),
                delay_ticks,
                on_time,
                perfect_landing: perfect,
            },
            ctx.modifiers,
        );
        for step in &revenue.steps {
            ctx.events.log(Event::RevenueAdjusted {
                tick,
                flight_number: flight.flight_number().to_string(),
                cause: step.cause.clone(),
                delta: step.delta,
            });
        }

        let transaction = ctx.account.credit(
            revenue.total,
            format!("landing {}", flight.flight_number()),
            TransactionKind::LandingRevenue,
            tick,
        );
        ctx.events.log(Event::FlightLanded {
            tick,
            flight_number: flight.flight_number().to_string(),
            runway_id: runway_id.clone(),
            on_time,
            revenue: revenue.total,
        });
        tracing::debug!(
            flight = flight.flight_number(),
            runway = %runway_id,
            on_time,
            revenue = revenue.total,
            "landing committed"
        );

        Ok(LandingReport {
            flight_number: flight.flight_number().to_string(),
            category: flight.category(),
            runway_id,
            tick,
            on_time,
            delay_ticks,
            perfect,
            occupancy_ticks,
            wear,
            revenue,
            transaction,
        })
    }

    fn delay(
        &self,
        flight: &mut Flight,
        ctx: &mut DispatchContext<'_>,
        ticks: usize,
        reason: DelayReason,
    ) -> Result<DispatchOutcome, DispatchError> {
        let tick = ctx.tick;
        flight.delay_by(ticks, tick)?;
        ctx.events.log(Event::FlightDelayed {
            tick,
            flight_number: flight.flight_number().to_string(),
            added_ticks: ticks,
            total_delay: flight.delay_ticks(tick),
            reason: reason.clone(),
        });
        Ok(DispatchOutcome::Delayed {
            reason,
            added_ticks: ticks,
        })
    }
}
