//! Orchestrator Engine
//!
//! Main simulation loop integrating all components:
//! - Emergency deadlines (response-time enforcement)
//! - Passive income and weather
//! - Runway occupancy countdowns
//! - Landing dispatch (delay, selection, commit, revenue)
//! - Scenario events and flight arrivals
//! - Failure tracking, progression and notifications
//!
//! # Architecture
//!
//! ```text
//! For each tick t:
//! a. Expire emergency records past their deadline
//! b. Credit passive income, re-roll weather
//! c. Count down runway occupancy
//! d. Dispatch due and overdue flights in scheduler order
//! e. Execute scenario events, generate new flights
//! f. Prune old terminal flights
//! g. Advance time; handle end-of-day if needed
//! h. Forward events and transactions to the sink, notify observers
//! ```
//!
//! Once the failure tracker reaches game over, the remaining steps of that
//! tick are skipped and every later `tick()` returns without touching state.
//!
//! # Example
//!
//! ```rust
//! use airport_simulator_core_rs::orchestrator::{AirportConfig, Orchestrator};
//!
//! let mut orchestrator = Orchestrator::new(AirportConfig::default()).unwrap();
//! for _ in 0..10 {
//!     let result = orchestrator.tick().unwrap();
//!     assert!(!result.game_over);
//! }
//! assert_eq!(orchestrator.current_tick(), 10);
//! ```

use thiserror::Error;

use crate::arrivals::{FlightGenerator, MIN_LEAD_TIME};
use crate::core::TimeManager;
use crate::dispatch::{
    DispatchContext, DispatchError, DispatchMode, DispatchOutcome, LandingDispatcher,
    LandingReport, RunwaySelector,
};
use crate::emergency::{EmergencyTracker, RegisterOutcome};
use crate::events::{ScenarioContext, ScenarioError, ScenarioEvent, ScenarioEventHandler};
use crate::failure::{FailureCategory, FailureTracker, GameOverObserver};
use crate::models::{
    Account, AccountError, CancelReason, Event, EventLog, Flight, FlightCategory, FlightError,
    RunwayError, TransactionKind,
};
use crate::orchestrator::checkpoint::{compute_config_hash, AirportSnapshot, RunwaySummary};
use crate::orchestrator::config::{AirportConfig, DelayPolicy, RunwaySpec};
use crate::progression::{AchievementDef, AchievementReward, ProgressionTracker};
use crate::revenue::{BonusCondition, ModifierError, ModifierSet, RevenuePipeline};
use crate::rng::RngManager;
use crate::runways::{RunwayAllocator, RunwayRegistry};
use crate::schedule::{FlightScheduler, ScheduleError};
use crate::sink::{EventSink, TracingSink};
use crate::weather::WeatherState;

// ============================================================================
// Errors, Notifications, Results
// ============================================================================

/// Simulation error types
#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    /// Configuration validation error
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Bad argument to an inbound registration call
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Flight not found: {0}")]
    FlightNotFound(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error(transparent)]
    Runway(#[from] RunwayError),

    #[error(transparent)]
    Flight(#[from] FlightError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Modifier(#[from] ModifierError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Scenario(#[from] ScenarioError),

    #[error(transparent)]
    Account(#[from] AccountError),
}

/// Outbound notifications for content collaborators
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    FlightLanded {
        tick: usize,
        flight_number: String,
        category: FlightCategory,
        runway_id: String,
        on_time: bool,
        revenue: i64,
    },
    LevelUp {
        tick: usize,
        level: u32,
    },
    AchievementUnlocked {
        tick: usize,
        achievement_id: String,
        name: String,
    },
    GameOver {
        tick: usize,
        category: FailureCategory,
        reason: String,
    },
}

/// Subscriber to [`Notification`]s, called synchronously at the end of a tick
pub trait AirportObserver {
    fn on_notification(&mut self, notification: &Notification);
}

/// Result of a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickResult {
    /// Tick number that was processed
    pub tick: usize,
    pub new_flights: usize,
    pub landings: usize,
    pub delays: usize,
    pub cancellations: usize,
    /// Landing revenue credited this tick
    pub revenue: i64,
    pub notifications: Vec<Notification>,
    /// The airport is in (or just entered) game over
    pub game_over: bool,
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Main orchestrator owning all airport state and the tick loop
///
/// # Determinism
///
/// All randomness is via `rng_manager` with seeded xorshift64*.
/// Same seed + same config + same manual answers = identical event stream.
pub struct Orchestrator {
    config: AirportConfig,
    config_hash: String,

    time_manager: TimeManager,
    rng_manager: RngManager,

    registry: RunwayRegistry,
    allocator: RunwayAllocator,
    scheduler: FlightScheduler,
    dispatcher: LandingDispatcher,
    pipeline: RevenuePipeline,
    modifiers: ModifierSet,
    account: Account,
    failures: FailureTracker,
    emergencies: EmergencyTracker,
    weather: WeatherState,
    generator: FlightGenerator,
    progression: ProgressionTracker,
    scenario: ScenarioEventHandler,

    dispatch_mode: DispatchMode,
    selector: Option<Box<dyn RunwaySelector>>,

    weather_resistance: f64,
    landing_duration_reduction: usize,

    event_log: EventLog,
    sink: Box<dyn EventSink>,
    observers: Vec<Box<dyn AirportObserver>>,

    /// Events and transactions already handed to the sink
    forwarded_events: usize,
    forwarded_transactions: usize,

    notifications: Vec<Notification>,
    day_landings: usize,
    day_revenue: i64,
}

impl Orchestrator {
    /// Create new orchestrator from configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Orchestrator)` - Successfully initialized orchestrator
    /// * `Err(SimulationError)` - Configuration validation failed
    pub fn new(config: AirportConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        let config_hash = compute_config_hash(&config)?;

        let mut registry = RunwayRegistry::new();
        for spec in &config.runways {
            registry.add(spec.to_runway())?;
        }

        let mut orchestrator = Self {
            config_hash,
            time_manager: TimeManager::new(config.ticks_per_day),
            rng_manager: RngManager::new(config.rng_seed),
            registry,
            allocator: RunwayAllocator::new(config.wear.clone()),
            scheduler: FlightScheduler::new(),
            dispatcher: LandingDispatcher::new(config.dispatch.clone()),
            pipeline: RevenuePipeline::new(config.revenue.clone()),
            modifiers: ModifierSet::new(),
            account: Account::new(config.economy.opening_balance),
            failures: FailureTracker::new(config.failure_thresholds.clone()),
            emergencies: EmergencyTracker::new(config.emergency_window),
            weather: WeatherState::new(config.weather.clone()),
            generator: FlightGenerator::new(config.arrivals.clone()),
            progression: ProgressionTracker::new(config.progression.clone()),
            scenario: ScenarioEventHandler::new(config.scenario_events.clone()),
            dispatch_mode: config.dispatch_mode,
            selector: None,
            weather_resistance: 0.0,
            landing_duration_reduction: 0,
            event_log: EventLog::new(),
            sink: Box::new(TracingSink),
            observers: Vec::new(),
            forwarded_events: 0,
            forwarded_transactions: 0,
            notifications: Vec::new(),
            day_landings: 0,
            day_revenue: 0,
            config,
        };

        let runway_added: Vec<Event> = orchestrator
            .registry
            .iter()
            .map(|r| Event::RunwayAdded {
                tick: 0,
                runway_id: r.id().to_string(),
                tier: r.tier(),
                length: r.length(),
            })
            .collect();
        for event in runway_added {
            orchestrator.event_log.log(event);
        }

        tracing::info!(
            airport = %orchestrator.config.name,
            runways = orchestrator.registry.len(),
            seed = orchestrator.config.rng_seed,
            "airport initialized"
        );
        Ok(orchestrator)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &AirportConfig {
        &self.config
    }

    pub fn config_hash(&self) -> &str {
        &self.config_hash
    }

    /// Next tick to be processed
    pub fn current_tick(&self) -> usize {
        self.time_manager.current_tick()
    }

    pub fn current_day(&self) -> usize {
        self.time_manager.current_day()
    }

    pub fn balance(&self) -> i64 {
        self.account.balance()
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn runways(&self) -> &RunwayRegistry {
        &self.registry
    }

    pub fn allocator(&self) -> &RunwayAllocator {
        &self.allocator
    }

    pub fn scheduler(&self) -> &FlightScheduler {
        &self.scheduler
    }

    pub fn flight(&self, flight_number: &str) -> Option<&Flight> {
        self.scheduler.get(flight_number)
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    pub fn failures(&self) -> &FailureTracker {
        &self.failures
    }

    pub fn emergencies(&self) -> &EmergencyTracker {
        &self.emergencies
    }

    pub fn progression(&self) -> &ProgressionTracker {
        &self.progression
    }

    pub fn weather(&self) -> &WeatherState {
        &self.weather
    }

    pub fn modifiers(&self) -> &ModifierSet {
        &self.modifiers
    }

    pub fn weather_resistance(&self) -> f64 {
        self.weather_resistance
    }

    pub fn landing_duration_reduction(&self) -> usize {
        self.landing_duration_reduction
    }

    pub fn dispatch_mode(&self) -> DispatchMode {
        self.dispatch_mode
    }

    pub fn is_game_over(&self) -> bool {
        self.failures.is_game_over()
    }

    // ========================================================================
    // Collaborators
    // ========================================================================

    pub fn set_dispatch_mode(&mut self, mode: DispatchMode) {
        self.dispatch_mode = mode;
    }

    /// Attach the manual-dispatch collaborator
    pub fn set_selector(&mut self, selector: Box<dyn RunwaySelector>) {
        self.selector = Some(selector);
    }

    pub fn clear_selector(&mut self) -> Option<Box<dyn RunwaySelector>> {
        self.selector.take()
    }

    /// Replace the event/transaction sink (defaults to [`TracingSink`])
    pub fn set_sink(&mut self, sink: Box<dyn EventSink>) {
        self.sink = sink;
    }

    pub fn subscribe(&mut self, observer: Box<dyn AirportObserver>) {
        self.observers.push(observer);
    }

    /// Observers notified directly by the failure tracker on game over
    pub fn subscribe_game_over(&mut self, observer: Box<dyn GameOverObserver>) {
        self.failures.subscribe(observer);
    }

    // ========================================================================
    // Inbound Surface (shop, achievements, host commands)
    // ========================================================================

    /// Register a global revenue multiplier
    pub fn add_modifier(&mut self, name: &str, factor: f64) -> Result<(), SimulationError> {
        self.modifiers.add_global(name, factor)?;
        self.log_modifier(name, factor, "global".to_string());
        Ok(())
    }

    /// Register a revenue multiplier for one flight category
    pub fn add_flight_type_modifier(
        &mut self,
        category: FlightCategory,
        name: &str,
        factor: f64,
    ) -> Result<(), SimulationError> {
        self.modifiers.add_for_category(category, name, factor)?;
        self.log_modifier(name, factor, category.to_string());
        Ok(())
    }

    /// Register a flat bonus added to the base fare when `condition` holds
    pub fn add_bonus(
        &mut self,
        name: &str,
        amount: i64,
        condition: BonusCondition,
    ) -> Result<(), SimulationError> {
        self.modifiers.add_bonus(name, amount, condition)?;
        self.flush();
        Ok(())
    }

    /// Increase weather resistance (total is capped at 1.0)
    pub fn add_weather_resistance(&mut self, amount: f64) -> Result<(), SimulationError> {
        if !(amount.is_finite() && amount >= 0.0) {
            return Err(SimulationError::InvalidArgument(format!(
                "weather resistance must be finite and >= 0, got {}",
                amount
            )));
        }
        self.weather_resistance = (self.weather_resistance + amount).min(1.0);
        self.log_modifier("weather resistance", self.weather_resistance, "wear".to_string());
        Ok(())
    }

    /// Shorten landing occupancy; a landing always occupies at least 1 tick
    pub fn reduce_landing_duration(&mut self, ticks: usize) {
        self.landing_duration_reduction += ticks;
        tracing::debug!(
            reduction = self.landing_duration_reduction,
            "landing duration reduced"
        );
    }

    pub fn add_xp_multiplier(&mut self, factor: f64) -> Result<(), SimulationError> {
        self.progression.add_xp_multiplier("xp", factor)?;
        self.log_modifier("xp", factor, "experience".to_string());
        Ok(())
    }

    /// Register a runway at no cost (unlock path)
    pub fn add_runway(&mut self, spec: &RunwaySpec) -> Result<(), SimulationError> {
        let runway = spec.to_runway();
        let (tier, length) = (runway.tier(), runway.length());
        self.registry.add(runway)?;
        self.event_log.log(Event::RunwayAdded {
            tick: self.current_tick(),
            runway_id: spec.id.clone(),
            tier,
            length,
        });
        self.flush();
        Ok(())
    }

    /// Buy and register a runway; rejected if the balance does not cover it
    pub fn purchase_runway(&mut self, spec: &RunwaySpec, cost: i64) -> Result<(), SimulationError> {
        if self.registry.contains(&spec.id) {
            return Err(RunwayError::DuplicateId(spec.id.clone()).into());
        }
        if cost > 0 {
            self.account
                .try_debit(
                    cost,
                    format!("purchase runway {}", spec.id),
                    TransactionKind::RunwayPurchase,
                    self.current_tick(),
                )
                .map_err(insufficient)?;
        }
        self.add_runway(spec)
    }

    /// Repair a runway: reset wear and close it for the repair duration.
    ///
    /// Returns the cost charged.
    pub fn repair_runway(&mut self, runway_id: &str) -> Result<i64, SimulationError> {
        let runway = self
            .registry
            .get(runway_id)
            .ok_or_else(|| RunwayError::NotFound(runway_id.to_string()))?;
        if let Some(occupancy) = runway.occupancy() {
            return Err(RunwayError::Occupied {
                runway_id: runway_id.to_string(),
                reason: occupancy.reason,
            }
            .into());
        }
        let cost = self.charge_repair(runway_id, runway.wear())?;
        self.allocator.repair(&mut self.registry, runway_id)?;
        self.log_repair(runway_id, cost, true);
        Ok(cost)
    }

    /// Repair a runway without closing it. Returns the cost charged.
    pub fn repair_runway_in_place(&mut self, runway_id: &str) -> Result<i64, SimulationError> {
        let wear = self
            .registry
            .get(runway_id)
            .map(|r| r.wear())
            .ok_or_else(|| RunwayError::NotFound(runway_id.to_string()))?;
        let cost = self.charge_repair(runway_id, wear)?;
        self.allocator.repair_in_place(&mut self.registry, runway_id)?;
        self.log_repair(runway_id, cost, false);
        Ok(cost)
    }

    /// Schedule an externally built flight at its scheduled tick
    pub fn inject_flight(&mut self, flight: Flight) -> Result<(), SimulationError> {
        let tick = self.current_tick();
        self.schedule(flight, tick)?;
        self.flush();
        Ok(())
    }

    /// Read-only state for persistence layers
    pub fn snapshot(&self) -> AirportSnapshot {
        let game_over = self.failures.game_over_reason();
        AirportSnapshot {
            name: self.config.name.clone(),
            identifier: self.config.identifier.clone(),
            tick: self.current_tick(),
            day: self.current_day(),
            balance: self.account.balance(),
            game_over: game_over.is_some(),
            game_over_category: game_over.map(|(category, _)| category),
            game_over_reason: game_over.map(|(_, reason)| reason.to_string()),
            level: self.progression.level(),
            xp: self.progression.xp(),
            achievements: self.progression.unlocked().iter().cloned().collect(),
            failure_counts: self.failures.counts().clone(),
            runways: self.registry.iter().map(RunwaySummary::from).collect(),
            airborne_flights: self.scheduler.airborne_count(),
            weather: self.weather.current(),
            config_hash: self.config_hash.clone(),
        }
    }

    // ========================================================================
    // Tick Loop Implementation
    // ========================================================================

    /// Execute one simulation tick
    pub fn tick(&mut self) -> Result<TickResult, SimulationError> {
        let tick = self.current_tick();
        if self.failures.is_game_over() {
            return Ok(TickResult {
                tick,
                game_over: true,
                ..TickResult::default()
            });
        }

        let mut result = TickResult {
            tick,
            ..TickResult::default()
        };

        // STEP A: EMERGENCY DEADLINES
        self.process_emergencies(tick, &mut result)?;

        if !self.failures.is_game_over() {
            // STEP B: PASSIVE ACCRUAL AND WEATHER
            self.accrue_passive_income(tick);
            if let Some((from, to)) = self.weather.update(tick, &mut self.rng_manager) {
                self.event_log.log(Event::WeatherChanged { tick, from, to });
            }

            // STEP C: RUNWAY OCCUPANCY
            for (runway_id, cleared) in self.registry.update_status() {
                self.event_log.log(Event::RunwayReleased {
                    tick,
                    runway_id,
                    reason: cleared.reason,
                });
            }

            // STEP D: DISPATCH
            self.dispatch_due_flights(tick, &mut result)?;
        }

        if !self.failures.is_game_over() {
            // STEP E: SCENARIO EVENTS AND ARRIVALS
            self.execute_scenario_events(tick)?;
            result.new_flights = self.generate_arrivals(tick)?;

            // STEP F: RETENTION
            if tick >= self.config.completed_retention_ticks {
                self.scheduler
                    .prune_terminal(tick - self.config.completed_retention_ticks);
            }
        }

        // STEP G: ADVANCE TIME
        // A game over earlier in the tick freezes the clock where it stopped
        if !self.failures.is_game_over() {
            if let Some(day) = self.time_manager.advance_tick() {
                self.handle_end_of_day(tick, day);
            }
        }

        // STEP H: OUTBOUND
        self.flush();
        result.notifications = std::mem::take(&mut self.notifications);
        for notification in &result.notifications {
            for observer in self.observers.iter_mut() {
                observer.on_notification(notification);
            }
        }
        result.game_over = self.failures.is_game_over();
        Ok(result)
    }

    fn process_emergencies(
        &mut self,
        tick: usize,
        result: &mut TickResult,
    ) -> Result<(), SimulationError> {
        for record in self.emergencies.process_emergencies(tick) {
            self.event_log.log(Event::EmergencyExpired {
                tick,
                flight_number: record.flight_number.clone(),
                deadline: record.deadline,
            });

            let canceled = match self.scheduler.get_mut(&record.flight_number) {
                Some(flight) if !flight.is_terminal() => {
                    flight.cancel(CancelReason::EmergencyExpired, tick)?;
                    true
                }
                _ => false,
            };
            if canceled {
                result.cancellations += 1;
                self.event_log.log(Event::FlightCanceled {
                    tick,
                    flight_number: record.flight_number.clone(),
                    reason: CancelReason::EmergencyExpired,
                });
            }

            self.record_failure(
                FailureCategory::EmergencyResponseMiss,
                format!("{} missed deadline t{}", record.flight_number, record.deadline),
                tick,
            );
            if canceled {
                self.record_failure(
                    FailureCategory::FlightCancellation,
                    format!("{} canceled: {}", record.flight_number, CancelReason::EmergencyExpired),
                    tick,
                );
            }
        }
        Ok(())
    }

    fn accrue_passive_income(&mut self, tick: usize) {
        let economy = &self.config.economy;
        if economy.passive_income_interval == 0
            || economy.passive_income_per_interval == 0
            || tick == 0
            || tick % economy.passive_income_interval != 0
        {
            return;
        }
        self.account.credit(
            economy.passive_income_per_interval,
            "passive income",
            TransactionKind::PassiveIncome,
            tick,
        );
    }

    fn dispatch_due_flights(
        &mut self,
        tick: usize,
        result: &mut TickResult,
    ) -> Result<(), SimulationError> {
        let due = self.scheduler.due_flight_numbers(tick);
        let traffic_volume = self.scheduler.airborne_count() as u32;
        let delay_policy = self.config.delay_policy.clone();

        for flight_number in due {
            if self.failures.is_game_over() {
                break;
            }

            if self.try_auto_cancel(&flight_number, tick, &delay_policy, result)? {
                continue;
            }

            let flight = self
                .scheduler
                .get_mut(&flight_number)
                .ok_or_else(|| SimulationError::FlightNotFound(flight_number.clone()))?;
            let mut ctx = DispatchContext {
                tick,
                mode: self.dispatch_mode,
                registry: &mut self.registry,
                allocator: &self.allocator,
                pipeline: &self.pipeline,
                modifiers: &self.modifiers,
                account: &mut self.account,
                rng: &mut self.rng_manager,
                events: &mut self.event_log,
                selector: self
                    .selector
                    .as_mut()
                    .map(|s| s.as_mut() as &mut dyn RunwaySelector),
                weather_impact: self.weather.impact(),
                weather_resistance: self.weather_resistance,
                traffic_volume,
                landing_duration_reduction: self.landing_duration_reduction,
            };
            let (outcome, _phases) = self.dispatcher.dispatch(flight, &mut ctx)?;

            match outcome {
                DispatchOutcome::Landed(report) => {
                    result.landings += 1;
                    result.revenue += report.revenue.total;
                    self.after_landing(&report);
                }
                DispatchOutcome::Delayed { .. } => {
                    result.delays += 1;
                    self.try_auto_cancel(&flight_number, tick, &delay_policy, result)?;
                }
            }
        }
        Ok(())
    }

    /// Cancel a flight whose delay is already past the auto-cancel line
    fn try_auto_cancel(
        &mut self,
        flight_number: &str,
        tick: usize,
        delay_policy: &DelayPolicy,
        result: &mut TickResult,
    ) -> Result<bool, SimulationError> {
        let flight = self
            .scheduler
            .get_mut(flight_number)
            .ok_or_else(|| SimulationError::FlightNotFound(flight_number.to_string()))?;

        let delay = flight.delay_ticks(tick);
        let report_critical =
            delay >= delay_policy.critical_delay_ticks && flight.take_critical_delay_report();
        let cancel = flight.exceeds_delay(tick, delay_policy.auto_cancel_ticks);
        if cancel {
            flight.cancel(CancelReason::DelayThreshold, tick)?;
        }

        if report_critical {
            self.record_failure(
                FailureCategory::CriticalDelay,
                format!("{} delayed {} ticks", flight_number, delay),
                tick,
            );
        }
        if !cancel {
            return Ok(false);
        }

        result.cancellations += 1;
        self.event_log.log(Event::FlightCanceled {
            tick,
            flight_number: flight_number.to_string(),
            reason: CancelReason::DelayThreshold,
        });
        // First to fire wins: the emergency clock stops without a response miss
        self.emergencies.mark_handled(flight_number);
        self.record_failure(
            FailureCategory::FlightCancellation,
            format!("{} canceled after {} ticks of delay", flight_number, delay),
            tick,
        );
        Ok(true)
    }

    fn after_landing(&mut self, report: &LandingReport) {
        let tick = report.tick;
        self.day_landings += 1;
        self.day_revenue += report.revenue.total;

        let emergency = self.emergencies.mark_handled(&report.flight_number).is_some()
            || report.category == FlightCategory::Emergency;

        if report.wear.newly_degraded {
            self.record_failure(
                FailureCategory::RunwayClosure,
                format!("runway {} reached wear {}", report.runway_id, report.wear.wear),
                tick,
            );
        }

        self.notifications.push(Notification::FlightLanded {
            tick,
            flight_number: report.flight_number.clone(),
            category: report.category,
            runway_id: report.runway_id.clone(),
            on_time: report.on_time,
            revenue: report.revenue.total,
        });

        let progress = self.progression.record_landing(report.on_time, emergency);
        for level in progress.levels_gained {
            self.event_log.log(Event::LevelUp { tick, level });
            self.notifications.push(Notification::LevelUp { tick, level });
        }

        let unlocked = self.progression.check_achievements(self.account.balance());
        for achievement in unlocked {
            self.unlock(&achievement, tick);
        }
    }

    fn unlock(&mut self, achievement: &AchievementDef, tick: usize) {
        self.event_log.log(Event::AchievementUnlocked {
            tick,
            achievement_id: achievement.id.clone(),
            name: achievement.name.clone(),
        });
        self.notifications.push(Notification::AchievementUnlocked {
            tick,
            achievement_id: achievement.id.clone(),
            name: achievement.name.clone(),
        });

        // Rewards were validated with the configuration
        let applied = match &achievement.reward {
            AchievementReward::GlobalRevenueModifier { name, factor } => {
                self.add_modifier(name, *factor)
            }
            AchievementReward::XpMultiplier { factor } => self.add_xp_multiplier(*factor),
            AchievementReward::WeatherResistance { amount } => self.add_weather_resistance(*amount),
            AchievementReward::LandingDurationReduction { ticks } => {
                self.reduce_landing_duration(*ticks);
                Ok(())
            }
            AchievementReward::None => Ok(()),
        };
        if let Err(error) = applied {
            tracing::warn!(achievement = %achievement.id, %error, "achievement reward rejected");
        }
    }

    fn execute_scenario_events(&mut self, tick: usize) -> Result<(), SimulationError> {
        let events: Vec<ScenarioEvent> = self
            .scenario
            .get_events_for_tick(tick)
            .into_iter()
            .cloned()
            .collect();
        if events.is_empty() {
            return Ok(());
        }

        let mark = self.account.records().len();
        for event in events {
            match &event {
                ScenarioEvent::InjectFlight {
                    category,
                    lead_time,
                    passengers,
                } => {
                    let drawn = self
                        .generator
                        .create_flight(*category, tick, &mut self.rng_manager);
                    let flight = Flight::new(
                        drawn.flight_number(),
                        drawn.aircraft().clone(),
                        *category,
                        passengers.unwrap_or_else(|| drawn.passengers()),
                        tick + (*lead_time).max(MIN_LEAD_TIME),
                    );
                    self.schedule(flight, tick)?;
                    crate::events::handler::log_scenario_event(&mut self.event_log, tick, &event);
                }
                _ => {
                    let mut ctx = ScenarioContext {
                        registry: &mut self.registry,
                        account: &mut self.account,
                        weather: &mut self.weather,
                        events: &mut self.event_log,
                    };
                    // A runway that is busy or gone makes the event a no-op
                    if let Err(error) = event.execute(&mut ctx, tick) {
                        tracing::warn!(event = event.event_type(), %error, "scenario event skipped");
                    }
                }
            }
        }
        self.audit_overdrafts(mark, tick);
        Ok(())
    }

    fn generate_arrivals(&mut self, tick: usize) -> Result<usize, SimulationError> {
        let flights = self.generator.generate(tick, &mut self.rng_manager);
        let count = flights.len();
        for flight in flights {
            self.schedule(flight, tick)?;
        }
        Ok(count)
    }

    /// Track a new flight and start its emergency clock if it needs one
    fn schedule(&mut self, flight: Flight, tick: usize) -> Result<(), SimulationError> {
        self.event_log.log(Event::FlightScheduled {
            tick,
            flight_number: flight.flight_number().to_string(),
            category: flight.category(),
            scheduled_tick: flight.scheduled_tick(),
            passengers: flight.passengers(),
        });
        if let RegisterOutcome::Registered { deadline } = self.emergencies.register(&flight, tick) {
            self.event_log.log(Event::EmergencyRegistered {
                tick,
                flight_number: flight.flight_number().to_string(),
                deadline,
            });
        }
        let key = flight.scheduled_tick();
        self.scheduler.schedule_flight(flight, key)?;
        Ok(())
    }

    fn handle_end_of_day(&mut self, tick: usize, day: usize) {
        let mark = self.account.records().len();

        let upkeep = self.config.economy.upkeep_per_runway * self.registry.len() as i64;
        if upkeep > 0 {
            self.account.force_debit(
                upkeep,
                format!("runway upkeep day {}", day),
                TransactionKind::RunwayUpkeep,
                tick,
            );
        }

        self.event_log.log(Event::EndOfDay {
            tick,
            day,
            landings: self.day_landings,
            revenue: self.day_revenue,
        });
        self.day_landings = 0;
        self.day_revenue = 0;

        self.audit_overdrafts(mark, tick);
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn record_failure(&mut self, category: FailureCategory, details: String, tick: usize) {
        let outcome = self.failures.record_failure(category, &details, tick);
        self.event_log.log(Event::FailureRecorded {
            tick,
            category,
            count: outcome.count,
            threshold: outcome.threshold,
            details,
        });
        if outcome.triggered_game_over {
            let reason = category.game_over_reason().to_string();
            self.event_log.log(Event::GameOver {
                tick,
                category,
                reason: reason.clone(),
            });
            self.notifications.push(Notification::GameOver {
                tick,
                category,
                reason,
            });
        }
    }

    /// Record a shortfall for every debit since `mark` that overdrew
    fn audit_overdrafts(&mut self, mark: usize, tick: usize) {
        let records = self.account.records();
        let overdrawn: Vec<(String, i64)> = records[mark.min(records.len())..]
            .iter()
            .filter(|r| r.amount < 0 && r.overdraft)
            .map(|r| (r.reason.clone(), r.resulting_balance))
            .collect();
        for (reason, balance) in overdrawn {
            self.record_failure(
                FailureCategory::FinancialShortfall,
                format!("{} left balance at {}", reason, balance),
                tick,
            );
        }
    }

    fn charge_repair(&mut self, runway_id: &str, wear: u32) -> Result<i64, SimulationError> {
        let cost = self.allocator.repair_cost(wear);
        if cost > 0 {
            self.account
                .try_debit(
                    cost,
                    format!("repair runway {}", runway_id),
                    TransactionKind::RunwayRepair,
                    self.current_tick(),
                )
                .map_err(insufficient)?;
        }
        Ok(cost)
    }

    fn log_repair(&mut self, runway_id: &str, cost: i64, blocking: bool) {
        self.event_log.log(Event::RunwayRepaired {
            tick: self.current_tick(),
            runway_id: runway_id.to_string(),
            cost,
            blocking,
        });
        self.flush();
    }

    fn log_modifier(&mut self, name: &str, factor: f64, scope: String) {
        self.event_log.log(Event::ModifierAdded {
            tick: self.current_tick(),
            name: name.to_string(),
            factor,
            scope,
        });
        self.flush();
    }

    /// Hand new events and transactions to the sink
    fn flush(&mut self) {
        for event in self.event_log.since(self.forwarded_events) {
            self.sink.log(&event.to_string());
        }
        self.forwarded_events = self.event_log.len();

        let records = self.account.records();
        for record in &records[self.forwarded_transactions.min(records.len())..] {
            self.sink.record_transaction(record);
        }
        self.forwarded_transactions = records.len();
    }
}

/// Map a rejected debit onto the runway error the purchase/repair surface reports
fn insufficient(error: AccountError) -> SimulationError {
    match error {
        AccountError::InsufficientFunds {
            required,
            available,
        } => RunwayError::InsufficientFunds {
            required,
            available,
        }
        .into(),
        other => other.into(),
    }
}
