//! Integration tests for the Orchestrator tick loop
//!
//! These tests drive whole ticks through the public surface: arrivals,
//! dispatch, delays and cancellation, money flows, scenario events and the
//! outbound sink/observer channels.

use std::cell::RefCell;
use std::rc::Rc;

use airport_simulator_core_rs::dispatch::{DispatchMode, RunwayChoice};
use airport_simulator_core_rs::events::{EventSchedule, ScenarioEvent, ScheduledEvent};
use airport_simulator_core_rs::failure::FailureCategory;
use airport_simulator_core_rs::models::{
    Aircraft, Event, Flight, FlightCategory, FlightStatus, OccupancyReason, Runway, RunwayError,
    RunwayTier, SizeClass,
};
use airport_simulator_core_rs::orchestrator::{
    AirportConfig, AirportObserver, Notification, Orchestrator, RunwaySpec, SimulationError,
};
use airport_simulator_core_rs::sink::MemorySink;
use airport_simulator_core_rs::weather::WeatherCondition;

/// Two runways, no generated traffic, no passive income, no upkeep,
/// no weather changes
fn quiet_config() -> AirportConfig {
    let mut config = AirportConfig {
        ticks_per_day: 1000,
        ..AirportConfig::default()
    };
    config.arrivals.rate_per_tick = 0.0;
    config.economy.opening_balance = 0;
    config.economy.passive_income_interval = 0;
    config.economy.upkeep_per_runway = 0;
    config.weather.change_interval = 0;
    config
}

fn commercial(number: &str, tick: usize) -> Flight {
    Flight::new(
        number,
        Aircraft::new("A320", SizeClass::Medium, 70),
        FlightCategory::Commercial,
        100,
        tick,
    )
}

fn jumbo(number: &str, tick: usize) -> Flight {
    Flight::new(
        number,
        Aircraft::new("B744", SizeClass::Large, 300),
        FlightCategory::Commercial,
        100,
        tick,
    )
}

struct Recorder(Rc<RefCell<Vec<Notification>>>);

impl AirportObserver for Recorder {
    fn on_notification(&mut self, notification: &Notification) {
        self.0.borrow_mut().push(notification.clone());
    }
}

// ============================================================================
// Basic tick cycle
// ============================================================================

#[test]
fn test_single_tick_without_traffic() {
    let mut orchestrator = Orchestrator::new(quiet_config()).unwrap();
    assert_eq!(orchestrator.current_tick(), 0);
    assert_eq!(orchestrator.current_day(), 0);

    let result = orchestrator.tick().unwrap();
    assert_eq!(result.tick, 0);
    assert_eq!(result.new_flights, 0);
    assert_eq!(result.landings, 0);
    assert!(!result.game_over);
    assert_eq!(orchestrator.current_tick(), 1);

    // Only the two start-up runway registrations were logged
    assert_eq!(orchestrator.event_log().len(), 2);
    assert_eq!(orchestrator.event_log().events_of_type("RunwayAdded").len(), 2);
}

#[test]
fn test_due_flight_lands_on_first_eligible_runway() {
    let mut orchestrator = Orchestrator::new(quiet_config()).unwrap();
    orchestrator.inject_flight(commercial("AS1", 0)).unwrap();

    let result = orchestrator.tick().unwrap();
    assert_eq!(result.landings, 1);
    assert_eq!(result.revenue, 1000);
    assert_eq!(orchestrator.balance(), 1000);
    assert_eq!(
        orchestrator.flight("AS1").unwrap().status(),
        &FlightStatus::Landed {
            tick: 0,
            runway_id: "09L".to_string()
        }
    );

    let runway = orchestrator.runways().get("09L").unwrap();
    assert_eq!(runway.landings(), 1);
    assert!(runway.wear() > 0);
    assert_eq!(
        runway.occupancy().map(|o| o.reason),
        Some(OccupancyReason::Landing)
    );
}

#[test]
fn test_generated_traffic_is_scheduled_ahead() {
    let mut config = quiet_config();
    config.arrivals.rate_per_tick = 2.0;
    let mut orchestrator = Orchestrator::new(config).unwrap();

    let mut generated = 0;
    for _ in 0..20 {
        generated += orchestrator.tick().unwrap().new_flights;
    }
    assert!(generated > 0);
    assert_eq!(
        orchestrator.event_log().events_of_type("FlightScheduled").len(),
        generated
    );
    for event in orchestrator.event_log().events_of_type("FlightScheduled") {
        if let Event::FlightScheduled {
            tick,
            scheduled_tick,
            ..
        } = event
        {
            assert!(scheduled_tick > tick);
        }
    }
}

// ============================================================================
// Determinism
// ============================================================================

fn busy_config(seed: u64) -> AirportConfig {
    let mut config = AirportConfig {
        rng_seed: seed,
        ticks_per_day: 50,
        ..AirportConfig::default()
    };
    config.arrivals.rate_per_tick = 0.8;
    config.weather.change_interval = 10;
    config
}

fn run(config: AirportConfig, ticks: usize) -> Vec<String> {
    let mut orchestrator = Orchestrator::new(config).unwrap();
    for _ in 0..ticks {
        if orchestrator.tick().unwrap().game_over {
            break;
        }
    }
    orchestrator
        .event_log()
        .events()
        .iter()
        .map(|e| e.to_string())
        .collect()
}

#[test]
fn test_same_seed_same_event_stream() {
    let first = run(busy_config(12345), 200);
    let second = run(busy_config(12345), 200);
    assert!(first.len() > 10);
    assert_eq!(first, second);
}

#[test]
fn test_different_seed_different_event_stream() {
    let first = run(busy_config(1), 200);
    let second = run(busy_config(2), 200);
    assert_ne!(first, second);
}

// ============================================================================
// Economy
// ============================================================================

#[test]
fn test_passive_income_accrues_on_interval() {
    let mut config = quiet_config();
    config.economy.passive_income_interval = 10;
    config.economy.passive_income_per_interval = 100;
    let mut orchestrator = Orchestrator::new(config).unwrap();

    for _ in 0..25 {
        orchestrator.tick().unwrap();
    }
    // Credited at ticks 10 and 20, never at tick 0
    assert_eq!(orchestrator.balance(), 200);
}

#[test]
fn test_end_of_day_charges_upkeep_per_runway() {
    let mut config = quiet_config();
    config.ticks_per_day = 10;
    config.economy.opening_balance = 5_000;
    config.economy.upkeep_per_runway = 250;
    let mut orchestrator = Orchestrator::new(config).unwrap();

    for _ in 0..9 {
        orchestrator.tick().unwrap();
    }
    assert_eq!(orchestrator.balance(), 5_000);
    assert!(orchestrator.event_log().events_of_type("EndOfDay").is_empty());

    orchestrator.tick().unwrap();
    assert_eq!(orchestrator.current_tick(), 10);
    assert_eq!(orchestrator.current_day(), 1);
    assert_eq!(orchestrator.balance(), 4_500);

    let end_of_day = orchestrator.event_log().events_of_type("EndOfDay");
    assert_eq!(end_of_day.len(), 1);
    assert!(matches!(
        end_of_day[0],
        Event::EndOfDay { tick: 9, day: 0, .. }
    ));
    assert_eq!(orchestrator.failures().count(FailureCategory::FinancialShortfall), 0);
}

#[test]
fn test_overdraft_records_shortfall_only_on_debit() {
    let mut config = quiet_config();
    config.ticks_per_day = 20;
    config.economy.upkeep_per_runway = 1_000;
    config.economy.passive_income_interval = 10;
    config.economy.passive_income_per_interval = 100;
    let mut orchestrator = Orchestrator::new(config).unwrap();

    for _ in 0..35 {
        orchestrator.tick().unwrap();
    }
    // Upkeep at tick 19 overdrew; the credits at ticks 20 and 30 did not
    // count as new shortfalls even though the balance stayed negative
    assert_eq!(orchestrator.balance(), 100 - 2_000 + 200);
    assert_eq!(orchestrator.failures().count(FailureCategory::FinancialShortfall), 1);
    assert!(!orchestrator.is_game_over());
}

#[test]
fn test_shortfall_threshold_ends_game_and_freezes_state() {
    let mut config = quiet_config();
    config.ticks_per_day = 5;
    config.economy.upkeep_per_runway = 100;
    config.failure_thresholds.financial_shortfall = 1;
    let mut orchestrator = Orchestrator::new(config).unwrap();

    let observed = Rc::new(RefCell::new(Vec::new()));
    orchestrator.subscribe(Box::new(Recorder(observed.clone())));

    for _ in 0..4 {
        assert!(!orchestrator.tick().unwrap().game_over);
    }
    let result = orchestrator.tick().unwrap();
    assert_eq!(result.tick, 4);
    assert!(result.game_over);
    assert!(orchestrator.is_game_over());
    assert_eq!(
        result.notifications,
        vec![Notification::GameOver {
            tick: 4,
            category: FailureCategory::FinancialShortfall,
            reason: FailureCategory::FinancialShortfall.game_over_reason().to_string(),
        }]
    );
    assert_eq!(observed.borrow().len(), 1);
    assert_eq!(orchestrator.event_log().events_of_type("GameOver").len(), 1);

    // Later ticks report game over without touching anything
    let events = orchestrator.event_log().len();
    let balance = orchestrator.balance();
    let tick = orchestrator.current_tick();
    orchestrator.inject_flight(commercial("AS9", tick)).unwrap();
    let events = events + 1;
    for _ in 0..3 {
        let result = orchestrator.tick().unwrap();
        assert!(result.game_over);
        assert_eq!(result.tick, tick);
        assert_eq!(result.landings, 0);
    }
    assert_eq!(orchestrator.current_tick(), tick);
    assert_eq!(orchestrator.balance(), balance);
    assert_eq!(orchestrator.event_log().len(), events);
    assert!(!orchestrator.flight("AS9").unwrap().is_terminal());

    let snapshot = orchestrator.snapshot();
    assert!(snapshot.game_over);
    assert_eq!(
        snapshot.game_over_category,
        Some(FailureCategory::FinancialShortfall)
    );
}

// ============================================================================
// Delays and cancellation
// ============================================================================

#[test]
fn test_flight_that_never_fits_is_auto_canceled() {
    let mut config = quiet_config();
    config.runways = vec![RunwaySpec::new("09L", RunwayTier::Medium)];
    let mut orchestrator = Orchestrator::new(config).unwrap();
    orchestrator.inject_flight(jumbo("HV1", 0)).unwrap();

    let mut canceled_at = None;
    for _ in 0..40 {
        let result = orchestrator.tick().unwrap();
        if result.cancellations > 0 {
            canceled_at = Some(result.tick);
            break;
        }
    }

    // Retried every 5 ticks; the retry at t30 pushes the delay to 35
    assert_eq!(canceled_at, Some(30));
    let flight = orchestrator.flight("HV1").unwrap();
    assert!(matches!(flight.status(), FlightStatus::Canceled { tick: 30, .. }));
    assert_eq!(flight.delay_ticks(1000), 35);

    let failures = orchestrator.failures();
    assert_eq!(failures.count(FailureCategory::CriticalDelay), 1);
    assert_eq!(failures.count(FailureCategory::FlightCancellation), 1);
    assert_eq!(
        orchestrator
            .event_log()
            .events_for_flight("HV1")
            .iter()
            .filter(|e| e.event_type() == "FlightDelayed")
            .count(),
        7
    );
}

#[test]
fn test_delayed_flight_lands_late_for_reduced_fare() {
    let mut config = quiet_config();
    config.runways = vec![RunwaySpec::new("09L", RunwayTier::Medium)];
    config.dispatch.landing_duration = 12;
    let mut orchestrator = Orchestrator::new(config).unwrap();
    orchestrator.inject_flight(commercial("AS1", 0)).unwrap();
    orchestrator.inject_flight(commercial("AS2", 0)).unwrap();

    let mut revenue = Vec::new();
    for _ in 0..20 {
        let result = orchestrator.tick().unwrap();
        if result.landings > 0 {
            revenue.push((result.tick, result.revenue));
        }
    }

    // AS2 waits t0 -> t5 -> t10 -> t15 while AS1 holds the runway through t11
    assert_eq!(revenue, vec![(0, 1000), (15, 950)]);
    assert_eq!(orchestrator.flight("AS2").unwrap().delay_ticks(100), 15);
    assert_eq!(orchestrator.failures().count(FailureCategory::CriticalDelay), 0);
}

// ============================================================================
// Manual dispatch
// ============================================================================

#[test]
fn test_manual_mode_follows_selector() {
    let mut config = quiet_config();
    config.dispatch_mode = DispatchMode::Manual;
    let mut orchestrator = Orchestrator::new(config).unwrap();

    let asked: Rc<RefCell<Vec<(String, Vec<String>)>>> = Rc::new(RefCell::new(Vec::new()));
    let log = asked.clone();
    let mut answers = vec![RunwayChoice::Runway("27R".to_string()), RunwayChoice::Delay];
    orchestrator.set_selector(Box::new(move |flight: &Flight, candidates: &[&Runway]| {
        log.borrow_mut().push((
            flight.flight_number().to_string(),
            candidates.iter().map(|r| r.id().to_string()).collect(),
        ));
        answers.pop().unwrap_or(RunwayChoice::Delay)
    }));
    orchestrator.inject_flight(commercial("AS1", 0)).unwrap();

    // First answer holds the flight for the manual delay
    let result = orchestrator.tick().unwrap();
    assert_eq!(result.delays, 1);
    assert_eq!(orchestrator.flight("AS1").unwrap().scheduled_tick(), 5);

    let mut landed_on = None;
    for _ in 1..=5 {
        for notification in orchestrator.tick().unwrap().notifications {
            if let Notification::FlightLanded { runway_id, .. } = notification {
                landed_on = Some(runway_id);
            }
        }
    }
    assert_eq!(landed_on.as_deref(), Some("27R"));

    let asked = asked.borrow();
    assert_eq!(asked.len(), 2);
    assert_eq!(asked[1].0, "AS1");
    assert_eq!(asked[1].1, vec!["09L".to_string(), "27R".to_string()]);
}

#[test]
fn test_manual_mode_without_selector_falls_back_to_automatic() {
    let mut orchestrator = Orchestrator::new(quiet_config()).unwrap();
    orchestrator.set_dispatch_mode(DispatchMode::Manual);
    orchestrator.inject_flight(commercial("AS1", 0)).unwrap();

    let result = orchestrator.tick().unwrap();
    assert_eq!(result.landings, 1);
    assert!(orchestrator.flight("AS1").unwrap().is_terminal());
}

// ============================================================================
// Scenario events
// ============================================================================

#[test]
fn test_scenario_events_execute_on_schedule() {
    let mut config = quiet_config();
    config.scenario_events = vec![
        ScheduledEvent {
            event: ScenarioEvent::Grant {
                amount: 500,
                reason: "sponsor".to_string(),
            },
            schedule: EventSchedule::OneTime { tick: 1 },
        },
        ScheduledEvent {
            event: ScenarioEvent::CloseRunway {
                runway_id: "09L".to_string(),
                duration: 4,
            },
            schedule: EventSchedule::OneTime { tick: 2 },
        },
        ScheduledEvent {
            event: ScenarioEvent::SetWeather {
                condition: WeatherCondition::Storm,
            },
            schedule: EventSchedule::OneTime { tick: 3 },
        },
        ScheduledEvent {
            event: ScenarioEvent::InjectFlight {
                category: FlightCategory::Vip,
                lead_time: 2,
                passengers: Some(8),
            },
            schedule: EventSchedule::OneTime { tick: 4 },
        },
    ];
    let mut orchestrator = Orchestrator::new(config).unwrap();

    orchestrator.tick().unwrap();
    assert_eq!(orchestrator.balance(), 0);
    orchestrator.tick().unwrap();
    assert_eq!(orchestrator.balance(), 500);

    orchestrator.tick().unwrap();
    let closed = orchestrator.runways().get("09L").unwrap().occupancy().cloned();
    assert_eq!(closed.map(|o| o.reason), Some(OccupancyReason::Maintenance));

    orchestrator.tick().unwrap();
    assert_eq!(orchestrator.weather().current(), WeatherCondition::Storm);

    let result = orchestrator.tick().unwrap();
    assert_eq!(result.new_flights, 0);
    let scheduled = orchestrator.event_log().events_of_type("FlightScheduled");
    assert_eq!(scheduled.len(), 1);
    let number = match scheduled[0] {
        Event::FlightScheduled {
            flight_number,
            category,
            scheduled_tick,
            passengers,
            ..
        } => {
            assert_eq!(*category, FlightCategory::Vip);
            assert_eq!(*scheduled_tick, 6);
            assert_eq!(*passengers, 8);
            flight_number.clone()
        }
        other => panic!("unexpected event {:?}", other),
    };

    orchestrator.tick().unwrap();
    orchestrator.tick().unwrap();
    assert!(orchestrator.flight(&number).unwrap().is_terminal());
    assert_eq!(
        orchestrator.event_log().events_of_type("ScenarioEventExecuted").len(),
        4
    );
}

#[test]
fn test_injected_flight_with_zero_lead_time_lands_on_time() {
    let mut config = quiet_config();
    config.scenario_events = vec![ScheduledEvent {
        event: ScenarioEvent::InjectFlight {
            category: FlightCategory::Commercial,
            lead_time: 0,
            passengers: Some(100),
        },
        schedule: EventSchedule::OneTime { tick: 1 },
    }];
    let mut orchestrator = Orchestrator::new(config).unwrap();

    orchestrator.tick().unwrap();
    orchestrator.tick().unwrap();
    let scheduled = orchestrator.event_log().events_of_type("FlightScheduled");
    assert_eq!(scheduled.len(), 1);
    let number = match scheduled[0] {
        Event::FlightScheduled {
            flight_number,
            scheduled_tick,
            ..
        } => {
            assert_eq!(*scheduled_tick, 2);
            flight_number.clone()
        }
        other => panic!("unexpected event {:?}", other),
    };

    let result = orchestrator.tick().unwrap();
    assert_eq!(result.landings, 1);
    assert_eq!(result.revenue, 1000);
    let flight = orchestrator.flight(&number).unwrap();
    assert!(matches!(flight.status(), FlightStatus::Landed { tick: 2, .. }));
    assert_eq!(flight.delay_ticks(100), 0);
    assert!(orchestrator.event_log().events_of_type("FlightOverdue").is_empty());
}

#[test]
fn test_scenario_closure_of_busy_runway_is_skipped() {
    let mut config = quiet_config();
    config.scenario_events = vec![ScheduledEvent {
        event: ScenarioEvent::CloseRunway {
            runway_id: "09L".to_string(),
            duration: 10,
        },
        schedule: EventSchedule::OneTime { tick: 0 },
    }];
    let mut orchestrator = Orchestrator::new(config).unwrap();
    orchestrator.inject_flight(commercial("AS1", 0)).unwrap();

    orchestrator.tick().unwrap();
    let runway = orchestrator.runways().get("09L").unwrap();
    assert_eq!(
        runway.occupancy().map(|o| o.reason),
        Some(OccupancyReason::Landing)
    );
    assert!(orchestrator
        .event_log()
        .events_of_type("ScenarioEventExecuted")
        .is_empty());
}

// ============================================================================
// Outbound channels
// ============================================================================

#[test]
fn test_sink_receives_every_event_and_transaction() {
    let mut config = quiet_config();
    config.economy.passive_income_interval = 2;
    config.economy.passive_income_per_interval = 10;
    let mut orchestrator = Orchestrator::new(config).unwrap();

    let probe = MemorySink::new();
    orchestrator.set_sink(Box::new(probe.clone()));
    orchestrator.inject_flight(commercial("AS1", 1)).unwrap();
    for _ in 0..5 {
        orchestrator.tick().unwrap();
    }

    let expected: Vec<String> = orchestrator
        .event_log()
        .events()
        .iter()
        .map(|e| e.to_string())
        .collect();
    assert_eq!(probe.messages(), expected);
    assert_eq!(probe.transactions(), orchestrator.account().records().to_vec());
    assert_eq!(probe.transactions().len(), 3);
}

#[test]
fn test_observer_receives_landing_notifications() {
    let mut orchestrator = Orchestrator::new(quiet_config()).unwrap();
    let observed = Rc::new(RefCell::new(Vec::new()));
    orchestrator.subscribe(Box::new(Recorder(observed.clone())));
    orchestrator.inject_flight(commercial("AS1", 0)).unwrap();

    let result = orchestrator.tick().unwrap();
    assert_eq!(*observed.borrow(), result.notifications);
    assert!(observed.borrow().contains(&Notification::FlightLanded {
        tick: 0,
        flight_number: "AS1".to_string(),
        category: FlightCategory::Commercial,
        runway_id: "09L".to_string(),
        on_time: true,
        revenue: 1000,
    }));
}

// ============================================================================
// Runway purchase and repair
// ============================================================================

fn worn_config(opening_balance: i64) -> AirportConfig {
    let mut config = quiet_config();
    config.economy.opening_balance = opening_balance;
    config.wear.base_increment = 50;
    config.wear.random_max = 0;
    config.wear.repair_base_rate = 30;
    config
}

/// Land one flight on 09L and wait until the runway is free again
fn land_and_clear(orchestrator: &mut Orchestrator) {
    orchestrator.inject_flight(commercial("AS1", 0)).unwrap();
    orchestrator.tick().unwrap();
    for _ in 0..10 {
        if !orchestrator.runways().get("09L").unwrap().is_occupied() {
            break;
        }
        orchestrator.tick().unwrap();
    }
}

#[test]
fn test_worn_out_runway_records_one_closure() {
    let mut config = quiet_config();
    config.runways = vec![RunwaySpec::new("09L", RunwayTier::Medium)];
    config.wear.full_degradation_threshold = 10;
    config.wear.base_increment = 10;
    config.wear.random_max = 0;
    let mut orchestrator = Orchestrator::new(config).unwrap();
    orchestrator.inject_flight(commercial("AS1", 0)).unwrap();
    orchestrator.inject_flight(commercial("AS2", 5)).unwrap();

    orchestrator.tick().unwrap();
    assert_eq!(orchestrator.runways().get("09L").unwrap().wear(), 10);
    assert_eq!(orchestrator.failures().count(FailureCategory::RunwayClosure), 1);

    // AS2 keeps coming back to the closed runway and is held each time
    for _ in 0..11 {
        orchestrator.tick().unwrap();
    }
    assert!(!orchestrator.flight("AS2").unwrap().is_terminal());
    assert_eq!(orchestrator.runways().get("09L").unwrap().landings(), 1);
    assert_eq!(orchestrator.failures().count(FailureCategory::RunwayClosure), 1);
    assert_eq!(orchestrator.event_log().events_of_type("RunwayClosed").len(), 1);
    assert!(!orchestrator
        .event_log()
        .events_for_flight("AS2")
        .iter()
        .any(|e| e.event_type() == "FlightLanded"));
}

#[test]
fn test_repair_rejected_while_runway_is_busy() {
    let mut orchestrator = Orchestrator::new(worn_config(0)).unwrap();
    orchestrator.inject_flight(commercial("AS1", 0)).unwrap();
    orchestrator.tick().unwrap();

    assert_eq!(
        orchestrator.repair_runway("09L"),
        Err(SimulationError::Runway(RunwayError::Occupied {
            runway_id: "09L".to_string(),
            reason: OccupancyReason::Landing,
        }))
    );
    assert_eq!(
        orchestrator.repair_runway("33X"),
        Err(SimulationError::Runway(RunwayError::NotFound("33X".to_string())))
    );
}

#[test]
fn test_repair_rejected_without_funds() {
    let mut orchestrator = Orchestrator::new(worn_config(0)).unwrap();
    land_and_clear(&mut orchestrator);
    assert_eq!(orchestrator.runways().get("09L").unwrap().wear(), 50);

    assert_eq!(
        orchestrator.repair_runway("09L"),
        Err(SimulationError::Runway(RunwayError::InsufficientFunds {
            required: 1500,
            available: 1000,
        }))
    );
    assert_eq!(orchestrator.runways().get("09L").unwrap().wear(), 50);
    assert_eq!(orchestrator.balance(), 1000);
}

#[test]
fn test_repair_resets_wear_and_closes_runway() {
    let mut orchestrator = Orchestrator::new(worn_config(1000)).unwrap();
    land_and_clear(&mut orchestrator);

    assert_eq!(orchestrator.repair_runway("09L").unwrap(), 1500);
    assert_eq!(orchestrator.balance(), 500);
    let runway = orchestrator.runways().get("09L").unwrap();
    assert_eq!(runway.wear(), 0);
    assert_eq!(
        runway.occupancy().map(|o| (o.reason, o.remaining_ticks)),
        Some((OccupancyReason::Repair, 5))
    );
    assert_eq!(orchestrator.event_log().events_of_type("RunwayRepaired").len(), 1);
}

#[test]
fn test_purchase_runway_debits_and_registers() {
    let mut config = quiet_config();
    config.economy.opening_balance = 2_000;
    let mut orchestrator = Orchestrator::new(config).unwrap();

    let spec = RunwaySpec::new("18C", RunwayTier::Small);
    assert_eq!(
        orchestrator.purchase_runway(&spec, 5_000),
        Err(SimulationError::Runway(RunwayError::InsufficientFunds {
            required: 5_000,
            available: 2_000,
        }))
    );
    assert!(!orchestrator.runways().contains("18C"));

    orchestrator.purchase_runway(&spec, 1_500).unwrap();
    assert_eq!(orchestrator.balance(), 500);
    assert_eq!(orchestrator.runways().len(), 3);
    assert_eq!(orchestrator.runways().get("18C").unwrap().length(), 1500);

    assert_eq!(
        orchestrator.purchase_runway(&spec, 0),
        Err(SimulationError::Runway(RunwayError::DuplicateId("18C".to_string())))
    );
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_invalid_config_rejected() {
    let mut config = quiet_config();
    config.runways.push(RunwaySpec::new("09L", RunwayTier::Small));
    assert!(matches!(
        Orchestrator::new(config),
        Err(SimulationError::InvalidConfig(_))
    ));

    let mut config = quiet_config();
    config.ticks_per_day = 0;
    assert!(matches!(
        Orchestrator::new(config),
        Err(SimulationError::InvalidConfig(_))
    ));

    // Generated flights need at least one tick of notice
    let mut config = quiet_config();
    config.arrivals.lead_time_range = (0, 5);
    assert!(matches!(
        Orchestrator::new(config),
        Err(SimulationError::InvalidConfig(_))
    ));

    // The delay penalty may not take a fare below 60%
    let mut config = quiet_config();
    config.revenue.max_penalty = 0.5;
    assert!(matches!(
        Orchestrator::new(config),
        Err(SimulationError::InvalidConfig(_))
    ));
}

#[test]
fn test_config_loads_from_partial_json() {
    let config = AirportConfig::from_json(
        r#"{
            "name": "Harbour Field",
            "rng_seed": 7,
            "runways": [{ "id": "04", "tier": "Large" }],
            "arrivals": { "rate_per_tick": 0.5 }
        }"#,
    )
    .unwrap();
    assert_eq!(config.ticks_per_day, 100);

    let orchestrator = Orchestrator::new(config).unwrap();
    assert_eq!(orchestrator.runways().len(), 1);
    assert_eq!(orchestrator.config().name, "Harbour Field");
    assert_eq!(orchestrator.config_hash().len(), 64);
}
