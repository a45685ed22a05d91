//! Tests for the landing dispatcher state machine

use airport_simulator_core_rs::dispatch::{
    DispatchConfig, DispatchContext, DispatchMode, DispatchOutcome, DispatchPhase,
    LandingDispatcher, LeastWornSelector, RunwayChoice, RunwaySelector, ScriptedSelector,
};
use airport_simulator_core_rs::models::{
    Account, Aircraft, DelayReason, Event, EventLog, Flight, FlightCategory, FlightStatus,
    OccupancyReason, Runway, RunwayTier, SizeClass, TransactionKind,
};
use airport_simulator_core_rs::revenue::{ModifierSet, RevenuePipeline};
use airport_simulator_core_rs::rng::RngManager;
use airport_simulator_core_rs::runways::{RunwayAllocator, RunwayRegistry, WearConfig};

/// Owns everything a dispatch call borrows
struct Harness {
    registry: RunwayRegistry,
    allocator: RunwayAllocator,
    pipeline: RevenuePipeline,
    modifiers: ModifierSet,
    account: Account,
    rng: RngManager,
    events: EventLog,
    dispatcher: LandingDispatcher,
    landing_duration_reduction: usize,
}

impl Harness {
    fn new(runways: Vec<Runway>) -> Self {
        let mut registry = RunwayRegistry::new();
        for runway in runways {
            registry.add(runway).unwrap();
        }
        Self {
            registry,
            allocator: RunwayAllocator::new(WearConfig {
                random_max: 0,
                ..WearConfig::default()
            }),
            pipeline: RevenuePipeline::default(),
            modifiers: ModifierSet::new(),
            account: Account::new(0),
            rng: RngManager::new(11),
            events: EventLog::new(),
            dispatcher: LandingDispatcher::default(),
            landing_duration_reduction: 0,
        }
    }

    fn dispatch(
        &mut self,
        flight: &mut Flight,
        tick: usize,
        mode: DispatchMode,
        selector: Option<&mut dyn RunwaySelector>,
    ) -> (DispatchOutcome, Vec<DispatchPhase>) {
        let mut ctx = DispatchContext {
            tick,
            mode,
            registry: &mut self.registry,
            allocator: &self.allocator,
            pipeline: &self.pipeline,
            modifiers: &self.modifiers,
            account: &mut self.account,
            rng: &mut self.rng,
            events: &mut self.events,
            selector: selector.map(|s| s as &mut dyn RunwaySelector),
            weather_impact: 0.0,
            weather_resistance: 0.0,
            traffic_volume: 0,
            landing_duration_reduction: self.landing_duration_reduction,
        };
        self.dispatcher.dispatch(flight, &mut ctx).unwrap()
    }

    fn occupy(&mut self, runway_id: &str, ticks: usize) {
        self.registry
            .require_mut(runway_id)
            .unwrap()
            .occupy(OccupancyReason::Landing, ticks, Some("XX1".to_string()))
            .unwrap();
    }
}

fn two_runways() -> Vec<Runway> {
    vec![
        Runway::new("09L", RunwayTier::Medium),
        Runway::new("27R", RunwayTier::Large),
    ]
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

fn landed_on(outcome: &DispatchOutcome) -> Option<&str> {
    match outcome {
        DispatchOutcome::Landed(report) => Some(report.runway_id.as_str()),
        DispatchOutcome::Delayed { .. } => None,
    }
}

// ============================================================================
// Automatic mode
// ============================================================================

#[test]
fn test_automatic_lands_on_first_eligible_runway() {
    let mut harness = Harness::new(two_runways());
    let mut flight = commercial("AS1", 10);

    let (outcome, phases) = harness.dispatch(&mut flight, 10, DispatchMode::Automatic, None);

    assert_eq!(landed_on(&outcome), Some("09L"));
    assert_eq!(
        phases,
        vec![
            DispatchPhase::Evaluate,
            DispatchPhase::RunwayFound {
                runway_id: "09L".to_string()
            },
            DispatchPhase::LandingSucceeded,
        ]
    );
    assert!(matches!(flight.status(), FlightStatus::Landed { tick: 10, .. }));
    assert_eq!(harness.account.balance(), 1_000);
    assert_eq!(harness.account.records()[0].kind, TransactionKind::LandingRevenue);
}

#[test]
fn test_landing_occupies_runway_and_applies_wear() {
    let mut harness = Harness::new(two_runways());
    let mut flight = commercial("AS1", 10);

    let (outcome, _) = harness.dispatch(&mut flight, 10, DispatchMode::Automatic, None);
    let DispatchOutcome::Landed(report) = outcome else {
        panic!("expected landing");
    };

    let runway = harness.registry.get("09L").unwrap();
    let occupancy = runway.occupancy().unwrap();
    assert_eq!(occupancy.reason, OccupancyReason::Landing);
    assert_eq!(occupancy.remaining_ticks, 3);
    assert_eq!(occupancy.flight_number.as_deref(), Some("AS1"));
    assert_eq!(runway.wear(), 2);
    assert_eq!(report.wear.wear, 2);
    assert!(report.on_time);
    assert!(report.perfect);
}

#[test]
fn test_landing_duration_reduction_never_below_one() {
    let mut harness = Harness::new(two_runways());
    harness.landing_duration_reduction = 10;
    let mut flight = commercial("AS1", 10);

    let (outcome, _) = harness.dispatch(&mut flight, 10, DispatchMode::Automatic, None);
    let DispatchOutcome::Landed(report) = outcome else {
        panic!("expected landing");
    };
    assert_eq!(report.occupancy_ticks, 1);
    assert_eq!(LandingDispatcher::default().landing_duration(2), 1);
    assert_eq!(
        LandingDispatcher::new(DispatchConfig {
            landing_duration: 6,
            ..DispatchConfig::default()
        })
        .landing_duration(2),
        4
    );
}

#[test]
fn test_no_runway_delays_with_retry_delay() {
    let mut harness = Harness::new(vec![Runway::new("S1", RunwayTier::Small)]);
    let mut flight = commercial("AS1", 10);

    let (outcome, phases) = harness.dispatch(&mut flight, 10, DispatchMode::Automatic, None);

    assert_eq!(
        outcome,
        DispatchOutcome::Delayed {
            reason: DelayReason::NoRunwayAvailable,
            added_ticks: 5,
        }
    );
    assert_eq!(
        phases,
        vec![
            DispatchPhase::Evaluate,
            DispatchPhase::NoRunway,
            DispatchPhase::LandingFailed
        ]
    );
    // Delayed, never canceled by the dispatcher
    assert_eq!(flight.status(), &FlightStatus::Delayed);
    assert_eq!(flight.scheduled_tick(), 15);
    assert_eq!(harness.account.balance(), 0);
    assert_eq!(harness.events.events_of_type("FlightDelayed").len(), 1);
}

#[test]
fn test_overdue_flight_logs_overdue_and_still_lands() {
    let mut harness = Harness::new(two_runways());
    let mut flight = commercial("AS1", 10);

    let (outcome, _) = harness.dispatch(&mut flight, 13, DispatchMode::Automatic, None);

    assert!(outcome.is_landed());
    assert!(harness.events.events().iter().any(|e| matches!(
        e,
        Event::FlightOverdue { overdue_by: 3, .. }
    )));
    let DispatchOutcome::Landed(report) = outcome else {
        unreachable!()
    };
    assert!(!report.on_time);
    assert!(!report.perfect);
    assert_eq!(report.delay_ticks, 3);
}

#[test]
fn test_busy_runways_mean_no_runway() {
    let mut harness = Harness::new(two_runways());
    harness.occupy("09L", 2);
    harness.occupy("27R", 2);
    let mut flight = commercial("AS1", 10);

    let (outcome, _) = harness.dispatch(&mut flight, 10, DispatchMode::Automatic, None);
    assert!(!outcome.is_landed());

    // Once a runway frees up the same flight lands
    harness.registry.update_status();
    harness.registry.update_status();
    let (outcome, _) = harness.dispatch(&mut flight, 15, DispatchMode::Automatic, None);
    assert_eq!(landed_on(&outcome), Some("09L"));
}

// ============================================================================
// Manual mode
// ============================================================================

#[test]
fn test_manual_choice_is_honoured() {
    let mut harness = Harness::new(two_runways());
    let mut selector = ScriptedSelector::new([RunwayChoice::Runway("27R".to_string())]);
    let mut flight = commercial("AS1", 10);

    let (outcome, _) =
        harness.dispatch(&mut flight, 10, DispatchMode::Manual, Some(&mut selector));

    assert_eq!(landed_on(&outcome), Some("27R"));
    assert_eq!(
        selector.requests(),
        &[(
            "AS1".to_string(),
            vec!["09L".to_string(), "27R".to_string()]
        )]
    );
}

#[test]
fn test_manual_none_delays_by_manual_delay() {
    let mut harness = Harness::new(two_runways());
    let mut selector = ScriptedSelector::new([RunwayChoice::Delay]);
    let mut flight = commercial("AS1", 10);

    let (outcome, phases) =
        harness.dispatch(&mut flight, 10, DispatchMode::Manual, Some(&mut selector));

    assert_eq!(
        outcome,
        DispatchOutcome::Delayed {
            reason: DelayReason::ManualDelay,
            added_ticks: 5,
        }
    );
    assert_eq!(phases.last(), Some(&DispatchPhase::LandingFailed));
    assert_eq!(flight.scheduled_tick(), 15);
}

#[test]
fn test_manual_invalid_answer_falls_back_to_automatic() {
    let mut harness = Harness::new(two_runways());
    let mut selector = ScriptedSelector::new([
        RunwayChoice::Invalid("banana".to_string()),
        RunwayChoice::Runway("99X".to_string()),
    ]);

    let mut first = commercial("AS1", 10);
    let (outcome, _) = harness.dispatch(&mut first, 10, DispatchMode::Manual, Some(&mut selector));
    assert_eq!(landed_on(&outcome), Some("09L"));

    let mut second = commercial("AS2", 10);
    let (outcome, _) = harness.dispatch(&mut second, 10, DispatchMode::Manual, Some(&mut selector));
    assert_eq!(landed_on(&outcome), Some("27R"));

    assert_eq!(harness.events.events_of_type("ManualSelectionFallback").len(), 2);
}

#[test]
fn test_manual_ineligible_runway_falls_back() {
    let mut harness = Harness::new(vec![
        Runway::new("S1", RunwayTier::Small),
        Runway::new("M1", RunwayTier::Medium),
    ]);
    let mut selector = ScriptedSelector::new([RunwayChoice::Runway("S1".to_string())]);
    let mut flight = commercial("AS1", 10);

    let (outcome, _) =
        harness.dispatch(&mut flight, 10, DispatchMode::Manual, Some(&mut selector));
    assert_eq!(landed_on(&outcome), Some("M1"));
}

#[test]
fn test_manual_occupied_choice_is_a_failed_landing() {
    let mut harness = Harness::new(two_runways());
    harness.occupy("27R", 3);
    let mut selector = ScriptedSelector::new([RunwayChoice::Runway("27R".to_string())]);
    let mut flight = commercial("AS1", 10);

    let (outcome, phases) =
        harness.dispatch(&mut flight, 10, DispatchMode::Manual, Some(&mut selector));

    assert_eq!(
        outcome,
        DispatchOutcome::Delayed {
            reason: DelayReason::RunwayOccupiedAtCommit {
                runway_id: "27R".to_string()
            },
            added_ticks: 5,
        }
    );
    assert_eq!(
        phases,
        vec![
            DispatchPhase::Evaluate,
            DispatchPhase::RunwayFound {
                runway_id: "27R".to_string()
            },
            DispatchPhase::LandingFailed,
        ]
    );
    assert_eq!(flight.status(), &FlightStatus::Delayed);
}

#[test]
fn test_manual_without_selector_falls_back() {
    let mut harness = Harness::new(two_runways());
    let mut flight = commercial("AS1", 10);

    let (outcome, _) = harness.dispatch(&mut flight, 10, DispatchMode::Manual, None);
    assert_eq!(landed_on(&outcome), Some("09L"));
}

#[test]
fn test_closure_and_least_worn_selectors() {
    let mut harness = Harness::new(vec![
        Runway::new("M1", RunwayTier::Medium).with_wear(40),
        Runway::new("M2", RunwayTier::Medium).with_wear(10),
    ]);

    let mut least_worn = LeastWornSelector;
    let mut first = commercial("AS1", 10);
    let (outcome, _) =
        harness.dispatch(&mut first, 10, DispatchMode::Manual, Some(&mut least_worn));
    assert_eq!(landed_on(&outcome), Some("M2"));

    let mut last = |_: &Flight, candidates: &[&Runway]| {
        RunwayChoice::Runway(candidates[candidates.len() - 1].id().to_string())
    };
    let mut second = commercial("AS2", 10);
    let (outcome, _) = harness.dispatch(&mut second, 10, DispatchMode::Manual, Some(&mut last));
    // M2 is busy with AS1, so M1 is the only candidate
    assert_eq!(landed_on(&outcome), Some("M1"));
}

#[test]
fn test_choice_parsing() {
    let ids = vec!["09L".to_string(), "27R".to_string()];
    assert_eq!(RunwayChoice::parse("1", &ids), RunwayChoice::Runway("09L".to_string()));
    assert_eq!(RunwayChoice::parse(" 27R ", &ids), RunwayChoice::Runway("27R".to_string()));
    assert_eq!(RunwayChoice::parse("HOLD", &ids), RunwayChoice::Delay);
    assert_eq!(RunwayChoice::parse("none", &ids), RunwayChoice::Delay);
    assert_eq!(RunwayChoice::parse("0", &ids), RunwayChoice::Invalid("0".to_string()));
}

#[test]
fn test_terminal_flight_is_an_error() {
    let mut harness = Harness::new(two_runways());
    let mut flight = commercial("AS1", 10);
    flight.land("09L", 10).unwrap();

    let mut ctx = DispatchContext {
        tick: 11,
        mode: DispatchMode::Automatic,
        registry: &mut harness.registry,
        allocator: &harness.allocator,
        pipeline: &harness.pipeline,
        modifiers: &harness.modifiers,
        account: &mut harness.account,
        rng: &mut harness.rng,
        events: &mut harness.events,
        selector: None,
        weather_impact: 0.0,
        weather_resistance: 0.0,
        traffic_volume: 0,
        landing_duration_reduction: 0,
    };
    assert!(harness.dispatcher.dispatch(&mut flight, &mut ctx).is_err());
}
