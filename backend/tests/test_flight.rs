//! Tests for the flight lifecycle and delay accounting

use airport_simulator_core_rs::models::{
    Aircraft, CancelReason, Flight, FlightCategory, FlightError, FlightStatus, PriorityTier,
    SizeClass,
};

fn commercial(number: &str, scheduled_tick: usize) -> Flight {
    Flight::new(
        number,
        Aircraft::new("A320", SizeClass::Medium, 70),
        FlightCategory::Commercial,
        150,
        scheduled_tick,
    )
}

#[test]
fn test_new_flight_is_scheduled_and_on_time() {
    let flight = commercial("AS100", 10);
    assert_eq!(flight.status(), &FlightStatus::Scheduled);
    assert_eq!(flight.original_scheduled_tick(), 10);
    assert_eq!(flight.scheduled_tick(), 10);
    assert_eq!(flight.priority(), PriorityTier::Normal);
    assert_eq!(flight.delay_ticks(10), 0);
    assert!(flight.is_on_time(10));
    assert!(!flight.is_overdue(10));
}

#[test]
fn test_emergency_category_gets_critical_priority() {
    let flight = Flight::new(
        "AS900",
        Aircraft::new("B738", SizeClass::Medium, 60),
        FlightCategory::Emergency,
        90,
        5,
    );
    assert_eq!(flight.priority(), PriorityTier::Critical);
    assert!(flight.is_emergency());
}

#[test]
fn test_critical_priority_marks_any_category_as_emergency() {
    let flight = commercial("AS101", 5).with_priority(PriorityTier::Critical);
    assert!(flight.is_emergency());
}

#[test]
fn test_overdue_flight_accrues_delay() {
    let flight = commercial("AS102", 10);
    assert!(flight.is_overdue(13));
    assert_eq!(flight.delay_ticks(13), 3);
    assert!(!flight.is_on_time(13));
}

#[test]
fn test_delay_by_moves_schedule_and_counts_reschedule() {
    let mut flight = commercial("AS103", 10);
    flight.delay_by(5, 10).unwrap();

    assert_eq!(flight.status(), &FlightStatus::Delayed);
    assert_eq!(flight.scheduled_tick(), 15);
    assert_eq!(flight.original_scheduled_tick(), 10);
    assert_eq!(flight.delay_ticks(15), 5);
    // Overrun past the new schedule adds on top
    assert_eq!(flight.delay_ticks(18), 8);
}

#[test]
fn test_delay_by_from_overdue_starts_at_now() {
    let mut flight = commercial("AS104", 10);
    flight.delay_by(5, 12).unwrap();
    assert_eq!(flight.scheduled_tick(), 17);
    assert_eq!(flight.delay_ticks(17), 7);
}

#[test]
fn test_exceeds_delay_is_strict() {
    let mut flight = commercial("AS105", 0);
    flight.delay_by(30, 0).unwrap();
    assert!(!flight.exceeds_delay(30, 30));
    assert!(flight.exceeds_delay(31, 30));
}

#[test]
fn test_land_is_terminal() {
    let mut flight = commercial("AS106", 10);
    flight.land("09L", 12).unwrap();

    assert!(flight.is_terminal());
    assert_eq!(
        flight.status(),
        &FlightStatus::Landed {
            tick: 12,
            runway_id: "09L".to_string()
        }
    );
    // Delay is frozen at landing time
    assert_eq!(flight.delay_ticks(12), 2);
    assert_eq!(flight.delay_ticks(500), 2);
    assert!(!flight.is_overdue(500));
    assert!(!flight.is_due(500));
}

#[test]
fn test_terminal_flight_rejects_every_transition() {
    let mut flight = commercial("AS107", 10);
    flight.cancel(CancelReason::DelayThreshold, 41).unwrap();
    let frozen_delay = flight.delay_ticks(41);
    let status = flight.status().clone();

    let expected = Err(FlightError::AlreadyTerminal {
        flight_number: "AS107".to_string(),
        status: "canceled".to_string(),
    });
    assert_eq!(flight.delay_by(5, 42), expected);
    assert_eq!(flight.land("09L", 42), expected);
    assert_eq!(flight.cancel(CancelReason::EmergencyExpired, 42), expected);

    assert_eq!(flight.status(), &status);
    assert_eq!(flight.scheduled_tick(), 10);
    assert_eq!(flight.delay_ticks(99), frozen_delay);
    assert!(!flight.exceeds_delay(99, 30));
}

#[test]
fn test_critical_delay_report_is_taken_once() {
    let mut flight = commercial("AS108", 10);
    assert!(flight.take_critical_delay_report());
    assert!(!flight.take_critical_delay_report());
}

#[test]
fn test_category_parsing() {
    assert_eq!("VIP".parse::<FlightCategory>(), Ok(FlightCategory::Vip));
    assert_eq!(" cargo ".parse::<FlightCategory>(), Ok(FlightCategory::Cargo));
    assert!("glider".parse::<FlightCategory>().is_err());
}

#[test]
fn test_aircraft_required_length_grows_with_weight() {
    let light = Aircraft::new("E175", SizeClass::Medium, 50);
    let heavy = Aircraft::new("A321", SizeClass::Medium, 90);
    assert!(heavy.required_runway_length() > light.required_runway_length());
    assert_eq!(light.size(), SizeClass::Medium);
}
