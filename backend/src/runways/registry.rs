//! Runway registry
//!
//! Runways are kept in registration order. That order is the tie-break for
//! automatic selection, so it must never be shuffled.

use serde::{Deserialize, Serialize};

use crate::models::{Occupancy, Runway, RunwayError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunwayRegistry {
    runways: Vec<Runway>,
}

impl RunwayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a runway; ids must be unique
    pub fn add(&mut self, runway: Runway) -> Result<(), RunwayError> {
        if self.contains(runway.id()) {
            return Err(RunwayError::DuplicateId(runway.id().to_string()));
        }
        self.runways.push(runway);
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.runways.iter().any(|r| r.id() == id)
    }

    pub fn get(&self, id: &str) -> Option<&Runway> {
        self.runways.iter().find(|r| r.id() == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Runway> {
        self.runways.iter_mut().find(|r| r.id() == id)
    }

    pub fn require_mut(&mut self, id: &str) -> Result<&mut Runway, RunwayError> {
        self.get_mut(id)
            .ok_or_else(|| RunwayError::NotFound(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Runway> {
        self.runways.iter()
    }

    pub fn len(&self) -> usize {
        self.runways.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runways.is_empty()
    }

    /// Count down every occupancy by one tick.
    ///
    /// Returns `(runway_id, cleared occupancy)` for each runway freed.
    pub fn update_status(&mut self) -> Vec<(String, Occupancy)> {
        self.runways
            .iter_mut()
            .filter_map(|runway| {
                runway
                    .update_status()
                    .map(|cleared| (runway.id().to_string(), cleared))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OccupancyReason, RunwayTier};

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut registry = RunwayRegistry::new();
        registry.add(Runway::new("09L", RunwayTier::Small)).unwrap();
        assert_eq!(
            registry.add(Runway::new("09L", RunwayTier::Large)),
            Err(RunwayError::DuplicateId("09L".to_string()))
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_update_status_reports_released_runways() {
        let mut registry = RunwayRegistry::new();
        registry.add(Runway::new("A", RunwayTier::Small)).unwrap();
        registry.add(Runway::new("B", RunwayTier::Small)).unwrap();
        registry
            .require_mut("A")
            .unwrap()
            .occupy(OccupancyReason::Landing, 1, None)
            .unwrap();
        registry
            .require_mut("B")
            .unwrap()
            .occupy(OccupancyReason::Repair, 2, None)
            .unwrap();

        let released = registry.update_status();
        assert_eq!(released.len(), 1);
        assert_eq!(released[0].0, "A");
        assert!(registry.get("B").unwrap().is_occupied());
    }
}
