// ==========================================
// Pipe Inspection QMS - Shift/Station resolver
// ==========================================
// Maps a workstation id and the wall clock to shift + physical station.
// The station table is immutable after construction; callers inject the
// clock so the mapping stays deterministic under test.
// ==========================================

use crate::domain::inspection::ShiftContext;
use crate::domain::types::Shift;
use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// DAY shift covers local hours [DAY_SHIFT_START, DAY_SHIFT_END).
pub const DAY_SHIFT_START: u32 = 6;
pub const DAY_SHIFT_END: u32 = 18;

// ==========================================
// StationInfo - one registered workstation
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationInfo {
    pub area: String,
    pub machine_number: String,
}

// ==========================================
// StationMap - workstation id -> station
// ==========================================
// Built once at startup, then read-only.
#[derive(Debug, Clone)]
pub struct StationMap {
    stations: HashMap<String, StationInfo>,
}

impl StationMap {
    pub fn new(stations: HashMap<String, StationInfo>) -> Self {
        Self { stations }
    }

    /// The built-in Ennis plant mapping.
    pub fn default_ennis() -> Self {
        let mut stations = HashMap::new();
        stations.insert(
            "QMS-ENNIS-M1".to_string(),
            StationInfo {
                area: "Area A".to_string(),
                machine_number: "M1".to_string(),
            },
        );
        stations.insert(
            "QMS-ENNIS-M2".to_string(),
            StationInfo {
                area: "Area B".to_string(),
                machine_number: "M2".to_string(),
            },
        );
        Self { stations }
    }

    /// Parse a mapping from JSON: `{"<workstation id>": {"area": ..., "machine_number": ...}}`.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let stations: HashMap<String, StationInfo> = serde_json::from_str(raw)?;
        Ok(Self { stations })
    }

    pub fn get(&self, workstation_id: &str) -> Option<&StationInfo> {
        self.stations.get(workstation_id)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

// ==========================================
// ShiftResolver
// ==========================================
pub struct ShiftResolver {
    stations: StationMap,
}

impl ShiftResolver {
    pub fn new(stations: StationMap) -> Self {
        Self { stations }
    }

    /// Shift for a wall-clock instant.
    ///
    /// # Rules
    /// - DAY when the local hour is in [6, 18), NIGHT otherwise
    pub fn shift_for(now: NaiveDateTime) -> Shift {
        let hour = now.hour();
        if (DAY_SHIFT_START..DAY_SHIFT_END).contains(&hour) {
            Shift::Day
        } else {
            Shift::Night
        }
    }

    /// Resolve a workstation id to shift + station at an explicit instant.
    ///
    /// # Rules
    /// - Known workstation -> its registered {area, machine_number}
    /// - Unknown workstation -> area "Unknown", machine_number = raw id
    ///   (never an error; unregistered stations stay usable)
    pub fn resolve(&self, workstation_id: &str, now: NaiveDateTime) -> ShiftContext {
        let shift = Self::shift_for(now);
        match self.stations.get(workstation_id) {
            Some(station) => ShiftContext {
                shift,
                area: station.area.clone(),
                machine_number: station.machine_number.clone(),
            },
            None => ShiftContext {
                shift,
                area: "Unknown".to_string(),
                machine_number: workstation_id.to_string(),
            },
        }
    }

    /// Resolve against the current local wall clock.
    pub fn resolve_now(&self, workstation_id: &str) -> ShiftContext {
        self.resolve(workstation_id, Local::now().naive_local())
    }
}
