// ==========================================
// Pipe Inspection QMS - Domain type definitions
// ==========================================
// Closed enumerations shared by the engine, repositories and APIs.
// Serialized form: SCREAMING_SNAKE_CASE (matches database storage)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Inspection Status
// ==========================================
// Terminal: COMPLETED, SCRAPPED. The three *_INSPECTION values are the
// open set; per (work order, connection, pipe number) at most one open
// record may exist per stage, and the highest round is the live one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InspectionStatus {
    FirstInspection,  // Initial inspection in progress
    SecondInspection, // First re-inspection required
    ThirdInspection,  // Second re-inspection required
    Completed,        // Accepted (pass, or manager override)
    Scrapped,         // Re-inspection budget exhausted or Tier1 defect
}

impl fmt::Display for InspectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InspectionStatus::FirstInspection => write!(f, "FIRST_INSPECTION"),
            InspectionStatus::SecondInspection => write!(f, "SECOND_INSPECTION"),
            InspectionStatus::ThirdInspection => write!(f, "THIRD_INSPECTION"),
            InspectionStatus::Completed => write!(f, "COMPLETED"),
            InspectionStatus::Scrapped => write!(f, "SCRAPPED"),
        }
    }
}

impl InspectionStatus {
    /// Parse the database string form.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "FIRST_INSPECTION" => Some(InspectionStatus::FirstInspection),
            "SECOND_INSPECTION" => Some(InspectionStatus::SecondInspection),
            "THIRD_INSPECTION" => Some(InspectionStatus::ThirdInspection),
            "COMPLETED" => Some(InspectionStatus::Completed),
            "SCRAPPED" => Some(InspectionStatus::Scrapped),
            _ => None,
        }
    }

    /// String form stored in the database.
    pub fn to_db_str(&self) -> &'static str {
        match self {
            InspectionStatus::FirstInspection => "FIRST_INSPECTION",
            InspectionStatus::SecondInspection => "SECOND_INSPECTION",
            InspectionStatus::ThirdInspection => "THIRD_INSPECTION",
            InspectionStatus::Completed => "COMPLETED",
            InspectionStatus::Scrapped => "SCRAPPED",
        }
    }

    /// True for COMPLETED and SCRAPPED; no further rounds follow.
    pub fn is_terminal(&self) -> bool {
        matches!(self, InspectionStatus::Completed | InspectionStatus::Scrapped)
    }

    /// True for the three *_INSPECTION values still awaiting a decision.
    pub fn is_open(&self) -> bool {
        !self.is_terminal()
    }
}

// ==========================================
// NCR Status
// ==========================================
// Fixed at creation time: CLOSED exactly when the owning inspection
// ended terminal, OPEN otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NcrStatus {
    Open,   // Owning inspection still in the re-inspection sequence
    Closed, // Owning inspection ended COMPLETED or SCRAPPED
}

impl fmt::Display for NcrStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NcrStatus::Open => write!(f, "OPEN"),
            NcrStatus::Closed => write!(f, "CLOSED"),
        }
    }
}

impl NcrStatus {
    /// Parse the database string form.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "OPEN" => Some(NcrStatus::Open),
            "CLOSED" => Some(NcrStatus::Closed),
            _ => None,
        }
    }

    /// String form stored in the database.
    pub fn to_db_str(&self) -> &'static str {
        match self {
            NcrStatus::Open => "OPEN",
            NcrStatus::Closed => "CLOSED",
        }
    }
}

// ==========================================
// NCR Sync Status
// ==========================================
// Push state toward the plant quality system; updated by the sync job,
// independent of the OPEN/CLOSED lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NcrSyncStatus {
    Pending, // Not yet pushed
    Synced,  // Pushed, synced_at records when
}

impl fmt::Display for NcrSyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NcrSyncStatus::Pending => write!(f, "PENDING"),
            NcrSyncStatus::Synced => write!(f, "SYNCED"),
        }
    }
}

impl NcrSyncStatus {
    /// Parse the database string form.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "PENDING" => Some(NcrSyncStatus::Pending),
            "SYNCED" => Some(NcrSyncStatus::Synced),
            _ => None,
        }
    }

    /// String form stored in the database.
    pub fn to_db_str(&self) -> &'static str {
        match self {
            NcrSyncStatus::Pending => "PENDING",
            NcrSyncStatus::Synced => "SYNCED",
        }
    }
}

// ==========================================
// Shift
// ==========================================
// DAY covers local hours [6, 18); everything else is NIGHT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Shift {
    Day,
    Night,
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shift::Day => write!(f, "DAY"),
            Shift::Night => write!(f, "NIGHT"),
        }
    }
}

impl Shift {
    /// Parse the database string form.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "DAY" => Some(Shift::Day),
            "NIGHT" => Some(Shift::Night),
            _ => None,
        }
    }

    /// String form stored in the database.
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Shift::Day => "DAY",
            Shift::Night => "NIGHT",
        }
    }
}
