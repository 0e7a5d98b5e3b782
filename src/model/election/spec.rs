use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::validation::{require, ValidationErrors};

use super::{ElectionId, Position};

/// An election specification, as filled in by an admin.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElectionSpec {
    /// Election name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// When voting opens.
    pub start_time: Option<DateTime<Utc>>,
    /// When voting closes.
    pub end_time: Option<DateTime<Utc>>,
    /// When results go public; defaults to whenever the admin announces them.
    pub result_announcement_time: Option<DateTime<Utc>>,
    /// Positions on the ballot.
    pub positions: Vec<Position>,
}

impl ElectionSpec {
    /// Add a position by name. Blank and duplicate names are ignored.
    pub fn add_position(&mut self, name: &str) -> bool {
        let trimmed = name.trim();
        if trimmed.is_empty() || self.positions.iter().any(|p| p.position_name == trimmed) {
            return false;
        }
        self.positions.push(Position::new(trimmed));
        true
    }

    pub fn remove_position(&mut self, name: &str) {
        self.positions.retain(|p| p.position_name != name);
    }

    /// Check every field, collecting all problems at once.
    pub fn validate(&self) -> Result<()> {
        let mut errors = ValidationErrors::new();

        require(&mut errors, "name", &self.name, "Election name is required");

        if self.start_time.is_none() {
            errors.add("start_time", "Start time is required");
        }
        if self.end_time.is_none() {
            errors.add("end_time", "End time is required");
        }
        if let (Some(start), Some(end)) = (self.start_time, self.end_time) {
            if end <= start {
                errors.add("end_time", "End time must be after start time");
            }
        }
        if let (Some(end), Some(results)) = (self.end_time, self.result_announcement_time) {
            if results < end {
                errors.add(
                    "result_announcement_time",
                    "Results cannot be announced before election ends",
                );
            }
        }

        if self.positions.is_empty() {
            errors.add("positions", "At least one position is required");
        }
        let mut seen = HashSet::new();
        for position in &self.positions {
            let name = position.position_name.trim();
            if name.is_empty() {
                errors.add("positions", "Position names cannot be blank");
            } else if !seen.insert(name) {
                errors.add("positions", format!("Position `{name}` is listed twice"));
            }
        }

        errors.into_result()
    }

    /// Validate and convert into the request body the server expects.
    pub fn into_request(self) -> Result<CreateElectionRequest> {
        self.validate()?;
        let positions = serde_json::to_string(&self.positions)?;
        let (start, end) = match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => (start, end),
            _ => return Err(ValidationErrors::single("start_time", "Start time is required")),
        };
        Ok(CreateElectionRequest {
            election_name: self.name.trim().to_string(),
            description: (!self.description.trim().is_empty()).then(|| self.description),
            election_start_time: start,
            election_end_time: end,
            result_announcement_time: self.result_announcement_time,
            positions,
        })
    }
}

/// `POST /admin/elections` body. Positions travel as a JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateElectionRequest {
    pub election_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub election_start_time: DateTime<Utc>,
    pub election_end_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_announcement_time: Option<DateTime<Utc>>,
    pub positions: String,
}

/// Server acknowledgement of a created election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateElectionResponse {
    pub election_id: ElectionId,
    #[serde(default)]
    pub message: String,
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    use chrono::{Duration, Timelike};

    macro_rules! midnight_today {
        () => {{
            Utc::now()
                .with_hour(0)
                .and_then(|t| t.with_minute(0))
                .and_then(|t| t.with_second(0))
                .and_then(|t| t.with_nanosecond(0))
                .unwrap()
        }};
    }

    impl ElectionSpec {
        pub fn current_example() -> Self {
            let start_time = midnight_today!();
            let end_time = start_time + Duration::days(30);
            let mut spec = Self {
                name: "Student Union 2026".to_string(),
                description: "Annual officer elections".to_string(),
                start_time: Some(start_time),
                end_time: Some(end_time),
                result_announcement_time: Some(end_time + Duration::days(1)),
                positions: Vec::new(),
            };
            spec.add_position("President");
            spec.add_position("Secretary");
            spec
        }
    }
}
