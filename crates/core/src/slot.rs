//! The clinic's fixed daily schedule.
//!
//! A [`Slot`] is one half-hour label from [`DAILY_SLOT_LABELS`]. Construction goes through
//! [`Slot::parse`], so a `Slot` value is always on the schedule.

use crate::constants::DAILY_SLOT_LABELS;
use crate::error::{ClinicError, ClinicResult};
use chrono::{NaiveTime, Timelike};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slot(NaiveTime);

impl Slot {
    /// Parses an `HH:MM` label, accepting only times on the daily schedule.
    pub fn parse(label: &str) -> ClinicResult<Self> {
        let label = label.trim();
        let time = NaiveTime::parse_from_str(label, "%H:%M")
            .map_err(|_| ClinicError::InvalidInput(format!("'{label}' is not an HH:MM time")))?;
        let slot = Self(time);
        if !DAILY_SLOT_LABELS.contains(&slot.label().as_str()) {
            return Err(ClinicError::InvalidInput(format!(
                "'{label}' is not a slot on the clinic schedule"
            )));
        }
        Ok(slot)
    }

    pub fn time(&self) -> NaiveTime {
        self.0
    }

    /// The `HH:MM` label.
    pub fn label(&self) -> String {
        format!("{:02}:{:02}", self.0.hour(), self.0.minute())
    }
}

/// All slots of a clinic day, in schedule order.
pub fn daily_schedule() -> Vec<Slot> {
    DAILY_SLOT_LABELS
        .iter()
        .map(|label| {
            let time = NaiveTime::parse_from_str(label, "%H:%M")
                .unwrap_or_else(|_| unreachable!("schedule label {label} is well-formed"));
            Slot(time)
        })
        .collect()
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Slot {
    type Err = ClinicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl serde::Serialize for Slot {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.label())
    }
}

impl<'de> serde::Deserialize<'de> for Slot {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Slot::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_has_sixteen_ordered_slots() {
        let schedule = daily_schedule();
        assert_eq!(schedule.len(), 16);
        assert_eq!(schedule.first().map(Slot::label).as_deref(), Some("08:00"));
        assert_eq!(schedule.last().map(Slot::label).as_deref(), Some("17:30"));
        assert!(schedule.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn schedule_skips_lunch_break() {
        let labels: Vec<String> = daily_schedule().iter().map(Slot::label).collect();
        assert!(labels.contains(&"11:30".to_string()));
        assert!(!labels.contains(&"12:00".to_string()));
        assert!(!labels.contains(&"13:30".to_string()));
        assert!(labels.contains(&"14:00".to_string()));
    }

    #[test]
    fn parse_rejects_times_off_schedule() {
        assert!(Slot::parse("12:00").is_err());
        assert!(Slot::parse("08:15").is_err());
        assert!(Slot::parse("8am").is_err());
        assert!(Slot::parse("").is_err());
    }

    #[test]
    fn parse_trims_surrounding_whitespace() {
        let slot = Slot::parse(" 08:30 ").expect("valid slot");
        assert_eq!(slot.label(), "08:30");
    }

    #[test]
    fn serialises_as_label() {
        let slot = Slot::parse("14:30").unwrap();
        assert_eq!(serde_json::to_string(&slot).unwrap(), "\"14:30\"");
        let back: Slot = serde_json::from_str("\"14:30\"").unwrap();
        assert_eq!(back, slot);
    }
}
