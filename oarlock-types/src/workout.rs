//! Workout configuration vocabulary

use std::fmt;

use crate::error::{Error, Result};

/// Workout type as programmed into the monitor
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WorkoutType {
    JustRowNoSplits = 0,
    JustRowSplits = 1,
    FixedDistNoSplits = 2,
    FixedDistSplits = 3,
    FixedTimeNoSplits = 4,
    FixedTimeSplits = 5,
    FixedTimeInterval = 6,
    FixedDistInterval = 7,
    VariableInterval = 8,
    VariableUndefinedRestInterval = 9,
    FixedCalorieSplits = 10,
    FixedWattMinuteSplits = 11,
    FixedCalsInterval = 12,
}

impl WorkoutType {
    pub fn name(self) -> &'static str {
        match self {
            Self::JustRowNoSplits => "Just Row (No Splits)",
            Self::JustRowSplits => "Just Row (Splits)",
            Self::FixedDistNoSplits => "Fixed Distance (No Splits)",
            Self::FixedDistSplits => "Fixed Distance (Splits)",
            Self::FixedTimeNoSplits => "Fixed Time (No Splits)",
            Self::FixedTimeSplits => "Fixed Time (Splits)",
            Self::FixedTimeInterval => "Fixed Time Interval",
            Self::FixedDistInterval => "Fixed Distance Interval",
            Self::VariableInterval => "Variable Interval",
            Self::VariableUndefinedRestInterval => "Variable Interval (Undefined Rest)",
            Self::FixedCalorieSplits => "Fixed Calorie (Splits)",
            Self::FixedWattMinuteSplits => "Fixed Watt-Minute (Splits)",
            Self::FixedCalsInterval => "Fixed Calorie Interval",
        }
    }
}

impl From<WorkoutType> for u8 {
    fn from(t: WorkoutType) -> u8 {
        t as u8
    }
}

impl TryFrom<u8> for WorkoutType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::JustRowNoSplits),
            1 => Ok(Self::JustRowSplits),
            2 => Ok(Self::FixedDistNoSplits),
            3 => Ok(Self::FixedDistSplits),
            4 => Ok(Self::FixedTimeNoSplits),
            5 => Ok(Self::FixedTimeSplits),
            6 => Ok(Self::FixedTimeInterval),
            7 => Ok(Self::FixedDistInterval),
            8 => Ok(Self::VariableInterval),
            9 => Ok(Self::VariableUndefinedRestInterval),
            10 => Ok(Self::FixedCalorieSplits),
            11 => Ok(Self::FixedWattMinuteSplits),
            12 => Ok(Self::FixedCalsInterval),
            _ => Err(Error::unknown("workout type", value)),
        }
    }
}

impl fmt::Display for WorkoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Interval type reported for interval workouts
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum IntervalType {
    Time = 0,
    Distance = 1,
    Rest = 2,
    TimeRestUndefined = 3,
    DistanceRestUndefined = 4,
    RestUndefined = 5,
    Calorie = 6,
    CalorieRestUndefined = 7,
    WattMinute = 8,
    WattMinuteRestUndefined = 9,
    None = 255,
}

impl IntervalType {
    pub fn name(self) -> &'static str {
        match self {
            Self::Time => "Time",
            Self::Distance => "Distance",
            Self::Rest => "Rest",
            Self::TimeRestUndefined => "Time (Undefined Rest)",
            Self::DistanceRestUndefined => "Distance (Undefined Rest)",
            Self::RestUndefined => "Undefined Rest",
            Self::Calorie => "Calorie",
            Self::CalorieRestUndefined => "Calorie (Undefined Rest)",
            Self::WattMinute => "Watt-Minute",
            Self::WattMinuteRestUndefined => "Watt-Minute (Undefined Rest)",
            Self::None => "None",
        }
    }
}

impl From<IntervalType> for u8 {
    fn from(t: IntervalType) -> u8 {
        t as u8
    }
}

impl TryFrom<u8> for IntervalType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Time),
            1 => Ok(Self::Distance),
            2 => Ok(Self::Rest),
            3 => Ok(Self::TimeRestUndefined),
            4 => Ok(Self::DistanceRestUndefined),
            5 => Ok(Self::RestUndefined),
            6 => Ok(Self::Calorie),
            7 => Ok(Self::CalorieRestUndefined),
            8 => Ok(Self::WattMinute),
            9 => Ok(Self::WattMinuteRestUndefined),
            255 => Ok(Self::None),
            _ => Err(Error::unknown("interval type", value)),
        }
    }
}

impl fmt::Display for IntervalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Progress of the currently programmed workout
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WorkoutState {
    WaitToBegin = 0,
    WorkoutRow = 1,
    CountdownPause = 2,
    IntervalRest = 3,
    IntervalWorkTime = 4,
    IntervalWorkDistance = 5,
    IntervalRestEndToWorkTime = 6,
    IntervalRestEndToWorkDistance = 7,
    IntervalWorkTimeToRest = 8,
    IntervalWorkDistanceToRest = 9,
    WorkoutEnd = 10,
    Terminate = 11,
    WorkoutLogged = 12,
    Rearm = 13,
}

impl WorkoutState {
    pub fn name(self) -> &'static str {
        match self {
            Self::WaitToBegin => "Wait To Begin",
            Self::WorkoutRow => "Workout Row",
            Self::CountdownPause => "Countdown Pause",
            Self::IntervalRest => "Interval Rest",
            Self::IntervalWorkTime => "Interval Work Time",
            Self::IntervalWorkDistance => "Interval Work Distance",
            Self::IntervalRestEndToWorkTime => "Interval Rest End To Work Time",
            Self::IntervalRestEndToWorkDistance => "Interval Rest End To Work Distance",
            Self::IntervalWorkTimeToRest => "Interval Work Time To Rest",
            Self::IntervalWorkDistanceToRest => "Interval Work Distance To Rest",
            Self::WorkoutEnd => "Workout End",
            Self::Terminate => "Terminate",
            Self::WorkoutLogged => "Workout Logged",
            Self::Rearm => "Rearm",
        }
    }

    /// True once the workout has run to completion or been terminated
    pub fn is_over(self) -> bool {
        matches!(
            self,
            Self::WorkoutEnd | Self::Terminate | Self::WorkoutLogged
        )
    }
}

impl From<WorkoutState> for u8 {
    fn from(s: WorkoutState) -> u8 {
        s as u8
    }
}

impl TryFrom<u8> for WorkoutState {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::WaitToBegin),
            1 => Ok(Self::WorkoutRow),
            2 => Ok(Self::CountdownPause),
            3 => Ok(Self::IntervalRest),
            4 => Ok(Self::IntervalWorkTime),
            5 => Ok(Self::IntervalWorkDistance),
            6 => Ok(Self::IntervalRestEndToWorkTime),
            7 => Ok(Self::IntervalRestEndToWorkDistance),
            8 => Ok(Self::IntervalWorkTimeToRest),
            9 => Ok(Self::IntervalWorkDistanceToRest),
            10 => Ok(Self::WorkoutEnd),
            11 => Ok(Self::Terminate),
            12 => Ok(Self::WorkoutLogged),
            13 => Ok(Self::Rearm),
            _ => Err(Error::unknown("workout state", value)),
        }
    }
}

impl fmt::Display for WorkoutState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Predefined workout slots addressable with the public SetProgram command
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WorkoutNumber {
    Programmed = 0,
    Default1 = 1,
    Default2 = 2,
    Default3 = 3,
    Default4 = 4,
    Default5 = 5,
    Custom1 = 6,
    Custom2 = 7,
    Custom3 = 8,
    Custom4 = 9,
    Custom5 = 10,
}

impl From<WorkoutNumber> for u8 {
    fn from(n: WorkoutNumber) -> u8 {
        n as u8
    }
}

/// Duration-type tag prefixed to workout and split duration payloads
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DurationType {
    /// Duration in hundredths of a second
    Time = 0x00,
    /// Duration in calories
    Calories = 0x40,
    /// Duration in meters
    Distance = 0x80,
    /// Duration in watt-minutes
    WattMinutes = 0xC0,
}

impl From<DurationType> for u8 {
    fn from(t: DurationType) -> u8 {
        t as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_workout_type_round_trip() {
        for raw in 0..=12u8 {
            let t = WorkoutType::try_from(raw).unwrap();
            assert_eq!(u8::from(t), raw);
        }
        assert!(WorkoutType::try_from(13).is_err());
    }

    #[test]
    fn test_interval_type_none() {
        assert_eq!(IntervalType::try_from(255).unwrap(), IntervalType::None);
        assert!(IntervalType::try_from(10).is_err());
    }

    #[test]
    fn test_workout_state_is_over() {
        assert!(WorkoutState::WorkoutEnd.is_over());
        assert!(WorkoutState::WorkoutLogged.is_over());
        assert!(!WorkoutState::WorkoutRow.is_over());
    }

    #[test]
    fn test_duration_type_tags() {
        assert_eq!(u8::from(DurationType::Time), 0x00);
        assert_eq!(u8::from(DurationType::Calories), 0x40);
        assert_eq!(u8::from(DurationType::Distance), 0x80);
        assert_eq!(u8::from(DurationType::WattMinutes), 0xC0);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(WorkoutType::FixedDistSplits.to_string(), "Fixed Distance (Splits)");
        assert_eq!(IntervalType::Rest.to_string(), "Rest");
    }
}
