//! Monitor and flywheel state vocabulary

use std::fmt;

use crate::error::{Error, Result};

/// Operational state of the monitor firmware
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OperationalState {
    Reset = 0,
    Ready = 1,
    Workout = 2,
    Warmup = 3,
    Race = 4,
    PowerOff = 5,
    Pause = 6,
    InvokeBootloader = 7,
    PowerOffShip = 8,
    IdleCharge = 9,
    Idle = 10,
    MfgTest = 11,
    FirmwareUpdate = 12,
    DragFactor = 13,
    DragFactorCalibration = 100,
}

impl OperationalState {
    pub fn name(self) -> &'static str {
        match self {
            Self::Reset => "Reset",
            Self::Ready => "Ready",
            Self::Workout => "Workout",
            Self::Warmup => "Warmup",
            Self::Race => "Race",
            Self::PowerOff => "PowerOff",
            Self::Pause => "Pause",
            Self::InvokeBootloader => "InvokeBootloader",
            Self::PowerOffShip => "PowerOffShip",
            Self::IdleCharge => "IdleCharge",
            Self::Idle => "Idle",
            Self::MfgTest => "MfgTest",
            Self::FirmwareUpdate => "FirmwareUpdate",
            Self::DragFactor => "DragFactor",
            Self::DragFactorCalibration => "DragFactorCalibration",
        }
    }
}

impl From<OperationalState> for u8 {
    fn from(s: OperationalState) -> u8 {
        s as u8
    }
}

impl TryFrom<u8> for OperationalState {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Reset),
            1 => Ok(Self::Ready),
            2 => Ok(Self::Workout),
            3 => Ok(Self::Warmup),
            4 => Ok(Self::Race),
            5 => Ok(Self::PowerOff),
            6 => Ok(Self::Pause),
            7 => Ok(Self::InvokeBootloader),
            8 => Ok(Self::PowerOffShip),
            9 => Ok(Self::IdleCharge),
            10 => Ok(Self::Idle),
            11 => Ok(Self::MfgTest),
            12 => Ok(Self::FirmwareUpdate),
            13 => Ok(Self::DragFactor),
            100 => Ok(Self::DragFactorCalibration),
            _ => Err(Error::unknown("operational state", value)),
        }
    }
}

impl fmt::Display for OperationalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether the flywheel is being driven
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RowingState {
    Inactive = 0,
    Active = 1,
}

impl From<RowingState> for u8 {
    fn from(s: RowingState) -> u8 {
        s as u8
    }
}

impl TryFrom<u8> for RowingState {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Inactive),
            1 => Ok(Self::Active),
            _ => Err(Error::unknown("rowing state", value)),
        }
    }
}

impl fmt::Display for RowingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        })
    }
}

/// Phase of the current stroke
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StrokeState {
    WaitingForWheelToReachMinSpeed = 0,
    WaitingForWheelToAccelerate = 1,
    Driving = 2,
    DwellingAfterDrive = 3,
    Recovery = 4,
}

impl StrokeState {
    pub fn name(self) -> &'static str {
        match self {
            Self::WaitingForWheelToReachMinSpeed => "Waiting for Wheel",
            Self::WaitingForWheelToAccelerate => "Waiting to Accelerate",
            Self::Driving => "Driving",
            Self::DwellingAfterDrive => "Dwelling",
            Self::Recovery => "Recovery",
        }
    }
}

impl From<StrokeState> for u8 {
    fn from(s: StrokeState) -> u8 {
        s as u8
    }
}

impl TryFrom<u8> for StrokeState {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::WaitingForWheelToReachMinSpeed),
            1 => Ok(Self::WaitingForWheelToAccelerate),
            2 => Ok(Self::Driving),
            3 => Ok(Self::DwellingAfterDrive),
            4 => Ok(Self::Recovery),
            _ => Err(Error::unknown("stroke state", value)),
        }
    }
}

impl fmt::Display for StrokeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ergometer hardware attached to the monitor
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErgMachineType {
    StaticD = 0,
    StaticC = 1,
    StaticA = 2,
    StaticB = 3,
    StaticE = 5,
    StaticSimulator = 7,
    StaticDynamic = 8,
    SlidesA = 16,
    SlidesB = 17,
    SlidesC = 18,
    SlidesD = 19,
    SlidesE = 20,
    LinkedDynamic = 32,
    StaticDyno = 64,
    StaticSki = 128,
    SkiSimulator = 143,
    Bike = 192,
    BikeArms = 193,
    BikeNoArms = 194,
    BikeSimulator = 207,
    MultiErgRow = 224,
    MultiErgSki = 225,
    MultiErgBike = 226,
}

impl ErgMachineType {
    pub fn name(self) -> &'static str {
        match self {
            Self::StaticD => "Rower Model D",
            Self::StaticC => "Rower Model C",
            Self::StaticA => "Rower Model A",
            Self::StaticB => "Rower Model B",
            Self::StaticE => "Rower Model E",
            Self::StaticSimulator => "Rower Simulator",
            Self::StaticDynamic => "Dynamic Rower",
            Self::SlidesA => "Slides Model A",
            Self::SlidesB => "Slides Model B",
            Self::SlidesC => "Slides Model C",
            Self::SlidesD => "Slides Model D",
            Self::SlidesE => "Slides Model E",
            Self::LinkedDynamic => "Linked Dynamic",
            Self::StaticDyno => "Dynamometer",
            Self::StaticSki => "SkiErg",
            Self::SkiSimulator => "SkiErg Simulator",
            Self::Bike => "BikeErg",
            Self::BikeArms => "BikeErg with Arms",
            Self::BikeNoArms => "BikeErg No Arms",
            Self::BikeSimulator => "BikeErg Simulator",
            Self::MultiErgRow => "MultiErg Row",
            Self::MultiErgSki => "MultiErg Ski",
            Self::MultiErgBike => "MultiErg Bike",
        }
    }
}

impl From<ErgMachineType> for u8 {
    fn from(t: ErgMachineType) -> u8 {
        t as u8
    }
}

impl TryFrom<u8> for ErgMachineType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::StaticD),
            1 => Ok(Self::StaticC),
            2 => Ok(Self::StaticA),
            3 => Ok(Self::StaticB),
            5 => Ok(Self::StaticE),
            7 => Ok(Self::StaticSimulator),
            8 => Ok(Self::StaticDynamic),
            16 => Ok(Self::SlidesA),
            17 => Ok(Self::SlidesB),
            18 => Ok(Self::SlidesC),
            19 => Ok(Self::SlidesD),
            20 => Ok(Self::SlidesE),
            32 => Ok(Self::LinkedDynamic),
            64 => Ok(Self::StaticDyno),
            128 => Ok(Self::StaticSki),
            143 => Ok(Self::SkiSimulator),
            192 => Ok(Self::Bike),
            193 => Ok(Self::BikeArms),
            194 => Ok(Self::BikeNoArms),
            207 => Ok(Self::BikeSimulator),
            224 => Ok(Self::MultiErgRow),
            225 => Ok(Self::MultiErgSki),
            226 => Ok(Self::MultiErgBike),
            _ => Err(Error::unknown("erg machine type", value)),
        }
    }
}

impl fmt::Display for ErgMachineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_operational_state_round_trip() {
        assert_eq!(
            OperationalState::try_from(100).unwrap(),
            OperationalState::DragFactorCalibration
        );
        assert!(OperationalState::try_from(14).is_err());
    }

    #[test]
    fn test_rowing_state() {
        assert_eq!(RowingState::try_from(1).unwrap(), RowingState::Active);
        assert!(RowingState::try_from(2).is_err());
    }

    #[test]
    fn test_stroke_state_names() {
        assert_eq!(StrokeState::Driving.to_string(), "Driving");
        assert_eq!(StrokeState::Recovery.to_string(), "Recovery");
    }

    #[test]
    fn test_erg_machine_type() {
        assert_eq!(ErgMachineType::try_from(128).unwrap(), ErgMachineType::StaticSki);
        assert_eq!(ErgMachineType::try_from(192).unwrap(), ErgMachineType::Bike);
        assert!(ErgMachineType::try_from(4).is_err());
    }
}
