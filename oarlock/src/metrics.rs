//! Typed vendor metric surface
//!
//! Every vendor read lands here: one table maps each opcode to its
//! width, endianness and target type, and each getter unwraps the
//! matching [`MetricValue`]. Multi-byte vendor payloads are big-endian
//! with two firmware exceptions (rest time is little-endian, see the
//! table).

use std::time::Duration;

use oarlock_csafe::commands::{build, cfg, data, public, wrapper};
use oarlock_types::{
    ErgMachineType, IntervalType, OperationalState, RowingState, StrokeState, WorkoutState,
    WorkoutType,
};

use crate::{
    device::Monitor,
    error::{Error, Result},
    units,
};

/// Per-stroke statistics record (vendor long command)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrokeStats {
    /// Stroke distance, 0.01 m units
    pub stroke_distance: u16,
    /// Drive time, 0.01 s units
    pub drive_time: u8,
    /// Recovery time, 0.01 s units
    pub recovery_time: u16,
    /// Stroke length, 0.01 m units
    pub stroke_length: u8,
    pub drive_counter: u16,
    /// Peak drive force, 0.1 lbf units
    pub peak_drive_force: u16,
    /// Impulse drive force, 0.1 lbf units
    pub impulse_drive_force: u16,
    /// Average drive force, 0.1 lbf units
    pub avg_drive_force: u16,
    /// Work per stroke, 0.1 J units
    pub work_per_stroke: u16,
}

/// One decoded vendor metric
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    FirmwareVersion(String),
    HardwareAddress(u32),
    WorkoutType(WorkoutType),
    WorkoutState(WorkoutState),
    IntervalType(IntervalType),
    OperationalState(OperationalState),
    RowingState(RowingState),
    BatteryPercent(u8),
    IntervalCount(u8),
    ErgMachineType(ErgMachineType),
    /// Elapsed workout time
    WorkDuration(Duration),
    /// Covered distance in meters
    WorkDistance(f64),
    /// Current pace per 500 m
    StrokePace(Duration),
    /// Current power in watts
    StrokePower(u32),
    /// Caloric burn rate in calories per hour
    CaloricBurnRate(u32),
    /// Average pace per 500 m over the workout
    TotalAvgPace(Duration),
    /// Average power in watts over the workout
    TotalAvgPower(u32),
    /// Total calories burned
    TotalCalories(u32),
    /// Strokes per minute
    StrokeRate(u8),
    AvgHeartRate(u8),
    StrokeState(StrokeState),
    DragFactor(u8),
    ErrorValue(u16),
    /// Interval rest time remaining
    RestTime(Duration),
    /// Force curve samples
    ForcePlot(Vec<u16>),
    StrokeStats(StrokeStats),
}

/// Decode one vendor record's data by opcode
///
/// Fails with [`Error::InvalidResponse`] when the data is shorter than
/// the opcode's width or the opcode is not in the table.
pub fn decode_metric(opcode: u8, d: &[u8]) -> Result<MetricValue> {
    let value = match opcode {
        cfg::FW_VERSION => {
            if d.len() < 16 {
                return Err(Error::InvalidResponse(opcode));
            }
            let text = String::from_utf8_lossy(&d[..16])
                .trim_end_matches('\0')
                .to_string();
            MetricValue::FirmwareVersion(text)
        }
        cfg::HW_ADDRESS => MetricValue::HardwareAddress(be_u32(opcode, d)?),
        cfg::WORKOUT_TYPE => MetricValue::WorkoutType(WorkoutType::try_from(u8_at(opcode, d)?)?),
        cfg::WORKOUT_STATE => {
            MetricValue::WorkoutState(WorkoutState::try_from(u8_at(opcode, d)?)?)
        }
        cfg::INTERVAL_TYPE => {
            MetricValue::IntervalType(IntervalType::try_from(u8_at(opcode, d)?)?)
        }
        cfg::OPERATIONAL_STATE => {
            MetricValue::OperationalState(OperationalState::try_from(u8_at(opcode, d)?)?)
        }
        cfg::ROWING_STATE => MetricValue::RowingState(RowingState::try_from(u8_at(opcode, d)?)?),
        cfg::BATTERY_PERCENT => MetricValue::BatteryPercent(u8_at(opcode, d)?),
        cfg::INTERVAL_COUNT => MetricValue::IntervalCount(u8_at(opcode, d)?),
        cfg::ERG_MACHINE_TYPE => {
            MetricValue::ErgMachineType(ErgMachineType::try_from(u8_at(opcode, d)?)?)
        }
        data::WORK_TIME => {
            MetricValue::WorkDuration(units::hundredths_to_duration(be_u32(opcode, d)?))
        }
        data::WORK_DISTANCE => {
            MetricValue::WorkDistance(units::tenths_to_meters(be_u32(opcode, d)?))
        }
        data::STROKE_500M_PACE => {
            MetricValue::StrokePace(units::hundredths_to_duration(be_u32(opcode, d)?))
        }
        data::STROKE_POWER => MetricValue::StrokePower(be_u32(opcode, d)?),
        data::STROKE_CALORIC_BURN_RATE => MetricValue::CaloricBurnRate(be_u32(opcode, d)?),
        data::TOTAL_AVG_500M_PACE => {
            MetricValue::TotalAvgPace(units::hundredths_to_duration(be_u32(opcode, d)?))
        }
        data::TOTAL_AVG_POWER => MetricValue::TotalAvgPower(be_u32(opcode, d)?),
        data::TOTAL_AVG_CALORIES => MetricValue::TotalCalories(be_u32(opcode, d)?),
        data::STROKE_RATE => MetricValue::StrokeRate(u8_at(opcode, d)?),
        data::AVG_HEART_RATE => MetricValue::AvgHeartRate(u8_at(opcode, d)?),
        data::STROKE_STATE => MetricValue::StrokeState(StrokeState::try_from(u8_at(opcode, d)?)?),
        data::DRAG_FACTOR => MetricValue::DragFactor(u8_at(opcode, d)?),
        data::ERROR_VALUE => MetricValue::ErrorValue(be_u16(opcode, d)?),
        // Firmware sends this one low byte first.
        data::REST_TIME => {
            MetricValue::RestTime(units::hundredths_to_duration(u32::from(le_u16(opcode, d)?)))
        }
        data::FORCE_PLOT => MetricValue::ForcePlot(decode_force_plot(opcode, d)?),
        data::STROKE_STATS => MetricValue::StrokeStats(decode_stroke_stats(opcode, d)?),
        _ => return Err(Error::InvalidResponse(opcode)),
    };
    Ok(value)
}

fn u8_at(opcode: u8, d: &[u8]) -> Result<u8> {
    d.first().copied().ok_or(Error::InvalidResponse(opcode))
}

fn le_u16(opcode: u8, d: &[u8]) -> Result<u16> {
    if d.len() < 2 {
        return Err(Error::InvalidResponse(opcode));
    }
    Ok(u16::from_le_bytes([d[0], d[1]]))
}

fn be_u16(opcode: u8, d: &[u8]) -> Result<u16> {
    if d.len() < 2 {
        return Err(Error::InvalidResponse(opcode));
    }
    Ok(u16::from_be_bytes([d[0], d[1]]))
}

fn be_u32(opcode: u8, d: &[u8]) -> Result<u32> {
    if d.len() < 4 {
        return Err(Error::InvalidResponse(opcode));
    }
    Ok(u32::from_be_bytes([d[0], d[1], d[2], d[3]]))
}

/// Leading count byte, then big-endian force samples
fn decode_force_plot(opcode: u8, d: &[u8]) -> Result<Vec<u16>> {
    let bytes_read = usize::from(u8_at(opcode, d)?);
    let words = (bytes_read / 2).min(16);

    let mut out = Vec::with_capacity(words);
    for i in 0..words {
        let hi = 1 + i * 2;
        if hi + 1 >= d.len() {
            break;
        }
        out.push(u16::from_be_bytes([d[hi], d[hi + 1]]));
    }
    Ok(out)
}

fn decode_stroke_stats(opcode: u8, d: &[u8]) -> Result<StrokeStats> {
    if d.len() < 16 {
        return Err(Error::InvalidResponse(opcode));
    }
    Ok(StrokeStats {
        stroke_distance: u16::from_be_bytes([d[0], d[1]]),
        drive_time: d[2],
        recovery_time: u16::from_be_bytes([d[3], d[4]]),
        stroke_length: d[5],
        drive_counter: u16::from_be_bytes([d[6], d[7]]),
        peak_drive_force: u16::from_be_bytes([d[8], d[9]]),
        impulse_drive_force: u16::from_be_bytes([d[10], d[11]]),
        avg_drive_force: u16::from_be_bytes([d[12], d[13]]),
        work_per_stroke: u16::from_be_bytes([d[14], d[15]]),
    })
}

// ============================================================================
// Vendor getters
// ============================================================================

macro_rules! metric_getter {
    ($(#[$doc:meta])* $name:ident, $wrapper:expr, $opcode:expr, $payload:expr,
     $variant:ident => $ret:ty) => {
        $(#[$doc])*
        pub async fn $name(&self) -> Result<$ret> {
            match self.vendor_value($wrapper, $opcode, $payload).await? {
                MetricValue::$variant(v) => Ok(v),
                _ => Err(Error::InvalidResponse($opcode)),
            }
        }
    };
}

impl Monitor {
    /// Exchange one vendor command and decode the echoed record
    async fn vendor_value(&self, wrap: u8, opcode: u8, payload: &[u8]) -> Result<MetricValue> {
        let resp = self
            .exchange_wrapped(wrap, &[build(opcode, payload)])
            .await?;
        let rec = Self::expect(&resp, opcode)?;
        decode_metric(opcode, &rec.data)
    }

    metric_getter!(
        /// Read the 16-character firmware version string
        firmware_version, wrapper::GET_CFG, cfg::FW_VERSION, &[],
        FirmwareVersion => String
    );
    metric_getter!(
        /// Read the hardware address
        hardware_address, wrapper::GET_CFG, cfg::HW_ADDRESS, &[],
        HardwareAddress => u32
    );
    metric_getter!(
        /// Read the programmed workout type
        workout_type, wrapper::GET_CFG, cfg::WORKOUT_TYPE, &[],
        WorkoutType => WorkoutType
    );
    metric_getter!(
        /// Read the workout state machine
        workout_state, wrapper::GET_CFG, cfg::WORKOUT_STATE, &[],
        WorkoutState => WorkoutState
    );
    metric_getter!(
        /// Read the interval type of the current workout
        interval_type, wrapper::GET_CFG, cfg::INTERVAL_TYPE, &[],
        IntervalType => IntervalType
    );
    metric_getter!(
        /// Read the monitor's operational state
        operational_state, wrapper::GET_CFG, cfg::OPERATIONAL_STATE, &[],
        OperationalState => OperationalState
    );
    metric_getter!(
        /// Check whether the flywheel is being driven
        rowing_state, wrapper::GET_CFG, cfg::ROWING_STATE, &[],
        RowingState => RowingState
    );
    metric_getter!(
        /// Read the battery charge percentage
        battery_percent, wrapper::GET_CFG, cfg::BATTERY_PERCENT, &[],
        BatteryPercent => u8
    );
    metric_getter!(
        /// Read the current interval number
        interval_count, wrapper::GET_CFG, cfg::INTERVAL_COUNT, &[],
        IntervalCount => u8
    );
    metric_getter!(
        /// Identify the attached ergometer hardware
        erg_machine_type, wrapper::GET_CFG, cfg::ERG_MACHINE_TYPE, &[],
        ErgMachineType => ErgMachineType
    );

    metric_getter!(
        /// Read elapsed workout time at 0.01 s resolution
        work_duration, wrapper::GET_DATA, data::WORK_TIME, &[],
        WorkDuration => Duration
    );
    metric_getter!(
        /// Read covered distance in meters
        work_distance, wrapper::GET_DATA, data::WORK_DISTANCE, &[],
        WorkDistance => f64
    );
    metric_getter!(
        /// Read the current pace per 500 m
        stroke_pace, wrapper::GET_DATA, data::STROKE_500M_PACE, &[],
        StrokePace => Duration
    );
    metric_getter!(
        /// Read the current stroke power in watts
        stroke_power, wrapper::GET_DATA, data::STROKE_POWER, &[],
        StrokePower => u32
    );
    metric_getter!(
        /// Read the caloric burn rate in calories per hour
        caloric_burn_rate, wrapper::GET_DATA, data::STROKE_CALORIC_BURN_RATE, &[],
        CaloricBurnRate => u32
    );
    metric_getter!(
        /// Read the workout-average pace per 500 m
        total_avg_pace, wrapper::GET_DATA, data::TOTAL_AVG_500M_PACE, &[],
        TotalAvgPace => Duration
    );
    metric_getter!(
        /// Read the workout-average power in watts
        total_avg_power, wrapper::GET_DATA, data::TOTAL_AVG_POWER, &[],
        TotalAvgPower => u32
    );
    metric_getter!(
        /// Read total calories burned this workout
        total_calories, wrapper::GET_DATA, data::TOTAL_AVG_CALORIES, &[],
        TotalCalories => u32
    );
    metric_getter!(
        /// Read the current stroke rate in strokes per minute
        stroke_rate, wrapper::GET_DATA, data::STROKE_RATE, &[],
        StrokeRate => u8
    );
    metric_getter!(
        /// Read the average heart rate in beats per minute
        avg_heart_rate, wrapper::GET_DATA, data::AVG_HEART_RATE, &[],
        AvgHeartRate => u8
    );
    metric_getter!(
        /// Read the stroke phase
        stroke_state, wrapper::GET_DATA, data::STROKE_STATE, &[],
        StrokeState => StrokeState
    );
    metric_getter!(
        /// Read the drag factor
        drag_factor, wrapper::GET_DATA, data::DRAG_FACTOR, &[],
        DragFactor => u8
    );
    metric_getter!(
        /// Read the last error value
        error_value, wrapper::GET_DATA, data::ERROR_VALUE, &[],
        ErrorValue => u16
    );
    metric_getter!(
        /// Read the interval rest time remaining
        rest_time, wrapper::GET_DATA, data::REST_TIME, &[],
        RestTime => Duration
    );
    metric_getter!(
        /// Read per-stroke statistics
        stroke_stats, wrapper::GET_DATA, data::STROKE_STATS, &[0x00],
        StrokeStats => StrokeStats
    );

    /// Read a block of force curve samples
    ///
    /// `block_size` is the number of bytes to request, capped at 32
    /// (16 samples). Travels through the user-config wrapper rather
    /// than the vendor get-data wrapper.
    pub async fn force_plot(&self, block_size: u8) -> Result<Vec<u16>> {
        let block_size = block_size.min(32);
        match self
            .vendor_value(public::SET_USER_CFG1, data::FORCE_PLOT, &[block_size])
            .await?
        {
            MetricValue::ForcePlot(v) => Ok(v),
            _ => Err(Error::InvalidResponse(data::FORCE_PLOT)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oarlock_csafe::Frame;
    use oarlock_transport::MockTransport;
    use pretty_assertions::assert_eq;

    fn monitor_with_mock() -> (Monitor, MockTransport) {
        let mock = MockTransport::new();
        (Monitor::new(Box::new(mock.clone())), mock)
    }

    fn queue_frame(mock: &MockTransport, contents: Vec<u8>) {
        let encoded = Frame::standard(contents).encode().unwrap();
        mock.queue_response(encoded.to_vec());
    }

    #[test]
    fn test_decode_big_endian_u32() {
        let value = decode_metric(data::STROKE_POWER, &[0x00, 0x00, 0x01, 0x2C]).unwrap();
        assert_eq!(value, MetricValue::StrokePower(300));
    }

    #[test]
    fn test_decode_work_time_to_duration() {
        // 12345 hundredths = 123.45 s
        let value = decode_metric(data::WORK_TIME, &[0x00, 0x00, 0x30, 0x39]).unwrap();
        assert_eq!(
            value,
            MetricValue::WorkDuration(Duration::from_millis(123_450))
        );
    }

    #[test]
    fn test_decode_work_distance_tenths() {
        // 20000 tenths = 2000 m
        let value = decode_metric(data::WORK_DISTANCE, &[0x00, 0x00, 0x4E, 0x20]).unwrap();
        assert_eq!(value, MetricValue::WorkDistance(2000.0));
    }

    #[test]
    fn test_decode_error_value_big_endian() {
        let value = decode_metric(data::ERROR_VALUE, &[0x01, 0x02]).unwrap();
        assert_eq!(value, MetricValue::ErrorValue(0x0102));
    }

    #[test]
    fn test_decode_rest_time_little_endian() {
        // 0x1234 hundredths, low byte first.
        let value = decode_metric(data::REST_TIME, &[0x34, 0x12]).unwrap();
        assert_eq!(
            value,
            MetricValue::RestTime(Duration::from_millis(0x1234 * 10))
        );
    }

    #[test]
    fn test_decode_short_data_fails() {
        assert!(matches!(
            decode_metric(data::STROKE_POWER, &[0x01, 0x2C]),
            Err(Error::InvalidResponse(0xA9))
        ));
        assert!(matches!(
            decode_metric(data::STROKE_RATE, &[]),
            Err(Error::InvalidResponse(0xB3))
        ));
    }

    #[test]
    fn test_decode_unknown_opcode_fails() {
        assert!(matches!(
            decode_metric(0x42, &[0x00]),
            Err(Error::InvalidResponse(0x42))
        ));
    }

    #[test]
    fn test_decode_firmware_version() {
        let mut d = Vec::from(&b"PM5 211 181"[..]);
        d.resize(16, 0);
        let value = decode_metric(cfg::FW_VERSION, &d).unwrap();
        assert_eq!(value, MetricValue::FirmwareVersion("PM5 211 181".into()));
    }

    #[test]
    fn test_decode_stroke_stats() {
        let d: Vec<u8> = vec![
            0x00, 0x64, // stroke distance
            0x50, // drive time
            0x00, 0xC8, // recovery time
            0x8C, // stroke length
            0x00, 0x2A, // drive counter
            0x01, 0x00, // peak force
            0x02, 0x00, // impulse force
            0x01, 0x80, // avg force
            0x03, 0xE8, // work per stroke
        ];
        let MetricValue::StrokeStats(stats) = decode_metric(data::STROKE_STATS, &d).unwrap()
        else {
            panic!("wrong variant");
        };
        assert_eq!(stats.stroke_distance, 100);
        assert_eq!(stats.drive_time, 0x50);
        assert_eq!(stats.recovery_time, 200);
        assert_eq!(stats.drive_counter, 42);
        assert_eq!(stats.work_per_stroke, 1000);
    }

    #[test]
    fn test_decode_force_plot() {
        // 4 bytes read: two samples.
        let d = vec![0x04, 0x01, 0x00, 0x02, 0x00];
        let value = decode_metric(data::FORCE_PLOT, &d).unwrap();
        assert_eq!(value, MetricValue::ForcePlot(vec![0x0100, 0x0200]));
    }

    #[test]
    fn test_decode_force_plot_empty() {
        let value = decode_metric(data::FORCE_PLOT, &[0x00]).unwrap();
        assert_eq!(value, MetricValue::ForcePlot(Vec::new()));
    }

    #[tokio::test]
    async fn test_workout_type_via_wrapper() {
        let (monitor, mock) = monitor_with_mock();
        monitor.connect().await.unwrap();

        queue_frame(&mock, vec![0x01, 0x7E, 0x03, 0x89, 0x01, 0x03]);
        let workout = monitor.workout_type().await.unwrap();
        assert_eq!(workout, WorkoutType::FixedDistSplits);

        // Request is a single inner command under the get-config wrapper.
        let frame = Frame::decode(&mock.written()[0]).unwrap();
        assert_eq!(&frame.contents[..], &[0x7E, 0x01, 0x89]);
    }

    #[tokio::test]
    async fn test_stroke_rate_via_wrapper() {
        let (monitor, mock) = monitor_with_mock();
        monitor.connect().await.unwrap();

        queue_frame(&mock, vec![0x01, 0x7F, 0x03, 0xB3, 0x01, 0x18]);
        assert_eq!(monitor.stroke_rate().await.unwrap(), 24);
    }

    #[tokio::test]
    async fn test_missing_inner_record_is_invalid() {
        let (monitor, mock) = monitor_with_mock();
        monitor.connect().await.unwrap();

        // Wrapper comes back empty.
        queue_frame(&mock, vec![0x01, 0x7F, 0x00]);
        let result = monitor.stroke_rate().await;
        assert!(matches!(result, Err(Error::InvalidResponse(0xB3))));
    }

    #[tokio::test]
    async fn test_force_plot_request_shape() {
        let (monitor, mock) = monitor_with_mock();
        monitor.connect().await.unwrap();

        queue_frame(
            &mock,
            vec![0x01, 0x6B, 0x05, 0x04, 0x01, 0x00, 0x02, 0x00],
        );
        let samples = monitor.force_plot(64).await.unwrap();
        assert_eq!(samples, vec![0x0100, 0x0200]);

        // Block size capped at 32, sent through the user-config wrapper.
        let frame = Frame::decode(&mock.written()[0]).unwrap();
        assert_eq!(&frame.contents[..], &[0x1A, 0x03, 0x6B, 0x01, 0x20]);
    }
}
