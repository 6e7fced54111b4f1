//! Whole-workout snapshot in a single exchange
//!
//! Sixteen vendor reads travel in one get-data wrapper, with the
//! public heart-rate command appended to the same frame. One frame
//! out, one frame back, one consistent view of the workout.

use std::fmt;
use std::time::Duration;

use oarlock_csafe::commands::{build, cfg, data, public, wrapper};
use oarlock_types::{IntervalType, RowingState, StrokeState, WorkoutState, WorkoutType};

use crate::{
    device::Monitor,
    error::Result,
    metrics::{decode_metric, MetricValue},
    units,
};

/// One consistent view of the running workout
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutSnapshot {
    pub workout_type: Option<WorkoutType>,
    pub workout_state: Option<WorkoutState>,
    pub interval_type: Option<IntervalType>,
    pub rowing_state: Option<RowingState>,
    pub stroke_state: Option<StrokeState>,
    pub interval_count: u8,

    /// Elapsed work time
    pub work_time: Duration,
    /// Covered distance in meters
    pub distance: f64,
    /// Current pace per 500 m
    pub pace: Duration,
    /// Average pace per 500 m
    pub avg_pace: Duration,
    /// Current power in watts
    pub power: u32,
    /// Average power in watts
    pub avg_power: u32,
    /// Strokes per minute
    pub stroke_rate: u8,
    pub drag_factor: u8,
    /// Total calories burned
    pub calories: u32,

    /// Current heart rate in beats per minute (255 when no belt)
    pub heart_rate: u8,
    pub avg_heart_rate: u8,
}

impl fmt::Display for WorkoutSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Time: {} | Distance: {:.1}m | Pace: {} | Power: {}W | S/R: {} | HR: {} | Cals: {}",
            units::format_time(self.work_time),
            self.distance,
            units::format_pace(self.pace),
            self.power,
            self.stroke_rate,
            self.heart_rate,
            self.calories,
        )
    }
}

impl Monitor {
    /// Read a complete workout snapshot in one exchange
    ///
    /// Records the device declined to answer are left at their
    /// defaults rather than failing the whole snapshot.
    pub async fn snapshot(&self) -> Result<WorkoutSnapshot> {
        let inner = vec![
            build(cfg::WORKOUT_TYPE, &[]),
            build(cfg::WORKOUT_STATE, &[]),
            build(cfg::INTERVAL_TYPE, &[]),
            build(cfg::ROWING_STATE, &[]),
            build(data::STROKE_STATE, &[]),
            build(cfg::INTERVAL_COUNT, &[]),
            build(data::WORK_TIME, &[]),
            build(data::WORK_DISTANCE, &[]),
            build(data::STROKE_500M_PACE, &[]),
            build(data::TOTAL_AVG_500M_PACE, &[]),
            build(data::STROKE_POWER, &[]),
            build(data::TOTAL_AVG_POWER, &[]),
            build(data::STROKE_RATE, &[]),
            build(data::DRAG_FACTOR, &[]),
            build(data::TOTAL_AVG_CALORIES, &[]),
            build(data::AVG_HEART_RATE, &[]),
        ];

        let mut contents = oarlock_csafe::commands::wrap(wrapper::GET_DATA, &inner);
        contents.push(public::GET_HR_CURRENT);

        let response = self.exchange(contents).await?;

        let mut snapshot = WorkoutSnapshot::default();
        for record in &response.commands {
            if record.command == public::GET_HR_CURRENT {
                if let Some(&hr) = record.data.first() {
                    snapshot.heart_rate = hr;
                }
                continue;
            }
            for nested in &record.nested {
                let Ok(value) = decode_metric(nested.command, &nested.data) else {
                    continue;
                };
                snapshot.apply(value);
            }
        }

        Ok(snapshot)
    }
}

impl WorkoutSnapshot {
    fn apply(&mut self, value: MetricValue) {
        match value {
            MetricValue::WorkoutType(v) => self.workout_type = Some(v),
            MetricValue::WorkoutState(v) => self.workout_state = Some(v),
            MetricValue::IntervalType(v) => self.interval_type = Some(v),
            MetricValue::RowingState(v) => self.rowing_state = Some(v),
            MetricValue::StrokeState(v) => self.stroke_state = Some(v),
            MetricValue::IntervalCount(v) => self.interval_count = v,
            MetricValue::WorkDuration(v) => self.work_time = v,
            MetricValue::WorkDistance(v) => self.distance = v,
            MetricValue::StrokePace(v) => self.pace = v,
            MetricValue::TotalAvgPace(v) => self.avg_pace = v,
            MetricValue::StrokePower(v) => self.power = v,
            MetricValue::TotalAvgPower(v) => self.avg_power = v,
            MetricValue::StrokeRate(v) => self.stroke_rate = v,
            MetricValue::DragFactor(v) => self.drag_factor = v,
            MetricValue::TotalCalories(v) => self.calories = v,
            MetricValue::AvgHeartRate(v) => self.avg_heart_rate = v,
            _ => {}
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

    #[tokio::test]
    async fn test_snapshot_decodes_batched_response() {
        let (monitor, mock) = monitor_with_mock();
        monitor.connect().await.unwrap();

        // Wrapper with a few answered records plus the public HR record.
        let wrapped: Vec<u8> = vec![
            0x89, 0x01, 0x01, // workout type: just row (splits)
            0x93, 0x01, 0x01, // rowing state: active
            0xB3, 0x01, 0x1C, // stroke rate: 28
            0xC1, 0x01, 0x87, // drag factor: 135
            0xA0, 0x04, 0x00, 0x00, 0x30, 0x39, // work time: 123.45 s
            0xA3, 0x04, 0x00, 0x00, 0x4E, 0x20, // distance: 2000 m
        ];
        let mut contents = vec![0x01, 0x7F, wrapped.len() as u8];
        contents.extend_from_slice(&wrapped);
        contents.extend_from_slice(&[0xB0, 0x01, 0x48]); // HR 72

        let encoded = Frame::standard(contents).encode().unwrap();
        mock.queue_response(encoded.to_vec());

        let snapshot = monitor.snapshot().await.unwrap();

        assert_eq!(snapshot.workout_type, Some(WorkoutType::JustRowSplits));
        assert_eq!(snapshot.rowing_state, Some(RowingState::Active));
        assert_eq!(snapshot.stroke_rate, 28);
        assert_eq!(snapshot.drag_factor, 135);
        assert_eq!(snapshot.work_time, Duration::from_millis(123_450));
        assert_eq!(snapshot.distance, 2000.0);
        assert_eq!(snapshot.heart_rate, 72);

        // Unanswered records stay at their defaults.
        assert_eq!(snapshot.workout_state, None);
        assert_eq!(snapshot.power, 0);
    }

    #[tokio::test]
    async fn test_snapshot_request_is_one_frame() {
        let (monitor, mock) = monitor_with_mock();
        monitor.connect().await.unwrap();

        let encoded = Frame::standard(vec![0x01, 0x7F, 0x00]).encode().unwrap();
        mock.queue_response(encoded.to_vec());

        monitor.snapshot().await.unwrap();

        let written = mock.written();
        assert_eq!(written.len(), 1);

        let frame = Frame::decode(&written[0]).unwrap();
        // Wrapper first, trailing public heart-rate command last.
        assert_eq!(frame.contents[0], 0x7F);
        assert_eq!(frame.contents[frame.contents.len() - 1], 0xB0);
    }

    #[test]
    fn test_snapshot_display() {
        let snapshot = WorkoutSnapshot {
            work_time: Duration::from_secs(65),
            distance: 250.0,
            pace: Duration::from_millis(110_000),
            power: 180,
            stroke_rate: 26,
            heart_rate: 150,
            calories: 18,
            ..Default::default()
        };
        assert_eq!(
            snapshot.to_string(),
            "Time: 1:05.00 | Distance: 250.0m | Pace: 1:50.0 | Power: 180W | S/R: 26 | HR: 150 | Cals: 18"
        );
    }
}
