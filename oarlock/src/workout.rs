//! Workout programming
//!
//! Individual vendor set-config commands plus the batched program
//! starters. A program travels as one set-config wrapper carrying, in
//! order: workout type, workout duration, optional split or rest
//! duration, the configure-workout enable, and the screen transition
//! to "prepare to row". One frame means the monitor commits the whole
//! configuration atomically with respect to framing.

use std::time::Duration;

use oarlock_csafe::commands::{build, set, wrapper};
use oarlock_types::{
    DurationType, IntervalType, ScreenType, WorkoutScreenValue, WorkoutType,
};

use crate::{
    device::Monitor,
    error::Result,
    units,
};

/// Wall-clock setting for the monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTime {
    /// 1–12
    pub hours: u8,
    /// 0–59
    pub minutes: u8,
    /// 0 = AM, 1 = PM
    pub meridiem: u8,
    /// 1–12
    pub month: u8,
    /// 1–31
    pub day: u8,
    pub year: u16,
}

/// Type-tagged duration payload: tag byte + big-endian u32
fn duration_payload(tag: DurationType, value: u32) -> Vec<u8> {
    let mut payload = vec![tag.into()];
    payload.extend_from_slice(&value.to_be_bytes());
    payload
}

fn screen_command(value: WorkoutScreenValue) -> Vec<u8> {
    build(
        set::SCREEN_STATE,
        &[ScreenType::Workout.into(), value.into()],
    )
}

impl Monitor {
    /// Set the workout type
    pub async fn set_workout_type(&self, workout: WorkoutType) -> Result<()> {
        self.exchange_wrapped(
            wrapper::SET_CFG,
            &[build(set::WORKOUT_TYPE, &[workout.into()])],
        )
        .await
        .map(|_| ())
    }

    /// Set the workout duration
    ///
    /// Units follow the tag: hundredths of a second for time, meters
    /// for distance, calories or watt-minutes otherwise.
    pub async fn set_workout_duration(&self, tag: DurationType, value: u32) -> Result<()> {
        self.exchange_wrapped(
            wrapper::SET_CFG,
            &[build(set::WORKOUT_DURATION, &duration_payload(tag, value))],
        )
        .await
        .map(|_| ())
    }

    /// Set the interval rest duration in seconds
    pub async fn set_rest_duration(&self, seconds: u16) -> Result<()> {
        self.exchange_wrapped(
            wrapper::SET_CFG,
            &[build(set::REST_DURATION, &seconds.to_be_bytes())],
        )
        .await
        .map(|_| ())
    }

    /// Set the split duration
    pub async fn set_split_duration(&self, tag: DurationType, value: u32) -> Result<()> {
        self.exchange_wrapped(
            wrapper::SET_CFG,
            &[build(set::SPLIT_DURATION, &duration_payload(tag, value))],
        )
        .await
        .map(|_| ())
    }

    /// Set the target pace in hundredths of a second per 500 m
    pub async fn set_target_pace(&self, pace: u32) -> Result<()> {
        self.exchange_wrapped(
            wrapper::SET_CFG,
            &[build(set::TARGET_PACE_TIME, &pace.to_be_bytes())],
        )
        .await
        .map(|_| ())
    }

    /// Set the interval type for interval workouts
    pub async fn set_interval_type(&self, interval: IntervalType) -> Result<()> {
        self.exchange_wrapped(
            wrapper::SET_CFG,
            &[build(set::INTERVAL_TYPE, &[interval.into()])],
        )
        .await
        .map(|_| ())
    }

    /// Enable or disable workout programming mode
    pub async fn configure_workout(&self, enable: bool) -> Result<()> {
        self.exchange_wrapped(
            wrapper::SET_CFG,
            &[build(set::CONFIGURE_WORKOUT, &[u8::from(enable)])],
        )
        .await
        .map(|_| ())
    }

    /// Drive the display to a specific screen
    pub async fn set_screen_state(&self, screen: ScreenType, value: u8) -> Result<()> {
        self.exchange_wrapped(
            wrapper::SET_CFG,
            &[build(set::SCREEN_STATE, &[screen.into(), value])],
        )
        .await
        .map(|_| ())
    }

    /// Set the monitor's wall clock
    pub async fn set_date_time(&self, dt: DateTime) -> Result<()> {
        let [year_hi, year_lo] = dt.year.to_be_bytes();
        self.exchange_wrapped(
            wrapper::SET_CFG,
            &[build(
                set::DATE_TIME,
                &[dt.hours, dt.minutes, dt.meridiem, dt.month, dt.day, year_hi, year_lo],
            )],
        )
        .await
        .map(|_| ())
    }

    // ========================================================================
    // Batched program starters
    // ========================================================================

    /// Start an open-ended row, with or without splits
    pub async fn start_just_row(&self, with_splits: bool) -> Result<()> {
        let workout = if with_splits {
            WorkoutType::JustRowSplits
        } else {
            WorkoutType::JustRowNoSplits
        };

        self.exchange_wrapped(
            wrapper::SET_CFG,
            &[
                build(set::WORKOUT_TYPE, &[workout.into()]),
                screen_command(WorkoutScreenValue::PrepareToRowWorkout),
            ],
        )
        .await
        .map(|_| ())
    }

    /// Start a fixed-distance workout
    ///
    /// `split_meters` of zero programs no splits.
    pub async fn start_fixed_distance(&self, meters: u32, split_meters: u32) -> Result<()> {
        let workout = if split_meters > 0 {
            WorkoutType::FixedDistSplits
        } else {
            WorkoutType::FixedDistNoSplits
        };

        let mut commands = vec![
            build(set::WORKOUT_TYPE, &[workout.into()]),
            build(
                set::WORKOUT_DURATION,
                &duration_payload(DurationType::Distance, meters),
            ),
        ];
        if split_meters > 0 {
            commands.push(build(
                set::SPLIT_DURATION,
                &duration_payload(DurationType::Distance, split_meters),
            ));
        }
        commands.push(build(set::CONFIGURE_WORKOUT, &[0x01]));
        commands.push(screen_command(WorkoutScreenValue::PrepareToRowWorkout));

        self.exchange_wrapped(wrapper::SET_CFG, &commands)
            .await
            .map(|_| ())
    }

    /// Start a fixed-time workout
    ///
    /// A zero `split` programs no splits.
    pub async fn start_fixed_time(&self, duration: Duration, split: Duration) -> Result<()> {
        let workout = if split > Duration::ZERO {
            WorkoutType::FixedTimeSplits
        } else {
            WorkoutType::FixedTimeNoSplits
        };

        let mut commands = vec![
            build(set::WORKOUT_TYPE, &[workout.into()]),
            build(
                set::WORKOUT_DURATION,
                &duration_payload(DurationType::Time, units::duration_to_hundredths(duration)),
            ),
        ];
        if split > Duration::ZERO {
            commands.push(build(
                set::SPLIT_DURATION,
                &duration_payload(DurationType::Time, units::duration_to_hundredths(split)),
            ));
        }
        commands.push(build(set::CONFIGURE_WORKOUT, &[0x01]));
        commands.push(screen_command(WorkoutScreenValue::PrepareToRowWorkout));

        self.exchange_wrapped(wrapper::SET_CFG, &commands)
            .await
            .map(|_| ())
    }

    /// Start a fixed-calorie workout
    pub async fn start_fixed_calories(&self, calories: u32, split_calories: u32) -> Result<()> {
        let workout = if split_calories > 0 {
            WorkoutType::FixedCalorieSplits
        } else {
            WorkoutType::JustRowNoSplits
        };

        let mut commands = vec![
            build(set::WORKOUT_TYPE, &[workout.into()]),
            build(
                set::WORKOUT_DURATION,
                &duration_payload(DurationType::Calories, calories),
            ),
        ];
        if split_calories > 0 {
            commands.push(build(
                set::SPLIT_DURATION,
                &duration_payload(DurationType::Calories, split_calories),
            ));
        }
        commands.push(build(set::CONFIGURE_WORKOUT, &[0x01]));
        commands.push(screen_command(WorkoutScreenValue::PrepareToRowWorkout));

        self.exchange_wrapped(wrapper::SET_CFG, &commands)
            .await
            .map(|_| ())
    }

    /// Start fixed-distance intervals with a rest period
    pub async fn start_distance_intervals(&self, meters: u32, rest_seconds: u16) -> Result<()> {
        self.exchange_wrapped(
            wrapper::SET_CFG,
            &[
                build(set::WORKOUT_TYPE, &[WorkoutType::FixedDistInterval.into()]),
                build(
                    set::WORKOUT_DURATION,
                    &duration_payload(DurationType::Distance, meters),
                ),
                build(set::REST_DURATION, &rest_seconds.to_be_bytes()),
                build(set::CONFIGURE_WORKOUT, &[0x01]),
                screen_command(WorkoutScreenValue::PrepareToRowWorkout),
            ],
        )
        .await
        .map(|_| ())
    }

    /// Start fixed-time intervals with a rest period
    pub async fn start_time_intervals(
        &self,
        duration: Duration,
        rest_seconds: u16,
    ) -> Result<()> {
        self.exchange_wrapped(
            wrapper::SET_CFG,
            &[
                build(set::WORKOUT_TYPE, &[WorkoutType::FixedTimeInterval.into()]),
                build(
                    set::WORKOUT_DURATION,
                    &duration_payload(DurationType::Time, units::duration_to_hundredths(duration)),
                ),
                build(set::REST_DURATION, &rest_seconds.to_be_bytes()),
                build(set::CONFIGURE_WORKOUT, &[0x01]),
                screen_command(WorkoutScreenValue::PrepareToRowWorkout),
            ],
        )
        .await
        .map(|_| ())
    }

    /// Terminate the running workout
    pub async fn terminate_workout(&self) -> Result<()> {
        self.exchange_wrapped(
            wrapper::SET_CFG,
            &[screen_command(WorkoutScreenValue::TerminateWorkout)],
        )
        .await
        .map(|_| ())
    }

    /// Navigate the display back to the main screen
    pub async fn go_to_main_screen(&self) -> Result<()> {
        self.exchange_wrapped(
            wrapper::SET_CFG,
            &[screen_command(WorkoutScreenValue::GoToMainScreen)],
        )
        .await
        .map(|_| ())
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

    fn queue_ok(mock: &MockTransport) {
        let encoded = Frame::standard(vec![0x01]).encode().unwrap();
        mock.queue_response(encoded.to_vec());
    }

    fn written_contents(mock: &MockTransport) -> Vec<u8> {
        Frame::decode(&mock.written()[0]).unwrap().contents.to_vec()
    }

    #[test]
    fn test_duration_payload() {
        assert_eq!(
            duration_payload(DurationType::Distance, 2000),
            vec![0x80, 0x00, 0x00, 0x07, 0xD0]
        );
        assert_eq!(
            duration_payload(DurationType::Time, 60_000),
            vec![0x00, 0x00, 0x00, 0xEA, 0x60]
        );
    }

    #[tokio::test]
    async fn test_fixed_distance_program_is_one_batch() {
        let (monitor, mock) = monitor_with_mock();
        monitor.connect().await.unwrap();
        queue_ok(&mock);

        monitor.start_fixed_distance(2000, 500).await.unwrap();

        let contents = written_contents(&mock);
        assert_eq!(
            contents,
            vec![
                0x76, 0x18, // set-config wrapper, 24 payload bytes
                0x01, 0x01, 0x03, // workout type: fixed distance, splits
                0x03, 0x05, 0x80, 0x00, 0x00, 0x07, 0xD0, // duration: 2000 m
                0x05, 0x05, 0x80, 0x00, 0x00, 0x01, 0xF4, // split: 500 m
                0x14, 0x01, 0x01, // configure workout: enable
                0x13, 0x02, 0x01, 0x01, // screen: prepare to row
            ]
        );
    }

    #[tokio::test]
    async fn test_fixed_distance_without_splits_omits_split_command() {
        let (monitor, mock) = monitor_with_mock();
        monitor.connect().await.unwrap();
        queue_ok(&mock);

        monitor.start_fixed_distance(5000, 0).await.unwrap();

        let contents = written_contents(&mock);
        // Workout type "no splits" and no split-duration record.
        assert_eq!(contents[2..5], [0x01, 0x01, 0x02]);
        assert!(!contents.windows(2).any(|w| w == [0x05, 0x05]));
    }

    #[tokio::test]
    async fn test_fixed_time_converts_to_hundredths() {
        let (monitor, mock) = monitor_with_mock();
        monitor.connect().await.unwrap();
        queue_ok(&mock);

        monitor
            .start_fixed_time(Duration::from_secs(600), Duration::from_secs(120))
            .await
            .unwrap();

        let contents = written_contents(&mock);
        // 600 s = 60000 hundredths = 0x0000EA60, time tag 0x00.
        let duration_record = [0x03, 0x05, 0x00, 0x00, 0x00, 0xEA, 0x60];
        assert!(contents
            .windows(duration_record.len())
            .any(|w| w == duration_record));
    }

    #[tokio::test]
    async fn test_rest_duration_is_big_endian() {
        let (monitor, mock) = monitor_with_mock();
        monitor.connect().await.unwrap();
        queue_ok(&mock);

        monitor.start_distance_intervals(500, 90).await.unwrap();

        let contents = written_contents(&mock);
        let rest_record = [0x04, 0x02, 0x00, 0x5A];
        assert!(contents.windows(rest_record.len()).any(|w| w == rest_record));
    }

    #[tokio::test]
    async fn test_terminate_workout_screen_command() {
        let (monitor, mock) = monitor_with_mock();
        monitor.connect().await.unwrap();
        queue_ok(&mock);

        monitor.terminate_workout().await.unwrap();

        assert_eq!(
            written_contents(&mock),
            vec![0x76, 0x04, 0x13, 0x02, 0x01, 0x02]
        );
    }

    #[tokio::test]
    async fn test_set_date_time_payload() {
        let (monitor, mock) = monitor_with_mock();
        monitor.connect().await.unwrap();
        queue_ok(&mock);

        monitor
            .set_date_time(DateTime {
                hours: 7,
                minutes: 30,
                meridiem: 0,
                month: 8,
                day: 2,
                year: 2026,
            })
            .await
            .unwrap();

        assert_eq!(
            written_contents(&mock),
            vec![0x76, 0x09, 0x22, 0x07, 0x07, 0x1E, 0x00, 0x08, 0x02, 0x07, 0xEA]
        );
    }
}
