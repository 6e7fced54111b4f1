//! Pace, power and display arithmetic
//!
//! The pace/watts relationship is the flywheel cube law with a 2.8 W
//! reference (the power that holds a 500 s pace over 500 m).

use std::time::Duration;

/// Reference power for the pace/watts cube law
pub const REFERENCE_WATTS: f64 = 2.8;

/// Convert pace (seconds per 500 m) to watts
pub fn pace_to_watts(pace_seconds: f64) -> f64 {
    if pace_seconds <= 0.0 {
        return 0.0;
    }
    let pace = pace_seconds / 500.0;
    REFERENCE_WATTS / pace.powi(3)
}

/// Convert watts to pace (seconds per 500 m)
pub fn watts_to_pace(watts: f64) -> f64 {
    if watts <= 0.0 {
        return 0.0;
    }
    500.0 * (REFERENCE_WATTS / watts).cbrt()
}

/// Convert calories per hour to pace (seconds per 500 m)
pub fn cals_per_hour_to_pace(cals_per_hour: f64) -> f64 {
    if cals_per_hour <= 0.0 {
        return 0.0;
    }
    let watts = (cals_per_hour * 0.8604 - 350.0) / 4.0;
    if watts <= 0.0 {
        return 0.0;
    }
    watts_to_pace(watts)
}

/// Convert pace (seconds per 500 m) to calories per hour
pub fn pace_to_cals_per_hour(pace_seconds: f64) -> f64 {
    let watts = pace_to_watts(pace_seconds);
    if watts <= 0.0 {
        return 0.0;
    }
    (watts * 4.0 + 350.0) / 0.8604
}

/// Hundredths of a second, as the wire carries time, to a `Duration`
pub fn hundredths_to_duration(hundredths: u32) -> Duration {
    Duration::from_millis(u64::from(hundredths) * 10)
}

/// A `Duration` to wire hundredths of a second
pub fn duration_to_hundredths(duration: Duration) -> u32 {
    (duration.as_millis() / 10) as u32
}

/// Tenths of a meter, as the wire carries distance, to meters
pub fn tenths_to_meters(tenths: u32) -> f64 {
    f64::from(tenths) / 10.0
}

/// Meters to wire tenths of a meter
pub fn meters_to_tenths(meters: f64) -> u32 {
    (meters * 10.0) as u32
}

/// Format a pace as `M:SS.t`
pub fn format_pace(pace: Duration) -> String {
    let total_seconds = pace.as_millis() as f64 / 1000.0;
    let minutes = total_seconds as u64 / 60;
    let seconds = total_seconds - (minutes * 60) as f64;
    format!("{}:{:04.1}", minutes, seconds)
}

/// Format a time as `H:MM:SS.hh`, hours omitted when zero
pub fn format_time(time: Duration) -> String {
    let hundredths = duration_to_hundredths(time);
    let total_seconds = hundredths / 100;
    let remaining = hundredths % 100;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}.{:02}", hours, minutes, seconds, remaining)
    } else {
        format!("{}:{:02}.{:02}", minutes, seconds, remaining)
    }
}

/// Format a distance in meters, switching to kilometers at 1000 m
pub fn format_distance(meters: f64) -> String {
    if meters >= 1000.0 {
        format!("{:.2} km", meters / 1000.0)
    } else {
        format!("{:.1} m", meters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_reference_pace_is_reference_watts() {
        // 500 s per 500 m is the 2.8 W reference point.
        assert!((pace_to_watts(500.0) - REFERENCE_WATTS).abs() < 1e-9);
        assert!((watts_to_pace(REFERENCE_WATTS) - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_two_minute_pace() {
        // A 2:00/500m pace is just over 200 W.
        let watts = pace_to_watts(120.0);
        assert!((watts - 202.546).abs() < 0.001);
    }

    #[test]
    fn test_pace_watts_round_trip() {
        for pace in [90.0, 105.0, 120.0, 150.0, 240.0] {
            let back = watts_to_pace(pace_to_watts(pace));
            assert!((back - pace).abs() < 1e-9);
        }
    }

    #[test]
    fn test_cals_round_trip() {
        let pace = 120.0;
        let cals = pace_to_cals_per_hour(pace);
        let back = cals_per_hour_to_pace(cals);
        assert!((back - pace).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(pace_to_watts(0.0), 0.0);
        assert_eq!(watts_to_pace(-5.0), 0.0);
        assert_eq!(cals_per_hour_to_pace(50.0), 0.0);
    }

    #[test]
    fn test_duration_conversions() {
        assert_eq!(hundredths_to_duration(12345), Duration::from_millis(123_450));
        assert_eq!(duration_to_hundredths(Duration::from_millis(123_450)), 12345);
        assert_eq!(tenths_to_meters(20_000), 2000.0);
        assert_eq!(meters_to_tenths(2000.0), 20_000);
    }

    #[test]
    fn test_format_pace() {
        assert_eq!(format_pace(Duration::from_millis(90_500)), "1:30.5");
        assert_eq!(format_pace(Duration::from_millis(125_000)), "2:05.0");
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(Duration::from_millis(65_000)), "1:05.00");
        assert_eq!(
            format_time(Duration::from_millis(3_725_500)),
            "1:02:05.50"
        );
    }

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(250.0), "250.0 m");
        assert_eq!(format_distance(2000.0), "2.00 km");
    }
}
