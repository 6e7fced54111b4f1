//! Command opcodes and the short/long/wrapper command builder
//!
//! A short command is a single opcode byte with the high bit set. A
//! long command is `[opcode, byte_count, data...]`. Vendor commands
//! travel inside one of four wrapper opcodes whose payload is a
//! back-to-back run of inner commands in the same format.

/// Public short commands (high bit set, no payload)
pub mod public {
    pub const GET_STATUS: u8 = 0x80;
    pub const RESET: u8 = 0x81;
    pub const GO_IDLE: u8 = 0x82;
    pub const GO_HAVE_ID: u8 = 0x83;
    pub const GO_IN_USE: u8 = 0x85;
    pub const GO_FINISHED: u8 = 0x86;
    pub const GO_READY: u8 = 0x87;
    pub const GET_VERSION: u8 = 0x91;
    pub const GET_ID: u8 = 0x92;
    pub const GET_UNITS: u8 = 0x93;
    pub const GET_SERIAL: u8 = 0x94;
    pub const GET_ODOMETER: u8 = 0x9B;
    pub const GET_ERROR_CODE: u8 = 0x9C;
    pub const GET_TWORK: u8 = 0xA0;
    pub const GET_HORIZONTAL: u8 = 0xA1;
    pub const GET_CALORIES: u8 = 0xA3;
    pub const GET_PROGRAM: u8 = 0xA4;
    pub const GET_PACE: u8 = 0xA6;
    pub const GET_CADENCE: u8 = 0xA7;
    pub const GET_HR_CURRENT: u8 = 0xB0;
    pub const GET_POWER: u8 = 0xB4;

    // Long commands (payload-carrying)
    pub const SET_USER_CFG1: u8 = 0x1A;
    pub const SET_TWORK: u8 = 0x20;
    pub const SET_HORIZONTAL: u8 = 0x21;
    pub const SET_CALORIES: u8 = 0x23;
    pub const SET_PROGRAM: u8 = 0x24;
    pub const SET_POWER: u8 = 0x34;
}

/// Vendor command wrappers
pub mod wrapper {
    pub const SET_CFG: u8 = 0x76;
    pub const SET_DATA: u8 = 0x77;
    pub const GET_CFG: u8 = 0x7E;
    pub const GET_DATA: u8 = 0x7F;
}

/// Vendor get-configuration commands (inside [`wrapper::GET_CFG`])
pub mod cfg {
    pub const FW_VERSION: u8 = 0x80;
    pub const HW_VERSION: u8 = 0x81;
    pub const HW_ADDRESS: u8 = 0x82;
    pub const WORKOUT_TYPE: u8 = 0x89;
    pub const WORKOUT_STATE: u8 = 0x8D;
    pub const INTERVAL_TYPE: u8 = 0x8E;
    pub const OPERATIONAL_STATE: u8 = 0x8F;
    pub const ROWING_STATE: u8 = 0x93;
    pub const BATTERY_PERCENT: u8 = 0x97;
    pub const INTERVAL_COUNT: u8 = 0x9F;
    pub const WORKOUT_DURATION: u8 = 0xE8;
    pub const ERG_MACHINE_TYPE: u8 = 0xED;
}

/// Vendor get-data commands (inside [`wrapper::GET_DATA`])
pub mod data {
    pub const FORCE_PLOT: u8 = 0x6B;
    pub const STROKE_STATS: u8 = 0x6E;
    pub const WORK_TIME: u8 = 0xA0;
    pub const WORK_DISTANCE: u8 = 0xA3;
    pub const STROKE_500M_PACE: u8 = 0xA8;
    pub const STROKE_POWER: u8 = 0xA9;
    pub const STROKE_CALORIC_BURN_RATE: u8 = 0xAA;
    pub const TOTAL_AVG_500M_PACE: u8 = 0xAF;
    pub const TOTAL_AVG_POWER: u8 = 0xB0;
    pub const TOTAL_AVG_CALORIES: u8 = 0xB2;
    pub const STROKE_RATE: u8 = 0xB3;
    pub const AVG_HEART_RATE: u8 = 0xB6;
    pub const STROKE_STATE: u8 = 0xBF;
    pub const DRAG_FACTOR: u8 = 0xC1;
    pub const ERROR_VALUE: u8 = 0xC9;
    pub const REST_TIME: u8 = 0xCF;
}

/// Vendor set-configuration commands (inside [`wrapper::SET_CFG`])
pub mod set {
    pub const WORKOUT_TYPE: u8 = 0x01;
    pub const WORKOUT_DURATION: u8 = 0x03;
    pub const REST_DURATION: u8 = 0x04;
    pub const SPLIT_DURATION: u8 = 0x05;
    pub const TARGET_PACE_TIME: u8 = 0x06;
    pub const SCREEN_STATE: u8 = 0x13;
    pub const CONFIGURE_WORKOUT: u8 = 0x14;
    pub const INTERVAL_TYPE: u8 = 0x17;
    pub const DATE_TIME: u8 = 0x22;
}

/// True for the four vendor wrapper opcodes
pub fn is_wrapper(opcode: u8) -> bool {
    matches!(
        opcode,
        wrapper::SET_CFG | wrapper::SET_DATA | wrapper::GET_CFG | wrapper::GET_DATA
    )
}

/// Build a single command
///
/// Emits the one-byte short form when the opcode has its high bit set
/// and no data is supplied, the long form `[opcode, len, data...]`
/// otherwise.
///
/// # Examples
///
/// ```
/// use oarlock_csafe::commands::{build, public};
///
/// assert_eq!(build(public::GET_STATUS, &[]), vec![0x80]);
/// assert_eq!(build(public::SET_PROGRAM, &[3, 0]), vec![0x24, 0x02, 0x03, 0x00]);
/// ```
pub fn build(opcode: u8, data: &[u8]) -> Vec<u8> {
    if opcode & 0x80 != 0 && data.is_empty() {
        return vec![opcode];
    }
    let mut out = Vec::with_capacity(2 + data.len());
    out.push(opcode);
    out.push(data.len() as u8);
    out.extend_from_slice(data);
    out
}

/// Wrap one or more pre-built inner commands in a vendor wrapper
///
/// # Examples
///
/// ```
/// use oarlock_csafe::commands::{build, wrap, data, wrapper};
///
/// let contents = wrap(
///     wrapper::GET_DATA,
///     &[build(data::STROKE_RATE, &[]), build(data::DRAG_FACTOR, &[])],
/// );
/// assert_eq!(contents, vec![0x7F, 0x02, 0xB3, 0xC1]);
/// ```
pub fn wrap(wrapper: u8, inner: &[Vec<u8>]) -> Vec<u8> {
    let total: usize = inner.iter().map(Vec::len).sum();
    let mut out = Vec::with_capacity(2 + total);
    out.push(wrapper);
    out.push(total as u8);
    for cmd in inner {
        out.extend_from_slice(cmd);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_short() {
        assert_eq!(build(public::GET_STATUS, &[]), vec![0x80]);
        assert_eq!(build(public::GO_READY, &[]), vec![0x87]);
    }

    #[test]
    fn test_build_long() {
        assert_eq!(
            build(public::SET_TWORK, &[0, 20, 0]),
            vec![0x20, 0x03, 0x00, 0x14, 0x00]
        );
    }

    #[test]
    fn test_build_high_bit_with_data_is_long() {
        // A high-bit opcode with a payload still takes the long form.
        assert_eq!(build(data::STROKE_STATS, &[0x00]), vec![0x6E, 0x01, 0x00]);
    }

    #[test]
    fn test_wrap_single() {
        let contents = wrap(wrapper::GET_CFG, &[build(cfg::WORKOUT_TYPE, &[])]);
        assert_eq!(contents, vec![0x7E, 0x01, 0x89]);
    }

    #[test]
    fn test_wrap_batch() {
        let contents = wrap(
            wrapper::GET_DATA,
            &[build(data::STROKE_RATE, &[]), build(data::DRAG_FACTOR, &[])],
        );
        assert_eq!(contents, vec![0x7F, 0x02, 0xB3, 0xC1]);
    }

    #[test]
    fn test_wrap_with_long_inner() {
        let duration: u32 = 2000;
        let mut payload = vec![0x80];
        payload.extend_from_slice(&duration.to_be_bytes());
        let contents = wrap(wrapper::SET_CFG, &[build(set::WORKOUT_DURATION, &payload)]);
        assert_eq!(
            contents,
            vec![0x76, 0x07, 0x03, 0x05, 0x80, 0x00, 0x00, 0x07, 0xD0]
        );
    }

    #[test]
    fn test_is_wrapper() {
        assert!(is_wrapper(0x76));
        assert!(is_wrapper(0x77));
        assert!(is_wrapper(0x7E));
        assert!(is_wrapper(0x7F));
        assert!(!is_wrapper(0x80));
        assert!(!is_wrapper(0x1A));
    }
}
