//! # oarlock-csafe
//!
//! Core CSAFE protocol implementation for ergometer performance
//! monitors.
//!
//! This crate provides the low-level protocol primitives:
//! - Frame structure with byte stuffing and XOR checksum
//! - Short/long command building and the vendor command wrapper
//! - Response parsing (status byte + nested command records)
//! - Protocol constants and opcode tables

pub mod commands;
pub mod consts;
pub mod error;
pub mod frame;
pub mod response;

pub use error::{Error, Result};
pub use frame::{checksum, Frame};
pub use response::{CommandResponse, MachineState, PrevFrameStatus, Response};
