//! Packet transports for CSAFE performance monitors
//!
//! One `write` delivers one request frame, one `read` yields at most
//! one device packet. The engine above tolerates stray prefix bytes in
//! a packet but expects a single complete frame per read.

pub mod error;
pub mod hid;
pub mod mock;

pub use error::{Error, Result};
pub use hid::{HidContext, HidTransport, MonitorInfo};
pub use mock::MockTransport;

use async_trait::async_trait;
use bytes::BytesMut;
use std::time::Duration;

/// Transport trait for different ways of reaching a monitor
#[async_trait]
pub trait Transport: Send + Sync {
    /// Acquire the underlying device
    async fn open(&mut self) -> Result<()>;

    /// Release the underlying device
    async fn close(&mut self) -> Result<()>;

    /// Check whether the device is held
    fn is_open(&self) -> bool;

    /// Deliver one request packet; returns the number of payload bytes
    /// accepted
    async fn write(&mut self, data: &[u8]) -> Result<usize>;

    /// Receive one device packet, waiting at most `timeout`
    async fn read(&mut self, timeout: Duration) -> Result<BytesMut>;

    /// Human-readable description of the endpoint
    fn describe(&self) -> String;
}
