//! Monitor session and transaction engine
//!
//! One `Monitor` owns one transport and runs one exchange at a time:
//! encode, gate, write, read, decode, parse, all under a single async
//! lock. Callers queue; cancellation at the gate or the read releases
//! the lock without leaving a partial frame on the wire.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, trace};

use oarlock_csafe::{
    commands::{build, public, wrap},
    consts::{EXT_FRAME_START, FRAME_STOP, INTER_FRAME_GAP, STD_FRAME_START},
    CommandResponse, Frame, PrevFrameStatus, Response,
};
use oarlock_transport::Transport;
use oarlock_types::WorkoutNumber;

use crate::error::{Error, Result};

/// Default window for one transport read
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(500);

/// A session with one performance monitor
///
/// # Examples
///
/// ```no_run
/// use oarlock::Monitor;
/// use oarlock_transport::{HidContext, HidTransport};
///
/// #[tokio::main]
/// async fn main() -> oarlock::Result<()> {
///     let context = HidContext::new()?;
///     let monitor = Monitor::new(Box::new(HidTransport::pm5(&context)));
///
///     monitor.connect().await?;
///     let version = monitor.version().await?;
///     println!("firmware {}", version.software_version);
///     monitor.disconnect().await?;
///     Ok(())
/// }
/// ```
pub struct Monitor {
    inner: Mutex<Inner>,
    read_timeout: Duration,
}

struct Inner {
    transport: Box<dyn Transport>,
    connected: bool,
    last_write_at: Option<Instant>,
}

impl Monitor {
    /// Create a detached session over the given transport
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                transport,
                connected: false,
                last_write_at: None,
            }),
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }

    /// Override the per-read timeout
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Acquire the transport and mark the session connected
    pub async fn connect(&self) -> Result<()> {
        let mut inner = self.inner.lock().await;

        if inner.connected {
            return Ok(());
        }

        info!("Connecting to {}...", inner.transport.describe());
        inner.transport.open().await?;
        inner.connected = true;

        Ok(())
    }

    /// Release the transport and mark the session detached
    pub async fn disconnect(&self) -> Result<()> {
        let mut inner = self.inner.lock().await;

        if !inner.connected {
            return Ok(());
        }

        info!("Disconnecting from {}...", inner.transport.describe());
        inner.transport.close().await?;
        inner.connected = false;

        Ok(())
    }

    /// Check whether the session is connected
    pub async fn is_connected(&self) -> bool {
        let inner = self.inner.lock().await;
        inner.connected && inner.transport.is_open()
    }

    /// Run one request/response exchange
    ///
    /// Builds a standard frame around `contents`, enforces the 50 ms
    /// inter-frame gap, writes the frame, reads one packet, recovers
    /// and parses the response frame. The whole exchange holds the
    /// session lock, so concurrent callers serialize in call order.
    ///
    /// # Errors
    ///
    /// Any error of the taxonomy: [`Error::NotConnected`] without an
    /// open session, codec errors on malformed frames,
    /// [`Error::Timeout`] / [`Error::TransportRead`] /
    /// [`Error::TransportWrite`] from the transport,
    /// [`Error::MalformedResponse`] when no frame can be recovered,
    /// and [`Error::Rejected`] (carrying the parsed response) when the
    /// device reports the previous frame as rejected.
    pub async fn exchange(&self, contents: Vec<u8>) -> Result<Response> {
        let mut inner = self.inner.lock().await;

        if !inner.connected {
            return Err(Error::NotConnected);
        }

        // The device drops frames that arrive inside the quiescent
        // interval after the previous write.
        if let Some(last) = inner.last_write_at {
            let elapsed = last.elapsed();
            if elapsed < INTER_FRAME_GAP {
                tokio::time::sleep(INTER_FRAME_GAP - elapsed).await;
            }
        }

        let encoded = Frame::standard(contents).encode()?;
        trace!(">> {:02X?}", &encoded[..]);

        inner
            .transport
            .write(&encoded)
            .await
            .map_err(Error::TransportWrite)?;
        inner.last_write_at = Some(Instant::now());

        let packet = match inner.transport.read(self.read_timeout).await {
            Ok(packet) => packet,
            Err(oarlock_transport::Error::ReadTimeout) => return Err(Error::Timeout),
            Err(e) => return Err(Error::TransportRead(e)),
        };
        trace!("<< {:02X?}", &packet[..]);

        let frame_bytes = extract_frame(&packet).ok_or(Error::MalformedResponse)?;
        let frame = Frame::decode(frame_bytes)?;
        let response = Response::parse(&frame.contents)?;

        if response.prev_frame_status == PrevFrameStatus::Reject {
            debug!("Device rejected previous frame (state: {})", response.state);
            return Err(Error::Rejected { response });
        }

        Ok(response)
    }

    /// Exchange a batch of vendor commands under one wrapper
    pub(crate) async fn exchange_wrapped(
        &self,
        wrapper: u8,
        inner: &[Vec<u8>],
    ) -> Result<Response> {
        self.exchange(wrap(wrapper, inner)).await
    }

    /// Find a record by opcode or fail with `InvalidResponse`
    pub(crate) fn expect<'a>(
        response: &'a Response,
        opcode: u8,
    ) -> Result<&'a CommandResponse> {
        response.find(opcode).ok_or(Error::InvalidResponse(opcode))
    }
}

/// Locate the first complete frame inside a packet
///
/// Stray bytes before the start flag are tolerated; everything from
/// the first start flag to the first stop flag after it is the frame.
fn extract_frame(packet: &[u8]) -> Option<&[u8]> {
    let start = packet
        .iter()
        .position(|&b| b == STD_FRAME_START || b == EXT_FRAME_START)?;
    let stop = packet[start..].iter().position(|&b| b == FRAME_STOP)?;
    Some(&packet[start..start + stop + 1])
}

// ============================================================================
// Public CSAFE surface
// ============================================================================

/// Monitor identity reported by the public GetVersion command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    pub manufacturer_id: u8,
    pub class_id: u8,
    pub model: u8,
    pub hardware_version: u16,
    pub software_version: u16,
}

/// Elapsed work time reported by the public GetTWork command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkTime {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

impl Monitor {
    /// Read the status byte without any command payload
    pub async fn status(&self) -> Result<Response> {
        self.exchange(build(public::GET_STATUS, &[])).await
    }

    /// Reset the command state machine
    pub async fn reset(&self) -> Result<()> {
        self.exchange(build(public::RESET, &[])).await.map(|_| ())
    }

    /// Transition to the Idle state
    pub async fn go_idle(&self) -> Result<()> {
        self.exchange(build(public::GO_IDLE, &[])).await.map(|_| ())
    }

    /// Transition to the Ready state
    pub async fn go_ready(&self) -> Result<()> {
        self.exchange(build(public::GO_READY, &[])).await.map(|_| ())
    }

    /// Transition to the InUse state
    pub async fn go_in_use(&self) -> Result<()> {
        self.exchange(build(public::GO_IN_USE, &[])).await.map(|_| ())
    }

    /// Transition to the Finished state
    pub async fn go_finished(&self) -> Result<()> {
        self.exchange(build(public::GO_FINISHED, &[]))
            .await
            .map(|_| ())
    }

    /// Read manufacturer, model and firmware revision
    pub async fn version(&self) -> Result<Version> {
        let resp = self.exchange(build(public::GET_VERSION, &[])).await?;
        let rec = Self::expect(&resp, public::GET_VERSION)?;
        let d = &rec.data;
        if d.len() < 7 {
            return Err(Error::InvalidResponse(public::GET_VERSION));
        }
        Ok(Version {
            manufacturer_id: d[0],
            class_id: d[1],
            model: d[2],
            hardware_version: u16::from_le_bytes([d[3], d[4]]),
            software_version: u16::from_le_bytes([d[5], d[6]]),
        })
    }

    /// Read the serial number as printed on the back of the monitor
    pub async fn serial(&self) -> Result<String> {
        let resp = self.exchange(build(public::GET_SERIAL, &[])).await?;
        let rec = Self::expect(&resp, public::GET_SERIAL)?;
        Ok(String::from_utf8_lossy(&rec.data).into_owned())
    }

    /// Read elapsed work time (one-second resolution)
    pub async fn work_time(&self) -> Result<WorkTime> {
        let resp = self.exchange(build(public::GET_TWORK, &[])).await?;
        let rec = Self::expect(&resp, public::GET_TWORK)?;
        let d = &rec.data;
        if d.len() < 3 {
            return Err(Error::InvalidResponse(public::GET_TWORK));
        }
        Ok(WorkTime {
            hours: d[0],
            minutes: d[1],
            seconds: d[2],
        })
    }

    /// Read the covered distance in meters
    pub async fn distance(&self) -> Result<u16> {
        self.public_u16(public::GET_HORIZONTAL).await
    }

    /// Read total calories burned
    pub async fn calories(&self) -> Result<u16> {
        self.public_u16(public::GET_CALORIES).await
    }

    /// Read the current pace in hundredths of a second per 500 m
    pub async fn pace(&self) -> Result<u16> {
        self.public_u16(public::GET_PACE).await
    }

    /// Read the current stroke rate in strokes per minute
    pub async fn cadence(&self) -> Result<u16> {
        self.public_u16(public::GET_CADENCE).await
    }

    /// Read the current power output in watts
    pub async fn power(&self) -> Result<u16> {
        self.public_u16(public::GET_POWER).await
    }

    /// Read the current heart rate in beats per minute
    pub async fn heart_rate(&self) -> Result<u8> {
        let resp = self.exchange(build(public::GET_HR_CURRENT, &[])).await?;
        let rec = Self::expect(&resp, public::GET_HR_CURRENT)?;
        rec.data
            .first()
            .copied()
            .ok_or(Error::InvalidResponse(public::GET_HR_CURRENT))
    }

    /// Select a predefined workout slot
    pub async fn set_program(&self, number: WorkoutNumber) -> Result<()> {
        self.exchange(build(public::SET_PROGRAM, &[number.into(), 0x00]))
            .await
            .map(|_| ())
    }

    /// Set the workout time goal
    pub async fn set_time_goal(&self, hours: u8, minutes: u8, seconds: u8) -> Result<()> {
        self.exchange(build(public::SET_TWORK, &[hours, minutes, seconds]))
            .await
            .map(|_| ())
    }

    /// Set the distance goal in meters
    pub async fn set_distance_goal(&self, meters: u16) -> Result<()> {
        let [lo, hi] = meters.to_le_bytes();
        self.exchange(build(
            public::SET_HORIZONTAL,
            &[lo, hi, oarlock_csafe::consts::units::METERS],
        ))
        .await
        .map(|_| ())
    }

    /// Set the calorie goal
    pub async fn set_calorie_goal(&self, calories: u16) -> Result<()> {
        let [lo, hi] = calories.to_le_bytes();
        self.exchange(build(public::SET_CALORIES, &[lo, hi]))
            .await
            .map(|_| ())
    }

    /// Set the power goal in watts
    pub async fn set_power_goal(&self, watts: u16) -> Result<()> {
        let [lo, hi] = watts.to_le_bytes();
        self.exchange(build(
            public::SET_POWER,
            &[lo, hi, oarlock_csafe::consts::units::WATTS],
        ))
        .await
        .map(|_| ())
    }

    /// Public 2-byte reads are little-endian, unlike vendor payloads
    async fn public_u16(&self, opcode: u8) -> Result<u16> {
        let resp = self.exchange(build(opcode, &[])).await?;
        let rec = Self::expect(&resp, opcode)?;
        let d = &rec.data;
        if d.len() < 2 {
            return Err(Error::InvalidResponse(opcode));
        }
        Ok(u16::from_le_bytes([d[0], d[1]]))
    }
}
