//! Response frame parsing
//!
//! The contents of a response frame are a status byte followed by a
//! run of `[opcode, byte_count, data...]` records mirroring the
//! request. Vendor wrapper records carry a further run of inner
//! records in their data; the same walker parses both levels, minus
//! the status byte on the inner one.

use bytes::Bytes;
use std::fmt;

use crate::{
    commands::is_wrapper,
    consts::{STATUS_FRAME_TOGGLE_MASK, STATUS_PREV_FRAME_MASK, STATUS_STATE_MASK},
    error::{Error, Result},
};

/// How the device treated the immediately preceding request
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum PrevFrameStatus {
    Ok = 0x00,
    Reject = 0x10,
    Bad = 0x20,
    NotReady = 0x30,
}

impl PrevFrameStatus {
    /// Extract from a raw status byte
    pub fn from_status(status: u8) -> Self {
        match status & STATUS_PREV_FRAME_MASK {
            0x00 => Self::Ok,
            0x10 => Self::Reject,
            0x20 => Self::Bad,
            _ => Self::NotReady,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Reject => "Reject",
            Self::Bad => "Bad",
            Self::NotReady => "Not Ready",
        }
    }
}

impl fmt::Display for PrevFrameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Command state machine reported in the low nibble of the status byte
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum MachineState {
    Error = 0x00,
    Ready = 0x01,
    Idle = 0x02,
    HaveId = 0x03,
    InUse = 0x05,
    Pause = 0x06,
    Finish = 0x07,
    Manual = 0x08,
    OffLine = 0x09,
}

impl MachineState {
    /// Extract from a raw status byte
    pub fn from_status(status: u8) -> Result<Self> {
        let state = status & STATUS_STATE_MASK;
        match state {
            0x00 => Ok(Self::Error),
            0x01 => Ok(Self::Ready),
            0x02 => Ok(Self::Idle),
            0x03 => Ok(Self::HaveId),
            0x05 => Ok(Self::InUse),
            0x06 => Ok(Self::Pause),
            0x07 => Ok(Self::Finish),
            0x08 => Ok(Self::Manual),
            0x09 => Ok(Self::OffLine),
            _ => Err(Error::UnknownState(state)),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::Ready => "Ready",
            Self::Idle => "Idle",
            Self::HaveId => "Have ID",
            Self::InUse => "In Use",
            Self::Pause => "Pause",
            Self::Finish => "Finish",
            Self::Manual => "Manual",
            Self::OffLine => "Off Line",
        }
    }
}

impl fmt::Display for MachineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One parsed `[opcode, byte_count, data...]` record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResponse {
    /// Echoed command opcode
    pub command: u8,

    /// Byte count the device declared for this record
    pub byte_count: u8,

    /// Record data; shorter than `byte_count` when the frame was clipped
    pub data: Bytes,

    /// Inner records, non-empty only for vendor wrapper opcodes
    pub nested: Vec<CommandResponse>,
}

impl CommandResponse {
    /// First inner record, if any
    pub fn first_nested(&self) -> Option<&CommandResponse> {
        self.nested.first()
    }
}

/// Parsed contents of one response frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Raw status byte
    pub status: u8,

    /// Frame toggle bit (bit 7)
    pub frame_toggle: bool,

    /// Disposition of the preceding request (bits 4–5)
    pub prev_frame_status: PrevFrameStatus,

    /// Command state machine (bits 0–3)
    pub state: MachineState,

    /// Command records in wire order
    pub commands: Vec<CommandResponse>,
}

impl Response {
    /// Parse the contents of a decoded response frame
    ///
    /// # Errors
    ///
    /// Fails when the contents are empty (no status byte) or when the
    /// status byte names a machine state outside the protocol table.
    /// Truncated command records never fail: the available bytes are
    /// kept and the walk stops.
    pub fn parse(contents: &[u8]) -> Result<Self> {
        let Some((&status, rest)) = contents.split_first() else {
            return Err(Error::FrameTooShort {
                expected: 1,
                actual: 0,
            });
        };

        Ok(Self {
            status,
            frame_toggle: status & STATUS_FRAME_TOGGLE_MASK != 0,
            prev_frame_status: PrevFrameStatus::from_status(status),
            state: MachineState::from_status(status)?,
            commands: walk(rest),
        })
    }

    /// Find a record by opcode, searching the top level first and then
    /// inside vendor wrappers
    pub fn find(&self, opcode: u8) -> Option<&CommandResponse> {
        find_in(&self.commands, opcode)
    }
}

fn find_in<'a>(records: &'a [CommandResponse], opcode: u8) -> Option<&'a CommandResponse> {
    records
        .iter()
        .find(|r| r.command == opcode)
        .or_else(|| records.iter().find_map(|r| find_in(&r.nested, opcode)))
}

/// Walk a run of `[opcode, byte_count, data...]` records
///
/// Shared by the top level (after the status byte) and by wrapper
/// payloads. A record whose byte count is missing or overruns the
/// buffer is kept with whatever bytes remain; frames clipped under
/// PrevFrameStatus=Bad still yield their leading records.
fn walk(mut buf: &[u8]) -> Vec<CommandResponse> {
    let mut records = Vec::new();

    while let Some((&command, rest)) = buf.split_first() {
        let Some((&byte_count, rest)) = rest.split_first() else {
            records.push(CommandResponse {
                command,
                byte_count: 0,
                data: Bytes::new(),
                nested: Vec::new(),
            });
            break;
        };

        let take = (byte_count as usize).min(rest.len());
        let data = Bytes::copy_from_slice(&rest[..take]);
        buf = &rest[take..];

        let nested = if is_wrapper(command) && !data.is_empty() {
            walk(&data)
        } else {
            Vec::new()
        };

        records.push(CommandResponse {
            command,
            byte_count,
            data,
            nested,
        });
    }

    records
}
