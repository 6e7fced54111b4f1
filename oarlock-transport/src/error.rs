//! Transport errors

use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("transport not open")]
    NotOpen,

    #[error("transport already open")]
    AlreadyOpen,

    #[error("no matching device found")]
    DeviceNotFound,

    #[error("read timeout")]
    ReadTimeout,

    #[error("connection closed by device")]
    ConnectionClosed,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("HID error: {0}")]
    Hid(#[from] hidapi::HidError),
}
