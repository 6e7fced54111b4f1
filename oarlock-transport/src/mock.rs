//! Scripted in-memory transport for tests
//!
//! Queue device packets ahead of time, then inspect what the engine
//! wrote and when. Clones share state, so a test can keep a handle
//! while the engine owns the boxed transport.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use parking_lot::Mutex;
use tokio::time::Instant;

use crate::{error::*, Transport};

/// Mock transport backed by scripted responses
#[derive(Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    open: bool,
    responses: VecDeque<Bytes>,
    written: Vec<Bytes>,
    write_times: Vec<Instant>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a packet to be returned by the next unanswered `read`
    pub fn queue_response(&self, data: impl Into<Bytes>) {
        self.inner.lock().responses.push_back(data.into());
    }

    /// Packets written so far, in order
    pub fn written(&self) -> Vec<Bytes> {
        self.inner.lock().written.clone()
    }

    /// Instant of each write, in order
    pub fn write_times(&self) -> Vec<Instant> {
        self.inner.lock().write_times.clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn open(&mut self) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.open {
            return Err(Error::AlreadyOpen);
        }
        inner.open = true;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.inner.lock().open = false;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.inner.lock().open
    }

    async fn write(&mut self, data: &[u8]) -> Result<usize> {
        let mut inner = self.inner.lock();
        if !inner.open {
            return Err(Error::NotOpen);
        }
        inner.written.push(Bytes::copy_from_slice(data));
        inner.write_times.push(Instant::now());
        Ok(data.len())
    }

    async fn read(&mut self, _timeout: Duration) -> Result<BytesMut> {
        let mut inner = self.inner.lock();
        if !inner.open {
            return Err(Error::NotOpen);
        }
        match inner.responses.pop_front() {
            Some(data) => Ok(BytesMut::from(&data[..])),
            None => Err(Error::ReadTimeout),
        }
    }

    fn describe(&self) -> String {
        "mock".to_string()
    }
}
