/*
 * recording.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * RecordingIo: decorator that logs every read before delegating.
 */

use async_trait::async_trait;
use std::sync::Mutex;

use crate::traits::{Encoding, IoInterface, IoResult};

/// A single observed `read_file` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IoCall {
    pub name: String,
    pub encoding: Encoding,
}

/// Decorator that records calls made to the wrapped capability.
///
/// Calls are recorded in the order they are issued, before the inner
/// capability runs, so failing reads are recorded too.
pub struct RecordingIo<I: IoInterface> {
    inner: I,
    calls: Mutex<Vec<IoCall>>,
}

impl<I: IoInterface> RecordingIo<I> {
    /// Wrap `inner`, starting with an empty call log.
    pub fn new(inner: I) -> Self {
        Self {
            inner,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of all calls so far.
    pub fn calls(&self) -> Vec<IoCall> {
        match self.calls.lock() {
            Ok(calls) => calls.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Names passed to `read_file`, in call order.
    pub fn names(&self) -> Vec<String> {
        self.calls().into_iter().map(|call| call.name).collect()
    }

    /// Number of calls so far.
    pub fn call_count(&self) -> usize {
        self.calls().len()
    }

    pub fn inner(&self) -> &I {
        &self.inner
    }
}

#[async_trait]
impl<I: IoInterface> IoInterface for RecordingIo<I> {
    async fn read_file(&self, name: &str, encoding: Encoding) -> IoResult<String> {
        let call = IoCall {
            name: name.to_string(),
            encoding,
        };
        match self.calls.lock() {
            Ok(mut calls) => calls.push(call),
            Err(poisoned) => poisoned.into_inner().push(call),
        }
        self.inner.read_file(name, encoding).await
    }
}
