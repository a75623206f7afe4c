/*
 * upward-io
 * Copyright (c) 2025 Posit, PBC
 *
 * I/O capability abstraction for compiled resources.
 *
 * Compiled resources receive an IoInterface at construction instead of
 * reaching for the filesystem, so they can run against:
 *
 * - NativeIo: a directory on the local filesystem
 * - MemoryIo / FnIo: in-memory resources
 * - RecordingIo: any capability, with every call logged (decorator pattern)
 */

mod memory;
mod native;
mod recording;
mod traits;

// Re-export core types (API surface)
pub use traits::{Encoding, IoError, IoInterface, IoResult};

// Re-export capability implementations
pub use memory::{FnIo, MemoryIo};
pub use native::NativeIo;
pub use recording::{IoCall, RecordingIo};
