//! # antitrace
//!
//! Native library that terminates its host process when a tracer attaches.
//!
//! Loading the shared object into a JVM runs [`JNI_OnLoad`](hooks::JNI_OnLoad),
//! which starts a background thread polling `/proc/<pid>/status` every five
//! seconds. When the `TracerPid` field exceeds 1000 the process exits
//! immediately with status 0, without unwinding or notifying the host.
//! [`JNI_OnUnload`](hooks::JNI_OnUnload) cancels the poller.
//!
//! Rust hosts can call [`on_load`] / [`on_unload`] directly, or
//! [`start_with`] to supply their own source, configuration and responder.
//!
//! ## Why unsafe code is allowed
//!
//! The JNI hooks must be exported under fixed, unmangled symbol names, which
//! the `unsafe_code` lint reports. No `unsafe` blocks are used.

#![allow(unsafe_code)] // Required for `#[no_mangle]` JNI exports

pub mod hooks;
pub mod responder;
mod runtime;

pub use hooks::{JInt, JNI_VERSION_1_6};
pub use responder::{ProcessExitResponder, EXIT_STATUS};
pub use runtime::{is_running, on_load, on_unload, start, start_with, stop};
