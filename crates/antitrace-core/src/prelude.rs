//! Common module for library exports

pub use crate::cancel::CancelToken;
pub use crate::config::{FieldLocator, MonitorConfig, DEFAULT_POLL_INTERVAL, DEFAULT_TRACER_THRESHOLD};
pub use crate::error::{FieldError, MonitorError, MonitorResult};
pub use crate::monitor::{MonitorExit, MonitorHandle, TracerMonitor, TracerResponder, Verdict};
pub use crate::parser::parse_status_field;
pub use crate::source::{FileStatusSource, StatusSource};
pub use crate::types::TracerId;
