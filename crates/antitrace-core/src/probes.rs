//! # Environment Probes
//!
//! One-shot checks that complement the tracer monitor. None of them act on
//! their result; callers decide what a positive probe means.
//!
//! - [`is_traced_by_status`]: key-based `TracerPid` check on a status dump
//! - [`current_process_name`]: first argument of `/proc/self/cmdline`
//! - [`has_loaded_library`]: a mapped `.so`/`.jar` path contains a fragment
//! - [`runs_in_virtual_app`]: the process maps files of a known app cloner
//! - [`su_binary_present`]: a `su` binary exists in a well-known location
//! - [`is_bluestacks`]: BlueStacks shared folder is mounted
//! - [`is_port_in_use`]: something accepts TCP connections on a port

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::net::{TcpStream, ToSocketAddrs};
use std::path::Path;
use std::time::Duration;

use antitrace_utils::LOG_TARGET;
use tracing::trace;

use crate::config::TRACER_PID_KEY;
use crate::parser::split_status_line;

/// Locations where a `su` binary usually lives on rooted devices.
pub const SU_PATHS: [&str; 8] = [
    "/sbin/su",
    "/system/bin/su",
    "/system/xbin/su",
    "/data/local/xbin/su",
    "/data/local/bin/su",
    "/system/sd/xbin/su",
    "/system/bin/failsafe/su",
    "/data/local/su",
];

/// Files only present inside the BlueStacks emulator.
pub const BLUESTACKS_PATHS: [&str; 1] = ["/mnt/windows/BstSharedFolder"];

/// Package names of apps that run other apps inside a cloned sandbox.
pub const VIRTUAL_APP_PACKAGES: [&str; 6] = [
    "com.bly.dkplat",
    "com.by.chaos",
    "com.lbe.parallel",
    "com.excelliance.dualaid",
    "com.lody.virtual",
    "com.qihoo.magic",
];

/// Upper bound on the bytes kept from a process name.
pub const PROCESS_NAME_MAX: usize = 256;

/// Value of the `TracerPid` field in a full status dump, if present.
#[must_use]
pub fn tracer_pid_field(status: &str) -> Option<&str>
{
    status
        .lines()
        .filter_map(split_status_line)
        .find_map(|(key, value)| (key == TRACER_PID_KEY).then_some(value))
}

/// True unless the status dump holds a `TracerPid` of exactly `0`.
///
/// A dump without a `TracerPid` line is reported as traced: the field is
/// present on every kernel that can trace, so its absence means the dump was
/// tampered with or is not a status record.
#[must_use]
pub fn is_traced_by_status(status: &str) -> bool
{
    !matches!(tracer_pid_field(status), Some("0"))
}

/// Process name from the contents of `/proc/<pid>/cmdline`.
///
/// The name is the first NUL-terminated argument, capped at
/// [`PROCESS_NAME_MAX`] bytes. `None` when it is empty.
#[must_use]
pub fn process_name_from_cmdline(cmdline: &[u8]) -> Option<String>
{
    let name = cmdline.split(|&byte| byte == 0).next().unwrap_or_default();
    let name = &name[..name.len().min(PROCESS_NAME_MAX)];
    (!name.is_empty()).then(|| String::from_utf8_lossy(name).into_owned())
}

/// Name of the calling process, as the kernel reports it.
///
/// On Android this is the package name (or `package:process`).
///
/// ## Errors
///
/// Any I/O error reading `/proc/self/cmdline`.
pub fn current_process_name() -> io::Result<Option<String>>
{
    Ok(process_name_from_cmdline(&fs::read("/proc/self/cmdline")?))
}

/// Library and archive paths mapped into a process, from a `/proc/<pid>/maps` listing.
///
/// A line counts when it ends in `.so` or `.jar`; its last column is the path.
///
/// ## Errors
///
/// Any I/O error while reading `maps`.
pub fn loaded_libraries<R: BufRead>(maps: R) -> io::Result<BTreeSet<String>>
{
    let mut libraries = BTreeSet::new();
    for line in maps.lines() {
        let line = line?;
        let line = line.trim_end();
        if !(line.ends_with(".so") || line.ends_with(".jar")) {
            continue;
        }
        if let Some(path) = line.split_whitespace().last() {
            libraries.insert(path.to_string());
        }
    }
    Ok(libraries)
}

/// True when any library mapped into the current process contains `fragment`.
///
/// ## Errors
///
/// Any I/O error opening or reading `/proc/self/maps`.
pub fn has_loaded_library(fragment: &str) -> io::Result<bool>
{
    let maps = BufReader::new(File::open("/proc/self/maps")?);
    Ok(loaded_libraries(maps)?.iter().any(|path| path.contains(fragment)))
}

/// True when any line of a `/proc/<pid>/maps` listing mentions one of
/// [`VIRTUAL_APP_PACKAGES`].
///
/// ## Errors
///
/// Any I/O error while reading `maps`.
pub fn maps_mention_virtual_app<R: BufRead>(maps: R) -> io::Result<bool>
{
    for line in maps.lines() {
        let line = line?;
        if let Some(package) = VIRTUAL_APP_PACKAGES.into_iter().find(|package| line.contains(package)) {
            trace!(target: LOG_TARGET, package, "virtual app mapping found");
            return Ok(true);
        }
    }
    Ok(false)
}

/// True when the current process maps files that belong to an app cloner.
///
/// ## Errors
///
/// Any I/O error opening or reading `/proc/self/maps`.
pub fn runs_in_virtual_app() -> io::Result<bool>
{
    maps_mention_virtual_app(BufReader::new(File::open("/proc/self/maps")?))
}

/// True when at least one of `paths` exists.
pub fn any_path_exists<I, P>(paths: I) -> bool
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    paths.into_iter().any(|path| path.as_ref().exists())
}

#[must_use]
pub fn su_binary_present() -> bool
{
    any_path_exists(SU_PATHS)
}

#[must_use]
pub fn is_bluestacks() -> bool
{
    any_path_exists(BLUESTACKS_PATHS)
}

/// True when a TCP connection to `host:port` succeeds within `timeout`.
///
/// A host that does not resolve is reported as in use, so a broken resolver
/// never hides a listening debug server.
#[must_use]
pub fn is_port_in_use(host: &str, port: u16, timeout: Duration) -> bool
{
    let addrs = match (host, port).to_socket_addrs() {
        Ok(addrs) => addrs,
        Err(err) => {
            trace!(target: LOG_TARGET, host, port, error = %err, "host did not resolve");
            return true;
        }
    };

    addrs.into_iter().any(|addr| TcpStream::connect_timeout(&addr, timeout).is_ok())
}
