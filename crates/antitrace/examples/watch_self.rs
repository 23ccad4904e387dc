//! Run the tracer monitor against this example's own process.
//!
//! ## Usage:
//!
//! ```bash
//! # Terminal 1: start the watched process (debug output, faster polling)
//! RUST_LOG=antitrace=debug ANTITRACE_POLL_INTERVAL_MS=1000 cargo run --example watch_self
//!
//! # Terminal 2: attach a tracer; terminal 1 exits within one interval
//! sudo gdb -p <PID>
//! ```
//!
//! Press Ctrl-C to unload the library instead, which stops the monitor.

use std::sync::mpsc;

fn main()
{
    let version = antitrace::on_load();
    println!(
        "pid {} is watching itself (JNI version token 0x{version:08x})",
        std::process::id()
    );

    let (tx, rx) = mpsc::channel();
    ctrlc::set_handler(move || {
        let _ = tx.send(());
    })
    .expect("Failed to install Ctrl-C handler");

    let _ = rx.recv();
    antitrace::on_unload();
    println!("monitor stopped, exiting");
}
