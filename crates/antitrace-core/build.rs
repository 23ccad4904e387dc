//! Build script for antitrace-core
//!
//! Checks the toolchain and target before compilation:
//! - Minimum Rust version (1.70, for `Option::is_some_and`)
//! - Target OS: the procfs status source only exists on Linux and Android
//!
//! Targets are read from `CARGO_CFG_*` so cross-compiling for Android from
//! another host reports the right platform.

use std::env;

fn main()
{
    println!("cargo:rerun-if-changed=build.rs");

    if let Ok(rustc_version) = rustc_version::version() {
        let min_rust_version = rustc_version::Version::new(1, 70, 0);

        if rustc_version < min_rust_version {
            panic!("antitrace-core requires Rust {min_rust_version} or newer, found {rustc_version}");
        }
    } else {
        // If we can't get version (e.g., in some build environments), just warn
        println!("cargo:warning=could not verify Rust version");
    }

    check_target_os();
}

fn check_target_os()
{
    let target_os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();

    match target_os.as_str() {
        "linux" | "android" => {}
        other => {
            println!(
                "cargo:warning=antitrace-core targets Linux/Android procfs; on '{other}' the tracer monitor stops on its first iteration"
            );
        }
    }
}
