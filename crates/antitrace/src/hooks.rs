//! Symbols the Java runtime looks up when it loads and unloads the library.
//!
//! Both hooks ignore their arguments; the monitor needs nothing from the VM.

use std::ffi::c_void;

/// JNI's `jint`.
pub type JInt = i32;

/// Version token returned from `JNI_OnLoad`.
pub const JNI_VERSION_1_6: JInt = 0x0001_0006;

/// Called by the VM after `System.loadLibrary`.
#[no_mangle]
#[allow(non_snake_case)]
pub extern "C" fn JNI_OnLoad(_vm: *mut c_void, _reserved: *mut c_void) -> JInt
{
    crate::on_load()
}

/// Called by the VM when the class loader holding the library is collected.
#[no_mangle]
#[allow(non_snake_case)]
pub extern "C" fn JNI_OnUnload(_vm: *mut c_void, _reserved: *mut c_void)
{
    crate::on_unload();
}
