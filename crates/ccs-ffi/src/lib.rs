//! C FFI bindings for ccs-core
//!
//! This crate provides a C-compatible API so editors and other host
//! applications can run the conversion in-process.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

/// Opaque handle to the outcome of a conversion
pub struct FfiConversion {
    inner: ccs_core::Result<ccs_core::Conversion>,
}

/// Validate and convert a CCS document given as JSON text
///
/// Always returns a handle for valid UTF-8 input, even when the conversion
/// fails; check `ccs_conversion_is_ok`.
///
/// # Safety
/// - `json` must be a valid C string or null
/// - Returns null if `json` is null or not UTF-8
#[no_mangle]
pub unsafe extern "C" fn ccs_convert(json: *const c_char) -> *mut FfiConversion {
    if json.is_null() {
        return ptr::null_mut();
    }

    let input = match CStr::from_ptr(json).to_str() {
        Ok(s) => s,
        Err(_) => return ptr::null_mut(),
    };

    let inner = ccs_core::convert_str(input);
    Box::into_raw(Box::new(FfiConversion { inner }))
}

/// Free a conversion handle
///
/// # Safety
/// - `conversion` must be a valid pointer returned by `ccs_convert` or null
#[no_mangle]
pub unsafe extern "C" fn ccs_free_conversion(conversion: *mut FfiConversion) {
    if !conversion.is_null() {
        drop(Box::from_raw(conversion));
    }
}

/// Whether the conversion succeeded
///
/// # Safety
/// - `conversion` must be a valid pointer returned by `ccs_convert`
#[no_mangle]
pub unsafe extern "C" fn ccs_conversion_is_ok(conversion: *const FfiConversion) -> bool {
    if conversion.is_null() {
        return false;
    }
    (*conversion).inner.is_ok()
}

/// Error message of a failed conversion
///
/// # Safety
/// - `conversion` must be a valid pointer returned by `ccs_convert`
/// - Returns null if the conversion succeeded
/// - Caller must free the returned string with `ccs_free_string`
#[no_mangle]
pub unsafe extern "C" fn ccs_conversion_error(conversion: *const FfiConversion) -> *mut c_char {
    if conversion.is_null() {
        return ptr::null_mut();
    }

    match &(*conversion).inner {
        Ok(_) => ptr::null_mut(),
        Err(e) => into_c_string(e.to_string()),
    }
}

/// The generated Content Patcher document as pretty-printed JSON
///
/// # Safety
/// - `conversion` must be a valid pointer returned by `ccs_convert`
/// - Returns null if the conversion failed
/// - Caller must free the returned string with `ccs_free_string`
#[no_mangle]
pub unsafe extern "C" fn ccs_conversion_document(conversion: *const FfiConversion) -> *mut c_char {
    if conversion.is_null() {
        return ptr::null_mut();
    }

    match &(*conversion).inner {
        Ok(c) => serde_json::to_string_pretty(&c.document)
            .map(into_c_string)
            .unwrap_or(ptr::null_mut()),
        Err(_) => ptr::null_mut(),
    }
}

/// Whether any station key was generated and needs renaming
///
/// # Safety
/// - `conversion` must be a valid pointer returned by `ccs_convert`
#[no_mangle]
pub unsafe extern "C" fn ccs_conversion_auto_generated(conversion: *const FfiConversion) -> bool {
    if conversion.is_null() {
        return false;
    }
    matches!(&(*conversion).inner, Ok(c) if c.auto_generated)
}

/// Number of author-supplied tile IDs
///
/// # Safety
/// - `conversion` must be a valid pointer returned by `ccs_convert`
#[no_mangle]
pub unsafe extern "C" fn ccs_conversion_tile_id_count(conversion: *const FfiConversion) -> usize {
    if conversion.is_null() {
        return 0;
    }

    match &(*conversion).inner {
        Ok(c) => c.tile_ids.len(),
        Err(_) => 0,
    }
}

/// Get an author-supplied tile ID by index
///
/// # Safety
/// - `conversion` must be a valid pointer returned by `ccs_convert`
/// - Returns null if index is out of bounds
/// - Caller must free the returned string with `ccs_free_string`
#[no_mangle]
pub unsafe extern "C" fn ccs_conversion_tile_id(
    conversion: *const FfiConversion,
    index: usize,
) -> *mut c_char {
    if conversion.is_null() {
        return ptr::null_mut();
    }

    match &(*conversion).inner {
        Ok(c) => c
            .tile_ids
            .get(index)
            .map(|s| into_c_string(s.clone()))
            .unwrap_or(ptr::null_mut()),
        Err(_) => ptr::null_mut(),
    }
}

/// Free a string returned by other FFI functions
///
/// # Safety
/// - `s` must be a valid pointer returned by a ccs_* function or null
#[no_mangle]
pub unsafe extern "C" fn ccs_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

fn into_c_string(s: String) -> *mut c_char {
    CString::new(s)
        .map(CString::into_raw)
        .unwrap_or(ptr::null_mut())
}
