//! C FFI API functions.

use crate::host::HostItem;
use crate::types::*;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use parcel_core::{Error, MergeStrategy, Result, SideBySideMerge, VerticalStackMerge};
use parcel_packer::{DefaultPacker, Packer, PackingResult, RecursivePacker};

/// Error codes.
pub const PARCEL_OK: i32 = 0;
pub const PARCEL_ERR_NULL_PTR: i32 = -1;
pub const PARCEL_ERR_INVALID_JSON: i32 = -2;
pub const PARCEL_ERR_PACK_FAILED: i32 = -3;
pub const PARCEL_ERR_UNKNOWN: i32 = -99;

/// Packs the items of a JSON request.
///
/// The response JSON is written to `result_ptr` for every return code except
/// `PARCEL_ERR_NULL_PTR` and `PARCEL_ERR_UNKNOWN`. Items that cannot be packed
/// are listed under `not_packed` and do not fail the call.
///
/// # Safety
/// - `request_json` must be a valid null-terminated UTF-8 string
/// - `result_ptr` must be a valid pointer to a `*mut c_char`
/// - The caller must free the result string using `parcel_free_string`
#[no_mangle]
pub unsafe extern "C" fn parcel_make_packages(
    request_json: *const c_char,
    result_ptr: *mut *mut c_char,
) -> i32 {
    if request_json.is_null() || result_ptr.is_null() {
        return PARCEL_ERR_NULL_PTR;
    }

    let (code, response) = match CStr::from_ptr(request_json).to_str() {
        Ok(json_str) => match serde_json::from_str::<PackRequest>(json_str) {
            Ok(request) => {
                let response = make_packages_internal(&request);
                let code = if response.success {
                    PARCEL_OK
                } else {
                    PARCEL_ERR_PACK_FAILED
                };
                (code, response)
            }
            Err(e) => (
                PARCEL_ERR_INVALID_JSON,
                PackResponse::failure(format!("Invalid JSON: {}", e)),
            ),
        },
        Err(_) => (
            PARCEL_ERR_INVALID_JSON,
            PackResponse::failure("Request is not valid UTF-8"),
        ),
    };

    let response_json = match serde_json::to_string(&response) {
        Ok(s) => s,
        Err(_) => return PARCEL_ERR_UNKNOWN,
    };

    match CString::new(response_json) {
        Ok(cstr) => {
            *result_ptr = cstr.into_raw();
            code
        }
        Err(_) => PARCEL_ERR_UNKNOWN,
    }
}

/// Frees a string allocated by parcel.
///
/// # Safety
/// - `ptr` must have been allocated by a parcel function
/// - `ptr` must not be used after this call
#[no_mangle]
pub unsafe extern "C" fn parcel_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

/// Returns the API version from Cargo.toml.
///
/// # Safety
/// - The returned string is statically allocated and must not be freed
#[no_mangle]
pub extern "C" fn parcel_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

/// Runs a parsed request. Configuration errors produce a failed response.
pub fn make_packages_internal(request: &PackRequest) -> PackResponse {
    let config = request.config.clone().unwrap_or_default().to_config();
    let result = match request.packer {
        PackerKind::Default => DefaultPacker::new(config).and_then(|p| run(p, request)),
        PackerKind::Recursive => RecursivePacker::new(config).and_then(|p| run(p, request)),
    };

    match result {
        Ok(result) => result.into(),
        Err(e) => {
            log::warn!("packing request rejected: {}", e);
            PackResponse::failure(e.to_string())
        }
    }
}

fn run<P: Packer>(mut packer: P, request: &PackRequest) -> Result<PackingResult<HostItem>> {
    configure(&mut packer, request)?;
    let items = request
        .items
        .iter()
        .map(|row| HostItem::new(row.clone(), request.field_prefix.as_str()));
    packer.make_packages(items)
}

fn configure<P: Packer>(packer: &mut P, request: &PackRequest) -> Result<()> {
    if let Some(weight) = request.preferred_weight {
        packer.set_preferred_weight(weight)?;
    }
    if let Some(size) = request.preferred_size {
        packer.set_preferred_size(size)?;
    }
    if let Some([first, second]) = request.handling_limits {
        packer.set_additional_handling_limits(first, second)?;
    }
    if let Some(value) = request.max_insurance {
        packer.set_max_insurance(value)?;
    }
    for name in &request.merge_strategies {
        packer.add_merge_strategy(merge_strategy(name)?);
    }
    Ok(())
}

fn merge_strategy(name: &str) -> Result<Box<dyn MergeStrategy>> {
    match name.to_lowercase().as_str() {
        "vertical_stack" | "vertical" => Ok(Box::new(VerticalStackMerge)),
        "side_by_side" | "side" => Ok(Box::new(SideBySideMerge)),
        _ => Err(Error::ConfigError(format!(
            "Unknown merge strategy '{}'",
            name
        ))),
    }
}
