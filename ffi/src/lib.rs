//! C-ABI wrapper around `marvel-core` for native mobile hosts.
//!
//! # Overview
//! The host owns the network stack and the UI thread. It asks this library
//! for the character-list request, performs it however it likes, and hands
//! the response back to receive either display-ready characters or the
//! message to show in an error alert.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - `marvel_parse_list_characters` applies the whole pipeline: status
//!   check, decode, missing-results policy, and mapping.
//! - The caller owns all returned pointers and must call the matching
//!   `marvel_free_*` function to release them.

pub mod types;

use std::ffi::{c_char, CStr};
use std::panic::catch_unwind;

use marvel_core::{
    extract_results, image_url, to_display_records, CatalogClient, Credentials, HttpResponse,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use types::*;

/// Borrow a C string as `&str`; `None` for null or invalid UTF-8.
unsafe fn opt_str<'a>(s: *const c_char) -> Option<&'a str> {
    if s.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(s) }.to_str().ok()
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Install a stderr `tracing` subscriber filtered by `RUST_LOG`
/// (default `marvel_core=info`). Returns false if one was already installed.
#[unsafe(no_mangle)]
pub extern "C" fn marvel_init_logging() -> bool {
    catch_unwind(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("marvel_core=info,marvel_ffi=info"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok()
    })
    .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a `CatalogClient` bound to `base_url`.
///
/// `public_key` and `private_key` may both be null for an unsigned client.
/// Returns null if `base_url` is null or empty, or if exactly one key is
/// given. Free with `marvel_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn marvel_client_new(
    base_url: *const c_char,
    public_key: *const c_char,
    private_key: *const c_char,
) -> *mut FfiCatalogClient {
    catch_unwind(|| {
        let Some(url) = (unsafe { opt_str(base_url) }).filter(|u| !u.is_empty()) else {
            return std::ptr::null_mut();
        };
        let client = CatalogClient::new(url);
        let client = match unsafe { (opt_str(public_key), opt_str(private_key)) } {
            (Some(public), Some(private)) => {
                client.with_credentials(Credentials::new(public, private))
            }
            (None, None) => client,
            _ => return std::ptr::null_mut(),
        };
        Box::into_raw(Box::new(FfiCatalogClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `marvel_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn marvel_client_free(client: *mut FfiCatalogClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Request / response
// ---------------------------------------------------------------------------

/// Build the character-list request.
///
/// `ts` is the request timestamp used for signing; pass null to use the
/// current time. Returns null if `client` is null. Free with
/// `marvel_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn marvel_build_list_characters(
    client: *const FfiCatalogClient,
    ts: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let ts = match unsafe { opt_str(ts) } {
            Some(ts) => ts.to_string(),
            None => marvel_core::client::timestamp(),
        };
        let req = client.inner.build_list_characters(&ts);
        debug!(url = %req.url, "built character list request");
        FfiHttpRequest::from_core(req)
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Copy the host's response. Invalid UTF-8 in the body is replaced, not
/// discarded, so error statuses keep their text.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    let body = if resp.body.is_null() {
        String::new()
    } else {
        unsafe { CStr::from_ptr(resp.body) }
            .to_string_lossy()
            .into_owned()
    };
    HttpResponse {
        status: resp.status,
        headers: Vec::new(),
        body,
    }
}

/// Turn the host's response into display-ready characters or an error
/// message. Never returns null. Free with `marvel_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn marvel_parse_list_characters(
    client: *const FfiCatalogClient,
    response: *const FfiHttpResponse,
) -> *mut FfiCharacterResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiCharacterResult::null_arg("client");
        }
        if response.is_null() {
            return FfiCharacterResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        let outcome = client
            .inner
            .parse_list_characters(ffi_response_to_core(resp))
            .and_then(extract_results)
            .map(to_display_records);
        match outcome {
            Ok(records) => FfiCharacterResult::ok(records),
            Err(e) => FfiCharacterResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiCharacterResult::panic("panic in marvel_parse_list_characters"))
}

// ---------------------------------------------------------------------------
// Images and selection
// ---------------------------------------------------------------------------

/// `{photo_url}/portrait_xlarge.{extension}`, or null when either argument
/// is null or `photo_url` is not an absolute URL. Free with
/// `marvel_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn marvel_image_url(
    photo_url: *const c_char,
    extension: *const c_char,
) -> *mut c_char {
    catch_unwind(|| {
        let photo_url = unsafe { opt_str(photo_url) };
        let extension = unsafe { opt_str(extension) };
        let (Some(photo_url), Some(extension)) = (photo_url, extension) else {
            return std::ptr::null_mut();
        };
        match image_url(photo_url, extension) {
            Some(url) => c_string(url),
            None => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Borrow the character at `index` of a successful result, for handing to
/// the detail screen. Null when out of range or the result is an error. The
/// pointer stays valid until the result is freed.
#[unsafe(no_mangle)]
pub extern "C" fn marvel_result_character_at(
    result: *const FfiCharacterResult,
    index: u32,
) -> *const FfiCharacter {
    catch_unwind(|| {
        if result.is_null() {
            return std::ptr::null();
        }
        let result = unsafe { &*result };
        if result.characters.is_null() {
            return std::ptr::null();
        }
        let list = unsafe { &*result.characters };
        if index >= list.len || list.items.is_null() {
            return std::ptr::null();
        }
        unsafe { list.items.add(index as usize) as *const FfiCharacter }
    })
    .unwrap_or(std::ptr::null())
}

/// Thumbnail URL of one character. Same contract as `marvel_image_url`.
#[unsafe(no_mangle)]
pub extern "C" fn marvel_character_image_url(character: *const FfiCharacter) -> *mut c_char {
    if character.is_null() {
        return std::ptr::null_mut();
    }
    let character = unsafe { &*character };
    marvel_image_url(character.photo_url, character.photo_extension)
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free a request from `marvel_build_list_characters`. Safe with null.
#[unsafe(no_mangle)]
pub extern "C" fn marvel_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        unsafe { drop_c_string(req.url) };
        let headers = unsafe { boxed_slice_from_raw(req.headers, req.headers_len) };
        for header in headers.iter() {
            unsafe {
                drop_c_string(header.key);
                drop_c_string(header.value);
            }
        }
    });
}

/// Free a result from `marvel_parse_list_characters`, including every
/// character in it. Safe with null.
#[unsafe(no_mangle)]
pub extern "C" fn marvel_free_result(result: *mut FfiCharacterResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| unsafe { FfiCharacterResult::free(result) });
}

/// Free a string returned by this library. Safe with null.
#[unsafe(no_mangle)]
pub extern "C" fn marvel_free_string(s: *mut c_char) {
    let _ = catch_unwind(|| unsafe { drop_c_string(s) });
}
