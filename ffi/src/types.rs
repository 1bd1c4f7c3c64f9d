//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type with C-compatible fields: `*mut c_char`
//! for strings, pointer + length for lists, explicit discriminants for
//! enums. Arrays are allocated as boxed slices so they can be released from
//! pointer and length alone.

use std::ffi::{c_char, CString};

use marvel_core::{ApiError, DisplayRecord, HttpMethod, HttpRequest};

/// Opaque handle to a `CatalogClient`. C callers receive a pointer to this
/// and pass it back into every FFI function.
pub struct FfiCatalogClient {
    pub(crate) inner: marvel_core::CatalogClient,
}

/// Copy `s` into a heap C string, dropping interior NUL bytes.
pub(crate) fn c_string(s: impl Into<Vec<u8>>) -> *mut c_char {
    let mut bytes = s.into();
    bytes.retain(|b| *b != 0);
    CString::new(bytes).unwrap_or_default().into_raw()
}

/// Release a string produced by `c_string`. Null is ignored.
pub(crate) unsafe fn drop_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

pub(crate) fn boxed_slice_into_raw<T>(items: Vec<T>) -> (*mut T, u32) {
    if items.is_empty() {
        return (std::ptr::null_mut(), 0);
    }
    let len = items.len() as u32;
    let ptr = Box::into_raw(items.into_boxed_slice()) as *mut T;
    (ptr, len)
}

pub(crate) unsafe fn boxed_slice_from_raw<T>(ptr: *mut T, len: u32) -> Box<[T]> {
    if ptr.is_null() {
        return Box::new([]);
    }
    unsafe { Box::from_raw(std::ptr::slice_from_raw_parts_mut(ptr, len as usize)) }
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// `url` already carries the encoded query string. The host executes the
/// request and passes the response back through
/// `marvel_parse_list_characters`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
}

impl FfiHttpRequest {
    pub(crate) fn from_core(req: HttpRequest) -> *mut Self {
        let url = c_string(req.full_url());
        let headers: Vec<FfiHeader> = req
            .headers
            .into_iter()
            .map(|(key, value)| FfiHeader {
                key: c_string(key),
                value: c_string(value),
            })
            .collect();
        let (headers, headers_len) = boxed_slice_into_raw(headers);
        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            url,
            headers,
            headers_len,
        }))
    }
}

/// An HTTP response handed in by the host. `body` may be null (empty).
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Failure category. The UI shows `error_message`; the code is for logs.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    NullArg = 1,
    Transport = 2,
    Http = 3,
    Deserialization = 4,
    MissingResults = 5,
    InvalidConfig = 6,
    Panic = 7,
}

/// One character ready for display.
#[repr(C)]
pub struct FfiCharacter {
    pub name: *mut c_char,
    pub description: *mut c_char,
    pub photo_url: *mut c_char,
    pub photo_extension: *mut c_char,
}

impl FfiCharacter {
    fn from_core(record: DisplayRecord) -> Self {
        FfiCharacter {
            name: c_string(record.name),
            description: c_string(record.description),
            photo_url: c_string(record.photo_url),
            photo_extension: c_string(record.photo_extension),
        }
    }

    unsafe fn free_fields(&self) {
        unsafe {
            drop_c_string(self.name);
            drop_c_string(self.description);
            drop_c_string(self.photo_url);
            drop_c_string(self.photo_extension);
        }
    }
}

/// Characters in server order.
#[repr(C)]
pub struct FfiCharacterList {
    pub items: *mut FfiCharacter,
    pub len: u32,
}

/// Result envelope for `marvel_parse_list_characters`.
///
/// On success `error_code` is `Ok`, `error_message` is null and
/// `characters` points to the list (possibly empty). On failure
/// `error_message` is the text to show the user and `characters` is null.
#[repr(C)]
pub struct FfiCharacterResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub characters: *mut FfiCharacterList,
}

impl FfiCharacterResult {
    pub(crate) fn ok(records: Vec<DisplayRecord>) -> *mut Self {
        let items: Vec<FfiCharacter> = records.into_iter().map(FfiCharacter::from_core).collect();
        let (items, len) = boxed_slice_into_raw(items);
        let list = Box::into_raw(Box::new(FfiCharacterList { items, len }));
        Box::into_raw(Box::new(FfiCharacterResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            http_status: 0,
            characters: list,
        }))
    }

    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let (error_code, http_status) = match &err {
            ApiError::Transport(_) => (FfiErrorCode::Transport, 0),
            ApiError::HttpError { status, .. } => (FfiErrorCode::Http, *status),
            ApiError::DeserializationError(_) => (FfiErrorCode::Deserialization, 0),
            ApiError::MissingResults => (FfiErrorCode::MissingResults, 0),
            ApiError::InvalidConfig(_) => (FfiErrorCode::InvalidConfig, 0),
        };
        Self::error(error_code, http_status, &err.to_string())
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::error(FfiErrorCode::NullArg, 0, &format!("null argument: {name}"))
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::error(FfiErrorCode::Panic, 0, msg)
    }

    fn error(error_code: FfiErrorCode, http_status: u16, msg: &str) -> *mut Self {
        Box::into_raw(Box::new(FfiCharacterResult {
            error_code,
            error_message: c_string(msg),
            http_status,
            characters: std::ptr::null_mut(),
        }))
    }

    /// Release everything reachable from `result`, then `result` itself.
    pub(crate) unsafe fn free(result: *mut Self) {
        let result = unsafe { Box::from_raw(result) };
        unsafe { drop_c_string(result.error_message) };
        if !result.characters.is_null() {
            let list = unsafe { Box::from_raw(result.characters) };
            let items = unsafe { boxed_slice_from_raw(list.items, list.len) };
            for item in items.iter() {
                unsafe { item.free_fields() };
            }
        }
    }
}
