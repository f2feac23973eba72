use std::{os::raw::c_char, ptr};

use libc::size_t;

/// The error record shared with C callers.
///
/// A record starts out empty. Every fallible call that is handed a record
/// either stores its failure in it or empties it again on success, so a
/// record never reports a stale failure.
#[derive(Debug, Default)]
pub struct Error {
    err: Option<rubex::Error>,
}

impl Error {
    pub fn new(err: rubex::Error) -> Error {
        Error { err: Some(err) }
    }

    pub fn is_err(&self) -> bool {
        self.err.is_some()
    }

    fn code(&self) -> i32 {
        self.err.as_ref().map_or(rubex::code::NORMAL, |err| err.code())
    }

    fn message(&self) -> &[u8] {
        match self.err {
            None => b"\0",
            Some(ref err) => err.as_bytes_with_nul(),
        }
    }

    fn required(&self) -> usize {
        match self.err.as_ref().map(|err| err.kind()) {
            Some(rubex::ErrorKind::BufferTooSmall { required }) => required,
            _ => 0,
        }
    }
}

/// Stores `err` in the record at `dst`, if there is one.
pub(crate) unsafe fn set(dst: *mut Error, err: rubex::Error) {
    if !dst.is_null() {
        *dst = Error::new(err);
    }
}

/// Empties the record at `dst`, if there is one.
pub(crate) unsafe fn clear(dst: *mut Error) {
    if !dst.is_null() {
        *dst = Error::default();
    }
}

ffi_fn! {
    fn rubex_error_new() -> *mut Error {
        Box::into_raw(Box::new(Error::default()))
    }
}

ffi_fn! {
    fn rubex_error_free(err: *mut Error) {
        if !err.is_null() {
            unsafe { drop(Box::from_raw(err)); }
        }
    }
}

ffi_fn! {
    fn rubex_error_code(err: *const Error) -> i32 {
        if err.is_null() {
            return rubex::code::NORMAL;
        }
        unsafe { &*err }.code()
    }
}

ffi_fn! {
    fn rubex_error_message(err: *const Error) -> *const c_char {
        if err.is_null() {
            return ptr::null();
        }
        let err = unsafe { &*err };
        err.message().as_ptr() as *const c_char
    }
}

ffi_fn! {
    fn rubex_error_required(err: *const Error) -> size_t {
        if err.is_null() {
            return 0;
        }
        unsafe { &*err }.required()
    }
}
