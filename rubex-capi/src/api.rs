use std::{ptr, slice};

use libc::size_t;
use rubex::{code, Options, SearchOptions};

use crate::error::{self, Error};

/// A compiled pattern, owned by the C caller until `rubex_free`.
#[derive(Debug)]
pub struct Pattern {
    re: rubex::Pattern,
}

/// A capture region, owned by the C caller until `rubex_region_free`.
#[derive(Debug)]
pub struct Region {
    region: rubex::Region,
}

/// Borrows `len` bytes at `data`. A zero length never reads `data`, so it
/// may be null.
unsafe fn bytes<'a>(data: *const u8, len: size_t) -> &'a [u8] {
    if len == 0 {
        &[]
    } else {
        slice::from_raw_parts(data, len)
    }
}

/// Translates the outcome of a search or match into the single signed value
/// returned across the boundary: a non-negative offset or length, the
/// mismatch sentinel, or a negative error code.
unsafe fn outcome(
    result: Result<Option<usize>, rubex::Error>,
    error: *mut Error,
) -> isize {
    match result {
        Ok(found) => {
            error::clear(error);
            found.map_or(code::MISMATCH as isize, |n| n as isize)
        }
        Err(err) => {
            let code = err.code();
            error::set(error, err);
            code as isize
        }
    }
}

ffi_fn! {
    fn rubex_compile(
        pattern: *const u8,
        length: size_t,
        options: u32,
        region: *mut *mut Region,
        error: *mut Error,
    ) -> *const Pattern {
        if !region.is_null() {
            unsafe { *region = ptr::null_mut(); }
        }
        let pat = unsafe { bytes(pattern, length) };
        let compiled = Options::from_bits(options)
            .and_then(|options| rubex::compile(pat, options));
        match compiled {
            Err(err) => {
                unsafe { error::set(error, err); }
                ptr::null()
            }
            Ok((re, companion)) => {
                unsafe { error::clear(error); }
                if !region.is_null() {
                    let companion = Box::new(Region { region: companion });
                    unsafe { *region = Box::into_raw(companion); }
                }
                Box::into_raw(Box::new(Pattern { re })) as *const Pattern
            }
        }
    }
}

ffi_fn! {
    fn rubex_free(re: *const Pattern) {
        if !re.is_null() {
            unsafe { drop(Box::from_raw(re as *mut Pattern)); }
        }
    }
}

ffi_fn! {
    fn rubex_captures_len(re: *const Pattern) -> size_t {
        let re = unsafe { &*re };
        re.re.captures_len()
    }
}

ffi_fn! {
    fn rubex_search(
        re: *const Pattern,
        haystack: *const u8,
        length: size_t,
        start: size_t,
        options: u32,
        region: *mut Region,
        error: *mut Error,
    ) -> isize {
        let re = unsafe { &*re };
        let haystack = unsafe { bytes(haystack, length) };
        let mut scratch;
        let region = if region.is_null() {
            scratch = re.re.region();
            &mut scratch
        } else {
            unsafe { &mut (*region).region }
        };
        let result = SearchOptions::from_bits(options).and_then(|options| {
            re.re.search(haystack, start, options, region)
        });
        unsafe { outcome(result, error) }
    }
}

ffi_fn! {
    fn rubex_match(
        re: *const Pattern,
        haystack: *const u8,
        length: size_t,
        at: size_t,
        options: u32,
        region: *mut Region,
        error: *mut Error,
    ) -> isize {
        let re = unsafe { &*re };
        let haystack = unsafe { bytes(haystack, length) };
        let mut scratch;
        let region = if region.is_null() {
            scratch = re.re.region();
            &mut scratch
        } else {
            unsafe { &mut (*region).region }
        };
        let result = SearchOptions::from_bits(options).and_then(|options| {
            re.re.match_at(haystack, at, options, region)
        });
        unsafe { outcome(result, error) }
    }
}

ffi_fn! {
    fn rubex_region_new(re: *const Pattern) -> *mut Region {
        let region = if re.is_null() {
            rubex::Region::new()
        } else {
            unsafe { &*re }.re.region()
        };
        Box::into_raw(Box::new(Region { region }))
    }
}

ffi_fn! {
    fn rubex_region_free(region: *mut Region) {
        if !region.is_null() {
            unsafe { drop(Box::from_raw(region)); }
        }
    }
}

ffi_fn! {
    fn rubex_region_len(region: *const Region) -> size_t {
        let region = unsafe { &*region };
        region.region.len()
    }
}

ffi_fn! {
    fn rubex_region_span(
        region: *const Region,
        i: size_t,
        start: *mut isize,
        end: *mut isize,
    ) -> bool {
        let region = unsafe { &*region };
        let (found, (s, e)) = match region.region.span_or_unset(i) {
            Ok(span) => (true, span),
            Err(_) => (false, (rubex::UNSET, rubex::UNSET)),
        };
        unsafe {
            if !start.is_null() {
                *start = s;
            }
            if !end.is_null() {
                *end = e;
            }
        }
        found
    }
}

ffi_fn! {
    fn rubex_name_to_index(
        re: *const Pattern,
        name: *const u8,
        length: size_t,
        region: *const Region,
    ) -> i32 {
        let re = unsafe { &*re };
        let name = unsafe { bytes(name, length) };
        let entry = match re.re.names().get(name) {
            None => return code::UNDEFINED_NAME_REFERENCE,
            Some(entry) => entry,
        };
        let index = if region.is_null() {
            entry.primary()
        } else {
            entry.resolve(unsafe { &(*region).region })
        };
        // Group counts are bounded by the engine well below i32::MAX.
        index as i32
    }
}

ffi_fn! {
    fn rubex_names_len(re: *const Pattern) -> size_t {
        let re = unsafe { &*re };
        re.re.names().len()
    }
}

ffi_fn! {
    fn rubex_names_write(
        re: *const Pattern,
        buf: *mut u8,
        capacity: size_t,
        length: *mut size_t,
        error: *mut Error,
    ) -> i32 {
        let re = unsafe { &*re };
        let dst: &mut [u8] = if capacity == 0 {
            &mut []
        } else {
            unsafe { slice::from_raw_parts_mut(buf, capacity) }
        };
        match re.re.names().write_to(dst) {
            Ok(n) => {
                unsafe {
                    if !length.is_null() {
                        *length = n;
                    }
                    error::clear(error);
                }
                code::NORMAL
            }
            Err(err) => {
                let code = err.code();
                unsafe {
                    if !length.is_null() {
                        *length = re.re.names().encoded_len();
                    }
                    error::set(error, err);
                }
                code
            }
        }
    }
}

ffi_fn! {
    fn rubex_name_groups(
        re: *const Pattern,
        name: *const u8,
        length: size_t,
        indices: *mut *const size_t,
    ) -> size_t {
        let re = unsafe { &*re };
        let name = unsafe { bytes(name, length) };
        let groups: &[usize] =
            re.re.names().get(name).map_or(&[], |entry| entry.indices());
        if !indices.is_null() {
            unsafe { *indices = groups.as_ptr(); }
        }
        groups.len()
    }
}

ffi_fn! {
    fn rubex_int_at(array: *const size_t, length: size_t, i: size_t) -> isize {
        if array.is_null() || i >= length {
            return code::INVALID_ARGUMENT as isize;
        }
        unsafe { *array.add(i) as isize }
    }
}
