/// The maximum size, in bytes, of an error message buffer, including its
/// terminating NUL byte.
///
/// This mirrors the fixed bound Oniguruma uses for its own message buffers.
/// Messages longer than `MAX_ERROR_MESSAGE_LEN - 1` bytes are truncated.
pub const MAX_ERROR_MESSAGE_LEN: usize = 90;

/// Error codes originated by this crate.
///
/// These follow Oniguruma's numbering. Codes produced by the engine itself
/// (for example, syntax errors) are passed through untouched and are not
/// listed here.
pub mod code {
    /// The operation succeeded.
    pub const NORMAL: i32 = 0;
    /// The pattern did not occur in the searched region. This is never
    /// reported through [`Error`](crate::Error) by the Rust API, but the
    /// foreign-call boundary uses it as the "no match" return value.
    pub const MISMATCH: i32 = -1;
    /// An argument was out of range: an offset, a group index, an option bit
    /// or a buffer size.
    pub const INVALID_ARGUMENT: i32 = -30;
    /// A group name that does not occur in the pattern.
    pub const UNDEFINED_NAME_REFERENCE: i32 = -217;
    /// Input that is not valid UTF-8.
    pub const INVALID_CODE_POINT_VALUE: i32 = -400;
}

/// Returns a human readable description of one of the codes in [`code`].
///
/// Codes that this crate doesn't originate itself yield a generic message.
pub fn describe(code: i32) -> &'static str {
    match code {
        code::NORMAL => "normal",
        code::MISMATCH => "mismatch",
        code::INVALID_ARGUMENT => "invalid argument",
        code::UNDEFINED_NAME_REFERENCE => "undefined name reference",
        code::INVALID_CODE_POINT_VALUE => "invalid code point value",
        _ => "undefined error code",
    }
}

/// The kind of failure an [`Error`] represents.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The pattern could not be compiled: bad syntax, an unsupported option
    /// combination or an allocation failure inside the engine.
    Compile,
    /// The engine failed while executing a search. This is distinct from a
    /// search that simply found nothing.
    Search,
    /// The caller passed an offset, index or option outside its valid range.
    Bounds,
    /// A caller provided buffer was too small. `required` is the capacity
    /// that would have been sufficient.
    BufferTooSmall {
        /// The number of bytes needed to complete the operation.
        required: usize,
    },
}

/// An error that occurred while compiling a pattern or running a search.
///
/// Every error carries both the numeric code (Oniguruma numbering) and a
/// bounded, NUL terminated message, so that callers can branch on the code
/// while humans read the message.
#[derive(Clone)]
pub struct Error {
    kind: ErrorKind,
    code: i32,
    message: Message,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind, code: i32, message: &str) -> Error {
        Error { kind, code, message: Message::new(message) }
    }

    /// Builds an error from a failure reported by the engine.
    pub(crate) fn engine(kind: ErrorKind, err: &onig::Error) -> Error {
        Error::new(kind, err.code() as i32, err.description())
    }

    pub(crate) fn bounds(message: &str) -> Error {
        Error::new(ErrorKind::Bounds, code::INVALID_ARGUMENT, message)
    }

    pub(crate) fn invalid_utf8(
        kind: ErrorKind,
        what: &str,
        err: core::str::Utf8Error,
    ) -> Error {
        let message = format!(
            "{}: {} at byte {}",
            what,
            describe(code::INVALID_CODE_POINT_VALUE),
            err.valid_up_to(),
        );
        Error::new(kind, code::INVALID_CODE_POINT_VALUE, &message)
    }

    pub(crate) fn buffer_too_small(required: usize, capacity: usize) -> Error {
        let message = format!(
            "buffer of {} bytes is too small, {} bytes required",
            capacity, required,
        );
        Error::new(
            ErrorKind::BufferTooSmall { required },
            code::INVALID_ARGUMENT,
            &message,
        )
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the numeric error code, using Oniguruma's numbering.
    ///
    /// This is always negative.
    pub fn code(&self) -> i32 {
        self.code
    }

    /// Returns the (possibly truncated) error message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Returns the error message followed by its terminating NUL byte.
    ///
    /// The returned slice is never longer than [`MAX_ERROR_MESSAGE_LEN`].
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        self.message.as_bytes_with_nul()
    }
}

impl std::error::Error for Error {}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{} (code {})", self.message(), self.code)
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_struct("Error")
            .field("kind", &self.kind)
            .field("code", &self.code)
            .field("message", &self.message())
            .finish()
    }
}

/// A fixed capacity, always terminated message buffer.
///
/// Each error owns its own buffer. There is no shared message storage, so
/// errors produced concurrently on different threads never clobber one
/// another.
#[derive(Clone)]
struct Message {
    buf: [u8; MAX_ERROR_MESSAGE_LEN],
    len: usize,
}

impl Message {
    fn new(text: &str) -> Message {
        let mut len = core::cmp::min(text.len(), MAX_ERROR_MESSAGE_LEN - 1);
        while !text.is_char_boundary(len) {
            len -= 1;
        }
        let mut buf = [0; MAX_ERROR_MESSAGE_LEN];
        buf[..len].copy_from_slice(&text.as_bytes()[..len]);
        buf[len] = 0;
        Message { buf, len }
    }

    fn as_str(&self) -> &str {
        // The buffer only ever holds a prefix of a &str cut at a character
        // boundary.
        core::str::from_utf8(&self.buf[..self.len]).unwrap_or("")
    }

    fn as_bytes_with_nul(&self) -> &[u8] {
        &self.buf[..=self.len]
    }
}
