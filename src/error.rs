use std::fmt;

use crate::compress;
use crate::rpm_container;

/// Coarse classification of an [`Error`], mirroring the five error kinds a
/// drpm decoder is specified to ever produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Prog,
    Io,
    Format,
    Memory,
    Overflow,
}

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    BadMagic(u32),
    BadSecondaryMagic(u32),
    BadVersionMagic(u32),
    UnsupportedVersion(u8),
    RpmOnlyRequiresVersion3(u8),
    ShortRead { want: usize, got: usize },
    SequenceTooShort(u64),
    RpmOnlySequenceLenMismatch(u64),
    RpmOnlyMissingTargetHeader,
    RpmOnlyNonEmptyAddData(u32),
    LeadSigTooShort(u32),
    UnknownCompression(u32),
    IntCopyOverflow { off: u64, int_data_len: u64 },
    ExtCopyOutOfRange { off: i64, ext_data_len: u64 },
    ExtCopyNotPositive,
    DataTooLarge(u64),
    Alloc,
    Compress(compress::Error),
    RpmContainer(rpm_container::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) => ErrorKind::Io,
            Error::Alloc => ErrorKind::Memory,
            Error::DataTooLarge(_) => ErrorKind::Overflow,
            Error::Compress(err) => err.kind(),
            Error::RpmContainer(err) => err.kind(),
            _ => ErrorKind::Format,
        }
    }
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "i/o error: {err}"),
            Error::BadMagic(magic) => write!(f, "unrecognized leading magic: {magic:#010x}"),
            Error::BadSecondaryMagic(magic) => write!(f, "bad rpm-only secondary magic: {magic:#010x}, expected \"DLT3\""),
            Error::BadVersionMagic(magic) => write!(f, "bad version magic: {magic:#010x}, expected \"DLTn\""),
            Error::UnsupportedVersion(v) => write!(f, "unsupported wire version: {v}"),
            Error::RpmOnlyRequiresVersion3(v) => write!(f, "rpm-only delta must be version 3, got {v}"),
            Error::ShortRead { want, got } => write!(f, "short read: wanted {want} bytes, got {got}"),
            Error::SequenceTooShort(len) => write!(f, "sequence too short: {len} bytes, need at least 16"),
            Error::RpmOnlySequenceLenMismatch(len) => write!(f, "rpm-only delta sequence must be exactly 16 bytes, got {len}"),
            Error::RpmOnlyMissingTargetHeader => write!(f, "rpm-only delta has zero-length target header"),
            Error::RpmOnlyNonEmptyAddData(len) => write!(f, "rpm-only delta has non-empty in-stream additional data ({len} bytes)"),
            Error::LeadSigTooShort(len) => write!(f, "target lead+signature too short: {len} bytes"),
            Error::UnknownCompression(packed) => write!(f, "unrecognized packed compression descriptor: {packed:#010x}"),
            Error::IntCopyOverflow { off, int_data_len } => {
                write!(f, "internal copy table overflows int_data_len: cumulative {off} > {int_data_len}")
            }
            Error::ExtCopyOutOfRange { off, ext_data_len } => {
                write!(f, "external copy table out of range: cumulative {off}, ext_data_len {ext_data_len}")
            }
            Error::ExtCopyNotPositive => write!(f, "external copy table cumulative offset is not strictly positive after a pair step"),
            Error::DataTooLarge(len) => write!(f, "declared data length {len} exceeds the platform's addressable object size"),
            Error::Alloc => write!(f, "allocation failed"),
            Error::Compress(err) => write!(f, "compression collaborator: {err}"),
            Error::RpmContainer(err) => write!(f, "rpm container collaborator: {err}"),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<compress::Error> for Error {
    fn from(err: compress::Error) -> Self {
        Error::Compress(err)
    }
}

impl From<rpm_container::Error> for Error {
    fn from(err: rpm_container::Error) -> Self {
        Error::RpmContainer(err)
    }
}
