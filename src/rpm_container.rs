//! A minimal RPM lead/signature/header reader: the "RPM container reader"
//! collaborator the distilled specification treats as external. This
//! module implements only the four operations the core needs
//! (`read`, `comp`, `size_full`, `nevr`) and nothing else of the RPM
//! ecosystem — no payload/cpio reading, no dependency resolution, no
//! writing.
//!
//! RPM's on-disk layout relevant here:
//!   lead (96 bytes, fixed)
//!   signature index-header section (8-byte magic+version+reserved,
//!     then nindex/hsize u32 pair, then nindex * 16-byte index entries,
//!     then hsize bytes of tag-value store), padded to an 8-byte boundary
//!   header index-header section (same shape as the signature section,
//!     unpadded)

use std::fmt;
use std::fs::File;
use std::io::Read;

use crate::bytes;
use crate::compress::CompressionAlgorithm;
use crate::error::ErrorKind;

pub const MAGIC_RPM: u32 = 0xEDAB_EEDB;

/// Smallest legal target lead+signature this crate will accept: a 96-byte
/// lead followed by a signature section header with zero index entries and
/// an empty store. The distilled specification leaves the exact value of
/// this environment-supplied constant unspecified; this is this crate's
/// concrete choice (see DESIGN.md).
pub const RPM_LEADSIG_MIN_LEN: u32 = 112;

const LEAD_SIZE: usize = 96;
const INDEX_HEADER_MAGIC: [u8; 3] = [0x8E, 0xAD, 0xE8];
const INDEX_ENTRY_SIZE: usize = 16;

const TAG_NAME: u32 = 1000;
const TAG_VERSION: u32 = 1001;
const TAG_RELEASE: u32 = 1002;
const TAG_EPOCH: u32 = 1003;
const TAG_PAYLOAD_COMPRESSOR: u32 = 1125;

const RPM_STRING_TYPE: u32 = 6;
const RPM_INT32_TYPE: u32 = 4;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    BadLeadMagic(u32),
    BadIndexHeaderMagic,
    MissingName,
    MissingVersion,
    MissingRelease,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) => ErrorKind::Io,
            _ => ErrorKind::Format,
        }
    }
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "i/o error: {err}"),
            Error::BadLeadMagic(magic) => write!(f, "bad rpm lead magic: {magic:#010x}"),
            Error::BadIndexHeaderMagic => write!(f, "bad rpm index-header magic"),
            Error::MissingName => write!(f, "rpm header missing NAME tag"),
            Error::MissingVersion => write!(f, "rpm header missing VERSION tag"),
            Error::MissingRelease => write!(f, "rpm header missing RELEASE tag"),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<crate::error::Error> for Error {
    fn from(err: crate::error::Error) -> Self {
        match err {
            crate::error::Error::Io(io) => Error::Io(io),
            other => Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, other.to_string())),
        }
    }
}

struct IndexEntry {
    tag: u32,
    typ: u32,
    offset: u32,
    count: u32,
}

struct IndexHeader {
    entries: Vec<IndexEntry>,
    store: Vec<u8>,
    /// Total bytes consumed from the stream, including the 16-byte section
    /// header and the index entry array.
    section_len: usize,
}

fn read_index_header<R: Read>(r: &mut R) -> Result<IndexHeader> {
    let mut magic_ver_reserved = [0u8; 8];
    r.read_exact(&mut magic_ver_reserved)?;
    if magic_ver_reserved[..3] != INDEX_HEADER_MAGIC {
        return Err(Error::BadIndexHeaderMagic);
    }

    let nindex = bytes::read_be32(r).map_err(Error::from)? as usize;
    let hsize = bytes::read_be32(r).map_err(Error::from)? as usize;

    let mut entries = Vec::with_capacity(nindex);
    for _ in 0..nindex {
        let tag = bytes::read_be32(r).map_err(Error::from)?;
        let typ = bytes::read_be32(r).map_err(Error::from)?;
        let offset = bytes::read_be32(r).map_err(Error::from)?;
        let count = bytes::read_be32(r).map_err(Error::from)?;
        entries.push(IndexEntry { tag, typ, offset, count });
    }

    let store = bytes::read_exact_alloc(r, hsize).map_err(Error::from)?;

    Ok(IndexHeader {
        entries,
        store,
        section_len: 8 + nindex * INDEX_ENTRY_SIZE + hsize,
    })
}

impl IndexHeader {
    fn find_string(&self, tag: u32) -> Option<String> {
        let entry = self.entries.iter().find(|e| e.tag == tag && e.typ == RPM_STRING_TYPE)?;
        let start = entry.offset as usize;
        let end = self.store[start..].iter().position(|&b| b == 0).map(|p| start + p)?;
        String::from_utf8(self.store[start..end].to_vec()).ok()
    }

    fn find_int32(&self, tag: u32) -> Option<i32> {
        let entry = self.entries.iter().find(|e| e.tag == tag && e.typ == RPM_INT32_TYPE)?;
        let start = entry.offset as usize;
        let bytes: [u8; 4] = self.store.get(start..start + 4)?.try_into().ok()?;
        Some(i32::from_be_bytes(bytes))
    }
}

/// An opaque handle on a parsed RPM lead/signature/header, as returned by
/// the RPM container collaborator.
pub struct RpmHandle {
    nevr: Vec<u8>,
    comp: Option<CompressionAlgorithm>,
    full_size: u64,
}

impl RpmHandle {
    pub fn comp(&self) -> Option<CompressionAlgorithm> {
        self.comp
    }

    pub fn size_full(&self) -> u64 {
        self.full_size
    }

    pub fn nevr(&self) -> &[u8] {
        &self.nevr
    }
}

/// Parses the lead, signature, and header sections of the RPM at `file`
/// (positioned at offset 0), stopping before the payload archive. `file`'s
/// cursor is left just past the header section on success.
pub fn read(file: &mut File) -> Result<RpmHandle> {
    let mut lead = [0u8; LEAD_SIZE];
    file.read_exact(&mut lead)?;

    let magic = u32::from_be_bytes(lead[0..4].try_into().unwrap());
    if magic != MAGIC_RPM {
        return Err(Error::BadLeadMagic(magic));
    }

    let sig = read_index_header(file)?;
    let sig_padded = sig.section_len.div_ceil(8) * 8;
    let pad = sig_padded - sig.section_len;
    if pad > 0 {
        let mut discard = vec![0u8; pad];
        file.read_exact(&mut discard)?;
    }

    let hdr = read_index_header(file)?;

    let name = hdr.find_string(TAG_NAME).ok_or(Error::MissingName)?;
    let version = hdr.find_string(TAG_VERSION).ok_or(Error::MissingVersion)?;
    let release = hdr.find_string(TAG_RELEASE).ok_or(Error::MissingRelease)?;
    let epoch = hdr.find_int32(TAG_EPOCH);

    let nevr = match epoch {
        Some(epoch) => format!("{name}-{epoch}:{version}-{release}"),
        None => format!("{name}-{version}-{release}"),
    }
    .into_bytes();

    let comp = hdr.find_string(TAG_PAYLOAD_COMPRESSOR).and_then(|s| match s.as_str() {
        "gzip" => Some(CompressionAlgorithm::Gzip),
        "bzip2" => Some(CompressionAlgorithm::Bzip2),
        "lzma" => Some(CompressionAlgorithm::Lzma),
        "xz" => Some(CompressionAlgorithm::Xz),
        "zstd" => Some(CompressionAlgorithm::Zstd),
        _ => None,
    });

    let full_size = (LEAD_SIZE + sig_padded + hdr.section_len) as u64;

    Ok(RpmHandle { nevr, comp, full_size })
}
