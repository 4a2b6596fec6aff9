//! The in-memory structured representation a drpm file is parsed into:
//! [`DeltaRecord`], built incrementally by the header-phase parsers and the
//! body parser, then handed off whole to the caller (or, on failure,
//! simply dropped — there is no manual cleanup list in this crate; Rust's
//! ownership model makes buffer release unconditional).

use crate::compress::CompressionAlgorithm;
use crate::rpm_container::RpmHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaType {
    Standard,
    RpmOnly,
}

/// A `(count, signed delta)` pair used to adjust file offsets in the
/// target CPIO archive during reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffAdjElem {
    pub count: u32,
    pub delta: i32,
}

/// An internal-data copy instruction: `(count, offset)`, both unsigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntCopy {
    pub count: u32,
    pub offset: u32,
}

/// An external-data copy instruction: `(signed offset delta, count)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtCopy {
    pub offset_delta: i32,
    pub count: u32,
}

/// Discriminated by which variant is constructed, not by a separate tag:
/// `DeltaRecord.type_` and `Head` are always set together by whichever
/// header-phase parser ran.
pub enum Head {
    Rpm(RpmHandle),
    Nevr(Vec<u8>),
}

/// The fully populated in-memory representation of one drpm archive.
pub struct DeltaRecord {
    pub type_: DeltaType,
    pub version: u8,
    pub comp: CompressionAlgorithm,

    pub src_nevr: Vec<u8>,
    pub sequence: Vec<u8>,

    pub tgt_md5: [u8; 16],
    pub tgt_size: u32,
    pub tgt_comp: CompressionAlgorithm,
    pub tgt_comp_level: u8,
    pub tgt_comp_param: Vec<u8>,

    pub tgt_header_len: u32,
    pub offadj_elems: Vec<OffAdjElem>,

    pub tgt_leadsig: Vec<u8>,
    pub payload_fmt_off: u32,

    pub int_copies: Vec<IntCopy>,
    pub ext_copies: Vec<ExtCopy>,

    pub ext_data_len: u64,
    pub add_data: Vec<u8>,

    pub int_data_len: u64,
    pub int_data: Vec<u8>,

    pub head: Head,
}
