//! The post-read projection (distilled spec §4.7): converts the internal
//! [`DeltaRecord`] into a caller-visible [`DeltaInfo`], hex-encoding the
//! binary fields that aren't meant to be handed out as raw bytes.

use ct_codecs::{Encoder, Hex};

use crate::compress::CompressionAlgorithm;
use crate::error::{Error, Result};
use crate::record::{DeltaRecord, DeltaType, ExtCopy, Head, IntCopy, OffAdjElem};

/// Caller-visible projection of a [`DeltaRecord`]. Scalar and table fields
/// are lossless copies; binary fields not meant for raw consumption
/// (`sequence`, `tgt_md5`, `tgt_leadsig`, `tgt_comp_param`) are hex strings.
pub struct DeltaInfo {
    pub type_: DeltaType,
    pub version: u8,
    pub comp: CompressionAlgorithm,

    pub sequence_hex: String,

    pub tgt_md5_hex: String,
    pub tgt_size: u32,
    pub tgt_comp: CompressionAlgorithm,
    pub tgt_comp_param_hex: String,
    pub tgt_header_len: u32,

    pub offadj_elems: Vec<OffAdjElem>,
    pub offadj_elems_word_count: u32,

    pub tgt_leadsig_hex: String,
    pub payload_fmt_off: u32,

    pub int_copies: Vec<IntCopy>,
    pub int_copies_word_count: u32,

    pub ext_copies: Vec<ExtCopy>,
    pub ext_copies_word_count: u32,

    pub ext_data_len: u64,
    pub int_data_len: u64,

    pub tgt_nevr: Vec<u8>,
}

fn hex_encode(bytes: &[u8]) -> Result<String> {
    Hex::encode_to_string(bytes).map_err(|_| Error::Alloc)
}

/// Projects `record` into a caller-visible [`DeltaInfo`].
pub fn project(record: &DeltaRecord) -> Result<DeltaInfo> {
    let tgt_nevr = match &record.head {
        Head::Rpm(handle) => handle.nevr().to_vec(),
        Head::Nevr(nevr) => nevr.clone(),
    };

    Ok(DeltaInfo {
        type_: record.type_,
        version: record.version,
        comp: record.comp,

        sequence_hex: hex_encode(&record.sequence)?,

        tgt_md5_hex: hex_encode(&record.tgt_md5)?,
        tgt_size: record.tgt_size,
        tgt_comp: record.tgt_comp,
        tgt_comp_param_hex: hex_encode(&record.tgt_comp_param)?,
        tgt_header_len: record.tgt_header_len,

        offadj_elems_word_count: record.offadj_elems.len() as u32 * 2,
        offadj_elems: record.offadj_elems.clone(),

        tgt_leadsig_hex: hex_encode(&record.tgt_leadsig)?,
        payload_fmt_off: record.payload_fmt_off,

        int_copies_word_count: record.int_copies.len() as u32 * 2,
        int_copies: record.int_copies.clone(),

        ext_copies_word_count: record.ext_copies.len() as u32 * 2,
        ext_copies: record.ext_copies.clone(),

        ext_data_len: record.ext_data_len,
        int_data_len: record.int_data_len,

        tgt_nevr,
    })
}
