//! The rpm-only header phase (distilled spec §4.3): everything read before
//! the compressed region begins, for a drpm whose outer framing omits the
//! RPM lead/signature entirely.

use std::fs::File;

use log::debug;

use crate::bytes;
use crate::error::{Error, Result};

const SECONDARY_MAGIC: u32 = 0x444C_5433; // "DLT3"

pub struct RpmOnlyHeader {
    pub tgt_nevr: Vec<u8>,
    pub add_data: Vec<u8>,
}

/// Reads the rpm-only header, with `file`'s cursor positioned just after
/// the leading `"drpm"` magic.
pub fn read(file: &mut File) -> Result<RpmOnlyHeader> {
    let secondary_magic = bytes::read_be32(file)?;
    if secondary_magic != SECONDARY_MAGIC {
        return Err(Error::BadSecondaryMagic(secondary_magic));
    }

    let tgt_nevr = bytes::read_nul_terminated_blob(file)?;
    let add_data = bytes::read_blob(file)?;

    debug!("rpm-only header: tgt_nevr={:?}, add_data_len={}", String::from_utf8_lossy(&tgt_nevr), add_data.len());

    Ok(RpmOnlyHeader { tgt_nevr, add_data })
}
