//! The entry point (distilled spec §4.6): opens the file, dispatches on
//! leading magic to the appropriate header-phase parser, then always runs
//! the body parser. The file descriptor and the decompression stream are
//! both closed/released unconditionally on every exit path via ordinary
//! Rust ownership — there is no manual cleanup list to fall out of sync.

use std::fs::File;

use log::{debug, info};

use crate::body;
use crate::bytes;
use crate::compress::DecompStream;
use crate::error::{Error, Result};
use crate::header_rpmonly;
use crate::header_standard;
use crate::record::{DeltaRecord, DeltaType, Head};
use crate::rpm_container::{RpmHandle, MAGIC_RPM};

const MAGIC_DRPM: u32 = 0x6472_706D; // "drpm"

/// Which header phase ran, and the result it produced — carries exactly the
/// fields the post-body-parse fixup needs for that framing, so the fixup
/// below is a plain match instead of a runtime assertion over `Option`s.
enum HeaderResult {
    RpmOnly { tgt_nevr: Vec<u8>, add_data: Vec<u8> },
    Standard { handle: RpmHandle },
}

/// Reads and fully parses the drpm archive at `filename`.
pub fn read(filename: &str) -> Result<DeltaRecord> {
    let mut file = File::open(filename)?;

    let magic = bytes::read_be32(&mut file)?;

    let (type_, header) = match magic {
        MAGIC_DRPM => {
            info!("{filename}: rpm-only framing");
            let header = header_rpmonly::read(&mut file)?;
            (DeltaType::RpmOnly, HeaderResult::RpmOnly { tgt_nevr: header.tgt_nevr, add_data: header.add_data })
        }
        MAGIC_RPM => {
            info!("{filename}: standard framing");
            let handle = header_standard::read(&mut file)?;
            (DeltaType::Standard, HeaderResult::Standard { handle })
        }
        other => return Err(Error::BadMagic(other)),
    };

    let (mut stream, comp) = DecompStream::new(file)?;
    let mut record = body::read_body(&mut stream, comp, type_)?;
    drop(stream);

    match header {
        HeaderResult::RpmOnly { tgt_nevr, add_data } => {
            record.add_data = add_data;
            record.head = Head::Nevr(tgt_nevr);
        }
        HeaderResult::Standard { handle } => {
            if record.version < 2 {
                if let Some(comp) = handle.comp() {
                    record.tgt_comp = comp;
                }
            }
            record.head = Head::Rpm(handle);
        }
    }

    debug!(
        "{filename}: parsed ok: version={}, type={:?}, int_copies={}, ext_copies={}",
        record.version,
        record.type_,
        record.int_copies.len(),
        record.ext_copies.len()
    );

    Ok(record)
}
