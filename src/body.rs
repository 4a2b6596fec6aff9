//! The body parser (distilled spec §4.5): reads the compressed remainder
//! of a drpm archive field by field, in the exact order the wire format
//! lays them out, including the interleaved two-pass table layout (all
//! first-members of a table before any second-members — never row-major).

use log::debug;

use crate::compress::{self, CompressionAlgorithm, DecompStream};
use crate::error::{Error, Result};
use crate::record::{DeltaRecord, DeltaType, ExtCopy, Head, IntCopy, OffAdjElem};
use crate::rpm_container::RPM_LEADSIG_MIN_LEN;
use crate::signed;

const VERSION_MAGIC_PREFIX: u32 = 0x444C_5400; // "DLT" + low byte is the ASCII digit
const VERSION_MAGIC_MASK: u32 = 0xFFFF_FF00;

fn read_version_magic(stream: &mut DecompStream, type_: DeltaType) -> Result<u8> {
    let magic = stream.read_be32()?;
    if magic & VERSION_MAGIC_MASK != VERSION_MAGIC_PREFIX {
        return Err(Error::BadVersionMagic(magic));
    }

    let digit = (magic & 0xFF) as u8;
    if !(b'1'..=b'3').contains(&digit) {
        return Err(Error::BadVersionMagic(magic));
    }
    let version = digit - b'0';

    if type_ == DeltaType::RpmOnly && version != 3 {
        return Err(Error::RpmOnlyRequiresVersion3(version));
    }

    Ok(version)
}

fn read_sequence(stream: &mut DecompStream, type_: DeltaType) -> Result<Vec<u8>> {
    let len = stream.read_be32()? as u64;
    if len < 16 {
        return Err(Error::SequenceTooShort(len));
    }
    if type_ == DeltaType::RpmOnly && len != 16 {
        return Err(Error::RpmOnlySequenceLenMismatch(len));
    }

    stream.read_exact(len as usize)
}

/// Reads a two-pass table: `count` pairs, with all first-members read
/// before any second-members. `decode_first` is applied to each raw `u32`
/// first-member (identity for unsigned tables, signed-magnitude decode for
/// `ext_copies`/`offadj_elems`).
fn read_two_pass_table<A>(stream: &mut DecompStream, count: u32, decode_first: impl Fn(u32) -> A) -> Result<Vec<(A, u32)>> {
    let count = count as usize;
    let mut firsts = Vec::with_capacity(count);
    for _ in 0..count {
        firsts.push(decode_first(stream.read_be32()?));
    }

    let mut seconds = Vec::with_capacity(count);
    for _ in 0..count {
        seconds.push(stream.read_be32()?);
    }

    Ok(firsts.into_iter().zip(seconds).collect())
}

/// Validates the internal-copy table (distilled spec §4.5, post-read walk
/// 1): cumulative sum of second members must never exceed `int_data_len`.
pub fn validate_int_copies(copies: &[IntCopy], int_data_len: u64) -> Result<()> {
    let mut off: u64 = 0;
    for copy in copies {
        off += copy.count as u64;
        if off > int_data_len {
            return Err(Error::IntCopyOverflow { off, int_data_len });
        }
    }
    Ok(())
}

/// Validates the external-copy table (distilled spec §4.5, post-read walk
/// 2): after the signed step the cumulative offset must not exceed
/// `ext_data_len`; after the full pair step it must be strictly positive
/// and not exceed `ext_data_len`.
pub fn validate_ext_copies(copies: &[ExtCopy], ext_data_len: u64) -> Result<()> {
    let mut off: i64 = 0;
    for copy in copies {
        off += copy.offset_delta as i64;
        if off > ext_data_len as i64 {
            return Err(Error::ExtCopyOutOfRange { off, ext_data_len });
        }

        off += copy.count as i64;
        if off <= 0 {
            return Err(Error::ExtCopyNotPositive);
        }
        if off > ext_data_len as i64 {
            return Err(Error::ExtCopyOutOfRange { off, ext_data_len });
        }
    }
    Ok(())
}

/// Reads the entire body of a drpm archive from `stream`, returning a
/// `DeltaRecord` with every field except `head` populated (the caller,
/// `read::read`, fills `head` in from whichever header-phase parser ran,
/// and for rpm-only deltas overwrites `add_data` with the pre-stream blob
/// the header phase already read).
pub fn read_body(stream: &mut DecompStream, comp: CompressionAlgorithm, record_type: DeltaType) -> Result<DeltaRecord> {
    let version = read_version_magic(stream, record_type)?;
    debug!("body: version={version}, comp={comp}");

    let src_nevr_len = stream.read_be32()?;
    let src_nevr = {
        let mut v = stream.read_exact(src_nevr_len as usize)?;
        v.push(0);
        v
    };

    let sequence = read_sequence(stream, record_type)?;

    let tgt_md5: [u8; 16] = stream.read_exact(16)?.try_into().map_err(|_| Error::ShortRead { want: 16, got: 0 })?;

    let mut tgt_size = 0u32;
    let mut tgt_comp = CompressionAlgorithm::None;
    let mut tgt_comp_level = 0u8;
    let mut tgt_comp_param = Vec::new();
    let mut tgt_header_len = 0u32;
    let mut offadj_elems = Vec::new();

    if version >= 2 {
        tgt_size = stream.read_be32()?;

        let packed_comp = stream.read_be32()?;
        let (algo, level) = compress::decode_comp(packed_comp).map_err(|_| Error::UnknownCompression(packed_comp))?;
        tgt_comp = algo;
        tgt_comp_level = level;

        let tgt_comp_param_len = stream.read_be32()?;
        tgt_comp_param = stream.read_exact(tgt_comp_param_len as usize)?;

        if version == 3 {
            tgt_header_len = stream.read_be32()?;

            let offadj_count = stream.read_be32()?;
            let pairs = read_two_pass_table(stream, offadj_count, signed::decode)?;
            offadj_elems = pairs.into_iter().map(|(delta, count)| OffAdjElem { count, delta }).collect();
        }
    }

    if record_type == DeltaType::RpmOnly && tgt_header_len == 0 {
        return Err(Error::RpmOnlyMissingTargetHeader);
    }

    let tgt_leadsig_len = stream.read_be32()?;
    if tgt_leadsig_len < RPM_LEADSIG_MIN_LEN {
        return Err(Error::LeadSigTooShort(tgt_leadsig_len));
    }
    let tgt_leadsig = stream.read_exact(tgt_leadsig_len as usize)?;

    let payload_fmt_off = stream.read_be32()?;

    let int_copies_count = stream.read_be32()?;
    let int_copies: Vec<IntCopy> = read_two_pass_table(stream, int_copies_count, |v| v)?
        .into_iter()
        .map(|(offset, count)| IntCopy { count, offset })
        .collect();

    let ext_copies_count = stream.read_be32()?;
    let ext_copies: Vec<ExtCopy> = read_two_pass_table(stream, ext_copies_count, signed::decode)?
        .into_iter()
        .map(|(offset_delta, count)| ExtCopy { offset_delta, count })
        .collect();

    let ext_data_len: u64 = if version == 3 { stream.read_be64()? } else { stream.read_be32()? as u64 };

    let add_data_len = stream.read_be32()?;
    if record_type == DeltaType::RpmOnly && add_data_len != 0 {
        return Err(Error::RpmOnlyNonEmptyAddData(add_data_len));
    }
    let add_data = if add_data_len != 0 { stream.read_exact(add_data_len as usize)? } else { Vec::new() };

    let int_data_len: u64 = if version == 3 { stream.read_be64()? } else { stream.read_be32()? as u64 };
    if int_data_len > usize::MAX as u64 {
        return Err(Error::DataTooLarge(int_data_len));
    }
    let int_data = stream.read_exact(int_data_len as usize)?;

    validate_int_copies(&int_copies, int_data_len)?;
    validate_ext_copies(&ext_copies, ext_data_len)?;

    Ok(DeltaRecord {
        type_: record_type,
        version,
        comp,
        src_nevr,
        sequence,
        tgt_md5,
        tgt_size,
        tgt_comp,
        tgt_comp_level,
        tgt_comp_param,
        tgt_header_len,
        offadj_elems,
        tgt_leadsig,
        payload_fmt_off,
        int_copies,
        ext_copies,
        ext_data_len,
        add_data,
        int_data_len,
        int_data,
        head: Head::Nevr(Vec::new()), // overwritten by read::read once the header phase's handle is known
    })
}
