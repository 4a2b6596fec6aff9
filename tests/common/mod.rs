//! Shared fixture builders for the integration tests: raw-byte
//! constructors for drpm files and the minimal RPM lead/signature/header
//! they optionally carry, black-box from the crate's own internals (no
//! reliance on `rpm_container`'s private tag constants).

use std::io::Write;

use flate2::write::GzEncoder;
use flate2::Compression;

pub const RPM_STRING_TYPE: u32 = 6;
pub const TAG_NAME: u32 = 1000;
pub const TAG_VERSION: u32 = 1001;
pub const TAG_RELEASE: u32 = 1002;
pub const TAG_PAYLOAD_COMPRESSOR: u32 = 1125;

pub fn be32(v: u32) -> [u8; 4] {
    v.to_be_bytes()
}

pub fn be64(v: u64) -> [u8; 8] {
    v.to_be_bytes()
}

pub fn blob(v: &[u8]) -> Vec<u8> {
    let mut out = be32(v.len() as u32).to_vec();
    out.extend_from_slice(v);
    out
}

/// Gzip-compresses `plain`, matching the leading-bytes detection
/// `compress::DecompStream` performs.
pub fn gzip(plain: &[u8]) -> Vec<u8> {
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(plain).unwrap();
    enc.finish().unwrap()
}

fn index_header(entries: &[(u32, u32, &[u8])]) -> Vec<u8> {
    let mut store = Vec::new();
    let mut index = Vec::new();
    for (tag, typ, value) in entries {
        let offset = store.len() as u32;
        store.extend_from_slice(value);
        index.push((*tag, *typ, offset));
    }

    let mut out = Vec::new();
    out.extend_from_slice(&[0x8E, 0xAD, 0xE8, 0x01, 0, 0, 0, 0]);
    out.extend_from_slice(&be32(index.len() as u32));
    out.extend_from_slice(&be32(store.len() as u32));
    for (tag, typ, offset) in index {
        out.extend_from_slice(&be32(tag));
        out.extend_from_slice(&be32(typ));
        out.extend_from_slice(&be32(offset));
        out.extend_from_slice(&be32(1));
    }
    out.extend_from_slice(&store);
    out
}

/// Builds a minimal RPM lead + empty signature (padded to 8 bytes) +
/// header carrying NAME/VERSION/RELEASE and, optionally, a payload
/// compressor tag.
pub fn minimal_rpm(name: &str, version: &str, release: &str, compressor: Option<&str>) -> Vec<u8> {
    let mut out = vec![0u8; 96];
    out[0..4].copy_from_slice(&be32(0xEDAB_EEDB));

    let sig = index_header(&[]);
    out.extend_from_slice(&sig);
    let pad = (sig.len().div_ceil(8) * 8) - sig.len();
    out.extend_from_slice(&vec![0u8; pad]);

    let name_nul = format!("{name}\0");
    let version_nul = format!("{version}\0");
    let release_nul = format!("{release}\0");
    let mut entries = vec![
        (TAG_NAME, RPM_STRING_TYPE, name_nul.as_bytes()),
        (TAG_VERSION, RPM_STRING_TYPE, version_nul.as_bytes()),
        (TAG_RELEASE, RPM_STRING_TYPE, release_nul.as_bytes()),
    ];
    let compressor_nul = compressor.map(|c| format!("{c}\0"));
    if let Some(c) = &compressor_nul {
        entries.push((TAG_PAYLOAD_COMPRESSOR, RPM_STRING_TYPE, c.as_bytes()));
    }
    out.extend_from_slice(&index_header(&entries));

    out
}

/// Builds the plain (pre-compression) bytes of a drpm body for the given
/// wire version, with the smallest legal value for every field not
/// overridden by the caller.
pub struct BodyFields {
    pub version: u8,
    pub src_nevr: Vec<u8>,
    pub sequence: Vec<u8>,
    pub tgt_md5: [u8; 16],
    pub tgt_size: u32,
    pub packed_comp: u32,
    pub tgt_comp_param: Vec<u8>,
    pub tgt_header_len: u32,
    pub offadj_elems: Vec<(u32, u32)>,
    pub tgt_leadsig: Vec<u8>,
    pub payload_fmt_off: u32,
    pub int_copies: Vec<(u32, u32)>,
    pub ext_copies: Vec<(u32, u32)>,
    pub ext_data_len: u64,
    pub add_data: Vec<u8>,
    pub int_data: Vec<u8>,
}

impl Default for BodyFields {
    fn default() -> Self {
        BodyFields {
            version: 3,
            src_nevr: Vec::new(),
            sequence: vec![0u8; 16],
            tgt_md5: [0u8; 16],
            tgt_size: 0x100,
            packed_comp: 0x0000_0001, // gzip, level 0
            tgt_comp_param: Vec::new(),
            tgt_header_len: 0x50,
            offadj_elems: Vec::new(),
            tgt_leadsig: vec![0xAAu8; 112],
            payload_fmt_off: 0,
            int_copies: Vec::new(),
            ext_copies: Vec::new(),
            ext_data_len: 0,
            add_data: Vec::new(),
            int_data: Vec::new(),
        }
    }
}

pub fn build_body(fields: &BodyFields) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&be32(0x444C_5400 | (b'0' + fields.version) as u32));
    out.extend_from_slice(&blob(&fields.src_nevr));
    out.extend_from_slice(&blob(&fields.sequence));
    out.extend_from_slice(&fields.tgt_md5);

    if fields.version >= 2 {
        out.extend_from_slice(&be32(fields.tgt_size));
        out.extend_from_slice(&be32(fields.packed_comp));
        out.extend_from_slice(&blob(&fields.tgt_comp_param));

        if fields.version == 3 {
            out.extend_from_slice(&be32(fields.tgt_header_len));
            out.extend_from_slice(&be32(fields.offadj_elems.len() as u32));
            for (count, _) in &fields.offadj_elems {
                out.extend_from_slice(&be32(*count));
            }
            for (_, delta) in &fields.offadj_elems {
                out.extend_from_slice(&be32(*delta));
            }
        }
    }

    out.extend_from_slice(&be32(fields.tgt_leadsig.len() as u32));
    out.extend_from_slice(&fields.tgt_leadsig);

    out.extend_from_slice(&be32(fields.payload_fmt_off));

    out.extend_from_slice(&be32(fields.int_copies.len() as u32));
    for (a, _) in &fields.int_copies {
        out.extend_from_slice(&be32(*a));
    }
    for (_, b) in &fields.int_copies {
        out.extend_from_slice(&be32(*b));
    }

    out.extend_from_slice(&be32(fields.ext_copies.len() as u32));
    for (a, _) in &fields.ext_copies {
        out.extend_from_slice(&be32(*a));
    }
    for (_, b) in &fields.ext_copies {
        out.extend_from_slice(&be32(*b));
    }

    if fields.version == 3 {
        out.extend_from_slice(&be64(fields.ext_data_len));
    } else {
        out.extend_from_slice(&be32(fields.ext_data_len as u32));
    }

    out.extend_from_slice(&be32(fields.add_data.len() as u32));
    out.extend_from_slice(&fields.add_data);

    if fields.version == 3 {
        out.extend_from_slice(&be64(fields.int_data.len() as u64));
    } else {
        out.extend_from_slice(&be32(fields.int_data.len() as u32));
    }
    out.extend_from_slice(&fields.int_data);

    out
}

/// Writes a full rpm-only drpm file (magic, secondary magic, tgt nevr,
/// pre-stream add_data, gzip-compressed body) to `path`.
pub fn write_rpmonly_file(path: &std::path::Path, tgt_nevr: &[u8], fields: &BodyFields) {
    let mut out = Vec::new();
    out.extend_from_slice(&be32(0x6472_706D));
    out.extend_from_slice(&be32(0x444C_5433));
    out.extend_from_slice(&blob(tgt_nevr));
    out.extend_from_slice(&blob(&[])); // pre-stream add_data_len = 0

    let body = build_body(fields);
    out.extend_from_slice(&gzip(&body));

    std::fs::write(path, out).unwrap();
}

/// Writes a full standard drpm file (rpm lead/sig/header, gzip-compressed
/// body) to `path`.
pub fn write_standard_file(path: &std::path::Path, rpm: &[u8], fields: &BodyFields) {
    let mut out = rpm.to_vec();
    out.extend_from_slice(&gzip(&build_body(fields)));
    std::fs::write(path, out).unwrap();
}
