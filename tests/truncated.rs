mod common;

use drpm::ErrorKind;

/// Builds a `drpm` file whose compressed region is a complete, valid gzip
/// stream, but whose decompressed plaintext stops in the middle of the
/// `sequence` field — exercising a clean short read (not a compression
/// error) partway through the body parse.
fn truncated_rpmonly_file(path: &std::path::Path) {
    let mut out = Vec::new();
    out.extend_from_slice(&0x6472_706Du32.to_be_bytes());
    out.extend_from_slice(&0x444C_5433u32.to_be_bytes());
    out.extend_from_slice(&common::blob(b"foo-1.0-1.x86_64"));
    out.extend_from_slice(&common::blob(&[]));

    let mut plain = Vec::new();
    plain.extend_from_slice(&0x444C_5433u32.to_be_bytes()); // "DLT3"
    plain.extend_from_slice(&common::blob(&[])); // src_nevr
    plain.extend_from_slice(&16u32.to_be_bytes()); // sequence length, but no bytes follow

    out.extend_from_slice(&common::gzip(&plain));
    std::fs::write(path, out).unwrap();
}

#[test]
fn truncated_sequence_is_format_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("truncated.drpm");
    truncated_rpmonly_file(&path);

    let err = drpm::read(path.to_str().unwrap()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
}
