mod common;

use common::BodyFields;
use drpm::ErrorKind;

#[test]
fn unrecognized_packed_descriptor_is_format_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("unknown-comp.drpm");

    let rpm = common::minimal_rpm("foo", "1.0", "1", Some("gzip"));
    let fields = BodyFields {
        version: 2,
        sequence: vec![0u8; 16],
        packed_comp: 0x0000_0006, // no algorithm id 6 is defined
        ..Default::default()
    };
    common::write_standard_file(&path, &rpm, &fields);

    let err = drpm::read(path.to_str().unwrap()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn nonzero_reserved_bits_are_format_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reserved-bits.drpm");

    let rpm = common::minimal_rpm("foo", "1.0", "1", Some("gzip"));
    let fields = BodyFields {
        version: 2,
        sequence: vec![0u8; 16],
        packed_comp: 0x0001_0000,
        ..Default::default()
    };
    common::write_standard_file(&path, &rpm, &fields);

    let err = drpm::read(path.to_str().unwrap()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
}
