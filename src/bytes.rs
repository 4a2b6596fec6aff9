//! Big-endian integer and length-prefixed blob readers shared by the
//! header-phase parsers (which read directly off a `File`) and the body
//! parser (which reads off a [`crate::compress::DecompStream`]).

use std::io::Read;

use crate::error::{Error, Result};

/// Reads exactly `buf.len()` bytes, distinguishing a genuine I/O failure
/// from a short read (including a clean EOF) the way the format requires:
/// the former is `Error::Io`, the latter is `Error::Format`.
fn read_exact_tracked<R: Read + ?Sized>(r: &mut R, buf: &mut [u8]) -> Result<()> {
    let mut got = 0;
    while got < buf.len() {
        match r.read(&mut buf[got..]) {
            Ok(0) => {
                return Err(Error::ShortRead { want: buf.len(), got });
            }
            Ok(n) => got += n,
            Err(ref err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(Error::Io(err)),
        }
    }
    Ok(())
}

/// Reads a big-endian `u32` from `r`.
pub fn read_be32<R: Read + ?Sized>(r: &mut R) -> Result<u32> {
    let mut buf = [0u8; 4];
    read_exact_tracked(r, &mut buf)?;
    Ok(u32::from_be_bytes(buf))
}

/// Reads a big-endian `u64` from `r`.
pub fn read_be64<R: Read + ?Sized>(r: &mut R) -> Result<u64> {
    let mut buf = [0u8; 8];
    read_exact_tracked(r, &mut buf)?;
    Ok(u64::from_be_bytes(buf))
}

/// Allocates a zeroed buffer of `len` bytes, surfacing allocation failure as
/// `Error::Alloc` rather than aborting the process.
pub fn try_vec(len: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len).map_err(|_| Error::Alloc)?;
    buf.resize(len, 0);
    Ok(buf)
}

/// Reads exactly `len` bytes from `r` into a freshly allocated buffer.
pub fn read_exact_alloc<R: Read + ?Sized>(r: &mut R, len: usize) -> Result<Vec<u8>> {
    let mut buf = try_vec(len)?;
    read_exact_tracked(r, &mut buf)?;
    Ok(buf)
}

/// Reads a `u32` length prefix followed by that many bytes.
pub fn read_blob<R: Read + ?Sized>(r: &mut R) -> Result<Vec<u8>> {
    let len = read_be32(r)? as usize;
    read_exact_alloc(r, len)
}

/// Reads a `u32`-prefixed string and stores it NUL-terminated, matching the
/// C convention the wire format assumes for `src_nevr`/target NEVR buffers.
pub fn read_nul_terminated_blob<R: Read + ?Sized>(r: &mut R) -> Result<Vec<u8>> {
    let mut buf = read_blob(r)?;
    buf.push(0);
    Ok(buf)
}
