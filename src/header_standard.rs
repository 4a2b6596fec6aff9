//! The standard header phase (distilled spec §4.4): delegates the RPM
//! lead/signature/header parse to the RPM container collaborator, then
//! seeks the file past the whole RPM so the compressed region can begin.

use std::fs::File;
use std::io::{Seek, SeekFrom};

use log::debug;

use crate::error::Result;
use crate::rpm_container::{self, RpmHandle};

/// Parses the target RPM's lead/signature/header with `file`'s cursor
/// positioned just after the leading RPM lead magic (i.e. at the start of
/// the lead), and seeks `file` to the start of the compressed region.
pub fn read(file: &mut File) -> Result<RpmHandle> {
    file.seek(SeekFrom::Start(0))?;

    let handle = rpm_container::read(file)?;
    debug!("standard header: target nevr={:?}, full_size={}", String::from_utf8_lossy(handle.nevr()), handle.size_full());

    file.seek(SeekFrom::Start(handle.size_full()))?;

    Ok(handle)
}
