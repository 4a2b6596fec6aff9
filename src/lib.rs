mod body;
mod bytes;
pub mod compress;
pub mod error;
mod header_rpmonly;
mod header_standard;
pub mod projection;
pub mod record;
mod read;
pub mod rpm_container;
mod signed;

pub use error::{Error, ErrorKind, Result};
pub use projection::{project, DeltaInfo};
pub use read::read;
pub use record::{DeltaRecord, DeltaType, Head};
