//! Platform file type tagging for written modules.
//!
//! RISC OS keeps a file type in the file's metadata instead of relying on
//! an extension. Other hosts have nothing to set.

use std::io;
use std::path::Path;

use tracing::debug;

/// RISC OS file type for tracker music (`TeqMusic`, the `*.mod`
/// equivalent).
pub const MODULE_FILE_TYPE: u16 = 0xCC5;

/// Tag a written module with the platform's file type for tracker music.
pub fn set_module_file_type(path: &Path) -> io::Result<()> {
    debug!(
        path = %path.display(),
        file_type = format_args!("{:03X}", MODULE_FILE_TYPE),
        "no typed file metadata on this platform"
    );
    Ok(())
}
