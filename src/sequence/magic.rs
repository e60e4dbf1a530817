// file: src/sequence/magic.rs
// description: studio start-frame heuristic applied before sequence comparison
// reference: publish naming convention where 1001 is the default first frame

use std::borrow::Cow;

/// Default studio start frame that may leak into scanned names.
pub const MAGIC_FRAME: &str = "1001";

/// Placeholder substituted for the magic frame.
pub const MAGIC_FRAME_SPEC: &str = "%04d";

/// Replaces every literal `1001` in `file_name` with `%04d`.
///
/// Precondition: `file_name` is a bare file name, not a path.
/// Postcondition: the result contains no `1001`; names without it are
/// returned borrowed and unchanged.
///
/// This is a textual substitution, not frame detection. A `1001` that is
/// part of a shot or asset name is rewritten too, so a candidate such as
/// `sh1001_comp.%04d.exr` only matches a request for
/// `sh%04d_comp.%04d.exr`.
pub fn normalize_magic_frame(file_name: &str) -> Cow<'_, str> {
    if file_name.contains(MAGIC_FRAME) {
        Cow::Owned(file_name.replace(MAGIC_FRAME, MAGIC_FRAME_SPEC))
    } else {
        Cow::Borrowed(file_name)
    }
}
