//! Filesystem helpers shared by the build steps.

pub(crate) mod fs;
