//! Process-level plumbing shared by the library and the driver binary.

pub mod logging;
