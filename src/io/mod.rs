//! Export collaborators: turn a finished [`GearOutline`](crate::GearOutline) into files
//! other tools understand, and read them back.
//!
//! Every backend writes the ring in outline order, so a round trip reproduces the same
//! ordered point sequence.

pub mod text;

#[cfg(feature = "dxf-io")]
pub mod dxf;

#[cfg(feature = "svg-io")]
pub mod svg;

/// Generic I/O and format-conversion errors.
///
/// Some variants only exist when the matching cargo feature is enabled.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("std::io::Error: {0}")]
    StdIo(#[from] std::io::Error),
    #[error("Could not parse float: {0}")]
    ParseFloat(#[from] std::num::ParseFloatError),
    #[error("Input is malformed: {0}")]
    MalformedInput(String),

    #[cfg(feature = "dxf-io")]
    /// Error bubbled up from the `dxf` crate.
    #[error("DXF error: {0}")]
    Dxf(#[from] ::dxf::DxfError),
}
