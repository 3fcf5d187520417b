//! Spur gear tooth profiles **generated** the way a gear hobbing or shaping machine cuts
//! them: a straight-sided rack cutter is rolled against the blank and the boundary it
//! leaves behind becomes the gear.
//!
//! Profile shift, backlash, root clearance, undercut and non-standard pressure angles are
//! not special-cased; they fall out of the cutting simulation.
//!
//! ```text
//! GearSpec ─▶ resolve ─▶ RackProfile ─▶ roll (SweptCurveFamily) ─▶ GapEnvelope
//!                                                                     │
//!          GeneratedGear ◀─ validate ◀─ GearOutline ◀─ ToothProfile ◀─┘
//! ```
//!
//! ```
//! use gearcut::{GearSpec, generate};
//!
//! let gear = generate(&GearSpec::new(1.5, 24).with_profile_shift(0.2)).unwrap();
//! let ring = gear.outline.points();
//! assert_eq!(ring.len(), 24 * gear.outline.tooth_len());
//! ```
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//! - [**dxf-io**](https://en.wikipedia.org/wiki/AutoCAD_DXF): `.dxf` export/import of outlines
//! - **svg-io**: `.svg` preview of outlines
//! - **hashmap**: enables use of hashbrown for the bounded [`OutlineCache`]
//! - **cli**: the `gearcut` command line tool
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64
//! - **parallel**: use rayon for the rack sweep and the envelope reduction

#![forbid(unsafe_code)]
#![deny(unused)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod envelope;
pub mod errors;
pub mod float_types;
pub mod involute;
pub mod io;
pub mod pipeline;
pub mod rack;
pub mod resolve;
pub mod roll;
pub mod spec;
pub mod tooth;
pub mod validate;

#[cfg(feature = "hashmap")]
pub mod cache;

#[cfg(any(all(feature = "f64", feature = "f32"), not(any(feature = "f64", feature = "f32"))))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use envelope::{GapEnvelope, ProfileRegion};
pub use errors::{GearError, GearWarning, WarningKind};
pub use pipeline::{GeneratedGear, generate, generate_with};
pub use resolve::DerivedGeometry;
pub use spec::{GearSpec, SamplingDensity, TipShape};
pub use tooth::{GearOutline, ToothProfile};

#[cfg(feature = "hashmap")]
pub use cache::OutlineCache;
