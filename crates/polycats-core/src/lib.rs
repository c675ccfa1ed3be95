//! polycats core: the Polygon → CATS conversion pipeline
//!
//! Opens a package directory or archive, reads it with [`polygon`], copies
//! its assets into the CATS layout, builds the document with [`cats`] and
//! writes it, timing every stage for the [`ConversionReport`].

pub mod config;
pub mod convert;
pub mod copier;
pub mod error;
pub mod runner;
pub mod unpack;

pub use config::{ConvertConfig, Folders};
pub use convert::convert;
pub use error::ConvertError;
pub use runner::{ConversionReport, PipelineRunner, StageReport};
pub use unpack::Package;

/// Version written into the trailing label of every generated document
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
