//! CATS: target model, builder and serializer for CATS problem packages
//!
//! The builder accepts relocated Polygon records and produces a typed
//! [`CatsDocument`]; the writer renders it as `problem.xml`.

pub mod builder;
pub mod error;
pub mod model;
pub mod node;
pub mod text;
pub mod writer;

pub use builder::{CatsBuilder, SampleMode};
pub use error::CatsError;
pub use model::CatsDocument;
