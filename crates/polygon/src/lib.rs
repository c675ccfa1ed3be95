//! Polygon: source model and readers for Polygon problem packages
//!
//! Reads `problem.xml` and the per-language `problem-properties.json`
//! documents into an immutable model, and derives the views the CATS
//! writer needs (compilers, generators, test group ranges).
//!
//! # Example
//!
//! ```ignore
//! use polygon::{read_problem, derive, Diagnostics};
//!
//! let mut diagnostics = Diagnostics::new();
//! let problem = read_problem(Path::new("a-plus-b/problem.xml"), &mut diagnostics)?;
//! let ranges = derive::group_ranges(&problem.judging.test_sets[0])?;
//! ```

pub mod compiler;
pub mod derive;
pub mod diagnostics;
pub mod error;
pub mod model;
pub mod reader;
pub mod statement;

pub use compiler::Compiler;
pub use diagnostics::Diagnostics;
pub use error::{PolygonError, RangeError};
pub use model::*;
pub use reader::{parse_problem, read_problem};
pub use statement::{SampleTest, Statement, StatementProperties};
