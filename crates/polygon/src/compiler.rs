//! Compiler resolution for Polygon source types.
//!
//! Polygon tags every source file with a language identifier such as
//! `cpp.g++17`. CATS wants the numeric `de_code` of a development
//! environment instead, so identifiers are looked up in a fixed table.

use crate::diagnostics::Diagnostics;
use lazy_static::lazy_static;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// CATS development environments, valued by their `de_code`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Compiler {
    None,
    Answer,
    GnuCpp11,
    MsCpp15,
    GnuC11,
    Rust,
    FreePascal,
    FreePascalDelphi,
    PascalAbc,
    Java8,
    MsCsharp15,
    JavaTestlib,
    Go,
    Kotlin,
    Perl5,
    Python3,
    Haskell,
    Ruby2,
    Php7,
    Pypy3,
    R,
}

impl Compiler {
    /// Numeric code understood by CATS
    pub fn code(self) -> u32 {
        match self {
            Compiler::None => 1,
            Compiler::Answer => 3,
            Compiler::GnuCpp11 => 102,
            Compiler::MsCpp15 => 103,
            Compiler::GnuC11 => 105,
            Compiler::Rust => 120,
            Compiler::FreePascal => 202,
            Compiler::FreePascalDelphi => 204,
            Compiler::PascalAbc => 205,
            Compiler::Java8 => 401,
            Compiler::MsCsharp15 => 402,
            Compiler::JavaTestlib => 403,
            Compiler::Go => 404,
            Compiler::Kotlin => 406,
            Compiler::Perl5 => 501,
            Compiler::Python3 => 502,
            Compiler::Haskell => 503,
            Compiler::Ruby2 => 504,
            Compiler::Php7 => 505,
            Compiler::Pypy3 => 510,
            Compiler::R => 511,
        }
    }
}

impl fmt::Display for Compiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.code())
    }
}

lazy_static! {
    /// Polygon type identifiers, lower-cased
    static ref COMPILERS: HashMap<&'static str, Compiler> = {
        let mut m = HashMap::new();
        m.insert("c.gcc", Compiler::GnuC11);
        m.insert("cpp.g++", Compiler::GnuCpp11);
        m.insert("cpp.g++11", Compiler::GnuCpp11);
        m.insert("cpp.g++14", Compiler::GnuCpp11);
        m.insert("cpp.g++17", Compiler::GnuCpp11);
        m.insert("cpp.gcc11-64-winlibs-g++20", Compiler::GnuCpp11);
        m.insert("cpp.ms2017", Compiler::MsCpp15);
        m.insert("cpp.msys2-mingw64-9-g++17", Compiler::MsCpp15);
        m.insert("csharp.mono", Compiler::MsCsharp15);
        m.insert("d", Compiler::None);
        m.insert("go", Compiler::Go);
        m.insert("java11", Compiler::Java8);
        m.insert("java8", Compiler::Java8);
        m.insert("kotlin", Compiler::Kotlin);
        m.insert("kotlin16", Compiler::Kotlin);
        m.insert("kotlin17", Compiler::Kotlin);
        m.insert("kotlin19", Compiler::Kotlin);
        m.insert("ocaml", Compiler::None);
        m.insert("pas.dpr", Compiler::FreePascalDelphi);
        m.insert("pas.fpc", Compiler::FreePascal);
        m.insert("perl.5", Compiler::Perl5);
        m.insert("php.5", Compiler::Php7);
        m.insert("python.2", Compiler::Python3);
        m.insert("python.3", Compiler::Python3);
        m.insert("python.pypy2", Compiler::Pypy3);
        m.insert("python.pypy3", Compiler::Pypy3);
        m.insert("ruby.2", Compiler::Ruby2);
        m.insert("rust", Compiler::Rust);
        m.insert("scala", Compiler::None);
        m.insert("h.g++", Compiler::None);
        m
    };
}

/// Look up a Polygon type identifier, ignoring case
pub fn lookup(identifier: &str) -> Option<Compiler> {
    COMPILERS.get(identifier.to_lowercase().as_str()).copied()
}

/// Look up an identifier, warning once when it is unknown
pub fn try_resolve(identifier: &str, diagnostics: &mut Diagnostics) -> Option<Compiler> {
    let compiler = lookup(identifier);
    if compiler.is_none() {
        diagnostics.warn(format!("compiler for type <{}> not found", identifier));
    }
    compiler
}

/// Resolve an identifier, falling back to [`Compiler::None`] with a warning
pub fn resolve(identifier: &str, diagnostics: &mut Diagnostics) -> Compiler {
    try_resolve(identifier, diagnostics).unwrap_or(Compiler::None)
}
