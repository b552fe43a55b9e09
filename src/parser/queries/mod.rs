//! Per-language call-site views for the tree walker.
//!
//! Each module maps its grammar's node kinds onto [`CallSite`]s, so the
//! shared walker never inspects node kinds itself.
//!
//! [`CallSite`]: crate::parser::walker::CallSite

pub mod java;
pub mod python;

pub use java::JavaGrammar;
pub use python::PythonGrammar;
