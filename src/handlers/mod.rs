//! Front-ends that feed evaluation units to the runtime.

pub mod repl;
pub mod stdin;
