//! Built-in guards

mod newline;

pub use newline::NewlineGuard;
