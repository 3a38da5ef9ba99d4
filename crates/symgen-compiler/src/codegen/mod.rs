//! Rust binding emission.
//!
//! Every kept user type, every generic template and every specialized
//! instantiation becomes one `pub struct` declaration. Declarations come out
//! with base classes before the classes deriving from them. Pointers, arrays
//! and enums are spelled inline where they are used.

mod emitter;
mod naming;
mod order;
mod render;

#[cfg(test)]
mod emitter_tests;

pub use emitter::Emitter;

/// One emitted type declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    /// Name other declarations use to refer to this one (`geo::Point`,
    /// `Stack<T>`, `Stack_i32`).
    pub name: String,
    /// Namespace path of the native type, for consumers that split output by module.
    pub namespace: Option<String>,
    pub text: String,
}
