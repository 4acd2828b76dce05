//! Crate-wide result type.
//!
//! All fallible paths in the tooling return this alias so errors can be
//! chained with `.wrap_err()` and rendered by `color-eyre` at the top
//! level. Typed domain errors live in [`crate::error`] and convert into
//! reports automatically through `?`.

use color_eyre::eyre::Result as EyreResult;

/// Standard result type used throughout grpc-web-devtools.
pub type Result<T> = EyreResult<T>;
