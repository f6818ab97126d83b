//! Logging macros
//!
//! Forward to `defmt` when the `defmt` feature is enabled. Otherwise every
//! macro only borrows its arguments so host builds need no logger.

#[cfg(feature = "defmt")]
pub(crate) use defmt::{debug, info, trace, warn};

#[cfg(not(feature = "defmt"))]
macro_rules! trace_noop {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        $( let _ = &$arg; )*
    }};
}

#[cfg(not(feature = "defmt"))]
macro_rules! debug_noop {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        $( let _ = &$arg; )*
    }};
}

#[cfg(not(feature = "defmt"))]
macro_rules! info_noop {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        $( let _ = &$arg; )*
    }};
}

#[cfg(not(feature = "defmt"))]
macro_rules! warn_noop {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        $( let _ = &$arg; )*
    }};
}

#[cfg(not(feature = "defmt"))]
pub(crate) use debug_noop as debug;
#[cfg(not(feature = "defmt"))]
pub(crate) use info_noop as info;
#[cfg(not(feature = "defmt"))]
pub(crate) use trace_noop as trace;
#[cfg(not(feature = "defmt"))]
pub(crate) use warn_noop as warn;
