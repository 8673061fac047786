//! Command implementations for the rendir CLI.

pub(crate) mod predict;
pub(crate) mod train;
