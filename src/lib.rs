// This is free and unencumbered software released into the public domain.

//! Camera preview: device selection, preview-size negotiation and the
//! preview lifecycle around a host camera framework.

extern crate alloc;

pub mod cli;
pub mod shared;
