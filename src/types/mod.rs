//! General types, at present only errors.

pub mod err;
