//! codec/mod.rs
//! Binary image codec: value conversion, decode (with regions, dribbles
//! and pre-region images), encode, stream framing and reload.

pub mod types;
pub mod value;
pub mod decode;
pub mod encode;
pub mod io;
pub mod reload;

pub use types::*;
pub use decode::{load, load_copy};
pub use encode::{size_of, unload};
pub use io::{read_header, write_header};
pub use reload::{copy, reload};
