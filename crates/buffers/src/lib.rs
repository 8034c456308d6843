//! Binary buffer primitives for the zonepack codecs.

mod writer;

pub use writer::Writer;
