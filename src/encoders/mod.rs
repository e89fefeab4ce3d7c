//! Stream encoder implementations for PDF filters.
//!
//! The write-side counterpart of [`crate::decoders`]:
//! - FlateDecode (zlib/deflate) - compression
//! - ASCII85Decode - base-85 text encoding
//!
//! Encoders are chained in the reverse order of the `/Filter` array a
//! reader will apply: data is compressed first, then made text-safe.

use crate::error::Result;

mod ascii85;
mod flate;

pub use ascii85::Ascii85Encoder;
pub use flate::FlateEncoder;

/// Trait for PDF stream encoders.
///
/// Each encoder produces the bytes a reader will feed to the decoder of
/// the same filter name.
pub trait StreamEncoder {
    /// Encode the input data.
    fn encode(&self, input: &[u8]) -> Result<Vec<u8>>;

    /// Get the filter name this encoder produces data for (e.g., "FlateDecode").
    fn name(&self) -> &str;
}

/// Run data through a chain of encoders, first to last.
///
/// Returns the encoded bytes together with the `/Filter` names in the
/// order a reader must apply them (the reverse of the encoding order).
pub fn encode_chain(data: &[u8], encoders: &[&dyn StreamEncoder]) -> Result<(Vec<u8>, Vec<String>)> {
    let mut current = data.to_vec();
    let mut filters = Vec::with_capacity(encoders.len());

    for encoder in encoders {
        log::trace!("Applying {} encoder to {} bytes", encoder.name(), current.len());
        current = encoder.encode(&current)?;
        filters.push(encoder.name().to_string());
    }
    filters.reverse();

    Ok((current, filters))
}
