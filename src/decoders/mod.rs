//! Stream decoder implementations for PDF filters.
//!
//! Reverses the filters this crate writes, so produced payloads can be
//! checked byte for byte:
//! - FlateDecode (zlib/deflate)
//! - ASCII85Decode - base85 encoding
//!
//! Decoders can be chained together in a filter pipeline.

use crate::error::{Error, Result};

mod ascii85;
mod flate;

pub use ascii85::Ascii85Decoder;
pub use flate::FlateDecoder;

/// Upper bound on the size of a decoded stream (100 MB).
const MAX_DECODED_SIZE: usize = 100 * 1024 * 1024;

/// Trait for PDF stream decoders.
///
/// Each decoder implements a specific PDF filter algorithm and can decode
/// compressed or encoded stream data.
pub trait StreamDecoder {
    /// Decode the input data.
    fn decode(&self, input: &[u8]) -> Result<Vec<u8>>;

    /// Get the name of this decoder (e.g., "FlateDecode").
    fn name(&self) -> &str;
}

/// Look up the decoder for a `/Filter` name.
pub fn decoder_for(filter_name: &str) -> Result<Box<dyn StreamDecoder>> {
    match filter_name {
        "FlateDecode" => Ok(Box::new(FlateDecoder)),
        "ASCII85Decode" => Ok(Box::new(Ascii85Decoder)),
        _ => Err(Error::UnsupportedFilter(filter_name.to_string())),
    }
}

/// Decode stream data using a filter pipeline.
///
/// PDF streams can have multiple filters applied in sequence. This function
/// applies each filter in the order given (the order of the `/Filter` array).
///
/// # Examples
///
/// ```rust
/// use pdf_folio::decoders::decode_stream;
/// use pdf_folio::encoders::{encode_chain, Ascii85Encoder, FlateEncoder};
///
/// let (payload, filters) =
///     encode_chain(b"pixels", &[&FlateEncoder::best(), &Ascii85Encoder]).unwrap();
/// assert_eq!(decode_stream(&payload, &filters).unwrap(), b"pixels");
/// ```
pub fn decode_stream(data: &[u8], filters: &[String]) -> Result<Vec<u8>> {
    let mut current = data.to_vec();

    for filter_name in filters {
        let decoder = decoder_for(filter_name)?;
        current = decoder.decode(&current)?;

        if current.len() > MAX_DECODED_SIZE {
            return Err(Error::Decode(format!(
                "decoded size {} bytes exceeds limit {} bytes",
                current.len(),
                MAX_DECODED_SIZE
            )));
        }
    }

    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decoder_for_known_filters() {
        assert_eq!(decoder_for("FlateDecode").unwrap().name(), "FlateDecode");
        assert_eq!(decoder_for("ASCII85Decode").unwrap().name(), "ASCII85Decode");
    }

    #[test]
    fn test_decoder_for_unknown_filter() {
        let result = decoder_for("JBIG2Decode");
        assert!(matches!(result, Err(Error::UnsupportedFilter(name)) if name == "JBIG2Decode"));
    }

    #[test]
    fn test_decode_stream_no_filters() {
        let decoded = decode_stream(b"plain", &[]).unwrap();
        assert_eq!(decoded, b"plain");
    }

    #[test]
    fn test_decode_stream_ascii85_only() {
        let decoded = decode_stream(b"<+U,m~>", &["ASCII85Decode".to_string()]).unwrap();
        assert_eq!(decoded, b"Test");
    }
}
