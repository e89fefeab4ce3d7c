//! ASCII85Decode (Base85) encoder.
//!
//! Encodes binary data as printable ASCII: every 4 input bytes become
//! 5 characters in the range '!' to 'u'. An all-zero group is written as
//! 'z', and the output is terminated with the `~>` end-of-data marker.

use crate::encoders::StreamEncoder;
use crate::error::Result;

/// End-of-data marker expected by ASCII85Decode readers.
const EOD: &[u8] = b"~>";

/// ASCII85 encoder.
pub struct Ascii85Encoder;

impl Ascii85Encoder {
    /// Encode one group of up to 4 bytes, returning the 5 digit characters.
    fn encode_group(group: &[u8]) -> [u8; 5] {
        let mut word = [0u8; 4];
        word[..group.len()].copy_from_slice(group);
        let mut value = u32::from_be_bytes(word);

        let mut digits = [0u8; 5];
        for slot in digits.iter_mut().rev() {
            *slot = (value % 85) as u8 + b'!';
            value /= 85;
        }
        digits
    }
}

impl StreamEncoder for Ascii85Encoder {
    fn encode(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut output = Vec::with_capacity(input.len() / 4 * 5 + 7);

        for group in input.chunks(4) {
            if group.len() == 4 {
                if group == [0, 0, 0, 0] {
                    output.push(b'z');
                } else {
                    output.extend_from_slice(&Self::encode_group(group));
                }
            } else {
                // Partial trailing group: n bytes -> n + 1 characters
                let digits = Self::encode_group(group);
                output.extend_from_slice(&digits[..group.len() + 1]);
            }
        }

        output.extend_from_slice(EOD);
        Ok(output)
    }

    fn name(&self) -> &str {
        "ASCII85Decode"
    }
}
