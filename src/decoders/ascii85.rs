//! ASCII85Decode (Base85) implementation.
//!
//! Decodes ASCII85/Base85 encoded data. This encoding represents 4 bytes
//! as 5 ASCII characters in the range '!' to 'u'.
//! Special case: 'z' represents 4 zero bytes (00000000).

use crate::decoders::StreamDecoder;
use crate::error::{Error, Result};

/// ASCII85Decode filter implementation.
pub struct Ascii85Decoder;

/// Accumulates base-85 digits into 4-byte words.
#[derive(Default)]
struct Group {
    value: u32,
    digits: usize,
}

impl Group {
    fn push(&mut self, digit: u8) -> Result<()> {
        self.value = self
            .value
            .checked_mul(85)
            .and_then(|v| v.checked_add(digit as u32))
            .ok_or_else(|| Error::Decode("ASCII85Decode: group value overflows".to_string()))?;
        self.digits += 1;
        Ok(())
    }

    fn take(&mut self) -> [u8; 4] {
        let bytes = self.value.to_be_bytes();
        *self = Group::default();
        bytes
    }
}

impl StreamDecoder for Ascii85Decoder {
    fn decode(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut output = Vec::with_capacity(input.len() / 5 * 4 + 4);
        let mut group = Group::default();

        for &byte in input {
            match byte {
                b'~' => break,
                b'z' if group.digits == 0 => output.extend_from_slice(&[0; 4]),
                b'z' => {
                    return Err(Error::Decode(
                        "ASCII85Decode: 'z' inside a group".to_string(),
                    ))
                },
                b'!'..=b'u' => {
                    group.push(byte - b'!')?;
                    if group.digits == 5 {
                        output.extend_from_slice(&group.take());
                    }
                },
                _ if byte.is_ascii_whitespace() => {},
                _ => {
                    return Err(Error::Decode(format!(
                        "ASCII85Decode: invalid character 0x{:02X}",
                        byte
                    )))
                },
            }
        }

        match group.digits {
            0 => {},
            1 => {
                return Err(Error::Decode(
                    "ASCII85Decode: trailing group of a single character".to_string(),
                ))
            },
            n => {
                // Pad with the highest digit, keep n - 1 bytes
                for _ in n..5 {
                    group.push(84)?;
                }
                output.extend_from_slice(&group.take()[..n - 1]);
            },
        }

        Ok(output)
    }

    fn name(&self) -> &str {
        "ASCII85Decode"
    }
}
