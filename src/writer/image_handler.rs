//! Image handling for PDF generation.
//!
//! Images are embedded as XObjects (ISO 32000-1 Section 8.9). Decoding the
//! source file is delegated to a [`RasterSource`]; this module only runs
//! the encoding pipeline on the decoded pixels:
//!
//! ```text
//! RGB triples (row-major)
//!     ↓ flatten
//! R,G,B,R,G,B,... bytes
//!     ↓ FlateEncoder (maximum effort by default)
//! zlib bytes
//!     ↓ Ascii85Encoder
//! text-safe payload  (/Filter [/ASCII85Decode /FlateDecode])
//! ```
//!
//! The declared `/Length` is the length of the final payload.

use std::path::PathBuf;

use super::IndirectObject;
use super::object_serializer::ObjectSerializer;
use crate::decoders::decode_stream;
use crate::encoders::{encode_chain, Ascii85Encoder, FlateEncoder};
use crate::error::Result;
use crate::object::{Object, ObjectRef};

/// Failure reported by a raster decoder.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    /// Unsupported image format
    #[error("Unsupported image format")]
    UnsupportedFormat,

    /// Failed to decode image
    #[error("Failed to decode image: {0}")]
    DecodeError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(String),

    /// Invalid image data
    #[error("Invalid image data: {0}")]
    InvalidData(String),
}

impl From<ImageError> for crate::error::Error {
    fn from(err: ImageError) -> Self {
        crate::error::Error::ImageSourceUnreadable(err.to_string())
    }
}

/// Decoded raster: dimensions plus one RGB triple per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 3]>,
}

impl Raster {
    /// Create a raster, checking that the pixel count matches the dimensions.
    pub fn new(width: u32, height: u32, pixels: Vec<[u8; 3]>) -> std::result::Result<Self, ImageError> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(ImageError::InvalidData(format!(
                "{}x{} raster needs {} pixels, got {}",
                width,
                height,
                expected,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// A raster where every pixel has the same colour.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        Self {
            width,
            height,
            pixels: vec![rgb; width as usize * height as usize],
        }
    }

    /// Build from packed `R,G,B,...` bytes.
    pub fn from_rgb_bytes(width: u32, height: u32, data: &[u8]) -> std::result::Result<Self, ImageError> {
        if data.len() % 3 != 0 {
            return Err(ImageError::InvalidData(format!(
                "RGB data length {} is not a multiple of 3",
                data.len()
            )));
        }
        let pixels = data.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect();
        Self::new(width, height, pixels)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixels in row-major order, left to right, top to bottom.
    pub fn pixels(&self) -> &[[u8; 3]] {
        &self.pixels
    }

    /// Flatten into one contiguous `R,G,B,R,G,B,...` sequence.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flatten().copied().collect()
    }

    fn from_dynamic(img: image::DynamicImage) -> Self {
        // Alpha, if any, is dropped here
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        let pixels = rgb.pixels().map(|p| p.0).collect();
        Self {
            width,
            height,
            pixels,
        }
    }
}

/// Something that can produce decoded pixels for `add_image`.
///
/// This is the seam to the external raster decoder: implementations may
/// read files, decode in-memory bytes, or hand over pixels directly.
pub trait RasterSource: Send + Sync {
    /// Decode into a raster.
    fn decode(&self) -> std::result::Result<Raster, ImageError>;
}

impl RasterSource for Raster {
    fn decode(&self) -> std::result::Result<Raster, ImageError> {
        Ok(self.clone())
    }
}

/// Image file on disk, decoded with the `image` crate (PNG, JPEG, GIF).
#[derive(Debug, Clone)]
pub struct ImageFile {
    path: PathBuf,
}

impl ImageFile {
    /// Refer to an image file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RasterSource for ImageFile {
    fn decode(&self) -> std::result::Result<Raster, ImageError> {
        let data = std::fs::read(&self.path)
            .map_err(|e| ImageError::IoError(format!("{}: {}", self.path.display(), e)))?;
        ImageBytes::new(data).decode()
    }
}

/// Encoded image held in memory (PNG, JPEG, GIF).
#[derive(Debug, Clone)]
pub struct ImageBytes {
    data: Vec<u8>,
}

impl ImageBytes {
    /// Wrap encoded image bytes.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }
}

impl RasterSource for ImageBytes {
    fn decode(&self) -> std::result::Result<Raster, ImageError> {
        let format = image::guess_format(&self.data).map_err(|_| ImageError::UnsupportedFormat)?;
        let img = image::load_from_memory_with_format(&self.data, format)
            .map_err(|e| ImageError::DecodeError(e.to_string()))?;
        Ok(Raster::from_dynamic(img))
    }
}

/// Output of the encoding pipeline: dimensions plus the framed payload.
///
/// The payload never changes once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedImage {
    width: u32,
    height: u32,
    filters: Vec<String>,
    payload: bytes::Bytes,
}

impl EncodedImage {
    /// Run the pipeline at maximum compression effort.
    pub fn encode(raster: &Raster) -> Result<Self> {
        Self::encode_with_level(raster, FlateEncoder::best().level())
    }

    /// Run the pipeline with a specific deflate level.
    pub fn encode_with_level(raster: &Raster, level: u32) -> Result<Self> {
        let flattened = raster.to_rgb_bytes();
        let flate = FlateEncoder::new(level);
        let (payload, filters) = encode_chain(&flattened, &[&flate, &Ascii85Encoder])?;

        log::debug!(
            "Encoded {}x{} raster: {} RGB bytes -> {} payload bytes",
            raster.width(),
            raster.height(),
            flattened.len(),
            payload.len()
        );

        Ok(Self {
            width: raster.width(),
            height: raster.height(),
            filters,
            payload: bytes::Bytes::from(payload),
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Filter names in the order a reader applies them.
    pub fn filters(&self) -> &[String] {
        &self.filters
    }

    /// The exact bytes written between `stream` and `endstream`.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Declared stream length (the payload length).
    pub fn stream_length(&self) -> usize {
        self.payload.len()
    }

    /// Reverse the pipeline, returning the flattened RGB bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        decode_stream(&self.payload, &self.filters)
    }
}

/// A registered image resource.
#[derive(Debug, Clone)]
pub struct Image {
    obj_ref: ObjectRef,
    name: String,
    encoded: EncodedImage,
}

impl Image {
    pub(crate) fn new(obj_ref: ObjectRef, name: impl Into<String>, encoded: EncodedImage) -> Self {
        Self {
            obj_ref,
            name: name.into(),
            encoded,
        }
    }

    /// Symbolic resource name (without the leading slash).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.encoded.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.encoded.height()
    }

    /// The encoded payload.
    pub fn encoded(&self) -> &EncodedImage {
        &self.encoded
    }
}

impl IndirectObject for Image {
    fn object_ref(&self) -> ObjectRef {
        self.obj_ref
    }

    fn to_object(&self) -> Object {
        let filters = self
            .encoded
            .filters()
            .iter()
            .map(|f| ObjectSerializer::name(f))
            .collect();

        let dict = ObjectSerializer::dict_entries(vec![
            ("Type", ObjectSerializer::name("XObject")),
            ("Subtype", ObjectSerializer::name("Image")),
            ("Name", ObjectSerializer::name(&self.name)),
            ("Width", ObjectSerializer::integer(self.width() as i64)),
            ("Height", ObjectSerializer::integer(self.height() as i64)),
            ("BitsPerComponent", ObjectSerializer::integer(8)),
            ("ColorSpace", ObjectSerializer::name("DeviceRGB")),
            ("Filter", ObjectSerializer::array(filters)),
            ("Length", ObjectSerializer::integer(self.encoded.stream_length() as i64)),
        ]);

        Object::Stream {
            dict,
            data: self.encoded.payload.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_pixel_count_checked() {
        let result = Raster::new(2, 2, vec![[0, 0, 0]; 3]);
        assert!(matches!(result, Err(ImageError::InvalidData(_))));
    }

    #[test]
    fn test_raster_flatten_row_major() {
        let raster = Raster::new(2, 1, vec![[1, 2, 3], [4, 5, 6]]).unwrap();
        assert_eq!(raster.to_rgb_bytes(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_raster_from_rgb_bytes() {
        let raster = Raster::from_rgb_bytes(1, 2, &[9, 8, 7, 6, 5, 4]).unwrap();
        assert_eq!(raster.pixels(), &[[9, 8, 7], [6, 5, 4]]);
        assert!(Raster::from_rgb_bytes(1, 1, &[1, 2]).is_err());
    }

    #[test]
    fn test_encode_zero_raster_round_trip() {
        let raster = Raster::filled(7, 5, [0, 0, 0]);
        let encoded = EncodedImage::encode(&raster).unwrap();

        assert_eq!(encoded.filters(), &["ASCII85Decode".to_string(), "FlateDecode".to_string()]);
        assert_eq!(encoded.decode().unwrap(), vec![0u8; 7 * 5 * 3]);
    }

    #[test]
    fn test_payload_is_text_safe() {
        let pixels = (0..64u32).map(|i| [i as u8, (i * 3) as u8, (i * 7) as u8]).collect();
        let raster = Raster::new(8, 8, pixels).unwrap();
        let encoded = EncodedImage::encode(&raster).unwrap();

        assert!(encoded.payload().iter().all(|b| b.is_ascii_graphic()));
        assert!(encoded.payload().ends_with(b"~>"));
        assert_eq!(encoded.stream_length(), encoded.payload().len());
    }

    #[test]
    fn test_image_xobject_dictionary() {
        let raster = Raster::filled(3, 2, [255, 0, 0]);
        let encoded = EncodedImage::encode(&raster).unwrap();
        let length = encoded.stream_length();
        let image = Image::new(ObjectRef::new(9, 0), "logo", encoded);

        let obj = image.to_object();
        let dict = obj.as_dict().unwrap();
        assert_eq!(dict.get("Subtype"), Some(&Object::Name("Image".to_string())));
        assert_eq!(dict.get("Name"), Some(&Object::Name("logo".to_string())));
        assert_eq!(dict.get("Width"), Some(&Object::Integer(3)));
        assert_eq!(dict.get("Height"), Some(&Object::Integer(2)));
        assert_eq!(dict.get("Length"), Some(&Object::Integer(length as i64)));
    }

    #[test]
    fn test_image_bytes_rejects_garbage() {
        let result = ImageBytes::new(b"not an image".to_vec()).decode();
        assert!(result.is_err());
    }

    #[test]
    fn test_image_file_missing() {
        let result = ImageFile::new("/nonexistent/gopher.png").decode();
        assert!(matches!(result, Err(ImageError::IoError(_))));
    }

    #[test]
    fn test_image_error_converts_to_unreadable() {
        let err: crate::error::Error = ImageError::UnsupportedFormat.into();
        assert!(matches!(err, crate::error::Error::ImageSourceUnreadable(_)));
    }
}
