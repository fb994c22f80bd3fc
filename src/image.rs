use crate::refs::{ObjectReferences, RefType};
use crate::ComposeError;
use image::{ColorType, DynamicImage, GenericImageView, ImageFormat, RgbaImage};
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use pdf_writer::{Filter, Finish, Pdf};
use serde::{Deserialize, Serialize};

/// A raw input file as supplied by the caller, before decoding
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub bytes: Vec<u8>,
    /// MIME type as reported by the uploader, if known. Only used as a hint;
    /// the format is sniffed from the bytes when it is absent or unrecognised.
    pub content_type: Option<String>,
}

impl Asset {
    pub fn new(bytes: Vec<u8>) -> Asset {
        Asset {
            bytes,
            content_type: None,
        }
    }

    pub fn with_content_type<S: ToString>(mut self, content_type: S) -> Asset {
        self.content_type = Some(content_type.to_string());
        self
    }

    fn format_hint(&self) -> Option<ImageFormat> {
        let mime = self.content_type.as_deref()?.to_ascii_lowercase();
        if mime.contains("png") {
            Some(ImageFormat::Png)
        } else if mime.contains("jpeg") || mime.contains("jpg") {
            Some(ImageFormat::Jpeg)
        } else {
            None
        }
    }

    /// Decode the asset into an [Image]. `role` names the asset in errors
    /// ("photo", "background", "qr").
    pub fn decode(&self, role: &'static str) -> Result<Image, ComposeError> {
        let decode_failure = |source| ComposeError::AssetDecodeFailure {
            asset: role,
            source,
        };

        let format = match self.format_hint() {
            Some(format) => format,
            None => image::guess_format(&self.bytes).map_err(decode_failure)?,
        };
        let decoded =
            image::load_from_memory_with_format(&self.bytes, format).map_err(decode_failure)?;

        // baseline RGB JPEGs go into the PDF untouched
        let jpeg = (format == ImageFormat::Jpeg && decoded.color() == ColorType::Rgb8)
            .then(|| self.bytes.clone());

        Ok(Image {
            width: decoded.width(),
            height: decoded.height(),
            pixels: decoded,
            jpeg,
            smooth: true,
        })
    }
}

/// A decoded raster image, ready to be placed on a page
#[derive(Clone, Debug)]
pub struct Image {
    pixels: DynamicImage,
    width: u32,
    height: u32,
    /// Original JPEG bytes when they can be embedded without re-encoding
    jpeg: Option<Vec<u8>>,
    /// Whether viewers may interpolate when scaling. Off for QR codes so
    /// modules keep hard edges.
    smooth: bool,
}

struct EncodeOutput {
    filter: Filter,
    bytes: Vec<u8>,
    mask: Option<Vec<u8>>,
}

impl Image {
    pub fn from_rgba(pixels: RgbaImage) -> Image {
        let (width, height) = pixels.dimensions();
        Image {
            pixels: DynamicImage::ImageRgba8(pixels),
            width,
            height,
            jpeg: None,
            smooth: true,
        }
    }

    /// Disable interpolation when the image is scaled
    pub fn pixelated(mut self) -> Image {
        self.smooth = false;
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_smooth(&self) -> bool {
        self.smooth
    }

    pub fn pixels(&self) -> &DynamicImage {
        &self.pixels
    }

    fn encode(&self) -> EncodeOutput {
        if let Some(jpeg) = &self.jpeg {
            return EncodeOutput {
                filter: Filter::DctDecode,
                bytes: jpeg.clone(),
                mask: None,
            };
        }

        let level = CompressionLevel::DefaultLevel as u8;
        let mask = self.pixels.color().has_alpha().then(|| {
            let alphas: Vec<u8> = self.pixels.pixels().map(|(_, _, p)| p.0[3]).collect();
            compress_to_vec_zlib(&alphas, level)
        });
        let bytes = compress_to_vec_zlib(self.pixels.to_rgb8().as_raw(), level);

        EncodeOutput {
            filter: Filter::FlateDecode,
            bytes,
            mask,
        }
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, image_index: usize, writer: &mut Pdf) {
        let id = refs.gen(RefType::Image(image_index));
        let encoded = self.encode();

        let mask_id = encoded
            .mask
            .as_ref()
            .map(|_| refs.gen(RefType::ImageMask(image_index)));

        let mut image = writer.image_xobject(id, encoded.bytes.as_slice());
        image.filter(encoded.filter);
        image.width(self.width as i32);
        image.height(self.height as i32);
        image.color_space().device_rgb();
        image.bits_per_component(8);
        image.interpolate(self.smooth);
        if let Some(mask_id) = mask_id {
            image.s_mask(mask_id);
        }
        image.finish();

        if let (Some(mask_id), Some(mask)) = (mask_id, encoded.mask) {
            let mut s_mask = writer.image_xobject(mask_id, mask.as_slice());
            s_mask.filter(Filter::FlateDecode);
            s_mask.width(self.width as i32);
            s_mask.height(self.height as i32);
            s_mask.color_space().device_gray();
            s_mask.bits_per_component(8);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> =
            ImageBuffer::from_fn(width, height, |x, _| Rgb([x as u8, 40, 200]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut out, ImageFormat::Png)
            .expect("encode png");
        out.into_inner()
    }

    #[test]
    fn decodes_png_by_sniffing() {
        let image = Asset::new(png_bytes(12, 7)).decode("photo").expect("valid png");
        assert_eq!((image.width(), image.height()), (12, 7));
        assert!(image.jpeg.is_none());
    }

    #[test]
    fn keeps_rgb_jpeg_bytes() {
        let img = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(8, 8, Rgb([10, 20, 30])));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Jpeg).expect("encode jpeg");
        let bytes = out.into_inner();

        let image = Asset::new(bytes.clone())
            .with_content_type("image/jpeg")
            .decode("photo")
            .expect("valid jpeg");
        assert_eq!(image.jpeg.as_deref(), Some(bytes.as_slice()));
    }

    #[test]
    fn corrupt_bytes_name_the_asset() {
        let err = Asset::new(b"definitely not an image".to_vec())
            .decode("background")
            .expect_err("garbage");
        assert!(matches!(
            err,
            ComposeError::AssetDecodeFailure {
                asset: "background",
                ..
            }
        ));
    }
}
