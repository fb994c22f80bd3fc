use thiserror::Error;

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum ComposeError {
    /// A source image reported a zero (or non-finite) width or height
    #[error("image has invalid dimensions {width}x{height}")]
    InvalidImageDimensions { width: f32, height: f32 },

    /// A mandatory input such as the QR code for a card back is absent
    #[error("missing required asset: {0}")]
    MissingRequiredAsset(&'static str),

    /// Text does not fit the fixed region reserved for it at its fixed size
    #[error("text overflow risk: {0}")]
    TextOverflowRisk(String),

    /// A preset passage was requested that the language doesn't have
    #[error("no preset passage at index {0}")]
    UnknownPassage(usize),

    /// A photo, background, or QR buffer could not be decoded
    #[error("failed to decode {asset}: {source}")]
    AssetDecodeFailure {
        asset: &'static str,
        #[source]
        source: image::ImageError,
    },

    /// Palette extraction failed. The compositor recovers from this locally
    /// by falling back to black-on-white, so callers of `compose` never see it.
    #[error("colour extraction failed: {0}")]
    ColorExtractionFailure(String),

    /// A layout was requested with non-positive or otherwise degenerate sizes
    #[error("invalid layout: {0}")]
    InvalidLayout(String),

    /// The font cannot be used for the requested output
    #[error("unsupported font: {0}")]
    UnsupportedFont(String),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FontParsing(#[from] owned_ttf_parser::FaceParsingError),

    #[error(transparent)]
    /// [qrcode] could not encode the payload
    QrEncoding(#[from] qrcode::types::QrError),

    /// Rasterization or PNG encoding failed
    #[error("raster error: {0}")]
    Raster(String),

    /// Configuration was rejected
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    /// Configuration could not be (de)serialized
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    /// An I/O error occurred
    Io(#[from] std::io::Error),

    /// A page listed in the page order was not found in the document
    #[error("page missing from document")]
    PageMissing,
}
