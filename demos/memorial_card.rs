//! Writes a card front, card back and poster for a sample memorial.
//!
//! Usage: `cargo run --example memorial-card [photo.jpg] [config.json]`
//!
//! Without a photo a generated gradient stands in. The acrylic proof is only
//! rendered when the config names TrueType fonts, since PNG output needs
//! glyph outlines.

use image::{ImageFormat, Rgba, RgbaImage};
use keepsake::{
    Asset, ComposeConfig, ComposeRequest, Compositor, Product, QrInput, QrTint, TextFields,
};
use tracing_subscriber::EnvFilter;

fn sample_photo() -> Asset {
    let img = RgbaImage::from_fn(600, 900, |x, y| {
        let r = (60 + x * 100 / 600) as u8;
        let g = (80 + y * 90 / 900) as u8;
        Rgba([r, g, 140, 255])
    });
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    Asset::new(out.into_inner()).with_content_type("image/png")
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let photo = match args.next() {
        Some(path) => Asset::new(std::fs::read(path).unwrap()),
        None => sample_photo(),
    };
    let config = match args.next() {
        Some(path) => ComposeConfig::load(path).unwrap(),
        None => ComposeConfig::default(),
    };
    let compositor = Compositor::new(config).unwrap();

    let fields = TextFields {
        name: "Eleanor Rose Whitfield".into(),
        sunrise: "April 14, 1938".into(),
        sunset: "September 3, 2024".into(),
        passage_index: Some(0),
        attribution: "Forever in our hearts".into(),
        counselor_name: "Samuel Reyes".into(),
        counselor_phone: "(555) 014-2277".into(),
        ..Default::default()
    };
    let qr = QrInput::Payload("https://example.com/memorials/eleanor-whitfield".into());

    for (product, file) in [
        (Product::CardFront, "card-front.pdf"),
        (Product::CardBack, "card-back.pdf"),
        (Product::Poster, "poster.pdf"),
    ] {
        let request = ComposeRequest::new(product)
            .with_photo(photo.clone())
            .with_qr(qr.clone())
            .with_fields(fields.clone())
            .with_qr_tint(QrTint::FromPhoto);
        let bytes = compositor.compose(&request).unwrap();
        std::fs::write(file, bytes).unwrap();
        println!("wrote {file}");
    }

    if compositor.fonts().has_outlines() {
        let request = compositor
            .request(Product::Acrylic)
            .with_photo(photo)
            .with_qr(qr)
            .with_fields(fields);
        let bytes = compositor.compose(&request).unwrap();
        std::fs::write("acrylic.png", bytes).unwrap();
        println!("wrote acrylic.png");
    }
}
