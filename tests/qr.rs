use image::{DynamicImage, Rgba, RgbaImage};
use keepsake::qr::{build_qr_image, colours_from_photo, resolve_tint, QrColours, MAX_DARK_BRIGHTNESS};
use keepsake::{colours, Colour, ComposeRequest, Compositor, ComposeConfig, PageContents, Product, QrInput, QrTint};

/// A photo made of horizontal bands, most common colour first
fn banded(bands: &[([u8; 3], u32)]) -> DynamicImage {
    let height: u32 = bands.iter().map(|(_, rows)| rows).sum();
    let mut img = RgbaImage::new(16, height);
    let mut y = 0;
    for (rgb, rows) in bands {
        for row in y..y + rows {
            for x in 0..16 {
                img.put_pixel(x, row, Rgba([rgb[0], rgb[1], rgb[2], 255]));
            }
        }
        y += rows;
    }
    DynamicImage::ImageRgba8(img)
}

#[test]
fn saturated_mid_tones_tint_the_code() {
    let photo = banded(&[([40, 90, 200], 12), ([230, 230, 225], 4)]);
    let chosen = colours_from_photo(&photo);
    assert_eq!(chosen.light, colours::WHITE);
    let [r, g, b] = chosen.dark.to_rgb_bytes();
    assert!(b > r && b > g, "expected a blue tint, got {chosen:?}");
    assert!(chosen.dark.brightness() <= 0.7);
}

#[test]
fn pale_photos_fall_back_to_something_dark() {
    // pale yellow dominates, navy is the only dark swatch
    let photo = banded(&[([250, 240, 150], 14), ([20, 30, 90], 2)]);
    let chosen = colours_from_photo(&photo);
    assert!(chosen.dark.brightness() <= MAX_DARK_BRIGHTNESS, "{chosen:?}");
}

#[test]
fn blank_photos_give_black_on_white() {
    let photo = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, Rgba([255, 255, 255, 255])));
    assert_eq!(colours_from_photo(&photo), QrColours::default());
    assert_eq!(resolve_tint(QrTint::FromPhoto, None), QrColours::default());
}

#[test]
fn custom_tints_are_used_as_given() {
    let ink = Colour::new_rgb_bytes(30, 60, 30);
    let colours = resolve_tint(QrTint::Custom(ink), None);
    assert_eq!(colours.dark, ink);

    let image = build_qr_image(&QrInput::Payload("hello".into()), colours).expect("encodes");
    assert!(!image.is_smooth());
    let pixels = image.pixels().to_rgba8();
    assert!(pixels.pixels().any(|p| p.0 == [30, 60, 30, 255]));
    assert!(pixels.pixels().all(|p| p.0 == [30, 60, 30, 255] || p.0 == [255, 255, 255, 255]));
}

#[test]
fn custom_tints_too_pale_to_scan_are_replaced() {
    let mint = Colour::new_rgb_bytes(190, 240, 200);
    assert!(mint.brightness() > MAX_DARK_BRIGHTNESS);
    let colours = resolve_tint(QrTint::Custom(mint), None);
    assert_eq!(colours, QrColours::default());
}

#[test]
fn poster_qr_follows_the_photo() {
    let mut photo = RgbaImage::from_pixel(60, 90, Rgba([30, 120, 40, 255]));
    photo.put_pixel(0, 0, Rgba([240, 240, 240, 255]));
    let mut encoded = std::io::Cursor::new(Vec::new());
    photo
        .write_to(&mut encoded, image::ImageFormat::Png)
        .expect("encodes");

    let request = ComposeRequest::new(Product::Poster)
        .with_photo(keepsake::Asset::new(encoded.into_inner()))
        .with_qr(QrInput::Payload("https://example.com/m/1".into()))
        .with_qr_tint(QrTint::FromPhoto);
    let compositor = Compositor::new(ComposeConfig::default()).expect("valid");
    let doc = compositor.layout(&request).expect("lays out");

    let qr_id = doc
        .page(0)
        .unwrap()
        .contents
        .iter()
        .filter_map(|c| match c {
            PageContents::Image(image) => Some(image.image_id),
            _ => None,
        })
        .last()
        .expect("qr placed");
    let qr = doc.images[qr_id].pixels().to_rgba8();
    let dark: Vec<_> = qr.pixels().filter(|p| p.0 != [255, 255, 255, 255]).collect();
    assert!(!dark.is_empty());
    for p in dark {
        let [r, g, b, _] = p.0;
        assert!(g > r && g > b, "module {:?} should be green", p.0);
    }
}
