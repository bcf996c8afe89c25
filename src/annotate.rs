use ab_glyph::{FontRef, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use std::sync::OnceLock;

use crate::types::Detection;
use crate::utils::class_label;

const PALETTE: [[u8; 3]; 10] = [
    [255, 56, 56],
    [255, 157, 151],
    [255, 112, 31],
    [255, 178, 29],
    [207, 210, 49],
    [72, 249, 10],
    [26, 147, 52],
    [0, 212, 187],
    [0, 194, 255],
    [52, 69, 147],
];

const LINE_WIDTH: i32 = 2;
const FONT_SIZE: f32 = 16.0;
const TEXT_PADDING: u32 = 2;
const TEXT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

static FONT_DATA: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");
static FONT: OnceLock<Option<FontRef<'static>>> = OnceLock::new();

fn label_font() -> Option<&'static FontRef<'static>> {
    FONT.get_or_init(|| match FontRef::try_from_slice(FONT_DATA) {
        Ok(font) => Some(font),
        Err(e) => {
            log::warn!("Failed to load label font, drawing boxes only: {}", e);
            None
        }
    })
    .as_ref()
}

pub fn class_color(class_id: u32) -> Rgb<u8> {
    Rgb(PALETTE[class_id as usize % PALETTE.len()])
}

/// Caption drawn above a box: class name (or id) and confidence
pub fn detection_caption(names: &[String], det: &Detection) -> String {
    format!("{} {:.2}", class_label(names, det.class_id), det.confidence)
}

/// Draw every detection as a hollow box with a `name conf` caption,
/// clamped to the image bounds.
///
/// The caption sits above the box, or just inside its top edge when the
/// box touches the top of the image.
pub fn draw_detections(image: &mut RgbImage, detections: &[Detection], names: &[String]) {
    let (img_w, img_h) = image.dimensions();

    for det in detections {
        let bbox = &det.bbox;
        let x1 = bbox.x1.min(bbox.x2).clamp(0.0, img_w as f64) as i32;
        let y1 = bbox.y1.min(bbox.y2).clamp(0.0, img_h as f64) as i32;
        let x2 = bbox.x1.max(bbox.x2).clamp(0.0, img_w as f64) as i32;
        let y2 = bbox.y1.max(bbox.y2).clamp(0.0, img_h as f64) as i32;

        let color = class_color(det.class_id);
        for inset in 0..LINE_WIDTH {
            let width = x2 - x1 - 2 * inset;
            let height = y2 - y1 - 2 * inset;
            if width <= 0 || height <= 0 {
                break;
            }
            let rect = Rect::at(x1 + inset, y1 + inset).of_size(width as u32, height as u32);
            draw_hollow_rect_mut(image, rect, color);
        }

        if x2 <= x1 || y2 <= y1 {
            continue;
        }
        if let Some(font) = label_font() {
            draw_caption(image, font, &detection_caption(names, det), x1, y1, color);
        }
    }
}

fn draw_caption(
    image: &mut RgbImage,
    font: &FontRef<'static>,
    text: &str,
    x: i32,
    box_top: i32,
    background: Rgb<u8>,
) {
    let scale = PxScale::from(FONT_SIZE);
    let (text_w, text_h) = text_size(scale, font, text);
    let label_h = text_h + 2 * TEXT_PADDING;

    let label_y = if box_top as u32 >= label_h {
        box_top - label_h as i32
    } else {
        box_top
    };

    draw_filled_rect_mut(
        image,
        Rect::at(x, label_y).of_size(text_w + 2 * TEXT_PADDING, label_h),
        background,
    );
    draw_text_mut(
        image,
        TEXT_COLOR,
        x + TEXT_PADDING as i32,
        label_y + TEXT_PADDING as i32,
        scale,
        font,
        text,
    );
}
