//! Record portraits: base64 payload in, kitty graphics escape sequences out.

use std::io::Cursor;

use base64::{engine::general_purpose, Engine as _};
use image::{codecs::gif::GifDecoder, AnimationDecoder, GenericImageView};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Terminal cells are roughly twice as tall as they are wide.
pub const CELL_ASPECT: f32 = 2.0;

const KITTY_CHUNK: usize = 4096;
const FORMAT_RGBA: u32 = 32;
const FORMAT_PNG: u32 = 100;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SpriteFrame {
    pub payload: String,
    pub width: u32,
    pub height: u32,
    pub format: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SpriteData {
    pub frames: Vec<SpriteFrame>,
    pub width: u32,
    pub height: u32,
}

impl SpriteData {
    pub fn frame(&self, index: usize) -> Option<&SpriteFrame> {
        if self.frames.is_empty() {
            return None;
        }
        self.frames.get(index % self.frames.len())
    }

    /// Largest (cols, rows) that keeps the image aspect inside the box.
    pub fn fit(&self, max_cols: u16, max_rows: u16) -> (u16, u16) {
        if max_cols == 0 || max_rows == 0 || self.height == 0 {
            return (max_cols, max_rows);
        }
        let ratio = self.width as f32 / self.height as f32;
        let cols_for_rows = ratio * max_rows as f32 * CELL_ASPECT;
        if cols_for_rows <= max_cols as f32 {
            let cols = cols_for_rows.max(1.0).round() as u16;
            return (cols.max(1), max_rows.max(1));
        }
        let rows_for_cols = max_cols as f32 / (ratio * CELL_ASPECT);
        let rows = rows_for_cols.max(1.0).round() as u16;
        (max_cols.max(1), rows.min(max_rows).max(1))
    }
}

/// Decode the transport form of an image: plain base64 or a `data:` URL.
pub fn decode_base64_image(encoded: &str) -> Result<SpriteData, String> {
    let trimmed = encoded.trim();
    let body = match trimmed.split_once(";base64,") {
        Some((prefix, body)) if prefix.starts_with("data:") => body,
        _ => trimmed,
    };
    if body.is_empty() {
        return Err("empty image payload".to_string());
    }
    let bytes = general_purpose::STANDARD
        .decode(body)
        .map_err(|err| format!("invalid base64: {err}"))?;
    decode_sprite(&bytes)
}

pub fn decode_sprite(bytes: &[u8]) -> Result<SpriteData, String> {
    if is_gif(bytes) {
        let decoder = GifDecoder::new(Cursor::new(bytes)).map_err(|err| err.to_string())?;
        let frames = decoder
            .into_frames()
            .collect_frames()
            .map_err(|err| err.to_string())?;
        let sprite_frames: Vec<SpriteFrame> = frames
            .into_iter()
            .map(|frame| {
                let buffer = frame.into_buffer();
                let (width, height) = buffer.dimensions();
                SpriteFrame {
                    payload: general_purpose::STANDARD.encode(buffer.as_raw()),
                    width,
                    height,
                    format: FORMAT_RGBA,
                }
            })
            .collect();
        if let Some(first) = sprite_frames.first() {
            let (width, height) = (first.width, first.height);
            return Ok(SpriteData {
                frames: sprite_frames,
                width,
                height,
            });
        }
    }

    let image = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
    let (width, height) = image.dimensions();
    // Kitty only takes PNG or raw pixels; re-encode anything else.
    let png = if image::guess_format(bytes).ok() == Some(image::ImageFormat::Png) {
        bytes.to_vec()
    } else {
        let mut buf = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .map_err(|err| err.to_string())?;
        buf
    };
    Ok(SpriteData {
        frames: vec![SpriteFrame {
            payload: general_purpose::STANDARD.encode(&png),
            width,
            height,
            format: FORMAT_PNG,
        }],
        width,
        height,
    })
}

pub fn kitty_sequence(
    frame: &SpriteFrame,
    cols: u16,
    rows: u16,
    id: u32,
) -> Result<String, String> {
    let mut sequences = String::new();
    let payload = frame.payload.as_bytes();
    let total_chunks = payload.len().div_ceil(KITTY_CHUNK);

    for (index, chunk) in payload.chunks(KITTY_CHUNK).enumerate() {
        let more = u8::from(index + 1 < total_chunks);
        let chunk_str = std::str::from_utf8(chunk).map_err(|err| err.to_string())?;
        if index == 0 {
            let mut params = format!(
                "f={},s={},v={},a=T,t=d,i={}",
                frame.format, frame.width, frame.height, id
            );
            if cols > 0 {
                params.push_str(&format!(",c={cols}"));
            }
            if rows > 0 {
                params.push_str(&format!(",r={rows}"));
            }
            params.push_str(&format!(",m={more}"));
            sequences.push_str(&format!("\x1b_G{params};{chunk_str}\x1b\\"));
        } else {
            sequences.push_str(&format!("\x1b_Gm={more};{chunk_str}\x1b\\"));
        }
    }
    Ok(sequences)
}

fn is_gif(bytes: &[u8]) -> bool {
    bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_png() -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(4, 2, image::Rgba([255, 0, 0, 255]));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn decodes_plain_base64_png() {
        let encoded = general_purpose::STANDARD.encode(tiny_png());
        let sprite = decode_base64_image(&encoded).unwrap();
        assert_eq!((sprite.width, sprite.height), (4, 2));
        assert_eq!(sprite.frames.len(), 1);
        assert_eq!(sprite.frames[0].format, FORMAT_PNG);
    }

    #[test]
    fn strips_data_url_prefix() {
        let encoded = format!(
            "data:image/png;base64,{}",
            general_purpose::STANDARD.encode(tiny_png())
        );
        assert!(decode_base64_image(&encoded).is_ok());
    }

    #[test]
    fn rejects_garbage() {
        assert!(decode_base64_image("").is_err());
        assert!(decode_base64_image("not base64 at all!").is_err());
        let not_an_image = general_purpose::STANDARD.encode(b"hello");
        assert!(decode_base64_image(&not_an_image).is_err());
    }

    #[test]
    fn fit_keeps_aspect_inside_box() {
        let sprite = SpriteData {
            frames: Vec::new(),
            width: 96,
            height: 96,
        };
        let (cols, rows) = sprite.fit(40, 10);
        assert_eq!((cols, rows), (20, 10));
        let (cols, rows) = sprite.fit(10, 10);
        assert_eq!((cols, rows), (10, 5));
    }

    #[test]
    fn kitty_sequence_chunks_payload() {
        let frame = SpriteFrame {
            payload: "A".repeat(KITTY_CHUNK + 10),
            width: 1,
            height: 1,
            format: FORMAT_PNG,
        };
        let seq = kitty_sequence(&frame, 4, 2, 7).unwrap();
        assert!(seq.starts_with("\x1b_Gf=100,s=1,v=1,a=T,t=d,i=7,c=4,r=2,m=1;"));
        assert!(seq.contains("\x1b_Gm=0;"));
    }
}
