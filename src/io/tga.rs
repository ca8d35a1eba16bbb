//! Uncompressed 24-bit truecolor TGA (image type 2), the other tone-mapped
//! output format spec.md §6 names alongside BMP. Simpler than BMP's padded,
//! bottom-up layout: rows are stored top-to-bottom here via the image
//! descriptor's origin bit, with no row padding.

use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::color::Color3;
use crate::error::AssetError;
use crate::io::Image;

const TOP_LEFT_ORIGIN: u8 = 0x20;

pub fn write(writer: &mut impl Write, width: u32, height: u32, pixels: &[Color3]) -> io::Result<()> {
    assert_eq!(pixels.len(), (width * height) as usize);
    writer.write_u8(0)?; // no image ID
    writer.write_u8(0)?; // no color map
    writer.write_u8(2)?; // uncompressed truecolor
    writer.write_u16::<LittleEndian>(0)?; // color map spec (unused)
    writer.write_u8(0)?;
    writer.write_u16::<LittleEndian>(0)?;
    writer.write_u16::<LittleEndian>(0)?;
    writer.write_u16::<LittleEndian>(0)?; // x origin
    writer.write_u16::<LittleEndian>(0)?; // y origin
    writer.write_u16::<LittleEndian>(width as u16)?;
    writer.write_u16::<LittleEndian>(height as u16)?;
    writer.write_u8(24)?;
    writer.write_u8(TOP_LEFT_ORIGIN)?;

    let to_byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8;
    for pixel in pixels {
        writer.write_all(&[to_byte(pixel.b), to_byte(pixel.g), to_byte(pixel.r)])?;
    }
    Ok(())
}

pub fn read(reader: &mut impl Read, path: &str) -> Result<Image, AssetError> {
    let io_err = |source: io::Error| AssetError::Io { path: path.to_string(), source };

    let id_length = reader.read_u8().map_err(io_err)?;
    let color_map_type = reader.read_u8().map_err(io_err)?;
    let image_type = reader.read_u8().map_err(io_err)?;
    if color_map_type != 0 || image_type != 2 {
        return Err(AssetError::MalformedHeader {
            path: path.to_string(),
            format: "TGA",
            reason: "only uncompressed truecolor (type 2, no color map) is supported".to_string(),
        });
    }
    let mut color_map_spec = [0u8; 5];
    reader.read_exact(&mut color_map_spec).map_err(io_err)?;
    let _x_origin = reader.read_u16::<LittleEndian>().map_err(io_err)?;
    let _y_origin = reader.read_u16::<LittleEndian>().map_err(io_err)?;
    let width = reader.read_u16::<LittleEndian>().map_err(io_err)? as u32;
    let height = reader.read_u16::<LittleEndian>().map_err(io_err)? as u32;
    let bits_per_pixel = reader.read_u8().map_err(io_err)?;
    let descriptor = reader.read_u8().map_err(io_err)?;
    if bits_per_pixel != 24 && bits_per_pixel != 32 {
        return Err(AssetError::MalformedHeader {
            path: path.to_string(),
            format: "TGA",
            reason: format!("only 24 or 32 bits per pixel is supported (got {bits_per_pixel})"),
        });
    }
    let bytes_per_pixel = (bits_per_pixel / 8) as usize;

    if id_length > 0 {
        let mut skip = vec![0u8; id_length as usize];
        reader.read_exact(&mut skip).map_err(io_err)?;
    }

    let top_down = descriptor & TOP_LEFT_ORIGIN != 0;
    let mut pixels = vec![Color3::BLACK; (width * height) as usize];
    let mut row_buf = vec![0u8; width as usize * bytes_per_pixel];
    for row in 0..height {
        reader
            .read_exact(&mut row_buf)
            .map_err(|_| AssetError::Truncated { path: path.to_string(), what: "pixel data" })?;
        let y = if top_down { row } else { height - 1 - row };
        for x in 0..width as usize {
            let base = x * bytes_per_pixel;
            let b = row_buf[base] as f32 / 255.0;
            let g = row_buf[base + 1] as f32 / 255.0;
            let r = row_buf[base + 2] as f32 / 255.0;
            pixels[(y * width) as usize + x] = Color3::new(r, g, b);
        }
    }

    Ok(Image { width, height, pixels })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_small_image() {
        let width = 4;
        let height = 3;
        let pixels: Vec<Color3> = (0..width * height)
            .map(|i| Color3::new((i % 3) as f32 / 2.0, (i % 5) as f32 / 4.0, (i % 2) as f32))
            .collect();
        let mut buf = Vec::new();
        write(&mut buf, width, height, &pixels).unwrap();

        let image = read(&mut buf.as_slice(), "test.tga").unwrap();
        assert_eq!(image.width, width);
        assert_eq!(image.height, height);
        for (a, b) in pixels.iter().zip(image.pixels.iter()) {
            assert!((a.r - b.r).abs() < 1.0 / 255.0 + 1e-6);
            assert!((a.g - b.g).abs() < 1.0 / 255.0 + 1e-6);
            assert!((a.b - b.b).abs() < 1.0 / 255.0 + 1e-6);
        }
    }

    #[test]
    fn rejects_a_color_mapped_image() {
        let mut header = vec![0u8; 18];
        header[1] = 1; // color map type
        header[2] = 1; // color-mapped image
        let err = read(&mut header.as_slice(), "bad.tga").unwrap_err();
        assert!(matches!(err, AssetError::MalformedHeader { .. }));
    }
}
