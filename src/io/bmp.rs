//! Uncompressed 24-bit BMP, used for the intermediate per-pass snapshots
//! and the final tone-mapped output (spec.md §6). Grounded on the field
//! layout `s3d_bmp.h`'s `SaveToBMP`/`LoadFromBMP` declare (file header +
//! info header + bottom-up BGR rows), the original's only documented
//! detail since its `.cpp` body is not in this retrieval pack.

use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::color::Color3;
use crate::error::AssetError;
use crate::io::Image;

const FILE_HEADER_SIZE: u32 = 14;
const INFO_HEADER_SIZE: u32 = 40;

fn row_stride(width: u32) -> usize {
    (((width * 3) + 3) & !3) as usize
}

/// Writes `pixels` (already tone-mapped to `[0, 1]`, row-major top-to-bottom)
/// as an uncompressed 24-bit BMP.
pub fn write(writer: &mut impl Write, width: u32, height: u32, pixels: &[Color3]) -> io::Result<()> {
    assert_eq!(pixels.len(), (width * height) as usize);
    let stride = row_stride(width);
    let data_size = stride * height as usize;
    let file_size = FILE_HEADER_SIZE + INFO_HEADER_SIZE + data_size as u32;

    writer.write_all(b"BM")?;
    writer.write_u32::<LittleEndian>(file_size)?;
    writer.write_u16::<LittleEndian>(0)?;
    writer.write_u16::<LittleEndian>(0)?;
    writer.write_u32::<LittleEndian>(FILE_HEADER_SIZE + INFO_HEADER_SIZE)?;

    writer.write_u32::<LittleEndian>(INFO_HEADER_SIZE)?;
    writer.write_i32::<LittleEndian>(width as i32)?;
    writer.write_i32::<LittleEndian>(height as i32)?;
    writer.write_u16::<LittleEndian>(1)?;
    writer.write_u16::<LittleEndian>(24)?;
    writer.write_u32::<LittleEndian>(0)?;
    writer.write_u32::<LittleEndian>(data_size as u32)?;
    writer.write_i32::<LittleEndian>(0)?;
    writer.write_i32::<LittleEndian>(0)?;
    writer.write_u32::<LittleEndian>(0)?;
    writer.write_u32::<LittleEndian>(0)?;

    let to_byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8;
    // BMP rows are stored bottom-to-top.
    for y in (0..height).rev() {
        let mut written = 0;
        for x in 0..width {
            let c = pixels[(y * width + x) as usize];
            writer.write_all(&[to_byte(c.b), to_byte(c.g), to_byte(c.r)])?;
            written += 3;
        }
        for _ in written..stride {
            writer.write_all(&[0])?;
        }
    }
    Ok(())
}

/// Reads an uncompressed 24-bit BMP into a linear-float `Image` (`[0, 1]`
/// per channel, row-major top-to-bottom).
pub fn read(reader: &mut impl Read, path: &str) -> Result<Image, AssetError> {
    let io_err = |source: io::Error| AssetError::Io { path: path.to_string(), source };

    let mut magic = [0u8; 2];
    reader.read_exact(&mut magic).map_err(io_err)?;
    if &magic != b"BM" {
        return Err(AssetError::MalformedHeader {
            path: path.to_string(),
            format: "BMP",
            reason: "missing 'BM' magic".to_string(),
        });
    }
    let _file_size = reader.read_u32::<LittleEndian>().map_err(io_err)?;
    reader.read_u16::<LittleEndian>().map_err(io_err)?;
    reader.read_u16::<LittleEndian>().map_err(io_err)?;
    let data_offset = reader.read_u32::<LittleEndian>().map_err(io_err)?;

    let info_size = reader.read_u32::<LittleEndian>().map_err(io_err)?;
    let width = reader.read_i32::<LittleEndian>().map_err(io_err)?;
    let height_raw = reader.read_i32::<LittleEndian>().map_err(io_err)?;
    let _planes = reader.read_u16::<LittleEndian>().map_err(io_err)?;
    let bit_count = reader.read_u16::<LittleEndian>().map_err(io_err)?;
    let compression = reader.read_u32::<LittleEndian>().map_err(io_err)?;
    if bit_count != 24 || compression != 0 {
        return Err(AssetError::MalformedHeader {
            path: path.to_string(),
            format: "BMP",
            reason: format!("only uncompressed 24-bit BMP is supported (got {bit_count}-bit, compression {compression})"),
        });
    }
    // 20 info-header bytes read so far: size, width, height, planes,
    // bit count, compression. Skip whatever's left of the info header,
    // then any further gap before the pixel data starts at `data_offset`.
    let info_header_read = 20u32;
    let remaining_info = info_size.saturating_sub(info_header_read) as u64;
    io::copy(&mut reader.by_ref().take(remaining_info), &mut io::sink()).map_err(io_err)?;
    let consumed = FILE_HEADER_SIZE + info_size;
    let gap = (data_offset as i64 - consumed as i64).max(0) as u64;
    io::copy(&mut reader.by_ref().take(gap), &mut io::sink()).map_err(io_err)?;

    let bottom_up = height_raw > 0;
    let width = width as u32;
    let height = height_raw.unsigned_abs();
    let stride = row_stride(width);

    let mut pixels = vec![Color3::BLACK; (width * height) as usize];
    for row in 0..height {
        let mut buf = vec![0u8; stride];
        reader
            .read_exact(&mut buf)
            .map_err(|_| AssetError::Truncated { path: path.to_string(), what: "pixel data" })?;
        let y = if bottom_up { height - 1 - row } else { row };
        for x in 0..width as usize {
            let b = buf[x * 3] as f32 / 255.0;
            let g = buf[x * 3 + 1] as f32 / 255.0;
            let r = buf[x * 3 + 2] as f32 / 255.0;
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
        let width = 3;
        let height = 2;
        let pixels = vec![
            Color3::new(1.0, 0.0, 0.0),
            Color3::new(0.0, 1.0, 0.0),
            Color3::new(0.0, 0.0, 1.0),
            Color3::new(1.0, 1.0, 1.0),
            Color3::new(0.0, 0.0, 0.0),
            Color3::new(0.5, 0.5, 0.5),
        ];
        let mut buf = Vec::new();
        write(&mut buf, width, height, &pixels).unwrap();

        let image = read(&mut buf.as_slice(), "test.bmp").unwrap();
        assert_eq!(image.width, width);
        assert_eq!(image.height, height);
        for (a, b) in pixels.iter().zip(image.pixels.iter()) {
            assert!((a.r - b.r).abs() < 1.0 / 255.0);
            assert!((a.g - b.g).abs() < 1.0 / 255.0);
            assert!((a.b - b.b).abs() < 1.0 / 255.0);
        }
    }

    #[test]
    fn rejects_a_file_with_the_wrong_magic() {
        let bytes = [0u8; 20];
        let err = read(&mut &bytes[..], "bad.bmp").unwrap_err();
        assert!(matches!(err, AssetError::MalformedHeader { .. }));
    }
}
