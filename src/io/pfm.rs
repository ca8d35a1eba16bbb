//! Netpbm PFM: the linear HDR output format spec.md §6 names alongside
//! Radiance HDR. A simple header of three ASCII lines followed by raw
//! little-endian `f32` triples, scanned bottom-to-top per the format's own
//! convention — the only one of this module's formats that stores linear
//! radiance directly with no byte-depth quantization, which is why it's
//! the preferred final-output format (`denoise.rs`/`tonemap.rs` read back
//! exactly what they wrote).

use std::io::{self, BufRead, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::color::Color3;
use crate::error::AssetError;
use crate::io::Image;

pub fn write(writer: &mut impl Write, width: u32, height: u32, pixels: &[Color3]) -> io::Result<()> {
    assert_eq!(pixels.len(), (width * height) as usize);
    writer.write_all(b"PF\n")?;
    writer.write_all(format!("{width} {height}\n").as_bytes())?;
    // Negative scale selects little-endian per the PFM convention.
    writer.write_all(b"-1.0\n")?;
    for y in (0..height).rev() {
        for x in 0..width {
            let c = pixels[(y * width + x) as usize];
            writer.write_f32::<LittleEndian>(c.r)?;
            writer.write_f32::<LittleEndian>(c.g)?;
            writer.write_f32::<LittleEndian>(c.b)?;
        }
    }
    Ok(())
}

fn read_header_line(reader: &mut impl BufRead, path: &str, what: &'static str) -> Result<String, AssetError> {
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .map_err(|source| AssetError::Io { path: path.to_string(), source })?;
    if line.is_empty() {
        return Err(AssetError::Truncated { path: path.to_string(), what });
    }
    Ok(line.trim().to_string())
}

pub fn read(reader: &mut impl BufRead, path: &str) -> Result<Image, AssetError> {
    let magic = read_header_line(reader, path, "magic")?;
    let channels = match magic.as_str() {
        "PF" => 3,
        "Pf" => 1,
        _ => {
            return Err(AssetError::MalformedHeader {
                path: path.to_string(),
                format: "PFM",
                reason: format!("expected 'PF' or 'Pf', got '{magic}'"),
            })
        }
    };

    let dims = read_header_line(reader, path, "dimensions")?;
    let mut parts = dims.split_whitespace();
    let parse_dim = |value: Option<&str>| -> Result<u32, AssetError> {
        value
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| AssetError::MalformedHeader {
                path: path.to_string(),
                format: "PFM",
                reason: format!("invalid dimensions line '{dims}'"),
            })
    };
    let width = parse_dim(parts.next())?;
    let height = parse_dim(parts.next())?;

    let scale_line = read_header_line(reader, path, "scale")?;
    let scale: f32 = scale_line.parse().map_err(|_| AssetError::MalformedHeader {
        path: path.to_string(),
        format: "PFM",
        reason: format!("invalid scale line '{scale_line}'"),
    })?;
    let little_endian = scale < 0.0;

    let mut pixels = vec![Color3::BLACK; (width * height) as usize];
    let mut read_sample = |reader: &mut dyn Read| -> Result<f32, AssetError> {
        let raw = if little_endian {
            reader.read_f32::<LittleEndian>()
        } else {
            reader.read_f32::<byteorder::BigEndian>()
        };
        raw.map_err(|_| AssetError::Truncated { path: path.to_string(), what: "pixel data" })
    };

    // PFM scanlines run bottom-to-top.
    for row in (0..height).rev() {
        for x in 0..width {
            let (r, g, b) = if channels == 3 {
                (read_sample(reader)?, read_sample(reader)?, read_sample(reader)?)
            } else {
                let v = read_sample(reader)?;
                (v, v, v)
            };
            pixels[(row * width + x) as usize] = Color3::new(r, g, b);
        }
    }

    Ok(Image { width, height, pixels })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn round_trips_linear_radiance_exactly() {
        let width = 3;
        let height = 2;
        let pixels = vec![
            Color3::new(0.1, 2.5, 10.0),
            Color3::new(0.0, 0.0, 0.0),
            Color3::new(1.0, 1.0, 1.0),
            Color3::new(3.3, 0.2, 7.0),
            Color3::new(0.5, 0.5, 0.5),
            Color3::new(100.0, 0.01, 0.001),
        ];
        let mut buf = Vec::new();
        write(&mut buf, width, height, &pixels).unwrap();

        let image = read(&mut Cursor::new(buf), "test.pfm").unwrap();
        assert_eq!(image.width, width);
        assert_eq!(image.height, height);
        for (a, b) in pixels.iter().zip(image.pixels.iter()) {
            assert_eq!(a, b);
        }
    }

    #[test]
    fn rejects_an_unknown_magic() {
        let mut cursor = Cursor::new(b"XX\n1 1\n-1.0\n".to_vec());
        let err = read(&mut cursor, "bad.pfm").unwrap_err();
        assert!(matches!(err, AssetError::MalformedHeader { .. }));
    }
}
