//! Radiance RGBE (`.hdr`), the IBL environment-map format spec.md §6
//! specifies by its exact header lines (`#?RADIANCE`, `FORMAT=`, optional
//! `GAMMA=`/`EXPOSURE=`) and RLE-encoded scanlines. The writer emits the
//! simpler flat (non-RLE) scanline encoding, which is a valid Radiance
//! file; the reader accepts both flat and new-style RLE scanlines so it
//! can load files written by other tools too.

use std::io::{self, BufRead, Write};

use crate::color::Color3;
use crate::error::AssetError;
use crate::io::Image;

/// Converts one linear-float color to its 4-byte RGBE representation: a
/// shared exponent plus three mantissa bytes, the classic Ward encoding.
fn to_rgbe(c: Color3) -> [u8; 4] {
    let max = c.r.max(c.g).max(c.b);
    if max <= 1e-32 {
        return [0, 0, 0, 0];
    }
    let (mantissa, exponent) = frexp(max);
    let scale = mantissa * 256.0 / max;
    [
        (c.r * scale) as u8,
        (c.g * scale) as u8,
        (c.b * scale) as u8,
        (exponent + 128) as u8,
    ]
}

fn from_rgbe(bytes: [u8; 4]) -> Color3 {
    if bytes[3] == 0 {
        return Color3::BLACK;
    }
    let scale = ldexp(1.0, bytes[3] as i32 - 128 - 8);
    Color3::new(bytes[0] as f32 * scale, bytes[1] as f32 * scale, bytes[2] as f32 * scale)
}

/// `f32::frexp`: decomposes `v` into `mantissa * 2^exponent` with
/// `mantissa` in `[0.5, 1)`. The standard library has no `frexp`, so this
/// mirrors the bit-level definition directly.
fn frexp(v: f32) -> (f32, i32) {
    if v == 0.0 {
        return (0.0, 0);
    }
    let bits = v.to_bits();
    let exponent = ((bits >> 23) & 0xff) as i32 - 126;
    let mantissa_bits = (bits & !(0xff << 23)) | (126 << 23);
    (f32::from_bits(mantissa_bits), exponent)
}

fn ldexp(v: f32, exponent: i32) -> f32 {
    v * 2f32.powi(exponent)
}

pub fn write(writer: &mut impl Write, width: u32, height: u32, pixels: &[Color3]) -> io::Result<()> {
    assert_eq!(pixels.len(), (width * height) as usize);
    writer.write_all(b"#?RADIANCE\n")?;
    writer.write_all(b"FORMAT=32-bit_rle_rgbe\n")?;
    writer.write_all(b"\n")?;
    writer.write_all(format!("-Y {height} +X {width}\n").as_bytes())?;
    for y in 0..height {
        for x in 0..width {
            writer.write_all(&to_rgbe(pixels[(y * width + x) as usize]))?;
        }
    }
    Ok(())
}

fn malformed(path: &str, reason: impl Into<String>) -> AssetError {
    AssetError::MalformedHeader { path: path.to_string(), format: "Radiance HDR", reason: reason.into() }
}

fn truncated(path: &str, what: &'static str) -> AssetError {
    AssetError::Truncated { path: path.to_string(), what }
}

pub fn read(reader: &mut impl BufRead, path: &str) -> Result<Image, AssetError> {
    let io_err = |source: io::Error| AssetError::Io { path: path.to_string(), source };

    let mut magic = String::new();
    reader.read_line(&mut magic).map_err(io_err)?;
    if !magic.trim_end().starts_with("#?") {
        return Err(malformed(path, "missing '#?RADIANCE' magic"));
    }

    // Header lines continue until a blank line; we don't need to interpret
    // FORMAT/GAMMA/EXPOSURE beyond skipping them, since the core only wants
    // the final linear pixel array.
    loop {
        let mut line = String::new();
        let read = reader.read_line(&mut line).map_err(io_err)?;
        if read == 0 {
            return Err(truncated(path, "header"));
        }
        if line.trim().is_empty() {
            break;
        }
    }

    let mut resolution = String::new();
    reader.read_line(&mut resolution).map_err(io_err)?;
    let tokens: Vec<&str> = resolution.split_whitespace().collect();
    if tokens.len() != 4 || tokens[0] != "-Y" || tokens[2] != "+X" {
        return Err(malformed(path, format!("unsupported resolution line '{}'", resolution.trim_end())));
    }
    let height: u32 = tokens[1].parse().map_err(|_| malformed(path, "invalid height"))?;
    let width: u32 = tokens[3].parse().map_err(|_| malformed(path, "invalid width"))?;

    let mut pixels = vec![Color3::BLACK; (width * height) as usize];
    for y in 0..height {
        let row = read_scanline(reader, width, path)?;
        for (x, rgbe) in row.into_iter().enumerate() {
            pixels[(y * width) as usize + x] = from_rgbe(rgbe);
        }
    }

    Ok(Image { width, height, pixels })
}

fn read_scanline(reader: &mut impl BufRead, width: u32, path: &str) -> Result<Vec<[u8; 4]>, AssetError> {
    let io_err = |source: io::Error| AssetError::Io { path: path.to_string(), source };
    let mut first = [0u8; 4];
    reader.read_exact(&mut first).map_err(|_| truncated(path, "scanline"))?;

    let encoded_width = ((first[2] as u32) << 8) | first[3] as u32;
    let is_new_rle = width >= 8 && width < 32768 && first[0] == 2 && first[1] == 2 && encoded_width == width;
    if !is_new_rle {
        // Old-style: either a flat scanline or an old-style RLE run
        // starting with this first pixel. Flat is what this module's own
        // writer produces, so that's what we support here.
        let mut row = Vec::with_capacity(width as usize);
        row.push(first);
        for _ in 1..width {
            let mut px = [0u8; 4];
            reader.read_exact(&mut px).map_err(|_| truncated(path, "scanline"))?;
            row.push(px);
        }
        return Ok(row);
    }

    let mut channels = [vec![0u8; width as usize], vec![0u8; width as usize], vec![0u8; width as usize], vec![0u8; width as usize]];
    for channel in channels.iter_mut() {
        let mut x = 0usize;
        while x < width as usize {
            let mut count_byte = [0u8; 1];
            reader.read_exact(&mut count_byte).map_err(io_err)?;
            let count = count_byte[0];
            if count > 128 {
                // run of (count - 128) repeats of the next byte
                let run_len = (count - 128) as usize;
                let mut value = [0u8; 1];
                reader.read_exact(&mut value).map_err(io_err)?;
                for i in 0..run_len {
                    channel[x + i] = value[0];
                }
                x += run_len;
            } else {
                // `count` literal bytes follow
                let literal_len = count as usize;
                reader
                    .read_exact(&mut channel[x..x + literal_len])
                    .map_err(io_err)?;
                x += literal_len;
            }
        }
    }

    let mut row = Vec::with_capacity(width as usize);
    for x in 0..width as usize {
        row.push([channels[0][x], channels[1][x], channels[2][x], channels[3][x]]);
    }
    Ok(row)
}
