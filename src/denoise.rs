use crate::color::Color3;

const KERNEL: i32 = 5;
const SUPPORT: i32 = 13;
const HALF_KERNEL: i32 = KERNEL / 2;
const HALF_SUPPORT: i32 = SUPPORT / 2;
const PATCH_LEN: usize = (KERNEL * KERNEL) as usize;

type Patch = [Color3; PATCH_LEN];

fn clamp_coord(v: i32, size: i32) -> i32 {
    v.max(0).min(size - 1)
}

fn pixel_at(src: &[Color3], width: i32, height: i32, x: i32, y: i32) -> Color3 {
    let x = clamp_coord(x, width);
    let y = clamp_coord(y, height);
    src[(y * width + x) as usize]
}

fn patch_at(src: &[Color3], width: i32, height: i32, x: i32, y: i32) -> Patch {
    let mut patch = [Color3::BLACK; PATCH_LEN];
    let mut i = 0;
    for sx in (x - HALF_KERNEL)..=(x + HALF_KERNEL) {
        for sy in (y - HALF_KERNEL)..=(y + HALF_KERNEL) {
            patch[i] = pixel_at(src, width, height, sx, sy);
            i += 1;
        }
    }
    patch
}

fn patch_distance_sq(a: &Patch, b: &Patch) -> f32 {
    a.iter().zip(b.iter()).map(|(p, q)| (*p - *q).to_vector3().length_sq()).sum()
}

/// Non-Local-Means denoising, ported with its exact constants (5x5 patches
/// compared over a 13x13 search window) from the reference filter this
/// design is based on. `coeff` controls both the filter strength `h` and the
/// noise estimate `sigma`, floored at `0.0001` to avoid a division by zero
/// when a caller passes `0.0`.
pub fn filter_nlm(width: usize, height: usize, coeff: f32, src: &[Color3]) -> Vec<Color3> {
    assert_eq!(src.len(), width * height);
    let w = width as i32;
    let h = height as i32;

    let param_h = coeff.max(0.0001);
    let sigma = coeff.max(0.0001);
    let inv_h_sq = 1.0 / (param_h * param_h);
    let sigma_sq = sigma * sigma;

    let mut dst = vec![Color3::BLACK; src.len()];

    for y in 0..h {
        for x in 0..w {
            let focus = patch_at(src, w, h, x, y);

            let mut sum = Color3::BLACK;
            let mut sum_weight = 0.0_f32;
            for sx in (x - HALF_SUPPORT)..=(x + HALF_SUPPORT) {
                for sy in (y - HALF_SUPPORT)..=(y + HALF_SUPPORT) {
                    let target = patch_at(src, w, h, sx, sy);
                    let dist = patch_distance_sq(&focus, &target);
                    let arg = -(dist - 2.0 * sigma_sq).max(0.0) * inv_h_sq;
                    let weight = arg.exp();

                    sum_weight += weight;
                    sum += pixel_at(src, w, h, sx, sy) * weight;
                }
            }

            dst[(y * w + x) as usize] = sum / sum_weight;
        }
    }

    dst
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_image_is_unchanged_by_filtering() {
        let src = vec![Color3::new(0.3, 0.3, 0.3); 16];
        let out = filter_nlm(4, 4, 0.1, &src);
        for c in out {
            assert!((c.r - 0.3).abs() < 1e-4);
        }
    }

    #[test]
    fn output_has_no_nans() {
        let mut src = vec![Color3::BLACK; 25];
        src[12] = Color3::WHITE;
        let out = filter_nlm(5, 5, 0.05, &src);
        for c in out {
            assert!(c.is_finite());
        }
    }
}
