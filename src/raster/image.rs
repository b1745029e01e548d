//! Floating-point RGBA images and texture-style sampling.

use glam::Vec2;

/// Bilinear lookup with clamp-to-edge addressing.
///
/// Texel `(i, j)` is centered at `uv = ((i + 0.5) / width, (j + 0.5) /
/// height)`, the same convention GPU samplers use, so results agree with a
/// `Linear` + `ClampToEdge` sampler up to storage precision.
pub fn bilinear<const N: usize>(
    texels: &[[f32; N]],
    width: usize,
    height: usize,
    uv: Vec2,
) -> [f32; N] {
    let x = uv.x * width as f32 - 0.5;
    let y = uv.y * height as f32 - 0.5;
    let (x0, fx) = (x.floor(), x - x.floor());
    let (y0, fy) = (y.floor(), y - y.floor());

    let clamp_x = |v: f32| (v.max(0.0) as usize).min(width - 1);
    let clamp_y = |v: f32| (v.max(0.0) as usize).min(height - 1);
    let (xa, xb) = (clamp_x(x0), clamp_x(x0 + 1.0));
    let (ya, yb) = (clamp_y(y0), clamp_y(y0 + 1.0));

    let at = |x: usize, y: usize| &texels[y * width + x];
    let mut out = [0.0; N];
    for (c, value) in out.iter_mut().enumerate() {
        let top = at(xa, ya)[c] * (1.0 - fx) + at(xb, ya)[c] * fx;
        let bottom = at(xa, yb)[c] * (1.0 - fx) + at(xb, yb)[c] * fx;
        *value = top * (1.0 - fy) + bottom * fy;
    }
    out
}

/// Row-major RGBA image, top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: usize,
    height: usize,
    texels: Vec<[f32; 4]>,
}

impl Image {
    /// Transparent black image. Zero dimensions are raised to one.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, [0.0; 4])
    }

    /// Image with every texel set to `texel`.
    pub fn filled(width: u32, height: u32, texel: [f32; 4]) -> Self {
        let width = width.max(1) as usize;
        let height = height.max(1) as usize;
        Self {
            width,
            height,
            texels: vec![texel; width * height],
        }
    }

    /// Width in texels.
    pub fn width(&self) -> u32 {
        self.width as u32
    }

    /// Height in texels.
    pub fn height(&self) -> u32 {
        self.height as u32
    }

    /// Size as a float vector, as passes receive it.
    pub fn resolution(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Texture coordinate of the center of texel `(x, y)`.
    pub fn uv(&self, x: u32, y: u32) -> Vec2 {
        Vec2::new(
            (x as f32 + 0.5) / self.width as f32,
            (y as f32 + 0.5) / self.height as f32,
        )
    }

    /// Texel at `(x, y)`.
    pub fn get(&self, x: u32, y: u32) -> [f32; 4] {
        self.texels[y as usize * self.width + x as usize]
    }

    /// Alpha channel at `(x, y)`.
    pub fn alpha(&self, x: u32, y: u32) -> f32 {
        self.get(x, y)[3]
    }

    /// Overwrite texel `(x, y)`.
    pub fn set(&mut self, x: u32, y: u32, texel: [f32; 4]) {
        self.texels[y as usize * self.width + x as usize] = texel;
    }

    /// All texels, row-major.
    pub fn texels(&self) -> &[[f32; 4]] {
        &self.texels
    }

    /// Bilinear, clamp-to-edge lookup.
    pub fn sample(&self, uv: Vec2) -> [f32; 4] {
        bilinear(&self.texels, self.width, self.height, uv)
    }

    /// Bilinear alpha lookup.
    pub fn sample_alpha(&self, uv: Vec2) -> f32 {
        self.sample(uv)[3]
    }

    /// Sum of the alpha channel over every texel.
    pub fn alpha_sum(&self) -> f32 {
        self.texels.iter().map(|t| t[3]).sum()
    }

    /// Evaluate `shade` at every texel center and store the result.
    pub fn fill_with(&mut self, mut shade: impl FnMut(Vec2) -> [f32; 4]) {
        let (w, h) = (self.width as f32, self.height as f32);
        for (i, texel) in self.texels.iter_mut().enumerate() {
            let x = (i % self.width) as f32;
            let y = (i / self.width) as f32;
            *texel = shade(Vec2::new((x + 0.5) / w, (y + 0.5) / h));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> Image {
        let mut image = Image::new(4, 2);
        for y in 0..2 {
            for x in 0..4 {
                image.set(x, y, [0.0, 0.0, 0.0, (y * 4 + x) as f32]);
            }
        }
        image
    }

    #[test]
    fn texel_centers_sample_exactly() {
        let image = ramp();
        for y in 0..2 {
            for x in 0..4 {
                assert_eq!(image.sample_alpha(image.uv(x, y)), image.alpha(x, y));
            }
        }
    }

    #[test]
    fn midpoint_between_texels_averages() {
        let image = ramp();
        // halfway between (1, 0) and (2, 0)
        let uv = Vec2::new(2.0 / 4.0, 0.5 / 2.0);
        assert!((image.sample_alpha(uv) - 1.5).abs() < 1e-6);
    }

    #[test]
    fn out_of_range_clamps_to_edge() {
        let image = ramp();
        assert_eq!(image.sample_alpha(Vec2::new(-3.0, -3.0)), 0.0);
        assert_eq!(image.sample_alpha(Vec2::new(5.0, 5.0)), 7.0);
        assert_eq!(image.sample_alpha(Vec2::new(0.0, 0.0)), 0.0);
    }

    #[test]
    fn fill_with_visits_texel_centers() {
        let mut image = Image::new(2, 2);
        image.fill_with(|uv| [uv.x, uv.y, 0.0, 1.0]);
        assert_eq!(image.get(1, 0), [0.75, 0.25, 0.0, 1.0]);
        assert_eq!(image.alpha_sum(), 4.0);
    }

    #[test]
    fn zero_size_is_raised_to_one() {
        let image = Image::new(0, 0);
        assert_eq!((image.width(), image.height()), (1, 1));
    }
}
