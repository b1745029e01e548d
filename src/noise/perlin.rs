//! Improved (2002) Perlin gradient noise in three dimensions.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// A seeded 3-D gradient noise function.
///
/// Output lies roughly in `[-1, 1]` and is exactly zero on integer lattice
/// points.
#[derive(Clone)]
pub struct Perlin {
    perm: [u8; 512],
}

impl Perlin {
    /// Build the permutation table from `seed`.
    pub fn new(seed: u64) -> Self {
        let mut table: Vec<u8> = (0..=u8::MAX).collect();
        table.shuffle(&mut StdRng::seed_from_u64(seed));

        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = table[i & 255];
        }
        Self { perm }
    }

    fn hash(&self, i: usize) -> usize {
        self.perm[i] as usize
    }

    /// Noise value at `(x, y, z)`.
    pub fn sample(&self, x: f32, y: f32, z: f32) -> f32 {
        let (xf, yf, zf) = (x.floor(), y.floor(), z.floor());
        let xi = (xf as i32 & 255) as usize;
        let yi = (yf as i32 & 255) as usize;
        let zi = (zf as i32 & 255) as usize;
        let (x, y, z) = (x - xf, y - yf, z - zf);

        let u = fade(x);
        let v = fade(y);
        let w = fade(z);

        let a = self.hash(xi) + yi;
        let aa = self.hash(a) + zi;
        let ab = self.hash(a + 1) + zi;
        let b = self.hash(xi + 1) + yi;
        let ba = self.hash(b) + zi;
        let bb = self.hash(b + 1) + zi;

        let near = lerp(
            v,
            lerp(
                u,
                grad(self.hash(aa), x, y, z),
                grad(self.hash(ba), x - 1.0, y, z),
            ),
            lerp(
                u,
                grad(self.hash(ab), x, y - 1.0, z),
                grad(self.hash(bb), x - 1.0, y - 1.0, z),
            ),
        );
        let far = lerp(
            v,
            lerp(
                u,
                grad(self.hash(aa + 1), x, y, z - 1.0),
                grad(self.hash(ba + 1), x - 1.0, y, z - 1.0),
            ),
            lerp(
                u,
                grad(self.hash(ab + 1), x, y - 1.0, z - 1.0),
                grad(self.hash(bb + 1), x - 1.0, y - 1.0, z - 1.0),
            ),
        );
        lerp(w, near, far)
    }
}

fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(t: f32, a: f32, b: f32) -> f32 {
    a + t * (b - a)
}

// Dot product with one of 12 cube-edge gradients (4 repeated).
fn grad(hash: usize, x: f32, y: f32, z: f32) -> f32 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        z
    };
    let u = if h & 1 == 0 { u } else { -u };
    let v = if h & 2 == 0 { v } else { -v };
    u + v
}
