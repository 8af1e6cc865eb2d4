use linfa::Float;
use ndarray::{Array2, ArrayBase, Data, Ix2, Zip};
use ndarray_rand::rand::Rng;

/// Shrink factor applied to the right edge of a cell so that a jittered value
/// never rounds onto the left edge of the next cell
pub const CELL_SHRINK: f64 = 0.999999;

/// Maps a stratum index to a continuous value drawn in `[index * h, CELL_SHRINK * (index + 1) * h)`
pub fn jitter_value<R: Rng>(index: usize, h: f64, rng: &mut R) -> f64 {
    let left = index as f64 * h;
    let right = CELL_SHRINK * (left + h);
    if right > left {
        rng.gen_range(left..right)
    } else {
        // cells narrower than the shrink margin collapse to their left edge
        left
    }
}

/// Maps a (ns, nx) stratum assignment to a (ns, nx) matrix of continuous coordinates,
/// each coordinate drawn uniformly inside its cell of width `h`.
///
/// Values are drawn row by row so that replaying the random stream reproduces the matrix.
pub fn jitter<F: Float, R: Rng>(
    strata: &ArrayBase<impl Data<Elem = usize>, Ix2>,
    h: f64,
    rng: &mut R,
) -> Array2<F> {
    let mut x = Array2::zeros(strata.raw_dim());
    Zip::from(&mut x)
        .and(strata)
        .for_each(|xij, &idx| *xij = F::cast(jitter_value(idx, h, rng)));
    x
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StrataAllocator;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use ndarray_rand::rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;

    #[test]
    fn test_jitter_stays_in_cell() {
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let ns = 25;
        let strata = StrataAllocator::new(4, ns)
            .unwrap()
            .draw_all(&mut rng)
            .unwrap();
        let h = 1. / ns as f64;
        for _ in 0..20 {
            let x: Array2<f64> = jitter(&strata, h, &mut rng);
            Zip::from(&x).and(&strata).for_each(|&v, &idx| {
                assert!(v >= idx as f64 * h, "{v} below cell {idx}");
                assert!(v < (idx + 1) as f64 * h, "{v} above cell {idx}");
                assert!(v < 1.);
            });
        }
    }

    #[test]
    fn test_jitter_replay() {
        let strata = array![[0, 3], [2, 1], [1, 0], [3, 2]];
        let x1: Array2<f64> = jitter(&strata, 0.25, &mut Xoshiro256Plus::seed_from_u64(3));
        let x2: Array2<f64> = jitter(&strata, 0.25, &mut Xoshiro256Plus::seed_from_u64(3));
        assert_abs_diff_eq!(x1, x2, epsilon = 0.);
    }

    #[test]
    fn test_single_cell() {
        let mut rng = Xoshiro256Plus::seed_from_u64(0);
        let v = jitter_value(0, 1., &mut rng);
        assert!((0. ..CELL_SHRINK).contains(&v));
    }
}
