use crate::errors::{DoeError, Result};
use linfa::Float;
use ndarray::{Array2, ArrayBase, Data, Ix2};
use statrs::distribution::{ContinuousCDF, Normal};

/// Maps samples of the unit hypercube to standard normal samples
/// through the inverse cumulative distribution function of `N(0, 1)`.
///
/// A Latin Hypercube sample stays stratified in probability: each stratum
/// of `[0, 1)` maps to an interval of equal probability mass.
///
/// ```
/// use feasample_doe::{to_standard_normal, Lhs, SamplingMethod};
///
/// let uniform = Lhs::<f64, _>::unit(2).sample(10).expect("LHS samples");
/// let normal = to_standard_normal(&uniform).expect("samples in [0, 1]");
/// assert_eq!(normal.dim(), (10, 2));
/// ```
///
/// # Errors
///
/// [DoeError::InvalidValue] when a value lies outside `[0, 1]`
pub fn to_standard_normal<F: Float>(x: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Result<Array2<F>> {
    if let Some(v) = x
        .iter()
        .find(|&&v| v.is_nan() || v < F::zero() || v > F::one())
    {
        return Err(DoeError::InvalidValue(format!(
            "probability expected in [0, 1], got {v}"
        )));
    }
    let normal = Normal::new(0., 1.).map_err(|err| DoeError::InvalidValue(err.to_string()))?;
    Ok(x.mapv(|v| F::cast(normal.inverse_cdf(v.to_f64().unwrap_or(f64::NAN)))))
}
