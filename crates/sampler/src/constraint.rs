//! Constraint models the sampler filters candidates through.
use crate::errors::{Result, SamplerError};
use ndarray::{Array1, Array2, ArrayView1};

/// A feasibility model over the `[0, 1)^ndim` hypercube
///
/// Evaluation failures of the model itself are reported through `apply`
/// and stop the sampling run unchanged.
pub trait Constraint {
    /// Dimension of the sampling space
    fn ndim(&self) -> usize;

    /// A point known to satisfy every constraint, used to seed the local walk
    fn example(&self) -> Array1<f64>;

    /// Returns true iff `x` satisfies every constraint
    fn apply(&self, x: &ArrayView1<f64>) -> anyhow::Result<bool>;
}

impl<C: Constraint + ?Sized> Constraint for &C {
    fn ndim(&self) -> usize {
        (**self).ndim()
    }

    fn example(&self) -> Array1<f64> {
        (**self).example()
    }

    fn apply(&self, x: &ArrayView1<f64>) -> anyhow::Result<bool> {
        (**self).apply(x)
    }
}

impl<C: Constraint + ?Sized> Constraint for Box<C> {
    fn ndim(&self) -> usize {
        (**self).ndim()
    }

    fn example(&self) -> Array1<f64> {
        (**self).example()
    }

    fn apply(&self, x: &ArrayView1<f64>) -> anyhow::Result<bool> {
        (**self).apply(x)
    }
}

/// Constraint given as a predicate closure along with a feasible example point
///
/// ```
/// use feasample::{Constraint, FnConstraint};
/// use ndarray::array;
///
/// let disk = FnConstraint::new(array![0.5, 0.5], |x| {
///     (x[0] - 0.5).powi(2) + (x[1] - 0.5).powi(2) < 0.1
/// });
/// assert_eq!(disk.ndim(), 2);
/// assert!(disk.apply(&array![0.6, 0.5].view()).unwrap());
/// ```
pub struct FnConstraint<P>
where
    P: Fn(&ArrayView1<f64>) -> bool,
{
    example: Array1<f64>,
    predicate: P,
}

impl<P> FnConstraint<P>
where
    P: Fn(&ArrayView1<f64>) -> bool,
{
    /// Constructor, the dimension is the one of the `example` point
    pub fn new(example: Array1<f64>, predicate: P) -> Self {
        FnConstraint { example, predicate }
    }
}

impl<P> Constraint for FnConstraint<P>
where
    P: Fn(&ArrayView1<f64>) -> bool,
{
    fn ndim(&self) -> usize {
        self.example.len()
    }

    fn example(&self) -> Array1<f64> {
        self.example.to_owned()
    }

    fn apply(&self, x: &ArrayView1<f64>) -> anyhow::Result<bool> {
        Ok((self.predicate)(x))
    }
}

/// Set of linear inequalities `a.x <= b`
#[derive(Clone, Debug)]
pub struct LinearConstraints {
    /// (n_cstr, nx) coefficients
    a: Array2<f64>,
    /// (n_cstr,) right-hand sides
    b: Array1<f64>,
    example: Array1<f64>,
}

impl LinearConstraints {
    /// Constructor from coefficients `a`, bounds `b` and a feasible `example`
    ///
    /// # Errors
    ///
    /// When shapes mismatch or when `example` violates the inequalities
    pub fn new(a: Array2<f64>, b: Array1<f64>, example: Array1<f64>) -> Result<Self> {
        if a.nrows() != b.len() {
            return Err(SamplerError::InvalidConfigError(format!(
                "{} constraint rows for {} bounds",
                a.nrows(),
                b.len()
            )));
        }
        if a.ncols() != example.len() || example.is_empty() {
            return Err(SamplerError::InvalidConfigError(format!(
                "example point of dim {} for constraints of dim {}",
                example.len(),
                a.ncols()
            )));
        }
        let cstrs = LinearConstraints { a, b, example };
        if !cstrs.is_satisfied(&cstrs.example.view()) {
            return Err(SamplerError::InvalidConfigError(format!(
                "example point {} is not feasible",
                cstrs.example
            )));
        }
        Ok(cstrs)
    }

    /// Mixture constraints: `sum(x) <= max_sum` and `x_i <= 1`.
    ///
    /// The example point is `max_sum / (2 nx)` on every component.
    pub fn mixture(nx: usize, max_sum: f64) -> Result<Self> {
        if nx == 0 || max_sum <= 0. {
            return Err(SamplerError::InvalidConfigError(format!(
                "mixture needs a positive dimension and sum bound, got {nx} and {max_sum}"
            )));
        }
        let mut a = Array2::zeros((nx + 1, nx));
        a.row_mut(0).fill(1.);
        for i in 0..nx {
            a[[i + 1, i]] = 1.;
        }
        let mut b = Array1::ones(nx + 1);
        b[0] = max_sum;
        let example = Array1::from_elem(nx, (max_sum / (2. * nx as f64)).min(0.5));
        Self::new(a, b, example)
    }

    fn is_satisfied(&self, x: &ArrayView1<f64>) -> bool {
        self.a
            .dot(x)
            .iter()
            .zip(self.b.iter())
            .all(|(lhs, rhs)| lhs <= rhs)
    }
}

impl Constraint for LinearConstraints {
    fn ndim(&self) -> usize {
        self.a.ncols()
    }

    fn example(&self) -> Array1<f64> {
        self.example.to_owned()
    }

    fn apply(&self, x: &ArrayView1<f64>) -> anyhow::Result<bool> {
        if x.len() != self.ndim() {
            anyhow::bail!(
                "point of dim {} evaluated against constraints of dim {}",
                x.len(),
                self.ndim()
            );
        }
        Ok(self.is_satisfied(x))
    }
}
