use num_traits::Float;
use std::fmt::Debug;

/// A trait for types that can be used as scalars by the steppers.
/// Must support floating-point arithmetic and debug printing.
pub trait Scalar: Float + Debug + 'static {}

impl<T: Float + Debug + 'static> Scalar for T {}

/// A one-dimensional flow dx/dt = f(t, x).
pub trait DynamicalSystem<T: Scalar> {
    /// Evaluates the vector field at time `t` and position `x`.
    fn apply(&self, t: T, x: T) -> T;
}

/// A trait for solvers that can step a system forward.
pub trait Steppable<T: Scalar> {
    /// Performs one step of size dt.
    /// t: current time (updated after step)
    /// x: current state (updated after step)
    /// dt: step size
    fn step(&mut self, system: &impl DynamicalSystem<T>, t: &mut T, x: &mut T, dt: T);
}
