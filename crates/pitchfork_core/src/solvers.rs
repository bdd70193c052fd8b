use crate::traits::{DynamicalSystem, Scalar, Steppable};

/// Classic Runge-Kutta 4th Order Solver
///
/// Stage values of the last step are kept around so a driver can inspect them, the
/// same way a vector solver keeps its stage buffers.
#[derive(Debug, Clone, Copy)]
pub struct RK4<T: Scalar> {
    k1: T,
    k2: T,
    k3: T,
    k4: T,
}

impl<T: Scalar> RK4<T> {
    pub fn new() -> Self {
        Self {
            k1: T::zero(),
            k2: T::zero(),
            k3: T::zero(),
            k4: T::zero(),
        }
    }

    /// Stages (k1, k2, k3, k4) of the most recent step.
    pub fn stages(&self) -> [T; 4] {
        [self.k1, self.k2, self.k3, self.k4]
    }
}

impl<T: Scalar> Default for RK4<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> Steppable<T> for RK4<T> {
    fn step(&mut self, system: &impl DynamicalSystem<T>, t: &mut T, x: &mut T, dt: T) {
        let two = T::one() + T::one();
        let half = T::one() / two;
        let six = two + two + two;

        let t0 = *t;
        let x0 = *x;

        // k1 = f(t, x)
        self.k1 = system.apply(t0, x0);

        // k2 = f(t + dt/2, x + k1*dt/2)
        self.k2 = system.apply(t0 + dt * half, x0 + self.k1 * dt * half);

        // k3 = f(t + dt/2, x + k2*dt/2)
        self.k3 = system.apply(t0 + dt * half, x0 + self.k2 * dt * half);

        // k4 = f(t + dt, x + k3*dt)
        self.k4 = system.apply(t0 + dt, x0 + self.k3 * dt);

        // x_next = x + (k1 + 2k2 + 2k3 + k4) * dt/6
        *x = x0 + (self.k1 + two * self.k2 + two * self.k3 + self.k4) * dt / six;

        *t = t0 + dt;
    }
}
