use crate::math::{Real, Vecd, PI, TINY_REAL};

/// Smoothing kernel with compact support `r <= cutoff_radius()`.
pub trait Kernel: Send + Sync {
    fn smoothing_length(&self) -> Real;

    /// Radius beyond which `w` and `dw` vanish.
    fn cutoff_radius(&self) -> Real;

    /// Kernel value `W(r, h)`.
    fn w(&self, r: Real) -> Real;

    /// Radial derivative `dW/dr`. Non-positive on the support.
    fn dw(&self, r: Real) -> Real;

    /// Kernel value at zero distance, the self-contribution in summations.
    fn w0(&self) -> Real {
        self.w(0.0)
    }

    /// `grad_i W(|x_i - x_j|)` given `displacement = x_i - x_j`.
    fn grad_w(&self, displacement: Vecd) -> Vecd {
        let r = displacement.length();
        if r <= TINY_REAL {
            return Vecd::ZERO;
        }
        displacement * (self.dw(r) / r)
    }
}

/// Wendland C2 kernel in two dimensions, support radius `2h`.
///
/// `W(q) = 7 / (4 pi h^2) * (1 - q/2)^4 * (1 + 2q)` for `q = r/h <= 2`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WendlandC2 {
    h: Real,
    inv_h: Real,
    factor_w: Real,
}

impl WendlandC2 {
    pub const KERNEL_SIZE: Real = 2.0;

    pub fn new(smoothing_length: Real) -> Self {
        Self {
            h: smoothing_length,
            inv_h: 1.0 / smoothing_length,
            factor_w: 7.0 / (4.0 * PI * smoothing_length * smoothing_length),
        }
    }

    /// Kernel sized relative to the particle spacing, `h = ratio * dp`.
    pub fn from_spacing(spacing: Real, ratio: Real) -> Self {
        Self::new(spacing * ratio)
    }
}

impl Kernel for WendlandC2 {
    fn smoothing_length(&self) -> Real {
        self.h
    }

    fn cutoff_radius(&self) -> Real {
        Self::KERNEL_SIZE * self.h
    }

    #[inline]
    fn w(&self, r: Real) -> Real {
        let q = r * self.inv_h;
        if q >= Self::KERNEL_SIZE {
            return 0.0;
        }
        let a = 1.0 - 0.5 * q;
        let a2 = a * a;
        self.factor_w * a2 * a2 * (1.0 + 2.0 * q)
    }

    #[inline]
    fn dw(&self, r: Real) -> Real {
        let q = r * self.inv_h;
        if q >= Self::KERNEL_SIZE {
            return 0.0;
        }
        let a = 1.0 - 0.5 * q;
        self.factor_w * self.inv_h * (-5.0 * q * a * a * a)
    }
}
