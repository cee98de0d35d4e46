use glam::DVec2;

/// Scalar type used throughout the solver.
pub type Real = f64;

/// Spatial vector type (2D).
pub type Vecd = DVec2;

/// Spatial dimension of the solver.
pub const DIMENSIONS: usize = 2;

/// Guards divisions by quantities that may vanish (speeds, distances).
pub const TINY_REAL: Real = 1.0e-15;

pub const PI: Real = std::f64::consts::PI;

/// Component of `v` along axis `axis` (0 = x, 1 = y).
#[inline]
pub fn component(v: Vecd, axis: usize) -> Real {
    match axis {
        0 => v.x,
        _ => v.y,
    }
}

/// Overwrite the component of `v` along `axis`.
#[inline]
pub fn set_component(v: &mut Vecd, axis: usize, value: Real) {
    match axis {
        0 => v.x = value,
        _ => v.y = value,
    }
}

/// Wrap `x` into the half-open interval `[lower, lower + length)`.
#[inline]
pub fn wrap_periodic(x: Real, lower: Real, length: Real) -> Real {
    let wrapped = lower + (x - lower).rem_euclid(length);
    // rem_euclid can return `length` itself for tiny negative inputs
    if wrapped >= lower + length {
        lower
    } else {
        wrapped
    }
}

/// Minimum-image displacement along one periodic axis.
#[inline]
pub fn minimum_image(d: Real, length: Real) -> Real {
    d - length * (d / length).round()
}
