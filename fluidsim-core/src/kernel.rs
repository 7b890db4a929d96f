//! SPH smoothing kernels
//!
//! The density kernel is the poly6-style polynomial
//!
//! ```text
//! W(r, d) = (r² − d²)³ / (π r⁸ / 4)    for 0 <= d < r
//! W(r, d) = 0                          for d >= r
//! ```
//!
//! The normalisation keeps the kernel's integral over its support constant,
//! so densities stay comparable when the smoothing radius changes at runtime.
//!
//! Both kernels are evaluated in terms of `q = d / r` so that no power of `r`
//! above the third is ever formed; `r⁸` leaves the f32 range for radii outside
//! roughly `[1e-5, 6e4]`.

use std::f32::consts::PI;

/// Kernel value at zero distance, `4 / (π r²)`.
#[inline]
pub fn kernel_peak(radius: f32) -> f32 {
    4.0 / (PI * radius * radius)
}

/// Magnitude scale of the derivative, `24 / (π r³)`.
#[inline]
pub fn derivative_scale(radius: f32) -> f32 {
    24.0 / (PI * radius * radius * radius)
}

/// Kernel value at `distance` for the given smoothing `radius`.
///
/// `radius` must be strictly positive; configuration validation guarantees it.
pub fn smoothing_kernel(radius: f32, distance: f32) -> f32 {
    debug_assert!(radius > 0.0, "smoothing radius must be positive");
    if distance >= radius {
        return 0.0;
    }
    let q = distance / radius;
    let w = 1.0 - q * q;
    kernel_peak(radius) * w * w * w
}

/// Derivative of [`smoothing_kernel`] with respect to `distance`.
///
/// ```text
/// dW/dd = −24 d (r² − d²)² / (π r⁸) = −24 q (1 − q²)² / (π r³)
/// ```
///
/// Non-positive on the support and zero outside it. Callers pair it with the
/// direction pointing from the neighbour towards the particle, which makes
/// `−pressure · direction · slope` push away from over-dense regions.
pub fn smoothing_kernel_derivative(radius: f32, distance: f32) -> f32 {
    debug_assert!(radius > 0.0, "smoothing radius must be positive");
    if distance >= radius {
        return 0.0;
    }
    let q = distance / radius;
    let w = 1.0 - q * q;
    -derivative_scale(radius) * q * w * w
}

/// Unnormalised Gaussian `exp(−(x − mean)² / 2σ²)`, peaking at 1.
pub fn gaussian(x: f32, mean: f32, std_dev: f32) -> f32 {
    let z = (x - mean) / std_dev;
    (-0.5 * z * z).exp()
}
