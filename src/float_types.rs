// Our Real scalar type:
#[cfg(feature = "f32")]
pub type Real = f32;
#[cfg(feature = "f64")]
pub type Real = f64;

use core::str::FromStr;
use std::sync::OnceLock;

/// Default distance below which a point counts as lying on a plane.
pub const EPSILON: Real = 1e-5;

/// Lazily-initialized classification tolerance used by every plane test.
/// Defaults to [`EPSILON`], but can be overridden:
///  1) **Build-time**: set env var `GEOCSG_TOLERANCE` (e.g. `GEOCSG_TOLERANCE=1e-6 cargo build`)
///  2) **Runtime**: call [`set_tolerance`] once before using the library
static TOLERANCE_CELL: OnceLock<Real> = OnceLock::new();

/// Returns the current classification tolerance.
pub fn tolerance() -> Real {
    *TOLERANCE_CELL.get_or_init(|| {
        if let Some(environment_variable) = option_env!("GEOCSG_TOLERANCE") {
            if let Ok(value) = Real::from_str(environment_variable) {
                return value.max(Real::EPSILON);
            }
        }
        EPSILON
    })
}

/// Set the tolerance programmatically once (subsequent calls are ignored).
/// Call near program start: `geocsg::float_types::set_tolerance(1e-6);`
pub fn set_tolerance(value: Real) {
    let _ = TOLERANCE_CELL.set(value.max(Real::EPSILON));
}

/// Narrow a `Real` to the `f32` used by render buffers.
#[inline]
pub fn to_f32(value: Real) -> f32 {
    value as f32
}
