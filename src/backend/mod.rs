//! Vector backends for the accumulator kernels.
//!
//! A backend is a zero-sized marker type implementing [`Backend<T>`] for each
//! supported element type. Three exist:
//! - [`Scalar`]: one lane per "register", always compiled, the reference
//! - `Avx2`: 256-bit registers, compiled when the target enables `avx2`
//! - `Avx512`: 512-bit registers, compiled when the target enables
//!   `avx512f` and `avx512bw`
//!
//! [`Native`] names the widest backend the build target declares. The choice
//! is made by `cfg` at compile time; nothing is probed at run time. Enabling
//! the `scalar` cargo feature pins [`Native`] to [`Scalar`].

use crate::element::Element;

#[cfg(feature = "serde")]
use serde::Serialize;

#[cfg(all(target_arch = "x86_64", target_feature = "avx2"))]
mod avx2;
#[cfg(all(
    target_arch = "x86_64",
    target_feature = "avx512f",
    target_feature = "avx512bw"
))]
mod avx512;
mod scalar;

#[cfg(all(target_arch = "x86_64", target_feature = "avx2"))]
pub use avx2::Avx2;
#[cfg(all(
    target_arch = "x86_64",
    target_feature = "avx512f",
    target_feature = "avx512bw"
))]
pub use avx512::Avx512;
pub use scalar::Scalar;

/// The capability set every backend provides for element type `T`.
///
/// `Vector` holds [`Self::CHUNK`] lanes of `T`; `Wide` holds lanes of the
/// accumulation type `T::Wide`. Arithmetic is safe to call: a backend module
/// only exists when its instruction set is statically enabled. Loads and
/// stores are `unsafe` because they do not bounds-check.
pub trait Backend<T: Element>: Copy + 'static {
    type Vector: Copy;
    type Wide: Copy;

    /// Lanes of `T` per register.
    const CHUNK: usize;

    /// All-zero accumulation register.
    fn zero() -> Self::Wide;

    /// Loads `CHUNK` elements starting at `offset`.
    ///
    /// # Safety
    ///
    /// `offset + CHUNK <= src.len()`.
    unsafe fn load(src: &[T], offset: usize) -> Self::Vector;

    /// Writes `CHUNK` elements starting at `offset`.
    ///
    /// # Safety
    ///
    /// `offset + CHUNK <= dst.len()`.
    unsafe fn store(v: Self::Vector, dst: &mut [T], offset: usize);

    fn add(x: Self::Vector, y: Self::Vector) -> Self::Vector;

    fn subtract(x: Self::Vector, y: Self::Vector) -> Self::Vector;

    /// Multiplies lanewise and sums adjacent pairs of products into the
    /// accumulation type.
    fn multiply_and_add_adjacent(x: Self::Vector, y: Self::Vector) -> Self::Wide;

    fn add_wide(x: Self::Wide, y: Self::Wide) -> Self::Wide;

    /// Horizontal sum of one accumulation register.
    fn sum(v: Self::Wide) -> T::Wide;

    fn splat(v: T) -> Self::Vector;

    fn max(x: Self::Vector, y: Self::Vector) -> Self::Vector;

    fn min(x: Self::Vector, y: Self::Vector) -> Self::Vector;
}

/// Widest backend enabled for this build.
#[cfg(all(
    not(feature = "scalar"),
    target_arch = "x86_64",
    target_feature = "avx512f",
    target_feature = "avx512bw"
))]
pub type Native = Avx512;

/// Widest backend enabled for this build.
#[cfg(all(
    not(feature = "scalar"),
    target_arch = "x86_64",
    target_feature = "avx2",
    not(all(target_feature = "avx512f", target_feature = "avx512bw"))
))]
pub type Native = Avx2;

/// Widest backend enabled for this build.
#[cfg(any(
    feature = "scalar",
    not(target_arch = "x86_64"),
    not(target_feature = "avx2")
))]
pub type Native = Scalar;

/// Description of the backend a build selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct BackendInfo {
    pub name: &'static str,
    /// Register width in bits; 0 for the scalar fallback.
    pub register_bits: u32,
    pub i16_lanes: usize,
    pub i32_lanes: usize,
    pub f32_lanes: usize,
}

/// Name of [`Native`].
#[must_use]
pub const fn native_name() -> &'static str {
    #[cfg(all(
        not(feature = "scalar"),
        target_arch = "x86_64",
        target_feature = "avx512f",
        target_feature = "avx512bw"
    ))]
    {
        "avx512"
    }

    #[cfg(all(
        not(feature = "scalar"),
        target_arch = "x86_64",
        target_feature = "avx2",
        not(all(target_feature = "avx512f", target_feature = "avx512bw"))
    ))]
    {
        "avx2"
    }

    #[cfg(any(
        feature = "scalar",
        not(target_arch = "x86_64"),
        not(target_feature = "avx2")
    ))]
    {
        "scalar"
    }
}

/// Describes [`Native`].
#[must_use]
pub fn info() -> BackendInfo {
    let i16_lanes = <Native as Backend<i16>>::CHUNK;
    BackendInfo {
        name: native_name(),
        register_bits: if i16_lanes == 1 {
            0
        } else {
            (i16_lanes * 16) as u32
        },
        i16_lanes,
        i32_lanes: <Native as Backend<i32>>::CHUNK,
        f32_lanes: <Native as Backend<f32>>::CHUNK,
    }
}

/// Logs the selected backend once per process.
///
/// A no-op unless the `logging` feature is enabled. Returns the same
/// [`BackendInfo`] as [`info`].
pub fn announce() -> BackendInfo {
    static ANNOUNCED: once_cell::sync::OnceCell<BackendInfo> = once_cell::sync::OnceCell::new();

    *ANNOUNCED.get_or_init(|| {
        let info = info();
        #[cfg(feature = "logging")]
        log::info!(
            "nnue kernels using {} backend ({} x i16, {} x i32, {} x f32 per register)",
            info.name,
            info.i16_lanes,
            info.i32_lanes,
            info.f32_lanes
        );
        info
    })
}
