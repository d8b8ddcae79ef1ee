//! Property-based tests using proptest.

use crate::activation::{Activation, ClippedReLU, Identity, ReLU};
use crate::backend::{Backend, Native, Scalar};
use crate::element::Element;
use crate::kernels;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const N: usize = 64;
const FEATURES: usize = 8;
const D: usize = N * FEATURES;
const OUTPUTS: usize = 4;
const W: usize = N * 2 * OUTPUTS;

/// Strategy for a delta-table offset. Offsets need not be chunk aligned.
fn offset_strategy() -> impl Strategy<Value = usize> {
    0..=(D - N)
}

/// Strategy for an offset addressing one whole feature row.
fn feature_strategy() -> impl Strategy<Value = usize> {
    (0..FEATURES).prop_map(|f| f * N)
}

fn seed_strategy() -> impl Strategy<Value = u64> {
    any::<u64>()
}

fn random_i16<const LEN: usize>(rng: &mut StdRng) -> [i16; LEN] {
    std::array::from_fn(|_| rng.gen())
}

fn random_i32<const LEN: usize>(rng: &mut StdRng) -> [i32; LEN] {
    std::array::from_fn(|_| rng.gen())
}

fn random_f32<const LEN: usize>(rng: &mut StdRng) -> [f32; LEN] {
    std::array::from_fn(|_| rng.gen_range(-1.0..1.0))
}

fn forward<B, A, T>(
    a: &[T; N],
    b: &[T; N],
    weight: &[T; W],
    bias: &[T; OUTPUTS],
) -> [T::Wide; OUTPUTS]
where
    T: Element,
    B: Backend<T>,
    A: Activation<T>,
{
    let mut output = [T::ZERO.widen(); OUTPUTS];
    unsafe {
        kernels::activate_flatten_and_forward::<B, A, T, N, W>(a, b, weight, bias, &mut output, 0);
    }
    output
}

/// Sum of |activated input * weight| terms for one output block, the scale
/// the float tolerance is taken relative to.
fn magnitude(a: &[f32; N], b: &[f32; N], weight: &[f32; W], block: usize) -> f32 {
    let stride = block * 2 * N;
    (0..N)
        .map(|j| (a[j] * weight[stride + j]).abs() + (b[j] * weight[stride + N + j]).abs())
        .sum()
}

proptest! {
    /// Property: the native backend updates accumulators exactly like scalar
    #[test]
    fn prop_updates_match_scalar(
        seed in seed_strategy(),
        oas in offset_strategy(),
        oaa in offset_strategy(),
        obs in offset_strategy(),
        oba in offset_strategy()
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let a: [i16; N] = random_i16(&mut rng);
        let b: [i16; N] = random_i16(&mut rng);
        let delta: [i16; D] = random_i16(&mut rng);

        let (mut na, mut nb, mut sa, mut sb) = (a, b, a, b);
        unsafe {
            kernels::add_to_all::<Native, i16, N, D>(&mut na, &mut nb, &delta, oaa, oba);
            kernels::add_to_all::<Scalar, i16, N, D>(&mut sa, &mut sb, &delta, oaa, oba);
        }
        prop_assert_eq!((na, nb), (sa, sb));

        unsafe {
            kernels::subtract_from_all::<Native, i16, N, D>(&mut na, &mut nb, &delta, oas, obs);
            kernels::subtract_from_all::<Scalar, i16, N, D>(&mut sa, &mut sb, &delta, oas, obs);
        }
        prop_assert_eq!((na, nb), (sa, sb));

        unsafe {
            kernels::subtract_and_add_to_all::<Native, i16, N, D>(&mut na, &mut nb, &delta, oas, oaa, obs, oba);
            kernels::subtract_and_add_to_all::<Scalar, i16, N, D>(&mut sa, &mut sb, &delta, oas, oaa, obs, oba);
        }
        prop_assert_eq!((na, nb), (sa, sb));
    }

    /// Property: i32 and f32 updates are lanewise, so every backend agrees exactly
    #[test]
    fn prop_wide_updates_match_scalar(seed in seed_strategy(), oa in offset_strategy(), ob in offset_strategy()) {
        let mut rng = StdRng::seed_from_u64(seed);

        let a: [i32; N] = random_i32(&mut rng);
        let b: [i32; N] = random_i32(&mut rng);
        let delta: [i32; D] = random_i32(&mut rng);
        let (mut na, mut nb, mut sa, mut sb) = (a, b, a, b);
        unsafe {
            kernels::subtract_and_add_to_all::<Native, i32, N, D>(&mut na, &mut nb, &delta, oa, ob, ob, oa);
            kernels::subtract_and_add_to_all::<Scalar, i32, N, D>(&mut sa, &mut sb, &delta, oa, ob, ob, oa);
        }
        prop_assert_eq!((na, nb), (sa, sb));

        let a: [f32; N] = random_f32(&mut rng);
        let b: [f32; N] = random_f32(&mut rng);
        let delta: [f32; D] = random_f32(&mut rng);
        let (mut na, mut nb, mut sa, mut sb) = (a, b, a, b);
        unsafe {
            kernels::add_to_all::<Native, f32, N, D>(&mut na, &mut nb, &delta, oa, ob);
            kernels::add_to_all::<Scalar, f32, N, D>(&mut sa, &mut sb, &delta, oa, ob);
        }
        prop_assert_eq!((na, nb), (sa, sb));
    }

    /// Property: integer forward passes are bit-exact across backends
    #[test]
    fn prop_forward_matches_scalar(seed in seed_strategy()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let a: [i16; N] = random_i16(&mut rng);
        let b: [i16; N] = random_i16(&mut rng);
        let weight: [i16; W] = random_i16(&mut rng);
        let bias: [i16; OUTPUTS] = random_i16(&mut rng);

        prop_assert_eq!(
            forward::<Native, Identity, i16>(&a, &b, &weight, &bias),
            forward::<Scalar, Identity, i16>(&a, &b, &weight, &bias)
        );
        prop_assert_eq!(
            forward::<Native, ReLU, i16>(&a, &b, &weight, &bias),
            forward::<Scalar, ReLU, i16>(&a, &b, &weight, &bias)
        );
        prop_assert_eq!(
            forward::<Native, ClippedReLU<255>, i16>(&a, &b, &weight, &bias),
            forward::<Scalar, ClippedReLU<255>, i16>(&a, &b, &weight, &bias)
        );

        let a: [i32; N] = random_i32(&mut rng);
        let b: [i32; N] = random_i32(&mut rng);
        let weight: [i32; W] = random_i32(&mut rng);
        let bias: [i32; OUTPUTS] = random_i32(&mut rng);
        prop_assert_eq!(
            forward::<Native, Identity, i32>(&a, &b, &weight, &bias),
            forward::<Scalar, Identity, i32>(&a, &b, &weight, &bias)
        );
    }

    /// Property: float forward passes agree up to reduction-order rounding
    #[test]
    fn prop_float_forward_within_rounding(seed in seed_strategy()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let a: [f32; N] = random_f32(&mut rng);
        let b: [f32; N] = random_f32(&mut rng);
        let weight: [f32; W] = random_f32(&mut rng);
        let bias: [f32; OUTPUTS] = random_f32(&mut rng);

        let native = forward::<Native, Identity, f32>(&a, &b, &weight, &bias);
        let scalar = forward::<Scalar, Identity, f32>(&a, &b, &weight, &bias);

        for i in 0..OUTPUTS {
            let tolerance = (magnitude(&a, &b, &weight, i) + bias[i].abs()) * 2.0 * N as f32 * f32::EPSILON;
            prop_assert!(
                (native[i] - scalar[i]).abs() <= tolerance,
                "output {} differs: native {} scalar {}", i, native[i], scalar[i]
            );
        }
    }

    /// Property: subtracting what was added restores the accumulators exactly
    #[test]
    fn prop_add_then_subtract_restores(seed in seed_strategy(), oa in offset_strategy(), ob in offset_strategy()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let a: [i16; N] = random_i16(&mut rng);
        let b: [i16; N] = random_i16(&mut rng);
        let delta: [i16; D] = random_i16(&mut rng);

        let (mut ua, mut ub) = (a, b);
        unsafe {
            kernels::add_to_all::<Native, i16, N, D>(&mut ua, &mut ub, &delta, oa, ob);
            kernels::subtract_from_all::<Native, i16, N, D>(&mut ua, &mut ub, &delta, oa, ob);
        }

        prop_assert_eq!(ua, a);
        prop_assert_eq!(ub, b);
    }

    /// Property: the fused replace equals subtract followed by add
    #[test]
    fn prop_fused_replace_matches_two_passes(
        seed in seed_strategy(),
        oas in feature_strategy(),
        oaa in feature_strategy(),
        obs in feature_strategy(),
        oba in feature_strategy()
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let a: [i32; N] = random_i32(&mut rng);
        let b: [i32; N] = random_i32(&mut rng);
        let delta: [i32; D] = random_i32(&mut rng);

        let (mut fa, mut fb, mut ta, mut tb) = (a, b, a, b);
        unsafe {
            kernels::subtract_and_add_to_all::<Native, i32, N, D>(&mut fa, &mut fb, &delta, oas, oaa, obs, oba);
            kernels::subtract_from_all::<Native, i32, N, D>(&mut ta, &mut tb, &delta, oas, obs);
            kernels::add_to_all::<Native, i32, N, D>(&mut ta, &mut tb, &delta, oaa, oba);
        }

        prop_assert_eq!(fa, ta);
        prop_assert_eq!(fb, tb);
    }

    /// Property: a zero delta slice changes nothing
    #[test]
    fn prop_zero_delta_is_identity(seed in seed_strategy(), oa in offset_strategy(), ob in offset_strategy()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let a: [i16; N] = random_i16(&mut rng);
        let b: [i16; N] = random_i16(&mut rng);
        let delta = [0i16; D];

        let (mut ua, mut ub) = (a, b);
        unsafe { kernels::add_to_all::<Native, i16, N, D>(&mut ua, &mut ub, &delta, oa, ob) };
        prop_assert_eq!((ua, ub), (a, b));

        unsafe { kernels::subtract_from_all::<Native, i16, N, D>(&mut ua, &mut ub, &delta, oa, ob) };
        prop_assert_eq!((ua, ub), (a, b));
    }

    /// Property: two adds from zero equal one add of the summed slices
    #[test]
    fn prop_adds_compose(seed in seed_strategy(), o1 in feature_strategy(), o2 in feature_strategy()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let delta: [i16; D] = random_i16(&mut rng);

        let (mut a, mut b) = ([0i16; N], [0i16; N]);
        unsafe {
            kernels::add_to_all::<Native, i16, N, D>(&mut a, &mut b, &delta, o1, o1);
            kernels::add_to_all::<Native, i16, N, D>(&mut a, &mut b, &delta, o2, o2);
        }

        let combined: [i16; N] = std::array::from_fn(|i| delta[o1 + i].wrapping_add(delta[o2 + i]));
        let (mut ca, mut cb) = ([0i16; N], [0i16; N]);
        unsafe { kernels::add_to_all::<Native, i16, N, N>(&mut ca, &mut cb, &combined, 0, 0) };

        prop_assert_eq!(a, ca);
        prop_assert_eq!(b, cb);
    }
}
