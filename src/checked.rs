//! Safe wrappers around the kernels.
//!
//! Each wrapper validates its offsets once, before the loop, then calls the
//! unchecked kernel on the [`Native`] backend. Hot paths that already know
//! their offsets are valid should call the `unsafe` kernels directly.

use crate::activation::Activation;
use crate::backend::{Backend, Native};
use crate::element::Element;
use crate::error::{KernelError, Operand};
use crate::kernels;

/// Validated [`kernels::add_to_all`].
pub fn add_to_all<T, const N: usize, const D: usize>(
    input_a: &mut [T; N],
    input_b: &mut [T; N],
    delta: &[T; D],
    oa: usize,
    ob: usize,
) -> Result<(), KernelError>
where
    T: Element,
    Native: Backend<T>,
{
    ensure(Operand::Delta, oa, N, D)?;
    ensure(Operand::Delta, ob, N, D)?;

    unsafe { kernels::add_to_all::<Native, T, N, D>(input_a, input_b, delta, oa, ob) };
    Ok(())
}

/// Validated [`kernels::subtract_from_all`].
pub fn subtract_from_all<T, const N: usize, const D: usize>(
    input_a: &mut [T; N],
    input_b: &mut [T; N],
    delta: &[T; D],
    oa: usize,
    ob: usize,
) -> Result<(), KernelError>
where
    T: Element,
    Native: Backend<T>,
{
    ensure(Operand::Delta, oa, N, D)?;
    ensure(Operand::Delta, ob, N, D)?;

    unsafe { kernels::subtract_from_all::<Native, T, N, D>(input_a, input_b, delta, oa, ob) };
    Ok(())
}

/// Validated [`kernels::subtract_and_add_to_all`].
#[allow(clippy::too_many_arguments)]
pub fn subtract_and_add_to_all<T, const N: usize, const D: usize>(
    input_a: &mut [T; N],
    input_b: &mut [T; N],
    delta: &[T; D],
    oas: usize,
    oaa: usize,
    obs: usize,
    oba: usize,
) -> Result<(), KernelError>
where
    T: Element,
    Native: Backend<T>,
{
    for offset in [oas, oaa, obs, oba] {
        ensure(Operand::Delta, offset, N, D)?;
    }

    unsafe {
        kernels::subtract_and_add_to_all::<Native, T, N, D>(
            input_a, input_b, delta, oas, oaa, obs, oba,
        );
    }
    Ok(())
}

/// Validated [`kernels::activate_flatten_and_forward`].
pub fn activate_flatten_and_forward<A, T, const N: usize, const W: usize>(
    input_a: &[T; N],
    input_b: &[T; N],
    weight: &[T; W],
    bias: &[T],
    output: &mut [T::Wide],
    o: usize,
) -> Result<(), KernelError>
where
    T: Element,
    A: Activation<T>,
    Native: Backend<T>,
{
    let outputs = W / (2 * N);
    ensure(Operand::Bias, o, outputs, bias.len())?;
    ensure(Operand::Output, o, outputs, output.len())?;

    unsafe {
        kernels::activate_flatten_and_forward::<Native, A, T, N, W>(
            input_a, input_b, weight, bias, output, o,
        );
    }
    Ok(())
}

fn ensure(operand: Operand, offset: usize, len: usize, capacity: usize) -> Result<(), KernelError> {
    if offset.checked_add(len).is_some_and(|end| end <= capacity) {
        return Ok(());
    }

    #[cfg(feature = "logging")]
    log::debug!("rejected {operand} slice {offset}..{offset}+{len} (capacity {capacity})");

    Err(KernelError::OutOfBounds {
        operand,
        offset,
        len,
        capacity,
    })
}
