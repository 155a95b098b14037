//! In-place discrete Fourier transform over split real/imaginary slices.
//!
//! This is the sole mathematical primitive behind HolE scoring: circular
//! correlation is evaluated through the convolution theorem, turning an
//! O(n²) sum into two forward transforms, an element-wise spectrum product,
//! and one inverse transform.
//!
//! # Normalization
//!
//! Both directions are **unnormalized** plain sums. The inverse uses the
//! conjugated kernel and applies no 1/n; callers own the scaling (the
//! correlation path in [`crate::scoring`] divides by n exactly once).
//! A forward-then-inverse round trip therefore reproduces the input scaled
//! by n.
//!
//! # Lengths
//!
//! Embedding dimensions are not required to be powers of two. Power-of-two
//! lengths take the iterative radix-2 path; everything else falls back to a
//! direct O(n²) evaluation, which is exact for any n and still amortized by
//! the per-entity spectrum precompute in [`crate::store::SpectrumTable`].

use std::f64::consts::TAU;

/// Transform `real`/`imag` in place.
///
/// `forward = true` is the analysis transform (kernel `e^(-2πi·jk/n)`),
/// `forward = false` the synthesis transform (kernel `e^(+2πi·jk/n)`,
/// unnormalized). Lengths 0 and 1 are no-ops.
pub fn fft(real: &mut [f64], imag: &mut [f64], forward: bool) {
    debug_assert_eq!(real.len(), imag.len());
    let n = real.len();
    if n <= 1 {
        return;
    }
    if n.is_power_of_two() {
        radix2(real, imag, forward);
    } else {
        dft(real, imag, forward);
    }
}

/// Iterative radix-2 Cooley-Tukey: bit-reversal permutation, then
/// butterfly passes of doubling span.
fn radix2(real: &mut [f64], imag: &mut [f64], forward: bool) {
    let n = real.len();

    let mut j = 0;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j |= bit;
        if i < j {
            real.swap(i, j);
            imag.swap(i, j);
        }
    }

    let sign = if forward { -1.0 } else { 1.0 };
    let mut len = 2;
    while len <= n {
        let ang = sign * TAU / len as f64;
        let (w_im, w_re) = ang.sin_cos();
        let half = len / 2;
        for start in (0..n).step_by(len) {
            let mut cur_re = 1.0;
            let mut cur_im = 0.0;
            for k in start..start + half {
                let m = k + half;
                let t_re = real[m] * cur_re - imag[m] * cur_im;
                let t_im = real[m] * cur_im + imag[m] * cur_re;
                real[m] = real[k] - t_re;
                imag[m] = imag[k] - t_im;
                real[k] += t_re;
                imag[k] += t_im;
                let next_re = cur_re * w_re - cur_im * w_im;
                cur_im = cur_re * w_im + cur_im * w_re;
                cur_re = next_re;
            }
        }
        len <<= 1;
    }
}

/// Direct O(n²) evaluation for arbitrary lengths.
///
/// The twiddle angle is reduced modulo n before the trig call, which keeps
/// accuracy flat as j·k grows.
fn dft(real: &mut [f64], imag: &mut [f64], forward: bool) {
    let n = real.len();
    let sign = if forward { -1.0 } else { 1.0 };
    let mut out_re = vec![0.0; n];
    let mut out_im = vec![0.0; n];
    for k in 0..n {
        let mut sum_re = 0.0;
        let mut sum_im = 0.0;
        for j in 0..n {
            let ang = sign * TAU * ((j * k) % n) as f64 / n as f64;
            let (s, c) = ang.sin_cos();
            sum_re += real[j] * c - imag[j] * s;
            sum_im += real[j] * s + imag[j] * c;
        }
        out_re[k] = sum_re;
        out_im[k] = sum_im;
    }
    real.copy_from_slice(&out_re);
    imag.copy_from_slice(&out_im);
}
