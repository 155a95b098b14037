//! Circular correlation and score mapping.
//!
//! HolE compares a subject and an object embedding through their circular
//! correlation, then dots the result with the relation embedding:
//!
//! ```text
//! score(s, p, o) = σ( r_p · (e_s ⋆ e_o) )
//! (a ⋆ b)[k] = Σ_i a[i] · b[(i + k) mod n]
//! ```
//!
//! # Two paths, one result
//!
//! | Path | Cost | Use |
//! |------|------|-----|
//! | [`circular_correlation`] | O(n²) | reference oracle, tests |
//! | [`circular_correlation_fft`] | O(n log n) | scoring, via the convolution theorem |
//!
//! The FFT path multiplies the conjugated subject spectrum with the object
//! spectrum and inverse-transforms the product. The engine in [`crate::fft`]
//! is unnormalized in both directions, so this module applies the single ÷n
//! that makes both paths numerically equal; that parity is a tested
//! contract, not an assumption.

use crate::fft::fft;

/// Direct circular correlation: `corr[k] = Σ_i s[i] · o[(i + k) mod n]`.
///
/// O(n²); retained as the reference the FFT path is verified against.
pub fn circular_correlation(s: &[f64], o: &[f64]) -> Vec<f64> {
    debug_assert_eq!(s.len(), o.len());
    let n = s.len();
    let mut corr = vec![0.0; n];
    for (k, c) in corr.iter_mut().enumerate() {
        let mut sum = 0.0;
        for i in 0..n {
            let mut t = i + k;
            if t >= n {
                t -= n;
            }
            sum += s[i] * o[t];
        }
        *c = sum;
    }
    corr
}

/// FFT-accelerated circular correlation, O(n log n).
///
/// Numerically equal to [`circular_correlation`] up to floating tolerance.
pub fn circular_correlation_fft(s: &[f64], o: &[f64]) -> Vec<f64> {
    debug_assert_eq!(s.len(), o.len());
    let n = s.len();
    let mut s_re = s.to_vec();
    let mut s_im = vec![0.0; n];
    let mut o_re = o.to_vec();
    let mut o_im = vec![0.0; n];
    fft(&mut s_re, &mut s_im, true);
    fft(&mut o_re, &mut o_im, true);
    correlation_from_spectra(&s_re, &s_im, &o_re, &o_im)
}

/// Correlation from already-transformed spectra.
///
/// This is the hot path: entity spectra are computed once at load time
/// (see [`crate::store::SpectrumTable`]), so each pair costs one spectrum
/// product and one inverse transform.
pub fn correlation_from_spectra(
    s_re: &[f64],
    s_im: &[f64],
    o_re: &[f64],
    o_im: &[f64],
) -> Vec<f64> {
    debug_assert_eq!(s_re.len(), o_re.len());
    let n = s_re.len();
    let mut re = vec![0.0; n];
    let mut im = vec![0.0; n];
    // conj(S) · O, the cross-correlation form of the convolution theorem.
    for i in 0..n {
        re[i] = s_re[i] * o_re[i] + s_im[i] * o_im[i];
        im[i] = s_re[i] * o_im[i] - s_im[i] * o_re[i];
    }
    fft(&mut re, &mut im, false);
    if n > 0 {
        let scale = 1.0 / n as f64;
        for v in &mut re {
            *v *= scale;
        }
    }
    re
}

/// Dot product of two equal-length vectors.
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Logistic function mapping a raw compatibility to a (0, 1) plausibility.
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
