//! Legendre polynomials and the orthonormal modal basis of the line element.
//!
//! The modal basis lives on the unit interval [0, 1]:
//! φ_m(x) = sqrt(2m+1) P_m(2x - 1), so that ∫_0^1 φ_m φ_n dx = δ_{mn}
//! and φ_0 ≡ 1 (the mode-0 coefficient is the element mean).

/// Evaluate P_n(x) on [-1, 1] by the three-term recurrence
/// (n+1) P_{n+1} = (2n+1) x P_n - n P_{n-1}.
pub fn legendre(n: usize, x: f64) -> f64 {
    legendre_and_derivative(n, x).0
}

/// Evaluate P_n(x) and P'_n(x) with a single recurrence sweep.
pub fn legendre_and_derivative(n: usize, x: f64) -> (f64, f64) {
    match n {
        0 => return (1.0, 0.0),
        1 => return (x, 1.0),
        _ => {}
    }

    let mut p_prev = 1.0;
    let mut p_curr = x;
    for k in 1..n {
        let p_next = ((2 * k + 1) as f64 * x * p_curr - k as f64 * p_prev) / (k + 1) as f64;
        p_prev = p_curr;
        p_curr = p_next;
    }

    let nn = (n * (n + 1)) as f64 / 2.0;
    let dp = if (x - 1.0).abs() < 1e-14 {
        nn
    } else if (x + 1.0).abs() < 1e-14 {
        if n % 2 == 0 { -nn } else { nn }
    } else {
        n as f64 * (x * p_curr - p_prev) / (x * x - 1.0)
    };

    (p_curr, dp)
}

/// Orthonormal mode `m` on [0, 1].
#[inline]
pub fn orthonormal_mode(m: usize, x: f64) -> f64 {
    ((2 * m + 1) as f64).sqrt() * legendre(m, 2.0 * x - 1.0)
}

/// All `M` orthonormal modes at `x`.
pub fn modal_basis<const M: usize>(x: f64) -> [f64; M] {
    std::array::from_fn(|m| orthonormal_mode(m, x))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legendre_values() {
        let x = 0.5;
        assert!((legendre(0, x) - 1.0).abs() < 1e-14);
        assert!((legendre(1, x) - x).abs() < 1e-14);
        assert!((legendre(2, x) - (3.0 * x * x - 1.0) / 2.0).abs() < 1e-14);
        assert!((legendre(3, x) - (5.0 * x * x * x - 3.0 * x) / 2.0).abs() < 1e-14);
    }

    #[test]
    fn test_derivative() {
        let x = 0.3;
        let (_, dp2) = legendre_and_derivative(2, x);
        assert!((dp2 - 3.0 * x).abs() < 1e-13);
        let (p, dp) = legendre_and_derivative(4, 1.0);
        assert!((p - 1.0).abs() < 1e-14);
        assert!((dp - 10.0).abs() < 1e-14);
        let (_, dp) = legendre_and_derivative(3, -1.0);
        assert!((dp - 6.0).abs() < 1e-14);
    }

    #[test]
    fn test_modal_basis_endpoints() {
        let left = modal_basis::<4>(0.0);
        let right = modal_basis::<4>(1.0);
        for m in 0..4 {
            let norm = ((2 * m + 1) as f64).sqrt();
            assert!((right[m] - norm).abs() < 1e-13);
            let sign = if m % 2 == 0 { 1.0 } else { -1.0 };
            assert!((left[m] - sign * norm).abs() < 1e-13);
        }
    }
}
