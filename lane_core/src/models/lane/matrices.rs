// lane_core/src/models/lane/matrices.rs

//! State-space matrices of the polynomial lane model.

use nalgebra::DMatrix;

use super::MotionInput;

/// Transition matrix `A` shifting a polynomial lane curve forward by `dx`.
///
/// Upper triangular with Taylor terms `A[i][j] = dx^(j-i) / (j-i)!` for `j >= i`.
/// For the cubic model this is:
///
/// ```text
/// | 1  dx  dx^2/2  dx^3/6 |
/// | 0  1   dx      dx^2/2 |
/// | 0  0   1       dx     |
/// | 0  0   0       1      |
/// ```
pub fn transition_matrix(dim: usize, dx: f64) -> DMatrix<f64> {
    DMatrix::from_fn(dim, dim, |i, j| {
        if j < i {
            0.0
        } else {
            let order = j - i;
            dx.powi(order as i32) / factorial(order)
        }
    })
}

/// Control matrix `B` (dim x 1) mapping the yaw rate onto offset and heading.
///
/// `B[0] = -dx^2 / (2 * speed)`, `B[1] = -look_ahead_time`, everything else 0.
/// `motion` must already be validated (non-zero speed).
pub fn control_matrix(dim: usize, motion: &MotionInput) -> DMatrix<f64> {
    let dx = motion.look_ahead_distance();
    let mut b = DMatrix::zeros(dim, 1);
    if dim > 0 {
        b[(0, 0)] = -dx.powi(2) / (2.0 * motion.speed);
    }
    if dim > 1 {
        b[(1, 0)] = -motion.look_ahead_time;
    }
    b
}

/// Measurement matrix `H`: every lane coefficient is observed directly.
pub fn measurement_matrix(dim: usize) -> DMatrix<f64> {
    DMatrix::identity(dim, dim)
}

fn factorial(k: usize) -> f64 {
    (1..=k).map(|v| v as f64).product()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cubic_transition_matches_closed_form() {
        let dx = 1.8;
        let a = transition_matrix(4, dx);
        let expected = DMatrix::from_row_slice(
            4,
            4,
            &[
                1.0, dx, dx * dx / 2.0, dx * dx * dx / 6.0,
                0.0, 1.0, dx, dx * dx / 2.0,
                0.0, 0.0, 1.0, dx,
                0.0, 0.0, 0.0, 1.0,
            ],
        );
        assert_relative_eq!(a, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_look_ahead_collapses_to_identity() {
        assert_eq!(transition_matrix(4, 0.0), DMatrix::identity(4, 4));

        let motion = MotionInput::new(3.6, 0.0, 0.2).unwrap();
        let b = control_matrix(4, &motion);
        assert_eq!(b[(0, 0)], 0.0);
        assert_eq!(b[(1, 0)], 0.0);
    }

    #[test]
    fn test_control_matrix_reference_values() {
        // dx = 1.8, so B[0] = -1.8^2 / 7.2
        let motion = MotionInput::new(3.6, 0.5, 0.0).unwrap();
        let b = control_matrix(4, &motion);
        assert_eq!(b.shape(), (4, 1));
        assert_relative_eq!(b[(0, 0)], -0.45, epsilon = 1e-12);
        assert_relative_eq!(b[(1, 0)], -0.5, epsilon = 1e-12);
        assert_eq!(b[(2, 0)], 0.0);
        assert_eq!(b[(3, 0)], 0.0);
    }

    #[test]
    fn test_quintic_transition_has_higher_order_terms() {
        let a = transition_matrix(6, 2.0);
        assert_eq!(a.shape(), (6, 6));
        // 2^5 / 5!
        assert_relative_eq!(a[(0, 5)], 32.0 / 120.0, epsilon = 1e-12);
        assert_relative_eq!(a[(2, 4)], 2.0, epsilon = 1e-12);
        assert_eq!(a[(5, 0)], 0.0);
    }

    #[test]
    fn test_measurement_matrix_is_identity() {
        assert_eq!(measurement_matrix(3), DMatrix::identity(3, 3));
    }
}
