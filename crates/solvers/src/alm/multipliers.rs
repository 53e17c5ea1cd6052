/// Clips the multipliers to the set they can occupy at a solution.
///
/// A constraint without a lower bound cannot have a negative multiplier, and
/// one without an upper bound cannot have a positive multiplier. All other
/// multipliers are clipped to `[-M, M]`. NaN entries are left as they are.
pub fn project_y(y: &mut [f64], z_lb: &[f64], z_ub: &[f64], max_multiplier: f64) {
    debug_assert_eq!(y.len(), z_lb.len());
    debug_assert_eq!(y.len(), z_ub.len());
    for ((yi, &lb), &ub) in y.iter_mut().zip(z_lb).zip(z_ub) {
        let y_lb = if lb == f64::NEG_INFINITY {
            0.0
        } else {
            -max_multiplier
        };
        let y_ub = if ub == f64::INFINITY {
            0.0
        } else {
            max_multiplier
        };
        if !yi.is_nan() {
            *yi = yi.max(y_lb).min(y_ub);
        }
    }
}
