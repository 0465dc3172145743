//! Internal Rate of Return (IRR) calculation
//!
//! Used to derive levered and unlevered IRR from the yearly net cashflows.

/// Lower edge of the bisection bracket (-90% annual rate).
pub const IRR_RATE_FLOOR: f64 = -0.9;

/// Upper edge of the bisection bracket (+100% annual rate).
pub const IRR_RATE_CEIL: f64 = 1.0;

/// Fixed number of bisection iterations. 60 halvings of the bracket
/// narrow it well past f64 resolution, so no convergence test is needed.
pub const IRR_BISECTION_STEPS: u32 = 60;

/// Calculate NPV of a cashflow series at a given annual rate.
///
/// The first element is at t=0 (undiscounted); element `t` is discounted
/// by `(1+rate)^t`.
pub fn npv_at_rate(cashflows: &[f64], rate: f64) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}

/// Calculate the Internal Rate of Return for a series of annual cash flows
/// using bisection over a fixed bracket.
///
/// Bisection is used deliberately instead of Newton-Raphson: it cannot
/// diverge on pathological cash-flow shapes, and a fixed iteration count
/// keeps the runtime bounded regardless of input.
///
/// # Arguments
/// * `cashflows` - Annual cash flows, element 0 at t=0 (positive = inflow,
///   negative = outflow). The upfront outlay is expected as a negative
///   first element.
///
/// # Returns
/// * `Option<f64>` - Annual IRR as a decimal (e.g. 0.08 for 8%), or None
///   if the NPV does not change sign over the bracket (e.g. all-negative
///   or all-positive series).
pub fn calculate_irr(cashflows: &[f64]) -> Option<f64> {
    if cashflows.is_empty() {
        return None;
    }

    let mut low = IRR_RATE_FLOOR;
    let mut high = IRR_RATE_CEIL;

    let npv_low = npv_at_rate(cashflows, low);
    let npv_high = npv_at_rate(cashflows, high);

    // No root in the bracket (degenerate series)
    if npv_low * npv_high > 0.0 {
        return None;
    }

    for _ in 0..IRR_BISECTION_STEPS {
        let mid = (low + high) / 2.0;
        let npv_mid = npv_at_rate(cashflows, mid);

        // NPV is decreasing in rate for an investment-then-returns
        // profile, so keep the half that still brackets the sign change
        if npv_mid * npv_at_rate(cashflows, low) < 0.0 {
            high = mid;
        } else {
            low = mid;
        }
    }

    Some((low + high) / 2.0)
}
