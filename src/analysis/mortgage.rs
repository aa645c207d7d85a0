//! Fixed-rate mortgage amortization

/// Term used for every computed payment (30-year fixed)
pub const STANDARD_TERM_MONTHS: u32 = 360;

/// Annual rate assumed when the caller supplies none
pub const DEFAULT_ANNUAL_RATE: f64 = 0.07;

/// Level monthly payment for a fully amortizing fixed-rate loan
///
/// # Arguments
/// * `principal` - Amount borrowed
/// * `annual_rate` - Nominal annual rate as a decimal (0.07 for 7%)
/// * `term_months` - Number of monthly payments
///
/// A non-positive rate falls back to straight-line repayment.
pub fn monthly_payment(principal: f64, annual_rate: f64, term_months: u32) -> f64 {
    if term_months == 0 {
        return 0.0;
    }

    let monthly_rate = annual_rate / 12.0;
    let n = term_months as f64;

    if monthly_rate > 0.0 {
        let factor = (1.0 + monthly_rate).powi(term_months as i32);
        principal * monthly_rate * factor / (factor - 1.0)
    } else {
        principal / n
    }
}

/// Total interest paid over the life of the loan
pub fn total_interest(principal: f64, annual_rate: f64, term_months: u32) -> f64 {
    monthly_payment(principal, annual_rate, term_months) * term_months as f64 - principal
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_standard_payment() {
        // $237,500 at 7% over 30 years
        let payment = monthly_payment(237_500.0, 0.07, STANDARD_TERM_MONTHS);
        assert_relative_eq!(payment, 1580.09, epsilon = 0.01);
    }

    #[test]
    fn test_zero_rate_is_straight_line() {
        assert_relative_eq!(monthly_payment(360_000.0, 0.0, 360), 1000.0);
        assert_relative_eq!(monthly_payment(360_000.0, -0.01, 360), 1000.0);
    }

    #[test]
    fn test_zero_principal_and_term() {
        assert_eq!(monthly_payment(0.0, 0.07, 360), 0.0);
        assert_eq!(monthly_payment(100_000.0, 0.07, 0), 0.0);
    }

    #[test]
    fn test_total_interest() {
        let interest = total_interest(100_000.0, 0.06, 360);
        // 599.55 * 360 - 100,000
        assert_relative_eq!(interest, 115_838.19, epsilon = 1.0);
    }
}
