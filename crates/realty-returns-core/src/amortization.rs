use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{OrOverflow, RealtyError};
use crate::types::{Money, Percent};
use crate::RealtyResult;

const MONTHS_PER_YEAR: u32 = 12;

/// One year of a fixed-rate amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleYear {
    pub year: u32,
    pub opening_balance: Money,
    pub interest_paid: Money,
    pub principal_paid: Money,
    pub total_paid: Money,
    pub closing_balance: Money,
}

/// Full yearly amortization schedule for a loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub principal: Money,
    pub annual_interest_rate_pct: Percent,
    pub loan_term_years: u32,
    pub monthly_payment: Money,
    pub total_interest: Money,
    pub total_paid: Money,
    pub years: Vec<ScheduleYear>,
}

/// Monthly rate as a fraction from an annual percentage (4.5 -> 0.00375).
pub fn monthly_rate(annual_rate_pct: Percent) -> Decimal {
    annual_rate_pct / dec!(100) / Decimal::from(MONTHS_PER_YEAR)
}

/// Longest loan a yearly schedule is produced for.
pub const MAX_SCHEDULE_YEARS: u32 = 100;

/// `(1 + rate)^periods`, failing instead of overflowing.
fn compound_factor(rate: Decimal, periods: u32, field: &str) -> RealtyResult<Decimal> {
    Decimal::ONE
        .checked_add(rate)
        .and_then(|base| base.checked_powu(u64::from(periods)))
        .ok_or_else(|| RealtyError::invalid(field, "compounding overflows decimal range"))
}

fn term_months(term_years: u32) -> RealtyResult<u32> {
    term_years
        .checked_mul(MONTHS_PER_YEAR)
        .ok_or_else(|| RealtyError::invalid("loan_term_years", "Loan term is too long to amortize"))
}

/// Standard fixed-rate mortgage payment: P * r(1+r)^n / ((1+r)^n - 1).
///
/// A zero rate falls back to straight-line repayment `P / n`. A non-positive
/// principal needs no payment.
pub fn monthly_payment(
    principal: Money,
    annual_rate_pct: Percent,
    term_years: u32,
) -> RealtyResult<Money> {
    if principal <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    if term_years == 0 {
        return Err(RealtyError::invalid(
            "loan_term_years",
            "Loan term must be at least 1 year when a loan balance is financed",
        ));
    }

    let n = term_months(term_years)?;
    let r = monthly_rate(annual_rate_pct);

    if r.is_zero() {
        return Ok(principal / Decimal::from(n));
    }

    let compound = compound_factor(r, n, "annual_interest_rate_pct")?;
    let denominator = compound
        .checked_sub(Decimal::ONE)
        .or_overflow("annual_interest_rate_pct")?;
    if denominator.is_zero() {
        return Err(RealtyError::invalid(
            "annual_interest_rate_pct",
            "Interest rate produces a zero amortization denominator",
        ));
    }

    principal
        .checked_mul(r)
        .and_then(|v| v.checked_mul(compound))
        .and_then(|numerator| numerator.checked_div(denominator))
        .ok_or_else(|| RealtyError::invalid("principal", "payment overflows decimal range"))
}

/// Outstanding balance after `months_paid` scheduled payments, floored at zero.
pub fn remaining_balance(
    principal: Money,
    annual_rate_pct: Percent,
    term_years: u32,
    months_paid: u32,
) -> RealtyResult<Money> {
    if principal <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    let payment = monthly_payment(principal, annual_rate_pct, term_years)?;
    let n = term_months(term_years)?;
    if months_paid >= n {
        return Ok(Decimal::ZERO);
    }

    let r = monthly_rate(annual_rate_pct);
    let balance = if r.is_zero() {
        payment
            .checked_mul(Decimal::from(months_paid))
            .and_then(|repaid| principal.checked_sub(repaid))
            .or_overflow("principal")?
    } else {
        // B_k = P(1+r)^k - PMT * ((1+r)^k - 1) / r
        let growth = compound_factor(r, months_paid, "annual_interest_rate_pct")?;
        let grown = principal.checked_mul(growth).or_overflow("principal")?;
        let repaid = growth
            .checked_sub(Decimal::ONE)
            .and_then(|g| payment.checked_mul(g))
            .and_then(|v| v.checked_div(r))
            .or_overflow("principal")?;
        grown.checked_sub(repaid).or_overflow("principal")?
    };

    Ok(balance.max(Decimal::ZERO))
}

/// Yearly amortization schedule. The final month absorbs any residual so the
/// loan closes at exactly zero.
pub fn amortization_schedule(
    principal: Money,
    annual_rate_pct: Percent,
    term_years: u32,
) -> RealtyResult<AmortizationSchedule> {
    if principal <= Decimal::ZERO {
        return Err(RealtyError::invalid(
            "principal",
            "Principal must be positive to build a schedule",
        ));
    }
    if term_years > MAX_SCHEDULE_YEARS {
        return Err(RealtyError::invalid(
            "loan_term_years",
            format!("Schedules are limited to {MAX_SCHEDULE_YEARS} years, got {term_years}"),
        ));
    }

    let payment = monthly_payment(principal, annual_rate_pct, term_years)?;
    let r = monthly_rate(annual_rate_pct);
    let total_months = term_months(term_years)?;

    let mut balance = principal;
    let mut years = Vec::with_capacity(term_years as usize);
    let mut total_interest = Decimal::ZERO;
    let mut total_paid = Decimal::ZERO;

    for year in 1..=term_years {
        let opening_balance = balance;
        let mut interest_paid = Decimal::ZERO;
        let mut principal_paid = Decimal::ZERO;

        for month in 0..MONTHS_PER_YEAR {
            let interest = balance.checked_mul(r).or_overflow("principal")?;
            let is_last = (year - 1) * MONTHS_PER_YEAR + month + 1 == total_months;
            let principal_part = if is_last {
                balance
            } else {
                payment.checked_sub(interest).or_overflow("principal")?.min(balance)
            };
            interest_paid = interest_paid.checked_add(interest).or_overflow("principal")?;
            principal_paid = principal_paid
                .checked_add(principal_part)
                .or_overflow("principal")?;
            balance = balance.checked_sub(principal_part).or_overflow("principal")?;
        }

        let year_total = interest_paid.checked_add(principal_paid).or_overflow("principal")?;
        total_interest = total_interest.checked_add(interest_paid).or_overflow("principal")?;
        total_paid = total_paid.checked_add(year_total).or_overflow("principal")?;

        years.push(ScheduleYear {
            year,
            opening_balance,
            interest_paid,
            principal_paid,
            total_paid: year_total,
            closing_balance: balance,
        });
    }

    Ok(AmortizationSchedule {
        principal,
        annual_interest_rate_pct: annual_rate_pct,
        loan_term_years: term_years,
        monthly_payment: payment,
        total_interest,
        total_paid,
        years,
    })
}

/// `value * (1 + pct/100)^years`. Negative `pct` models depreciation.
pub fn compound_growth(value: Money, pct: Percent, years: u32) -> RealtyResult<Money> {
    let factor = compound_factor(pct / dec!(100), years, "appreciation_pct")?;
    value
        .checked_mul(factor)
        .ok_or_else(|| RealtyError::invalid("appreciation_pct", "projection overflows decimal range"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Decimal, b: Decimal, tol: Decimal) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn test_monthly_rate() {
        assert_eq!(monthly_rate(dec!(4.5)), dec!(0.00375));
    }

    #[test]
    fn test_payment_standard_mortgage() {
        // 2.24M over 25y at 4.5%: ~12,450.65
        let pmt = monthly_payment(dec!(2240000), dec!(4.5), 25).unwrap();
        assert!(close(pmt, dec!(12450.65), dec!(0.01)), "got {pmt}");
    }

    #[test]
    fn test_payment_zero_rate_is_straight_line() {
        let pmt = monthly_payment(dec!(1200000), Decimal::ZERO, 10).unwrap();
        assert_eq!(pmt, dec!(10000));
    }

    #[test]
    fn test_payment_zero_principal() {
        assert_eq!(monthly_payment(Decimal::ZERO, dec!(5), 0).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_payment_zero_term_rejected() {
        let err = monthly_payment(dec!(100000), dec!(5), 0).unwrap_err();
        assert!(matches!(err, RealtyError::InvalidInput { ref field, .. } if field == "loan_term_years"));
    }

    #[test]
    fn test_payment_overflow_is_error_not_panic() {
        assert!(monthly_payment(dec!(1000000), dec!(5000), 30).is_err());
    }

    #[test]
    fn test_remaining_balance_endpoints() {
        let p = dec!(500000);
        assert!(close(remaining_balance(p, dec!(6), 20, 0).unwrap(), p, dec!(0.0001)));
        assert_eq!(remaining_balance(p, dec!(6), 20, 240).unwrap(), Decimal::ZERO);
        assert_eq!(remaining_balance(p, dec!(6), 20, 999).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_remaining_balance_zero_rate() {
        let bal = remaining_balance(dec!(120000), Decimal::ZERO, 10, 60).unwrap();
        assert_eq!(bal, dec!(60000));
    }

    #[test]
    fn test_schedule_closes_at_zero() {
        let sched = amortization_schedule(dec!(2240000), dec!(4.5), 25).unwrap();
        assert_eq!(sched.years.len(), 25);
        assert_eq!(sched.years.last().unwrap().closing_balance, Decimal::ZERO);

        let principal_sum: Decimal = sched.years.iter().map(|y| y.principal_paid).sum();
        assert!(close(principal_sum, dec!(2240000), dec!(0.000001)));
        assert!(close(
            sched.total_paid,
            sched.monthly_payment * dec!(300),
            dec!(0.01)
        ));
    }

    #[test]
    fn test_schedule_matches_closed_form_balance() {
        let sched = amortization_schedule(dec!(750000), dec!(6.5), 30).unwrap();
        let after_5 = remaining_balance(dec!(750000), dec!(6.5), 30, 60).unwrap();
        assert!(close(sched.years[4].closing_balance, after_5, dec!(0.01)));
    }

    #[test]
    fn test_schedule_interest_declines() {
        let sched = amortization_schedule(dec!(1000000), dec!(5), 15).unwrap();
        for pair in sched.years.windows(2) {
            assert!(pair[1].interest_paid < pair[0].interest_paid);
            assert!(pair[1].closing_balance < pair[0].closing_balance);
        }
    }

    #[test]
    fn test_compound_growth() {
        let v = compound_growth(dec!(2800000), dec!(8), 5).unwrap();
        assert!(close(v, dec!(4114118.615), dec!(0.01)), "got {v}");
    }

    #[test]
    fn test_compound_growth_negative_rate() {
        let v = compound_growth(dec!(1000000), dec!(-10), 2).unwrap();
        assert_eq!(v, dec!(810000));
    }

    #[test]
    fn test_term_months_overflow_is_error() {
        let err = monthly_payment(dec!(100000), Decimal::ZERO, 400_000_000).unwrap_err();
        assert!(matches!(err, RealtyError::InvalidInput { ref field, .. } if field == "loan_term_years"));
        assert!(remaining_balance(dec!(100000), dec!(4), u32::MAX, 12).is_err());
    }

    #[test]
    fn test_very_long_term_payment_still_computes() {
        // 300M years at zero rate stays within u32 months
        let pmt = monthly_payment(dec!(3600000000), Decimal::ZERO, 300_000_000).unwrap();
        assert_eq!(pmt, Decimal::ONE);
    }

    #[test]
    fn test_schedule_term_capped() {
        let err = amortization_schedule(dec!(100000), dec!(4), MAX_SCHEDULE_YEARS + 1).unwrap_err();
        assert!(matches!(err, RealtyError::InvalidInput { ref field, .. } if field == "loan_term_years"));
        assert!(amortization_schedule(dec!(100000), dec!(4), MAX_SCHEDULE_YEARS).is_ok());
    }

    #[test]
    fn test_remaining_balance_extreme_principal() {
        let huge = Decimal::MAX / dec!(2);
        assert!(remaining_balance(huge, dec!(900), 30, 120).is_err());
    }
}
