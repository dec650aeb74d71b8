use realty_returns_core::amortization::{amortization_schedule, remaining_balance};
use realty_returns_core::investment::sensitivity::{
    scenario_sensitivity, MetricField, ScenarioField, ScenarioSensitivityInput,
    SensitivityVariable,
};
use realty_returns_core::investment::{compute_metrics, PropertyFinancials, ScenarioParameters};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn downtown() -> PropertyFinancials {
    PropertyFinancials {
        price: dec!(1950000),
        annual_rent: dec!(130000),
        service_charges: dec!(21000),
        default_appreciation: dec!(7),
    }
}

// ===========================================================================
// Sensitivity grid
// ===========================================================================

#[test]
fn test_grid_cells_match_direct_computation() {
    let input = ScenarioSensitivityInput {
        financials: downtown(),
        base_scenario: None,
        variable_1: SensitivityVariable {
            field: ScenarioField::VacancyPct,
            min: dec!(0),
            max: dec!(20),
            step: dec!(5),
        },
        variable_2: SensitivityVariable {
            field: ScenarioField::LoanTermYears,
            min: dec!(15),
            max: dec!(30),
            step: dec!(5),
        },
        output_metric: MetricField::NetMonthlyCashFlow,
    };
    let out = scenario_sensitivity(&input).unwrap().result;

    let base = ScenarioParameters::seeded(&downtown());
    let direct = compute_metrics(
        &downtown(),
        &base.with_vacancy_pct(dec!(10)).with_loan_term_years(20),
    )
    .unwrap();
    assert_eq!(out.matrix[2][1], Some(direct.net_monthly_cash_flow));

    // seeded base: 5% vacancy, 25 years
    assert_eq!(out.base_case_position, (1, 2));
    assert_eq!(
        out.base_case_value,
        Some(compute_metrics(&downtown(), &base).unwrap().net_monthly_cash_flow)
    );
}

#[test]
fn test_appreciation_sweep_drives_projection_only() {
    let input = ScenarioSensitivityInput {
        financials: downtown(),
        base_scenario: None,
        variable_1: SensitivityVariable {
            field: ScenarioField::AppreciationPct,
            min: dec!(-5),
            max: dec!(10),
            step: dec!(5),
        },
        variable_2: SensitivityVariable {
            field: ScenarioField::DownPaymentPct,
            min: dec!(20),
            max: dec!(40),
            step: dec!(20),
        },
        output_metric: MetricField::ProjectedValueIn5Years,
    };
    let out = scenario_sensitivity(&input).unwrap().result;
    for row in &out.matrix {
        // down payment does not change the projection
        assert_eq!(row[0], row[1]);
    }
    let first = out.matrix[0][0].unwrap();
    let last = out.matrix[3][0].unwrap();
    assert!(first < dec!(1950000));
    assert!(last > dec!(1950000));
}

#[test]
fn test_sensitivity_rejects_invalid_base() {
    let mut f = downtown();
    f.price = Decimal::ZERO;
    let input = ScenarioSensitivityInput {
        financials: f,
        base_scenario: None,
        variable_1: SensitivityVariable {
            field: ScenarioField::VacancyPct,
            min: dec!(0),
            max: dec!(10),
            step: dec!(5),
        },
        variable_2: SensitivityVariable {
            field: ScenarioField::DownPaymentPct,
            min: dec!(10),
            max: dec!(30),
            step: dec!(10),
        },
        output_metric: MetricField::MonthlyPayment,
    };
    assert!(scenario_sensitivity(&input).is_err());
}

#[test]
fn test_sensitivity_input_from_json() {
    let json = r#"{
        "financials": {"price": "650000", "annualRent": "55000", "serviceCharges": "9000", "defaultAppreciation": "6"},
        "variable_1": {"field": "down_payment_pct", "min": "20", "max": "100", "step": "20"},
        "variable_2": {"field": "annual_interest_rate_pct", "min": "3", "max": "5", "step": "1"},
        "output_metric": "cash_on_cash_pct"
    }"#;
    let input: ScenarioSensitivityInput = serde_json::from_str(json).unwrap();
    let out = scenario_sensitivity(&input).unwrap().result;
    assert_eq!(out.variable_1_values.len(), 5);
    assert_eq!(out.output_metric, "cash_on_cash_pct");
    assert!(out.matrix.iter().flatten().all(|c| c.is_some()));
}

// ===========================================================================
// Amortization
// ===========================================================================

#[test]
fn test_schedule_year_one_split() {
    let sched = amortization_schedule(dec!(1560000), dec!(4.5), 25).unwrap();
    let y1 = &sched.years[0];
    assert_eq!(y1.opening_balance, dec!(1560000));
    // interest dominates early payments
    assert!(y1.interest_paid > y1.principal_paid);
    let closed = remaining_balance(dec!(1560000), dec!(4.5), 25, 12).unwrap();
    assert!((y1.closing_balance - closed).abs() < dec!(0.01));
}

#[test]
fn test_schedule_total_interest() {
    let sched = amortization_schedule(dec!(1000000), Decimal::ZERO, 10).unwrap();
    assert_eq!(sched.total_interest, Decimal::ZERO);
    assert!((sched.total_paid - dec!(1000000)).abs() < dec!(0.000001));
    assert!(sched
        .years
        .iter()
        .all(|y| (y.principal_paid - dec!(100000)).abs() < dec!(0.000001)));
}
