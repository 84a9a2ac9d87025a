// tests/integration_test.rs
use approx::assert_abs_diff_eq;
use exotic_mc::analytics::{barrier_analytic, bs_analytic};
use exotic_mc::mc::american::price_american;
use exotic_mc::mc::asian::price_asian;
use exotic_mc::mc::barrier::{barrier_price, price_barrier};
use exotic_mc::mc::european::{european_estimate, mc_price_european};
use exotic_mc::{
    price, AverageType, BarrierType, McError, MarketParameters, OptionType, PathSimulator,
    PayoffSpec, PricingRequest, RandomSource, SimulationConfig,
};

fn atm() -> MarketParameters {
    MarketParameters::new(100.0, 100.0, 1.0, 0.05, 0.2)
}

fn simulator(paths: usize, steps: usize) -> PathSimulator {
    PathSimulator::new(SimulationConfig::new(paths, steps))
}

#[test]
fn test_fixed_seed_reproduces_every_style() {
    let sim = SimulationConfig::new(4_000, 50).with_seed(2024);
    for payoff in [
        PayoffSpec::American,
        PayoffSpec::Asian {
            average_type: AverageType::Arithmetic,
        },
        PayoffSpec::Barrier {
            barrier_type: BarrierType::DownAndIn,
            barrier_level: 85.0,
        },
    ] {
        let req = PricingRequest::new(atm(), OptionType::Put, payoff).with_simulation(sim);
        let first = price(&req).unwrap().price;
        let second = price(&req).unwrap().price;
        assert_eq!(first.to_bits(), second.to_bits(), "{:?}", payoff);
    }
}

#[test]
fn test_mc_european_matches_black_scholes() {
    let (mc, variance) =
        mc_price_european(&atm(), OptionType::Call, &simulator(100_000, 1), RandomSource::Seeded(42))
            .unwrap();
    let analytic = bs_analytic::bs_price(&atm(), OptionType::Call);

    println!("\nMC: {} ± {}, analytic: {}", mc, variance.sqrt(), analytic);
    assert_abs_diff_eq!(analytic, 10.450583572185565, epsilon = 1e-9);
    assert!((mc - analytic).abs() < 4.0 * variance.sqrt());
}

#[test]
fn test_standard_error_shrinks_with_root_n() {
    let source = RandomSource::Seeded(11);
    let (_, var_small) =
        mc_price_european(&atm(), OptionType::Call, &simulator(10_000, 1), source).unwrap();
    let (_, var_large) =
        mc_price_european(&atm(), OptionType::Call, &simulator(160_000, 1), source).unwrap();

    // 16x the paths should cut the standard error by about 4
    let ratio = (var_small / var_large).sqrt();
    println!("\nstderr ratio: {}", ratio);
    assert!(ratio > 3.5 && ratio < 4.5, "ratio {}", ratio);
}

#[test]
fn test_american_call_without_dividends_matches_european() {
    let american = price_american(
        &atm(),
        OptionType::Call,
        &simulator(20_000, 50),
        RandomSource::Seeded(42),
    )
    .unwrap();
    let european = bs_analytic::bs_price(&atm(), OptionType::Call);

    println!("\nAmerican call: {}, European call: {}", american, european);
    assert!((american - european).abs() < 0.5);
}

#[test]
fn test_american_put_carries_early_exercise_premium() {
    let american = price_american(
        &atm(),
        OptionType::Put,
        &simulator(20_000, 50),
        RandomSource::Seeded(42),
    )
    .unwrap();
    let european = bs_analytic::bs_price(&atm(), OptionType::Put);

    println!("\nAmerican put: {}, European put: {}", american, european);
    assert!(american > european);
    assert!(american < 100.0);
}

#[test]
fn test_arithmetic_asian_call_below_european() {
    let sim = simulator(20_000, 52);
    let arithmetic = price_asian(
        &atm(),
        OptionType::Call,
        AverageType::Arithmetic,
        &sim,
        RandomSource::Seeded(3),
    )
    .unwrap();
    let geometric = price_asian(
        &atm(),
        OptionType::Call,
        AverageType::Geometric,
        &sim,
        RandomSource::Seeded(3),
    )
    .unwrap();
    let european = bs_analytic::bs_price(&atm(), OptionType::Call);

    println!("\nArithmetic: {}, geometric: {}, European: {}", arithmetic, geometric, european);
    assert!(arithmetic < european);
    // AM ≥ GM path by path on the same draws
    assert!(geometric <= arithmetic);
}

#[test]
fn test_knock_in_plus_knock_out_equals_vanilla_on_shared_paths() {
    let sim = simulator(10_000, 100);
    let source = RandomSource::Seeded(99);
    let (vanilla, _) = mc_price_european(&atm(), OptionType::Call, &sim, source).unwrap();

    for (out_type, in_type, level) in [
        (BarrierType::UpAndOut, BarrierType::UpAndIn, 120.0),
        (BarrierType::DownAndOut, BarrierType::DownAndIn, 90.0),
    ] {
        let knock_out =
            price_barrier(&atm(), OptionType::Call, out_type, level, &sim, source).unwrap();
        let knock_in =
            price_barrier(&atm(), OptionType::Call, in_type, level, &sim, source).unwrap();
        assert_abs_diff_eq!(knock_in + knock_out, vanilla, epsilon = 1e-9);
        assert!(knock_out > 0.0 && knock_in > 0.0);
    }
}

#[test]
fn test_down_and_out_call_against_closed_form() {
    let m = atm();
    let steps = 252;
    let level = 90.0;
    let paths = simulator(20_000, steps)
        .simulate(&m, RandomSource::Seeded(5))
        .unwrap();

    let mc = barrier_price(&paths, m.strike, m.rate, OptionType::Call, BarrierType::DownAndOut, level)
        .unwrap();
    // vanilla payoff variance bounds the knocked-out one
    let (_, vanilla_var) = european_estimate(&paths, m.strike, m.rate, OptionType::Call).unwrap();
    let stderr = vanilla_var.sqrt();

    // Discrete monitoring: shift the barrier by exp(-0.5826 σ √dt)
    let dt = m.maturity / steps as f64;
    let shifted = level * (-0.5826 * m.volatility * dt.sqrt()).exp();
    let continuous = barrier_analytic::down_and_out_call(&m, level);
    let corrected = barrier_analytic::down_and_out_call(&m, shifted);

    println!("\nMC: {} ± {}, continuous: {}, corrected: {}", mc, stderr, continuous, corrected);
    assert!((mc - corrected).abs() < 4.0 * stderr);
    assert!(mc > continuous - 3.0 * stderr);
}

#[test]
fn test_zero_maturity_put_is_intrinsic() {
    let m = atm().with_spot(90.0).with_maturity(0.0);
    let sim = simulator(1_000, 10);
    let src = RandomSource::Seeded(1);

    assert_abs_diff_eq!(price_american(&m, OptionType::Put, &sim, src).unwrap(), 10.0);
    assert_abs_diff_eq!(
        price_asian(&m, OptionType::Put, AverageType::Arithmetic, &sim, src).unwrap(),
        10.0
    );
    assert_abs_diff_eq!(
        price_barrier(&m, OptionType::Put, BarrierType::DownAndIn, 80.0, &sim, src).unwrap(),
        0.0
    );
}

#[test]
fn test_invalid_inputs_rejected() {
    let bad_markets = [
        atm().with_spot(0.0),
        MarketParameters::new(100.0, -1.0, 1.0, 0.05, 0.2),
        atm().with_maturity(-0.5),
        atm().with_volatility(0.0),
        atm().with_dividend_yield(-0.01),
    ];
    for m in bad_markets {
        let req = PricingRequest::new(m, OptionType::Call, PayoffSpec::European);
        assert!(
            matches!(price(&req), Err(McError::InvalidParameters { .. })),
            "{:?}",
            m
        );
    }

    let misplaced = [
        (BarrierType::UpAndOut, 100.0),
        (BarrierType::UpAndIn, 80.0),
        (BarrierType::DownAndOut, 100.0),
        (BarrierType::DownAndIn, 120.0),
    ];
    for (barrier_type, barrier_level) in misplaced {
        let payoff = PayoffSpec::Barrier {
            barrier_type,
            barrier_level,
        };
        let req = PricingRequest::new(atm(), OptionType::Put, payoff);
        assert!(matches!(price(&req), Err(McError::InvalidConfiguration { .. })));
    }

    assert!("sideways-and-out".parse::<BarrierType>().is_err());
    assert!("harmonic".parse::<AverageType>().is_err());

    let req = PricingRequest::new(atm(), OptionType::Put, PayoffSpec::American)
        .with_simulation(SimulationConfig::new(0, 10));
    assert!(matches!(price(&req), Err(McError::InvalidConfiguration { .. })));
}

#[test]
fn test_request_from_json() {
    let json = r#"{
        "spot": 100.0,
        "strike": 105.0,
        "maturity": 0.5,
        "rate": 0.03,
        "volatility": 0.25,
        "option_type": "put",
        "style": "barrier",
        "barrier_type": "down-and-in",
        "barrier_level": 80.0,
        "num_paths": 2000,
        "num_steps": 26,
        "seed": 17
    }"#;
    let req: PricingRequest = serde_json::from_str(json).unwrap();

    assert_eq!(req.market.dividend_yield, 0.0);
    assert_eq!(req.option_type, OptionType::Put);
    assert_eq!(
        req.payoff,
        PayoffSpec::Barrier {
            barrier_type: BarrierType::DownAndIn,
            barrier_level: 80.0
        }
    );
    assert_eq!(req.simulation, SimulationConfig::new(2_000, 26).with_seed(17));
    assert!(req.greeks.is_empty());

    let result = price(&req).unwrap();
    assert!(result.price >= 0.0);
    assert!(result.greeks.is_none());

    let asian = r#"{"spot": 100.0, "strike": 100.0, "maturity": 1.0, "rate": 0.05,
        "volatility": 0.2, "option_type": "Call", "style": "asian"}"#;
    let req: PricingRequest = serde_json::from_str(asian).unwrap();
    assert_eq!(req.option_type, OptionType::Call);
    assert_eq!(
        req.payoff,
        PayoffSpec::Asian {
            average_type: AverageType::Arithmetic
        }
    );
    assert_eq!(req.simulation, SimulationConfig::default());

    let unknown = asian.replace("\"asian\"", "\"barrier\", \"barrier_type\": \"sideways\", \"barrier_level\": 1.0");
    assert!(serde_json::from_str::<PricingRequest>(&unknown).is_err());
}
