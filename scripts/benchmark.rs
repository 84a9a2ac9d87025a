// scripts/benchmark.rs
use exotic_mc::analytics::{barrier_analytic, bs_analytic};
use exotic_mc::math_utils::Timer;
use exotic_mc::mc::european::mc_price_european;
use exotic_mc::{
    price, AverageType, BarrierType, GreeksConfig, MarketParameters, McResult, OptionType,
    PathSimulator, PayoffSpec, PricingRequest, RandomSource, SimulationConfig,
};
use std::env;
use std::fs::File;
use std::io::{self, Write};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct SystemInfo {
    os: String,
    cpu_model: String,
    cpu_cores: usize,
    rustc_flags: String,
    rayon_threads: usize,
}

impl SystemInfo {
    fn gather() -> Self {
        Self {
            os: env::consts::OS.to_string(),
            cpu_model: Self::cpu_model(),
            cpu_cores: num_cpus::get(),
            rustc_flags: env::var("RUSTFLAGS").unwrap_or_else(|_| "default".to_string()),
            rayon_threads: rayon::current_num_threads(),
        }
    }

    fn cpu_model() -> String {
        std::fs::read_to_string("/proc/cpuinfo")
            .ok()
            .and_then(|content| {
                content
                    .lines()
                    .find(|line| line.starts_with("model name"))
                    .and_then(|line| line.split(':').nth(1))
                    .map(|s| s.trim().to_string())
            })
            .unwrap_or_else(|| "Unknown CPU".to_string())
    }
}

#[derive(Debug)]
struct BenchmarkResult {
    name: String,
    paths: usize,
    steps: usize,
    time_ms: f64,
    value: f64,
    reference: Option<f64>,
}

impl BenchmarkResult {
    fn throughput(&self) -> f64 {
        (self.paths * self.steps.max(1)) as f64 / (self.time_ms / 1000.0)
    }

    fn relative_error(&self) -> Option<f64> {
        self.reference.map(|r| (self.value - r).abs() / r.abs())
    }
}

fn timed<F>(name: String, paths: usize, steps: usize, reference: Option<f64>, f: F) -> McResult<BenchmarkResult>
where
    F: FnOnce() -> McResult<f64>,
{
    let mut timer = Timer::new();
    timer.start();
    let value = f()?;
    let time_ms = timer.elapsed_ms();
    info!(%name, paths, time_ms, value, "benchmark finished");
    Ok(BenchmarkResult {
        name,
        paths,
        steps,
        time_ms,
        value,
        reference,
    })
}

fn run_style_benchmarks() -> McResult<Vec<BenchmarkResult>> {
    let market = MarketParameters::new(100.0, 100.0, 1.0, 0.05, 0.2);
    let steps = 252;
    let mut results = Vec::new();

    for &paths in &[10_000, 50_000, 200_000] {
        println!("Running benchmarks with {} paths...", paths);
        let sim = SimulationConfig::new(paths, steps).with_seed(42);

        let bs_call = bs_analytic::bs_price(&market, OptionType::Call);
        let simulator = PathSimulator::new(SimulationConfig::new(paths, 1));
        results.push(timed(
            format!("European Call MC ({}k)", paths / 1000),
            paths,
            1,
            Some(bs_call),
            || {
                mc_price_european(&market, OptionType::Call, &simulator, RandomSource::Seeded(42))
                    .map(|(p, _)| p)
            },
        )?);

        let styles = [
            ("American Put", OptionType::Put, PayoffSpec::American, None),
            (
                "Asian Arithmetic Call",
                OptionType::Call,
                PayoffSpec::Asian {
                    average_type: AverageType::Arithmetic,
                },
                None,
            ),
            (
                "Down-and-Out Call",
                OptionType::Call,
                PayoffSpec::Barrier {
                    barrier_type: BarrierType::DownAndOut,
                    barrier_level: 90.0,
                },
                Some(barrier_analytic::down_and_out_call(&market, 90.0)),
            ),
        ];

        for (label, option_type, payoff, reference) in styles {
            let req = PricingRequest::new(market, option_type, payoff).with_simulation(sim);
            results.push(timed(
                format!("{} ({}k)", label, paths / 1000),
                paths,
                steps,
                reference,
                || price(&req).map(|r| r.price),
            )?);
        }
    }

    // One Greek bundle: eight re-pricings of the American put
    let paths = 10_000;
    let req = PricingRequest::new(market, OptionType::Put, PayoffSpec::American)
        .with_simulation(SimulationConfig::new(paths, 50).with_seed(42))
        .with_greeks(GreeksConfig::ALL);
    results.push(timed(
        "American Put Delta (all Greeks)".to_string(),
        paths,
        50 * 8,
        None,
        || {
            let result = price(&req)?;
            Ok(result.greeks.and_then(|g| g.delta).unwrap_or(f64::NAN))
        },
    )?);

    Ok(results)
}

fn write_results_to_csv(results: &[BenchmarkResult], system_info: &SystemInfo, filename: &str) -> io::Result<()> {
    let mut file = File::create(filename)?;

    writeln!(file, "# OS: {}", system_info.os)?;
    writeln!(file, "# CPU: {}", system_info.cpu_model)?;
    writeln!(file, "# CPU Cores: {}", system_info.cpu_cores)?;
    writeln!(file, "# RUSTFLAGS: {}", system_info.rustc_flags)?;
    writeln!(file, "# Rayon Threads: {}", system_info.rayon_threads)?;
    writeln!(
        file,
        "# Benchmark Date: {}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    writeln!(file, "Benchmark,Paths,Steps,Time_ms,Path_steps_per_sec,Value,Reference,Relative_Error")?;

    for result in results {
        writeln!(
            file,
            "{},{},{},{:.2},{:.0},{:.6},{},{}",
            result.name,
            result.paths,
            result.steps,
            result.time_ms,
            result.throughput(),
            result.value,
            result
                .reference
                .map(|v| format!("{:.6}", v))
                .unwrap_or_else(|| "N/A".to_string()),
            result
                .relative_error()
                .map(|e| format!("{:.6}", e))
                .unwrap_or_else(|| "N/A".to_string())
        )?;
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    println!("exotic-mc Benchmark Suite");
    println!("=========================\n");

    let system_info = SystemInfo::gather();
    println!("  OS: {}", system_info.os);
    println!("  CPU: {}", system_info.cpu_model);
    println!("  CPU Cores: {}", system_info.cpu_cores);
    println!("  Rayon Threads: {}", system_info.rayon_threads);
    println!();

    let results = run_style_benchmarks()?;

    println!("\n{:=<96}", "");
    println!(
        "{:<36} {:>8} {:>12} {:>15} {:>10} {:>10} {:>10}",
        "Benchmark", "Paths", "Time (ms)", "Path-steps/s", "Value", "Reference", "Rel Error"
    );
    println!("{:-<96}", "");
    for result in &results {
        println!(
            "{:<36} {:>8} {:>12.2} {:>15.0} {:>10.4} {:>10} {:>10}",
            result.name,
            result.paths,
            result.time_ms,
            result.throughput(),
            result.value,
            result
                .reference
                .map(|v| format!("{:.4}", v))
                .unwrap_or_else(|| "N/A".to_string()),
            result
                .relative_error()
                .map(|e| format!("{:.2}%", e * 100.0))
                .unwrap_or_else(|| "N/A".to_string())
        );
    }
    println!("{:=<96}", "");

    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let filename = format!("benchmark_results_{}.csv", timestamp);
    write_results_to_csv(&results, &system_info, &filename)?;
    println!("Results saved to: {}", filename);

    Ok(())
}
