use chrono::{Datelike, Utc};
use colored::*;
use governor::{Quota, RateLimiter};
use hdrhistogram::Histogram;
use practice_booking::domain::ports::BookingGateway;
use practice_booking::domain::services::availability::month_bounds;
use practice_booking::infra::gateway::http_gateway::HttpBookingGateway;
use reqwest::Client;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

const DEFAULT_DURATION_SECS: u64 = 20;
const DEFAULT_BASE_URL: &str = "http://localhost:3000";

struct Target {
    name: String,
    url: String,
}

#[tokio::main]
async fn main() {
    let base_url = std::env::var("BENCH_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    let stage_secs = std::env::var("BENCH_DURATION_SECS").ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_DURATION_SECS);

    println!("{}", "🚀 Starting Benchmark Suite".bold().green());
    println!("Target URL: {}", base_url);

    let client = match Client::builder()
        .pool_max_idle_per_host(1000)
        .timeout(Duration::from_secs(10))
        .build()
    {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{} {}", "❌ Could not build HTTP client:".red().bold(), e);
            return;
        }
    };

    if client.get(format!("{}/health", base_url)).send().await.is_err() {
        eprintln!("{}", format!("❌ Server is NOT reachable at {}. Please start it first.", base_url).red().bold());
        return;
    }

    println!("\n{}", "⚙️  Discovering benchmark data...".yellow());
    let targets = discover_targets(&base_url).await;
    println!("{}", format!("✅ {} endpoints selected.", targets.len()).green());

    let rps_stages = vec![10, 50, 200, 1000];

    for target in targets {
        println!("\n{}", "=".repeat(60));
        println!("Benchmarking Endpoint: {}", target.name.cyan().bold());
        println!("URL: {}", target.url);
        println!("{}", "=".repeat(60));

        println!("{:<10} | {:<15} | {:<15} | {:<15}", "RPS", "Mean (ms)", "P99 (ms)", "Success Rate");
        println!("{:-<10}-+-{:-<15}-+-{:-<15}-+-{:-<15}", "", "", "", "");

        for &rps in &rps_stages {
            run_stage(&client, &target, rps, Duration::from_secs(stage_secs)).await;
        }
    }
}

/// Read-only endpoints, parameterised with whatever the store currently publishes.
async fn discover_targets(base_url: &str) -> Vec<Target> {
    let gateway = HttpBookingGateway::new(base_url);
    let today = Utc::now().date_naive();

    let mut targets = vec![
        Target { name: "Health Check".into(), url: format!("{}/health", base_url) },
        Target { name: "List Services".into(), url: format!("{}/api/v1/services", base_url) },
        Target { name: "Rating Summary".into(), url: format!("{}/api/v1/reviews/summary", base_url) },
    ];

    if let Ok((start, end)) = month_bounds(today.year(), today.month()) {
        targets.push(Target {
            name: "Month Availability".into(),
            url: format!("{}/api/v1/availability?start={}&end={}", base_url, start, end),
        });

        let open_day = match gateway.get_availability(start, end).await {
            Ok(days) => days.into_iter().find(|d| !d.is_fully_booked).map(|d| d.date),
            Err(e) => {
                println!("   {} {}", "Availability lookup failed:".yellow(), e);
                None
            }
        };

        match open_day {
            Some(date) => {
                println!("   Open day: {}", date);
                targets.push(Target {
                    name: "Day Slots".into(),
                    url: format!("{}/api/v1/slots/{}", base_url, date),
                });

                if let Ok(services) = gateway.list_services().await
                    && let Some(service) = services.first() {
                    println!("   Service: {} ({} min)", service.title, service.duration_min);
                    targets.push(Target {
                        name: "Valid Start Times (Filter)".into(),
                        url: format!("{}/api/v1/slots/{}/valid?service_id={}", base_url, date, service.id),
                    });
                }
            }
            None => println!("   {}", "No open day this month, skipping day endpoints.".yellow()),
        }
    }

    targets
}

async fn run_stage(client: &Client, target: &Target, rps: u32, duration: Duration) {
    let Some(per_second) = NonZeroU32::new(rps) else { return };
    let limiter = Arc::new(RateLimiter::direct(Quota::per_second(per_second)));

    let (tx, mut rx) = mpsc::channel(50000);
    let start_time = Instant::now();

    loop {
        if start_time.elapsed() > duration {
            break;
        }

        if limiter.check().is_ok() {
            let client = client.clone();
            let url = target.url.clone();
            let tx = tx.clone();

            tokio::spawn(async move {
                let req_start = Instant::now();
                let res = client.get(&url).send().await;
                let latency = req_start.elapsed();

                let success = match res {
                    Ok(r) => r.status().is_success(),
                    Err(_) => false,
                };

                let _ = tx.send((latency, success)).await;
            });
        } else {
            tokio::task::yield_now().await;
        }
    }

    drop(tx);

    let Ok(mut histogram) = Histogram::<u64>::new(3) else { return };
    let mut successes = 0;
    let mut total = 0;

    while let Some((latency, success)) = rx.recv().await {
        total += 1;
        if success { successes += 1; }
        let _ = histogram.record(latency.as_micros() as u64);
    }

    let mean_ms = histogram.mean() / 1000.0;
    let p99_ms = histogram.value_at_quantile(0.99) as f64 / 1000.0;
    let success_rate = if total > 0 { (successes as f64 / total as f64) * 100.0 } else { 0.0 };

    println!(
        "{:<10} | {:<15.2} | {:<15.2} | {:<14.1}%",
        rps,
        mean_ms,
        p99_ms,
        success_rate
    );

    tokio::time::sleep(Duration::from_millis(500)).await;
}
