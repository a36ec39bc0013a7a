//! resilience-runner: headless contingency analysis for a coverage roster.
//!
//! Usage:
//!   resilience-runner --roster roster.json --mode N-2 --start 2026-01-05 --days 28
//!   resilience-runner --seed 12345 --staff 20 --json
//!   resilience-runner --ipc-mode

use anyhow::{Context, Result};
use chrono::NaiveDate;
use coverage_resilience_core::{
    actions::{defense_label, recovery_label, status_label},
    engine::{Analysis, DemandInput, ResilienceEngine},
    synthetic::generate_roster,
    AnalysisPeriod, ContingencyMode, CoverageModel, ResilienceConfig, StaffMember,
};
use std::env;
use std::io::{self, BufRead, Write};
use uuid::Uuid;

/// One stateless request per stdin line.
#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcRequest {
    Analyze {
        roster: Vec<StaffMember>,
        mode: ContingencyMode,
        start: NaiveDate,
        end: NaiveDate,
        current_demand: f64,
        theoretical_capacity: f64,
    },
    Cascade {
        roster: Vec<StaffMember>,
        absent: Vec<String>,
        mode: ContingencyMode,
    },
    Classify {
        utilization_rate: f64,
        buffer_remaining: f64,
    },
    Quit,
}

#[derive(serde::Serialize)]
struct RunEnvelope<'a> {
    run_id: Uuid,
    version: &'static str,
    analysis: &'a Analysis,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let json_out = args.iter().any(|a| a == "--json");

    let config = match str_arg(&args, "--config") {
        Some(path) => ResilienceConfig::load(path)?,
        None => ResilienceConfig::default(),
    };
    let engine = ResilienceEngine::with_config(config)?;

    if ipc_mode {
        return run_ipc_loop(&engine);
    }

    let seed = parse_arg(&args, "--seed", 42u64);
    let staff = parse_arg(&args, "--staff", 12usize);
    let days = parse_arg(&args, "--days", 28u32);
    let demand = parse_arg(&args, "--demand", 70.0f64);
    let capacity = parse_arg(&args, "--capacity", 100.0f64);
    let mode: ContingencyMode = str_arg(&args, "--mode").unwrap_or("N-2").parse()?;
    let start = match str_arg(&args, "--start") {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("--start must be YYYY-MM-DD, got {s}"))?,
        None => chrono::Local::now().date_naive(),
    };

    let roster_source = str_arg(&args, "--roster");
    let model = match roster_source {
        Some(path) => load_roster(path)?,
        None => generate_roster(seed, staff)?,
    };

    let period = AnalysisPeriod::starting(start, days)?;

    if !json_out {
        println!("Coverage resilience runner");
        match roster_source {
            Some(path) => println!("  roster:    {path}"),
            None => println!("  roster:    synthetic (seed {seed}, {staff} staff)"),
        }
        println!("  mode:      {}", mode.as_str());
        println!(
            "  period:    {} .. {} ({} days)",
            period.start,
            period.end,
            period.len_days()
        );
        println!("  demand:    {demand} / {capacity}");
        println!();
    }

    let analysis = engine.analyze(
        &model,
        mode,
        period,
        DemandInput {
            current_demand: demand,
            theoretical_capacity: capacity,
        },
    )?;

    if json_out {
        let envelope = RunEnvelope {
            run_id: Uuid::new_v4(),
            version: env!("CARGO_PKG_VERSION"),
            analysis: &analysis,
        };
        println!("{}", serde_json::to_string_pretty(&envelope)?);
    } else {
        print_summary(&engine, &model, &analysis)?;
    }

    Ok(())
}

fn load_roster(path: &str) -> Result<CoverageModel> {
    let content =
        std::fs::read_to_string(path).map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
    let staff: Vec<StaffMember> = serde_json::from_str(&content)?;
    Ok(CoverageModel::new(staff)?)
}

fn run_ipc_loop(engine: &ResilienceEngine) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let request: IpcRequest = match serde_json::from_str(&buffer) {
            Ok(r) => r,
            Err(e) => {
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };
        if matches!(request, IpcRequest::Quit) {
            break;
        }

        match handle_request(engine, request) {
            Ok(response) => writeln!(stdout, "{response}")?,
            Err(e) => {
                log::warn!("ipc: request failed: {e:#}");
                write_error(&mut stdout, &format!("{e:#}"))?;
            }
        }
        stdout.flush()?;
    }
    Ok(())
}

fn handle_request(engine: &ResilienceEngine, request: IpcRequest) -> Result<serde_json::Value> {
    let value = match request {
        IpcRequest::Analyze {
            roster,
            mode,
            start,
            end,
            current_demand,
            theoretical_capacity,
        } => {
            let model = CoverageModel::new(roster)?;
            let period = AnalysisPeriod::new(start, end)?;
            let analysis = engine.analyze(
                &model,
                mode,
                period,
                DemandInput {
                    current_demand,
                    theoretical_capacity,
                },
            )?;
            serde_json::to_value(&analysis)?
        }
        IpcRequest::Cascade { roster, absent, mode } => {
            let model = CoverageModel::new(roster)?;
            let metrics = engine.cascade(&model, absent.as_slice(), mode)?;
            serde_json::to_value(&metrics)?
        }
        IpcRequest::Classify {
            utilization_rate,
            buffer_remaining,
        } => {
            let snapshot = engine
                .classifier()
                .classify(utilization_rate, buffer_remaining)?;
            serde_json::to_value(&snapshot)?
        }
        IpcRequest::Quit => serde_json::Value::Null,
    };
    Ok(value)
}

fn write_error(stdout: &mut io::Stdout, message: &str) -> Result<()> {
    let err_json = serde_json::json!({ "error": message });
    writeln!(stdout, "{err_json}")?;
    stdout.flush()?;
    Ok(())
}

fn print_summary(
    engine: &ResilienceEngine,
    model: &CoverageModel,
    analysis: &Analysis,
) -> Result<()> {
    let report = &analysis.report;
    let health = &analysis.health;

    println!("=== CONTINGENCY SUMMARY ===");
    println!("  staff:           {}", report.staff_count);
    println!("  total coverage:  {:.1}", model.total_coverage());
    println!("  singletons:      {}", report.singletons_evaluated);
    println!("  pairs:           {}", report.pairs_evaluated);
    println!("  N-1:             {}", pass_fail(report.n1_pass));
    println!(
        "  N-2:             {}",
        report.n2_pass.map_or("not evaluated", pass_fail)
    );
    println!("  phase risk:      {}", report.phase_transition_risk.as_str());

    println!();
    println!("=== SINGLE POINTS OF FAILURE ===");
    if report.n1_vulnerabilities.is_empty() {
        println!("  (none)");
    }
    for v in &report.n1_vulnerabilities {
        let metrics = engine.cascade(model, &[v.staff_id.as_str()], report.mode)?;
        println!(
            "  {:<28} gap {:>5.1}% | {:<8} | {} | recovery {}",
            v.staff_name,
            v.coverage_gap_pct,
            v.severity.as_str(),
            status_label(metrics.system_status),
            recovery_label(metrics.recovery_time_estimate)
        );
    }

    println!();
    println!("=== FATAL PAIRS ===");
    if report.n2_fatal_pairs.is_empty() {
        println!("  (none)");
    }
    for p in report.n2_fatal_pairs.iter().take(10) {
        println!(
            "  {} + {} | gap {:.1}% | {}",
            p.first_name,
            p.second_name,
            p.coverage_gap_pct,
            status_label(p.system_status)
        );
    }
    if report.n2_fatal_pairs.len() > 10 {
        println!("  ... and {} more", report.n2_fatal_pairs.len() - 10);
    }

    println!();
    println!("=== CRITICALITY RANKING (top 5) ===");
    for s in report.criticality_scores.iter().take(5) {
        println!(
            "  #{:<2} {:<28} centrality {:.2} | risk {} | unique {}",
            s.rank,
            s.staff_name,
            s.centrality_score,
            s.risk_level.as_str(),
            s.unique_coverage_slots
        );
    }

    println!();
    println!("=== HEALTH ===");
    println!(
        "  utilization:     {:.2} ({})",
        analysis.utilization.utilization_rate,
        analysis.utilization.level.as_str()
    );
    println!("  defense level:   {}", defense_label(health.defense_level));
    println!("  crisis mode:     {}", health.crisis_mode);
    println!("  overall:         {:?}", health.overall_status);
    for action in &analysis.actions.immediate_actions {
        println!("  [NOW]  {action}");
    }
    for action in &analysis.actions.recommended_actions {
        println!("  [NEXT] {action}");
    }

    println!();
    println!("=== FRAGILITY TIMELINE ===");
    for day in &analysis.timeline {
        println!(
            "  {} | fragility {:.2} | staffing {:>5.1} | spof {} | violations {}",
            day.date,
            day.fragility,
            day.staffing_level,
            day.spof.as_deref().unwrap_or("-"),
            day.violations.len()
        );
    }
    Ok(())
}

fn pass_fail(pass: bool) -> &'static str {
    if pass {
        "PASS"
    } else {
        "FAIL"
    }
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn str_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
