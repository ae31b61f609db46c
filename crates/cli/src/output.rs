//! Output formatting for CLI responses

use anyhow::Error;
use cadence_link::{LogSink, SessionEnd, SessionStats};
use cadence_scheduler::RunReport;
use colored::*;
use serde_json::json;

/// Print error in JSON format
pub fn print_error_json(error: &Error) {
    let code = error
        .downcast_ref::<crate::error::CliError>()
        .map_or(1, crate::error::CliError::exit_code);
    let error_json = json!({
        "success": false,
        "error": {
            "message": error.to_string(),
            "causes": error.chain().skip(1).map(ToString::to_string).collect::<Vec<_>>(),
            "exit_code": code,
        }
    });
    match serde_json::to_string(&error_json) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Failed to format error as JSON: {e}"),
    }
}

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    let mut source = error.source();
    while let Some(err) = source {
        eprintln!("  {} {}", "Caused by:".yellow(), err);
        source = err.source();
    }
}

/// Print success message
pub fn print_success(message: &str, json: bool) {
    if json {
        let output = json!({
            "success": true,
            "message": message
        });
        match serde_json::to_string(&output) {
            Ok(s) => println!("{s}"),
            Err(e) => eprintln!("Failed to format success message as JSON: {e}"),
        }
    } else {
        println!("{} {}", "✓".green(), message);
    }
}

/// Print the summary of a finished scheduler run.
pub fn print_run_report(report: &mut RunReport, json: bool) {
    let p50 = report.stats.p50_ns();
    let p99 = report.stats.p99_ns();
    let max = report.stats.max_lateness_ns;

    if json {
        let output = json!({
            "success": true,
            "ticks": report.ticks,
            "late_ticks": report.late_ticks,
            "overrun_ticks": report.overrun_ticks,
            "elapsed_ms": report.elapsed.as_secs_f64() * 1_000.0,
            "achieved_hz": report.achieved_hz(),
            "lateness_ns": {
                "p50": p50,
                "p99": p99,
                "max": max,
            }
        });
        match serde_json::to_string(&output) {
            Ok(s) => println!("{s}"),
            Err(e) => eprintln!("Failed to format run report as JSON: {e}"),
        }
        return;
    }

    println!(
        "{} {} ticks in {:.2}s ({:.2} Hz)",
        "✓".green(),
        report.ticks,
        report.elapsed.as_secs_f64(),
        report.achieved_hz()
    );

    let late = if report.late_ticks == 0 {
        report.late_ticks.to_string().green()
    } else {
        report.late_ticks.to_string().yellow()
    };
    let overrun = if report.overrun_ticks == 0 {
        report.overrun_ticks.to_string().green()
    } else {
        report.overrun_ticks.to_string().red()
    };
    println!("  Late: {late}  Overrun: {overrun}");
    println!(
        "  Lateness: p50 {:.3} ms, p99 {:.3} ms, max {:.3} ms",
        ns_to_ms(p50),
        ns_to_ms(p99),
        ns_to_ms(max)
    );
}

/// Print the summary of a finished WebSocket session.
pub fn print_session(stats: &SessionStats, json: bool) {
    let end = match stats.end {
        SessionEnd::ServerClosed => "server_closed",
        SessionEnd::OutboundClosed => "outbound_closed",
        SessionEnd::Shutdown => "shutdown",
    };

    if json {
        let output = json!({
            "success": true,
            "sent": stats.sent,
            "received": stats.received,
            "end": end,
        });
        match serde_json::to_string(&output) {
            Ok(s) => println!("{s}"),
            Err(e) => eprintln!("Failed to format session summary as JSON: {e}"),
        }
    } else {
        println!(
            "{} Session ended ({}): {} sent, {} received",
            "✓".green(),
            end.replace('_', " "),
            stats.sent,
            stats.received
        );
    }
}

fn ns_to_ms(ns: u64) -> f64 {
    ns as f64 / 1_000_000.0
}

/// Log sink writing one line per event to stdout.
///
/// Human mode prints `<message> at <ms> ms`; JSON mode prints one object per
/// line with `timestamp_ms` and `message` fields.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleSink {
    json: bool,
}

impl ConsoleSink {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    fn format(&self, timestamp_ms: i64, message: &str) -> String {
        if self.json {
            json!({ "timestamp_ms": timestamp_ms, "message": message }).to_string()
        } else {
            format!("{message} at {timestamp_ms} ms")
        }
    }
}

impl LogSink for ConsoleSink {
    fn record(&mut self, timestamp_ms: i64, message: &str) {
        println!("{}", self.format(timestamp_ms, message));
    }
}
