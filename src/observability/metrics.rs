//! Metrics collection.
//!
//! # Metrics
//! - `call_log_records_total` (counter): records emitted, by phase and level
//! - `call_log_emit_failures_total` (counter): backend rejections, by phase
//! - `call_log_render_failures_total` (counter): values replaced by the placeholder
//! - `call_log_hook_panics_total` (counter): panics caught inside hooks, by phase
//! - `call_log_loggers_created_total` (counter): registry cache misses
//!
//! # Design Decisions
//! - Uses the `metrics` facade; exporting is left to the host process

use crate::level::Level;

pub fn record_emitted(phase: &'static str, level: Level) {
    ::metrics::counter!("call_log_records_total", "phase" => phase, "level" => level.as_str())
        .increment(1);
}

pub fn record_emit_failure(phase: &'static str) {
    ::metrics::counter!("call_log_emit_failures_total", "phase" => phase).increment(1);
}

pub fn record_render_failure() {
    ::metrics::counter!("call_log_render_failures_total").increment(1);
}

pub fn record_hook_panic(phase: &'static str) {
    ::metrics::counter!("call_log_hook_panics_total", "phase" => phase).increment(1);
}

pub fn record_logger_created() {
    ::metrics::counter!("call_log_loggers_created_total").increment(1);
}
