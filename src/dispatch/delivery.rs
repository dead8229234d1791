//! Hand-off of drained prompts to the transformation connection.

use crate::collab::TransformConnection;
use crate::selector::ModeSwitch;
use crate::{log_debug, log_debug_content};

use super::DispatchItem;

/// Outcome of one drain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub sent: usize,
    /// Items discarded because the connection was not ready.
    pub dropped: usize,
    pub mode_switches: usize,
}

/// Deliver `items` in order. Items the connection cannot take right now are
/// dropped, never re-queued.
pub fn deliver(
    items: Vec<DispatchItem>,
    connection: &mut impl TransformConnection,
    mode_switch: &mut ModeSwitch,
    now: f64,
) -> DeliveryReport {
    let mut report = DeliveryReport::default();
    for item in items {
        if !connection.is_ready() {
            report.dropped += 1;
            log_debug(&format!(
                "connection unavailable; dropping {} prompt queued at {:.3}s",
                item.mode.label(),
                item.enqueued_at
            ));
            log_debug_content(&format!("dropped prompt: {}", item.payload));
            tracing::warn!(
                mode = item.mode.label(),
                queued_for_secs = now - item.enqueued_at,
                "prompt dropped (connection unavailable)"
            );
            continue;
        }
        if mode_switch.ensure(connection, item.mode) {
            report.mode_switches += 1;
            log_debug(&format!("switched connection to {} mode", item.mode.label()));
        }
        connection.send_prompt(&item.payload);
        report.sent += 1;
        log_debug_content(&format!("sent prompt: {}", item.payload));
        tracing::info!(
            mode = item.mode.label(),
            queued_for_secs = now - item.enqueued_at,
            chars = item.payload.chars().count(),
            "prompt delivered"
        );
    }
    report
}
