//! Prometheus metrics for the note pipeline and the broadcaster.

use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

pub struct Metrics {
    registry: Registry,
    pub notes_submitted: IntCounter,
    pub ws_messages_broadcast: IntCounter,
    pub ws_connections: IntGauge,
    /// Labelled by `op` (generate/summarize) and `outcome` (ok/error).
    pub model_requests: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new_custom(Some("notakers".to_string()), None)?;

        let notes_submitted =
            IntCounter::new("notes_submitted_total", "Notes persisted to storage")?;
        let ws_messages_broadcast = IntCounter::new(
            "ws_messages_broadcast_total",
            "Inbound WebSocket messages fanned out",
        )?;
        let ws_connections = IntGauge::new("ws_connections", "Open WebSocket connections")?;
        let model_requests = IntCounterVec::new(
            Opts::new("model_requests_total", "Inference jobs by operation and outcome"),
            &["op", "outcome"],
        )?;

        registry.register(Box::new(notes_submitted.clone()))?;
        registry.register(Box::new(ws_messages_broadcast.clone()))?;
        registry.register(Box::new(ws_connections.clone()))?;
        registry.register(Box::new(model_requests.clone()))?;

        Ok(Self {
            registry,
            notes_submitted,
            ws_messages_broadcast,
            ws_connections,
            model_requests,
        })
    }

    /// Text exposition of every registered metric.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_includes_prefixed_names() {
        let m = Metrics::new().unwrap();
        m.notes_submitted.inc();
        m.model_requests.with_label_values(&["generate", "ok"]).inc();

        let text = m.render().unwrap();
        assert!(text.contains("notakers_notes_submitted_total 1"));
        assert!(text.contains("notakers_model_requests_total{op=\"generate\",outcome=\"ok\"} 1"));
    }
}
