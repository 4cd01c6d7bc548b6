//! The five `(model, version)`-labeled metrics from §6. Each
//! [`DataPlaneMetrics`] owns its own [`prometheus::Registry`] rather than
//! the process-wide default one, so constructing more than one (as tests
//! routinely do) never collides on a duplicate-registration error.

use prometheus::{CounterVec, Encoder, GaugeVec, HistogramTimer, HistogramVec, Opts, Registry, TextEncoder};

/// `version == None` must render as the empty string in every label tuple,
/// to avoid label cardinality drift between a model's versioned and
/// version-less incarnations (§5).
pub fn version_label(version: Option<&str>) -> &str {
    version.unwrap_or("")
}

pub struct DataPlaneMetrics {
    registry: Registry,
    total: CounterVec,
    success: CounterVec,
    failure: CounterVec,
    duration: HistogramVec,
    sla: GaugeVec,
}

impl DataPlaneMetrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let total = CounterVec::new(
            Opts::new("model_infer_request_total", "Model infer request total count"),
            &["model", "version"],
        )
        .expect("model_infer_request_total opts");

        let success = CounterVec::new(
            Opts::new(
                "model_infer_request_success",
                "Model infer request success count",
            ),
            &["model", "version"],
        )
        .expect("model_infer_request_success opts");

        let failure = CounterVec::new(
            Opts::new(
                "model_infer_request_failure",
                "Model infer request failure count",
            ),
            &["model", "version"],
        )
        .expect("model_infer_request_failure opts");

        let duration = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "model_infer_request_duration",
                "Model infer request duration",
            ),
            &["model", "version"],
        )
        .expect("model_infer_request_duration opts");

        let sla = GaugeVec::new(
            Opts::new(
                "model_infer_request_sla",
                "Model request Service Level Agreement (SLA)",
            ),
            &["model", "version"],
        )
        .expect("model_infer_request_sla opts");

        registry
            .register(Box::new(total.clone()))
            .expect("register model_infer_request_total");
        registry
            .register(Box::new(success.clone()))
            .expect("register model_infer_request_success");
        registry
            .register(Box::new(failure.clone()))
            .expect("register model_infer_request_failure");
        registry
            .register(Box::new(duration.clone()))
            .expect("register model_infer_request_duration");
        registry
            .register(Box::new(sla.clone()))
            .expect("register model_infer_request_sla");

        Self {
            registry,
            total,
            success,
            failure,
            duration,
            sla,
        }
    }

    pub fn inc_total(&self, model: &str, version: Option<&str>) {
        self.total.with_label_values(&[model, version_label(version)]).inc();
    }

    pub fn inc_success(&self, model: &str, version: Option<&str>) {
        self.success
            .with_label_values(&[model, version_label(version)])
            .inc();
    }

    pub fn inc_failure(&self, model: &str, version: Option<&str>) {
        self.failure
            .with_label_values(&[model, version_label(version)])
            .inc();
    }

    pub fn set_sla(&self, model: &str, version: Option<&str>, value: f64) {
        self.sla.with_label_values(&[model, version_label(version)]).set(value);
    }

    /// Starts a duration timer; drop (or `stop_and_record`) to observe it.
    pub fn start_duration_timer(&self, model: &str, version: Option<&str>) -> HistogramTimer {
        self.duration
            .with_label_values(&[model, version_label(version)])
            .start_timer()
    }

    /// Renders this registry in the Prometheus text exposition format, for
    /// the `/metrics` endpoint.
    pub fn gather_text(&self) -> String {
        let metric_families = self.registry.gather();
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .expect("prometheus text encoding");
        String::from_utf8(buffer).expect("prometheus text encoding is valid utf-8")
    }
}

impl Default for DataPlaneMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_label_renders_none_as_empty_string() {
        assert_eq!(version_label(None), "");
        assert_eq!(version_label(Some("1")), "1");
    }

    #[test]
    fn counters_increment_independently_per_label_tuple() {
        let metrics = DataPlaneMetrics::new();
        metrics.inc_total("iris", Some("1"));
        metrics.inc_total("iris", Some("1"));
        metrics.inc_total("iris", None);

        let text = metrics.gather_text();
        assert!(text.contains("model_infer_request_total"));
    }

    #[test]
    fn two_instances_do_not_collide_on_registration() {
        let _a = DataPlaneMetrics::new();
        let _b = DataPlaneMetrics::new();
    }
}
