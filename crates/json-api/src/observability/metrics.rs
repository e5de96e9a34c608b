//! Prometheus HTTP metrics and the `/metrics` endpoint.
//!
//! Label values come from closed sets ([`Route`], [`method_label`] and the
//! status code), so a client probing random paths cannot grow the registry.

use std::sync::OnceLock;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};
use salvo::{
    Response, handler,
    http::{
        StatusCode,
        header::{CONTENT_TYPE, HeaderValue},
    },
};
use tracing::error;

const LATENCY_BUCKETS: [f64; 11] = [
    0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 5.0,
];

/// The route family a request path belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Route {
    LandingPage,
    Health,
    Metrics,
    Products,
    Product,
    Docs,
    StaticFile,
    Unknown,
}

impl Route {
    pub(super) fn classify(path: &str) -> Self {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Self::LandingPage,
            ["health"] => Self::Health,
            ["metrics"] => Self::Metrics,
            ["api", "productos"] => Self::Products,
            ["api", "productos", _] => Self::Product,
            ["api-doc" | "docs", ..] => Self::Docs,
            ["api", ..] => Self::Unknown,
            _ => Self::StaticFile,
        }
    }

    pub(super) fn label(self) -> &'static str {
        match self {
            Self::LandingPage => "/",
            Self::Health => "/health",
            Self::Metrics => "/metrics",
            Self::Products => "/api/productos",
            Self::Product => "/api/productos/{id}",
            Self::Docs => "/docs",
            Self::StaticFile => "static",
            Self::Unknown => "other",
        }
    }
}

pub(super) fn method_label(method: &str) -> &'static str {
    match method {
        "GET" => "GET",
        "POST" => "POST",
        "PUT" => "PUT",
        "DELETE" => "DELETE",
        "HEAD" => "HEAD",
        "OPTIONS" => "OPTIONS",
        "PATCH" => "PATCH",
        _ => "OTHER",
    }
}

#[derive(Debug)]
struct HttpMetrics {
    registry: Registry,
    requests_total: IntCounterVec,
    request_duration_seconds: HistogramVec,
    requests_in_flight: IntGauge,
}

impl HttpMetrics {
    fn build() -> Result<Self, prometheus::Error> {
        let registry = Registry::new_custom(Some("stockroom_json".to_owned()), None)?;

        let requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "HTTP requests by method, route and status."),
            &["method", "route", "status_class", "status_code"],
        )?;

        let request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request latency in seconds by method and route.",
            )
            .buckets(LATENCY_BUCKETS.to_vec()),
            &["method", "route"],
        )?;

        let requests_in_flight = IntGauge::new(
            "http_requests_in_flight",
            "HTTP requests currently being handled.",
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(request_duration_seconds.clone()))?;
        registry.register(Box::new(requests_in_flight.clone()))?;

        Ok(Self {
            registry,
            requests_total,
            request_duration_seconds,
            requests_in_flight,
        })
    }
}

static HTTP_METRICS: OnceLock<Option<HttpMetrics>> = OnceLock::new();

fn metrics() -> Option<&'static HttpMetrics> {
    HTTP_METRICS
        .get_or_init(|| {
            HttpMetrics::build()
                .inspect_err(|source| error!("failed to build HTTP metrics: {source}"))
                .ok()
        })
        .as_ref()
}

/// Counts a request as in flight until dropped.
#[derive(Debug)]
pub(super) struct InFlightRequestGuard {
    gauge: Option<&'static IntGauge>,
}

impl InFlightRequestGuard {
    pub(super) fn track() -> Self {
        let gauge = metrics().map(|metrics| &metrics.requests_in_flight);

        if let Some(gauge) = gauge {
            gauge.inc();
        }

        Self { gauge }
    }
}

impl Drop for InFlightRequestGuard {
    fn drop(&mut self) {
        if let Some(gauge) = self.gauge {
            gauge.dec();
        }
    }
}

pub(super) fn observe_request(
    method: &'static str,
    route: Route,
    status: StatusCode,
    duration_seconds: f64,
) {
    let Some(metrics) = metrics() else {
        return;
    };

    let route = route.label();

    metrics
        .requests_total
        .with_label_values(&[method, route, status_class(status), status.as_str()])
        .inc();

    metrics
        .request_duration_seconds
        .with_label_values(&[method, route])
        .observe(duration_seconds);
}

fn status_class(status: StatusCode) -> &'static str {
    if status.is_informational() {
        "1xx"
    } else if status.is_success() {
        "2xx"
    } else if status.is_redirection() {
        "3xx"
    } else if status.is_client_error() {
        "4xx"
    } else {
        "5xx"
    }
}

#[handler]
pub(crate) async fn metrics_handler(res: &mut Response) {
    let Some(metrics) = metrics() else {
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
        return;
    };

    let encoder = TextEncoder::new();
    let mut encoded = Vec::new();

    if let Err(source) = encoder.encode(&metrics.registry.gather(), &mut encoded) {
        error!("failed to encode metrics: {source}");
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
        return;
    }

    res.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static(prometheus::TEXT_FORMAT),
    );

    if let Err(source) = res.write_body(encoded) {
        error!("failed to write metrics body: {source}");
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
    }
}
