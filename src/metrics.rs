use lazy_static::lazy_static;
use prometheus::{
    Counter, Encoder, Histogram, TextEncoder, register_counter, register_histogram,
};


lazy_static! {
    pub static ref DISPATCH_TOTAL: Counter =
        register_counter!("redlama_dispatch_total", "Total number of dispatched prompts").unwrap();
    pub static ref CACHE_HITS: Counter =
        register_counter!("redlama_cache_hits_total", "Total cache hits").unwrap();
    pub static ref CACHE_MISSES: Counter =
        register_counter!("redlama_cache_misses_total", "Total cache misses").unwrap();
    pub static ref CACHE_WRITE_FAILURES: Counter = register_counter!(
        "redlama_cache_write_failures_total",
        "Backend responses that could not be written to the cache"
    )
    .unwrap();
    pub static ref BACKEND_FAILURES: Counter =
        register_counter!("redlama_backend_failures_total", "Failed backend calls").unwrap();
    pub static ref BACKEND_LATENCY: Histogram = register_histogram!(
        "redlama_backend_latency_seconds",
        "Ollama generate latency in seconds"
    )
    .unwrap();
}

// Text exposition of everything registered in the default registry
pub fn render() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return format!("# failed to encode metrics: {e}\n");
    }
    String::from_utf8_lossy(&buffer).into_owned()
}
