/// Performance instrumentation utilities

/// Time a pipeline stage: opens a profiler scope and logs the elapsed time
/// at debug level.
/// Usage: timed!("stage name", { code })
#[macro_export]
macro_rules! timed {
    ($name:expr, $block:expr) => {{
        profiling::scope!($name);
        let _t = std::time::Instant::now();
        let r = $block;
        tracing::debug!(stage = $name, elapsed = ?_t.elapsed(), "stage finished");
        r
    }};
}
