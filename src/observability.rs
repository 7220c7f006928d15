use biometrics::{Collector, Counter};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("zhv.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("zhv.client.request_errors");

pub(crate) static STREAM_EVENTS: Counter = Counter::new("zhv.stream.events");
pub(crate) static STREAM_ERRORS: Counter = Counter::new("zhv.stream.errors");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);

    collector.register_counter(&STREAM_EVENTS);
    collector.register_counter(&STREAM_ERRORS);
}
