// Saved job offers: persistence seam, bookmark/list endpoints and pipeline
// metrics. Status transitions live in `crate::status`.

pub mod handlers;
pub mod metrics;
pub mod store;
