pub mod call_source;
pub mod http;
pub mod result_sink;
