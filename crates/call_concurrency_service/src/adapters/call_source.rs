use call_concurrency_core::Call;

use crate::error::AdapterError;

pub trait CallSource {
    fn fetch_calls(&self) -> Result<Vec<Call>, AdapterError>;
}
