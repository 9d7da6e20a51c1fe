//! Common response envelope.

use serde::Serialize;

/// Standard success envelope wrapping a payload under `data`.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}
