// ABOUTME: The `clock` native function, returning milliseconds since the Unix epoch

use crate::value::Value;
use std::time::{SystemTime, UNIX_EPOCH};

pub fn clock(_args: &[Value]) -> Value {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    Value::Number(elapsed.as_millis() as f64)
}
