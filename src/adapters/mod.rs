// Adapters layer: turn bytes into sheets and processed results back into bytes.

pub mod export;
pub mod reader;
