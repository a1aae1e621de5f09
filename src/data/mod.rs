//! Dataset loading module

pub mod parquet;
