//! Segmenta - CRM customer segmentation engine.
//!
//! RFM (recency, frequency, monetary) scoring over a transactional CRM
//! database, with social and email campaign management built on the
//! resulting segments, a JSON tool surface, and file-based chart output.

pub mod campaign;
pub mod charts;
pub mod config;
pub mod content;
pub mod interfaces;
pub mod model;
pub mod segmentation;
pub mod storage;
pub mod tools;
