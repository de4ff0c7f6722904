pub mod exporter;
pub mod ics;
pub mod ndjson;
pub mod txt;
