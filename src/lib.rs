//! Glucosync core library
//!
//! Shared by the training binary (`glucosync-train`), the realtime
//! inference service (`glucosync`) and the serial probe (`glucosync-probe`).

pub mod constants;
pub mod logic;
