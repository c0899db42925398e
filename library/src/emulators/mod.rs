//! Per-emulator adapters.

pub mod redream;
pub mod rpcs3;

pub use redream::RedreamAdapter;
pub use rpcs3::Rpcs3Adapter;
