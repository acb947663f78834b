//! Infrastructure layer: order persistence adapters and command orchestration.

pub mod command_handler;
pub mod order_store;
