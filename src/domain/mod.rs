// Domain layer: feature schemas, value types and ports (interfaces).
// No I/O here; adapters and the model module provide the implementations.

pub mod model;
pub mod ports;
pub mod schema;
