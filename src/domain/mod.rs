// Domain layer: failure model and the ports services implement.

pub mod model;
pub mod ports;
