// Domain layer: sheet/result models and the ports the pipeline is built on.

pub mod model;
pub mod ports;
pub mod result;
