// Domain layer: gazette documents, movements, results and the output port.

pub mod model;
pub mod ports;
