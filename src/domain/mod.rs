// Domain layer: request identity, the response envelope and the ports the client depends on.

pub mod model;
pub mod ports;
