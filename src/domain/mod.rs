// Domain layer: remote-owned DTOs and the ports the core is written against.

pub mod model;
pub mod ports;
