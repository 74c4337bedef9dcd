// Domain layer: models and ports. The core depends on these traits, never on the host directly.

pub mod model;
pub mod ports;
