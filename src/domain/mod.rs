// Domain layer: models and ports shared by the lessons and the runner.

pub mod model;
pub mod ports;
