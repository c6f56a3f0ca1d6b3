// Domain layer: navdata models, route graph, geodesy and ports.

pub mod geo;
pub mod graph;
pub mod model;
pub mod ports;
