pub mod cell;
pub mod color;
pub mod grid;
pub mod layer;
pub mod logging;
pub mod params;
pub mod prop;
pub mod random;
