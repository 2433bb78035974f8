pub mod cellular;
pub mod composer;
pub mod noise_field;
pub mod placement;
