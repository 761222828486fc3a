pub mod camera_geom;
pub mod logger;
