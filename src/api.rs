pub mod fusion_solar;
