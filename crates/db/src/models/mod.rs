pub mod campaign;
pub mod scene;
