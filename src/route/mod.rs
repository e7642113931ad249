pub mod model;
pub mod post;
pub mod status;
