pub(crate) mod animation;
pub(crate) mod board_image;
pub(crate) mod interpreter;
pub(crate) mod layers;
pub(crate) mod paint;
pub(crate) mod pipeline;
