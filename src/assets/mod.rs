pub(crate) mod graphics;
pub(crate) mod svg;
