pub(crate) mod coords;
pub(crate) mod model;
pub(crate) mod parse;
