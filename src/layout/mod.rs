pub(crate) mod viewport;
