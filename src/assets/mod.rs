pub(crate) mod decode;
pub(crate) mod paths;
pub(crate) mod store;
