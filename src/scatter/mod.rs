pub(crate) mod bias;
pub(crate) mod builder;
pub(crate) mod item;
pub(crate) mod mask;
pub(crate) mod rng;
