pub(crate) mod godrays;
pub(crate) mod vignette;
