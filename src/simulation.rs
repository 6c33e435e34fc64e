pub(crate) mod context;
pub(crate) mod params;
pub(crate) mod particles;
pub(crate) mod starfield;
pub(crate) mod types;
