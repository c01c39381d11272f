pub(crate) mod color;
pub(crate) mod dataset;
pub(crate) mod load;
