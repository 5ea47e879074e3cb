pub mod converters;
pub mod pipeline;
