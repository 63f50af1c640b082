pub(crate) mod common;

mod attrition;
mod pipeline;
mod routing;
