//! Application services

pub mod render;
pub mod tech_tree;

pub use render::{OutputSpec, RenderOutput, RenderService};
pub use tech_tree::TechTreeService;
