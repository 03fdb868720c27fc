//! Publishing genotyped and imputed dataset files under a project directory.
//!
//! Independent of the munging pipeline: a project directory gets `genotyped/`
//! and `imputed/` folders of symbolic links named after the project id.

mod plan;

pub use plan::{LinkAction, LinkConfig, LinkPlan, project_id_from_path};
