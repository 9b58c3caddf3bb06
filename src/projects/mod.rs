pub mod projects_model;
pub mod projects_repository;
pub mod projects_traits;

pub use projects_model::{NewPhase, NewProject, NewProjectFinances, Phase, Project, ProjectFinances, ThresholdOverrides};
pub use projects_repository::ProjectRepository;
pub use projects_traits::ProjectRepositoryTrait;
