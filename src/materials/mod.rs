pub mod materials_model;
pub mod materials_repository;
pub mod materials_traits;

pub use materials_model::{Material, MaterialFilters, NewMaterial, SpendingBreakdown};
pub use materials_repository::MaterialRepository;
pub use materials_traits::MaterialRepositoryTrait;
