pub mod activation_model;
pub mod activation_repository;
pub mod activation_service;
pub mod activation_traits;

pub use activation_model::{
    ActivationOutcome, ActivationState, BudgetBaseline, CapitalBaseline, CapitalUsage,
    EffectiveSpending,
};
pub use activation_repository::ActivationRepository;
pub use activation_service::{needs_activation, ActivationService};
pub use activation_traits::{ActivationRepositoryTrait, ActivationServiceTrait};
