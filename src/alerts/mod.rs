pub mod alerts_model;
pub mod alerts_repository;
pub mod alerts_service;
pub mod alerts_traits;

pub use alerts_model::{
    AlertRunSummary, AuditLog, DiscrepancyEmail, NewAuditLog, NewNotification, NewUser,
    Notification, User,
};
pub use alerts_repository::AlertRepository;
pub use alerts_service::{AlertService, LogOnlyEmailSink};
pub use alerts_traits::{
    AlertServiceTrait, AuditSinkTrait, EmailSinkTrait, NotificationSinkTrait,
    RecipientDirectoryTrait,
};
