/// Business logic services
pub mod auth_service;
pub mod event_publisher;
pub mod identity_provider;
pub mod profile_store;
pub mod registration;
pub mod session_assembler;
pub mod supabase;
pub mod user_messaging;

pub use auth_service::AuthService;
pub use event_publisher::EventPublisher;
pub use identity_provider::IdentityProvider;
pub use profile_store::ProfileStore;
pub use registration::RegistrationOrchestrator;
pub use session_assembler::SessionAssembler;
pub use supabase::SupabaseClient;
pub use user_messaging::UserMessagingService;

#[cfg(test)]
pub use event_publisher::MockEventPublisher;
#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
#[cfg(test)]
pub use profile_store::MockProfileStore;
