/// Data models for the auth gateway
pub mod event;
pub mod profile;
pub mod session;
pub mod user;

pub use event::{UserSignUpMessage, USER_SIGN_UP_TOPIC};
pub use profile::LocalProfile;
pub use session::{RawSession, Session};
pub use user::{
    Credentials, ExternalIdentity, RawUser, SignInRequest, SignOutRequest, SignUpRequest,
    UserMetadata,
};
