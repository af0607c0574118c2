/// Database access for local profiles
use sqlx::migrate::Migrator;

pub mod profiles;

pub use profiles::PgProfileStore;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");
