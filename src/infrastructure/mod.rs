pub mod console_notifier;
pub mod fake_provider;
pub mod file_store;
pub mod memory_store;
pub mod ovh_provider;
pub mod sqlite_store;
pub mod telegram_notifier;
