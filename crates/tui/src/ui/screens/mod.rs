pub mod auth;
pub mod entries;
pub mod entry_form;
pub mod home;
pub mod profile;
pub mod recovery;
pub mod summary;
