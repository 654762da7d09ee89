pub mod address;
pub mod assist;
pub mod bank;
pub mod campaign;
pub mod dashboard;
pub mod event;
pub mod family;
pub mod location;
pub mod package;
pub mod settings;
