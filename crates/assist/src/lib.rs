//! Generative-AI text assist for the console forms.
//!
//! Three capabilities: campaign description generation, package item
//! suggestion, and free-text family extraction. Everything produced
//! here is a suggestion for the operator to review; nothing is written
//! to the store by this crate. Without a configured credential every
//! call returns [`AssistError::Unavailable`].

pub mod client;
pub mod types;

pub use client::{AssistClient, AssistError};
pub use types::{FamilyDraft, SuggestedItem};
