//! # tutorat
//!
//! Client-side request and session layer for the tutoring platform.
//!
//! This crate holds the authenticated session user, issues REST calls to the
//! tutoring backend (campaigns, subjects, registrations, assignments,
//! tutoring hours and lessons, availability slots), and defines the typed
//! shapes of every resource it exchanges. UI layers compose a
//! [`state::session::SessionStore`] with their own [`ui::Navigator`] and
//! [`ui::Notifier`] implementations.

pub mod config;
pub mod i18n;
pub mod net;
pub mod state;
pub mod ui;
