//! HTTP handlers for archive pages and forms.

pub mod application;
pub mod donor;
pub mod index;
pub mod scholarship;
