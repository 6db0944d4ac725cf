//! HTTP handlers: generic resources, enquiries, sales, business profile, upload, auth.

pub mod auth;
pub mod enquiry;
pub mod profile;
pub mod resource;
pub mod sales;
pub mod upload;
