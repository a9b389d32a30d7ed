//! Client-side core of the `NutriAdmin` dashboard.
//!
//! The crate owns everything the admin front ends share: the persisted
//! session and its decoded identity, the role-gated route table, the REST
//! client, and the generic resource table that drives list/edit/delete/create
//! for users, recipes, news, and notifications.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![deny(warnings, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod guard;
pub mod models;
pub mod resource;
pub mod session;
pub mod validation;
