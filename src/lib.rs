// Staffcall - function-calling chat client
// Library exports

pub mod app;
pub mod chat;
pub mod cli;
pub mod config;
pub mod directory; // Employee records and lookup policies
pub mod errors;
pub mod providers; // Chat-completion providers
pub mod tools; // Tool declaration and execution
