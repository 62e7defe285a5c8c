pub mod api;
pub mod command;
pub mod controls;
pub mod gauge;
pub mod outside;
pub mod panel;
pub mod poller;
pub mod snapshot;
pub mod state;
