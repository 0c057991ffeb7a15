pub mod static_server;
pub mod terminal_view;
