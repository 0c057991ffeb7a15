pub mod recognition_session;
pub mod upload_controller;
