pub mod mock_server;
pub mod recording_ui;
