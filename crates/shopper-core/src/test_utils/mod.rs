pub mod mock_finding_server;
pub mod mock_transport;
