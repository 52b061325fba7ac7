pub mod search_response;
pub mod ticket_info;
pub mod ticket_update;
pub mod upload_response;
