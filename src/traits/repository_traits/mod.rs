pub mod sqlserver_repository;
pub mod ticket_repository;
