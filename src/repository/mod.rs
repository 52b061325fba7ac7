pub mod sqlserver_repository_impl;
pub mod zendesk_repository_impl;
