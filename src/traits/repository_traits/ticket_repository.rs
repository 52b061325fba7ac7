use crate::common::*;

use crate::dto::ticket::ticket_info::*;

#[async_trait]
pub trait TicketRepository: Send + Sync {
    async fn search_tickets(
        &self,
        created_from: &str,
        created_to: &str,
    ) -> Result<Vec<TicketInfo>, anyhow::Error>;
    async fn upload_attachment(&self, file_path: &Path) -> Result<String, anyhow::Error>;
    async fn add_ticket_comment(
        &self,
        ticket_id: u64,
        body: &str,
        upload_token: &str,
    ) -> Result<(), anyhow::Error>;
}
