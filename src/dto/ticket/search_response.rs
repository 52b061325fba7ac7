use crate::common::*;

use crate::dto::ticket::ticket_info::*;

#[doc = "Zendesk search API 응답 한 페이지 - `next_page` 가 있으면 이어서 조회한다"]
#[derive(Debug, Clone, Serialize, Deserialize, Getters, new)]
#[getset(get = "pub")]
pub struct SearchResponse {
    pub results: Vec<TicketInfo>,
    #[serde(default)]
    pub next_page: Option<String>,
}
