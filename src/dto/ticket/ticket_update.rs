use crate::common::*;

#[doc = "티켓에 남길 비공개 코멘트 - 업로드 토큰으로 첨부를 연결한다"]
#[derive(Debug, Clone, Serialize, Deserialize, Getters, new)]
#[getset(get = "pub")]
pub struct TicketComment {
    pub body: String,
    pub public: bool,
    pub uploads: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Getters, new)]
#[getset(get = "pub")]
pub struct TicketUpdate {
    pub comment: TicketComment,
}

#[doc = "Zendesk ticket update API 요청 본문"]
#[derive(Debug, Clone, Serialize, Deserialize, Getters, new)]
#[getset(get = "pub")]
pub struct TicketUpdateRequest {
    pub ticket: TicketUpdate,
}
