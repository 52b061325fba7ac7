use crate::common::*;

fn default_ticket_type() -> String {
    String::from("ticket")
}

fn default_statuses() -> Vec<String> {
    vec![String::from("new"), String::from("open")]
}

#[doc = r#"
    Zendesk API 계정 정보와 티켓 검색 필터.

    `entity_field_id` 는 엔터티 라벨이 들어있는 커스텀 필드의 id 로,
    해당 필드 값은 `entity:"<label>"` 형식을 따라야 한다.
"#]
#[derive(Debug, Deserialize, Serialize, Getters)]
#[getset(get = "pub")]
pub struct ZendeskConfig {
    pub subdomain: String,
    pub email: String,
    pub token: String,
    pub search_group: String,
    #[serde(default = "default_ticket_type")]
    pub ticket_type: String,
    #[serde(default = "default_statuses")]
    pub statuses: Vec<String>,
    pub entity_field_id: u64,
}
