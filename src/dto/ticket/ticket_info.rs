use crate::common::*;

#[doc = "티켓 커스텀 필드 - 값 타입은 필드 정의에 따라 달라지므로 Value 로 받는다"]
#[derive(Debug, Clone, Serialize, Deserialize, Getters, new)]
#[getset(get = "pub")]
pub struct CustomField {
    pub id: u64,
    pub value: Option<Value>,
}

#[doc = "Zendesk 검색 결과의 티켓 한 건"]
#[derive(Debug, Clone, Serialize, Deserialize, Getters, new)]
#[getset(get = "pub")]
pub struct TicketInfo {
    pub id: u64,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,
}

impl TicketInfo {
    #[doc = "지정한 id 의 커스텀 필드 문자열 값을 찾아주는 함수"]
    pub fn custom_field_value(&self, field_id: u64) -> Option<&str> {
        self.custom_fields
            .iter()
            .find(|field| field.id == field_id)
            .and_then(|field| field.value.as_ref())
            .and_then(|value| value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_field_lookup_by_id() {
        let ticket: TicketInfo = serde_json::from_value(json!({
            "id": 981,
            "subject": "Chart request",
            "custom_fields": [
                { "id": 100, "value": null },
                { "id": 200, "value": "entity:\"Acme-1\"" },
                { "id": 300, "value": 42 }
            ]
        }))
        .unwrap();

        assert_eq!(ticket.custom_field_value(200), Some("entity:\"Acme-1\""));
        assert_eq!(ticket.custom_field_value(100), None);
        assert_eq!(ticket.custom_field_value(300), None);
        assert_eq!(ticket.custom_field_value(999), None);
    }
}
