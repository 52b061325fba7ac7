use crate::common::*;

#[doc = "첨부 업로드 응답의 upload 블록 - token 만 사용한다"]
#[derive(Debug, Clone, Serialize, Deserialize, Getters, new)]
#[getset(get = "pub")]
pub struct UploadInfo {
    pub token: String,
}

#[doc = "Zendesk uploads API 응답"]
#[derive(Debug, Clone, Serialize, Deserialize, Getters, new)]
#[getset(get = "pub")]
pub struct UploadResponse {
    pub upload: UploadInfo,
}
