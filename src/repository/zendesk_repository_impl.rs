use crate::common::*;

use crate::model::configs::zendesk_config::*;

use crate::traits::repository_traits::ticket_repository::*;

use crate::dto::ticket::{
    search_response::*, ticket_info::*, ticket_update::*, upload_response::*,
};

use crate::utils_modules::io_utils::*;

#[derive(Debug)]
pub struct ZendeskRepositoryImpl {
    client: Client,
    base_url: String,
    auth_user: String,
    auth_token: String,
    zendesk_config: &'static ZendeskConfig,
}

impl ZendeskRepositoryImpl {
    pub fn new(zendesk_config: &'static ZendeskConfig) -> Result<Self, anyhow::Error> {
        let client: Client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                anyhow!(
                    "[ZendeskRepositoryImpl->new] Failed to build the HTTP client: {:?}",
                    e
                )
            })?;

        let base_url: String = format!("https://{}.zendesk.com/api/v2", zendesk_config.subdomain());

        /* Zendesk API token auth: '<email>/token' + API token */
        let auth_user: String = format!("{}/token", zendesk_config.email());

        Ok(ZendeskRepositoryImpl {
            client,
            base_url,
            auth_user,
            auth_token: zendesk_config.token().to_string(),
            zendesk_config,
        })
    }

    #[doc = "검색 필터(유형/그룹/상태/생성일 범위)를 search API 쿼리 문자열로 조립해주는 함수"]
    fn build_search_query(&self, created_from: &str, created_to: &str) -> String {
        let mut query: String = format!(
            "type:{} group:\"{}\" created>{} created<{}",
            self.zendesk_config.ticket_type(),
            self.zendesk_config.search_group(),
            created_from,
            created_to
        );

        for status in self.zendesk_config.statuses() {
            query.push_str(&format!(" status:{}", status));
        }

        query
    }
}

#[async_trait]
impl TicketRepository for ZendeskRepositoryImpl {
    #[doc = r#"
        생성일 범위/그룹/유형/상태로 필터링된 티켓을 조회하는 함수.

        1. 검색 쿼리 문자열을 조립해 `GET /search.json` 호출
        2. 응답의 `next_page` 가 존재하는 동안 다음 페이지를 이어서 조회
        3. 모든 페이지의 결과를 하나의 목록으로 합쳐 반환

        # Arguments
        * `created_from` / `created_to` - 생성일 범위 (`%Y-%m-%d`)

        # Returns
        * `Vec<TicketInfo>` - 매칭된 티켓 목록
        * `anyhow::Error` - 요청 실패 또는 비정상 응답 상태 시
    "#]
    async fn search_tickets(
        &self,
        created_from: &str,
        created_to: &str,
    ) -> Result<Vec<TicketInfo>, anyhow::Error> {
        let query: String = self.build_search_query(created_from, created_to);

        let mut tickets: Vec<TicketInfo> = Vec::new();
        let mut next_url: Option<String> = Some(format!(
            "{}/search.json?query={}",
            self.base_url,
            encode(&query)
        ));

        while let Some(url) = next_url {
            let response: reqwest::Response = self
                .client
                .get(&url)
                .basic_auth(&self.auth_user, Some(&self.auth_token))
                .send()
                .await
                .map_err(|e| {
                    anyhow!(
                        "[ZendeskRepositoryImpl->search_tickets] Search request failed: {:?}",
                        e
                    )
                })?;

            if !response.status().is_success() {
                let status: reqwest::StatusCode = response.status();
                let error_body: String = response.text().await.unwrap_or_default();
                return Err(anyhow!(
                    "[Zendesk Error][search_tickets()] response status is failed: {} {}",
                    status,
                    error_body
                ));
            }

            let page: SearchResponse = response.json::<SearchResponse>().await.map_err(|e| {
                anyhow!(
                    "[ZendeskRepositoryImpl->search_tickets] Failed to parse the search response: {:?}",
                    e
                )
            })?;

            tickets.extend(page.results);
            next_url = page.next_page;
        }

        Ok(tickets)
    }

    #[doc = r#"
        파일 한 개를 티켓 첨부용으로 업로드하고 업로드 토큰을 반환하는 함수.

        # Arguments
        * `file_path` - 업로드할 파일 경로

        # Returns
        * `String` - 티켓 갱신 시 첨부를 연결할 업로드 토큰
        * `anyhow::Error` - 파일 읽기 실패, 요청 실패, 비정상 응답 상태 시
    "#]
    async fn upload_attachment(&self, file_path: &Path) -> Result<String, anyhow::Error> {
        let file_name: &str = file_path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                anyhow!(
                    "[ZendeskRepositoryImpl->upload_attachment] Invalid file name: {:?}",
                    file_path
                )
            })?;

        let file_bytes: Vec<u8> = tokio::fs::read(file_path).await.map_err(|e| {
            anyhow!(
                "[ZendeskRepositoryImpl->upload_attachment] Failed to read {:?}: {:?}",
                file_path,
                e
            )
        })?;

        let url: String = format!("{}/uploads.json?filename={}", self.base_url, encode(file_name));

        let response: reqwest::Response = self
            .client
            .post(&url)
            .basic_auth(&self.auth_user, Some(&self.auth_token))
            .header("Content-Type", "application/binary")
            .body(file_bytes)
            .send()
            .await
            .map_err(|e| {
                anyhow!(
                    "[ZendeskRepositoryImpl->upload_attachment] Upload request failed: {:?}",
                    e
                )
            })?;

        if !response.status().is_success() {
            let status: reqwest::StatusCode = response.status();
            let error_body: String = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "[Zendesk Error][upload_attachment()] response status is failed: {} {}",
                status,
                error_body
            ));
        }

        let upload_response: UploadResponse =
            response.json::<UploadResponse>().await.map_err(|e| {
                anyhow!(
                    "[ZendeskRepositoryImpl->upload_attachment] Failed to parse the upload response: {:?}",
                    e
                )
            })?;

        info!("Attachment uploaded successfully: {}", file_name);

        Ok(upload_response.upload.token)
    }

    #[doc = r#"
        티켓에 비공개 코멘트를 남기면서 업로드 토큰으로 첨부를 연결하는 함수.

        # Arguments
        * `ticket_id` - 갱신할 티켓 id
        * `body` - 코멘트 본문
        * `upload_token` - `upload_attachment` 가 반환한 토큰

        # Returns
        * `anyhow::Error` - 요청 실패 또는 비정상 응답 상태 시 (상태코드/본문 포함)
    "#]
    async fn add_ticket_comment(
        &self,
        ticket_id: u64,
        body: &str,
        upload_token: &str,
    ) -> Result<(), anyhow::Error> {
        let request: TicketUpdateRequest = TicketUpdateRequest::new(TicketUpdate::new(
            TicketComment::new(body.to_string(), false, vec![upload_token.to_string()]),
        ));

        let payload: Value = convert_json_from_struct(&request)?;

        let url: String = format!("{}/tickets/{}.json", self.base_url, ticket_id);

        let response: reqwest::Response = self
            .client
            .put(&url)
            .basic_auth(&self.auth_user, Some(&self.auth_token))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                anyhow!(
                    "[ZendeskRepositoryImpl->add_ticket_comment] Update request failed: {:?}",
                    e
                )
            })?;

        if !response.status().is_success() {
            let status: reqwest::StatusCode = response.status();
            let error_body: String = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "[Zendesk Error][add_ticket_comment()] response status is failed: {} {}",
                status,
                error_body
            ));
        }

        info!("Ticket {} updated with the report attachment", ticket_id);

        Ok(())
    }
}
