use crate::common::*;

use image::RgbImage;

#[async_trait]
pub trait ReportService: Send + Sync {
    #[doc = "입력 문서들을 페이지 순서를 보존하며 하나의 문서로 병합한다 - 페이지 0건은 오류"]
    async fn merge_documents(
        &self,
        input_paths: &[PathBuf],
        output_path: &Path,
        title: &str,
    ) -> anyhow::Result<()>;

    #[doc = "병합 문서의 각 페이지를 페이지 순서대로 래스터 이미지로 변환한다"]
    async fn rasterize_document(&self, document_path: &Path) -> anyhow::Result<Vec<RgbImage>>;

    #[doc = "페이지 이미지들을 최소 폭으로 정규화해 세로로 이어붙인 한 장의 PNG 를 저장한다"]
    async fn stack_pages_vertically(
        &self,
        page_images: Vec<RgbImage>,
        output_path: &Path,
    ) -> anyhow::Result<()>;
}
