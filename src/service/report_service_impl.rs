use crate::common::*;
use crate::traits::service_traits::report_service::*;

use crate::utils_modules::pdf_utils::*;

use image::{ImageFormat, RgbImage, imageops, imageops::FilterType};
use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};

#[derive(Debug, Clone, new)]
pub struct ReportServiceImpl;

impl ReportServiceImpl {
    #[doc = "사전 오브젝트의 /Type 이름을 꺼내주는 함수"]
    fn object_type(object: &Object) -> Option<Vec<u8>> {
        object
            .as_dict()
            .ok()
            .and_then(|dict| dict.get(b"Type").ok())
            .and_then(|type_obj| type_obj.as_name().ok())
            .map(|name| name.to_vec())
    }

    #[doc = r#"
        입력 문서들을 하나의 문서로 병합하는 함수 (동기 - spawn_blocking 내부에서 호출).

        1. 각 입력 문서의 오브젝트 번호를 재부여해 충돌을 피한다
        2. 페이지를 입력 문서 순서 + 문서 내 페이지 순서 그대로 수집한다
        3. 기존 Catalog / Pages 노드는 버리고 새 페이지 트리를 만든다
        4. 수집된 페이지가 0건이면 오류 (조용한 빈 문서 방지)

        # Arguments
        * `input_paths` - 병합할 문서 경로들 (순서 유지)
        * `output_path` - 병합 문서를 저장할 경로
        * `title` - 병합 문서의 Info Title
    "#]
    fn merge_documents_blocking(
        input_paths: &[PathBuf],
        output_path: &Path,
        title: &str,
    ) -> anyhow::Result<()> {
        let mut merged: Document = Document::with_version("1.5");
        let mut page_ids: Vec<ObjectId> = Vec::new();
        let mut max_id: u32 = 1;

        for input_path in input_paths {
            let mut doc: Document = Document::load(input_path).map_err(|e| {
                anyhow!(
                    "[ReportServiceImpl->merge_documents] Failed to load {:?}: {:?}",
                    input_path,
                    e
                )
            })?;

            doc.renumber_objects_with(max_id);
            max_id = doc.max_id + 1;

            page_ids.extend(doc.get_pages().into_values());

            for (object_id, object) in std::mem::take(&mut doc.objects) {
                match Self::object_type(&object).as_deref() {
                    /* 페이지 트리는 아래에서 새로 만든다 */
                    Some(b"Catalog") | Some(b"Pages") => {}
                    _ => {
                        merged.objects.insert(object_id, object);
                    }
                }
            }
        }

        if page_ids.is_empty() {
            return Err(anyhow!(
                "[ReportServiceImpl->merge_documents] Merged document has no pages"
            ));
        }

        merged.max_id = max_id;
        let pages_id: ObjectId = merged.new_object_id();

        for page_id in &page_ids {
            if let Ok(page_object) = merged.get_object_mut(*page_id) {
                if let Ok(page_dict) = page_object.as_dict_mut() {
                    page_dict.set("Parent", pages_id);
                }
            }
        }

        let kids: Vec<Object> = page_ids.iter().map(|id| Object::Reference(*id)).collect();

        merged.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_ids.len() as i64,
            }),
        );

        let catalog_id = merged.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        merged.trailer.set("Root", catalog_id);

        let info_id = merged.add_object(dictionary! {
            "Title" => Object::string_literal(title),
        });
        merged.trailer.set("Info", info_id);

        merged.save(output_path).map_err(|e| {
            anyhow!(
                "[ReportServiceImpl->merge_documents] Failed to save {:?}: {:?}",
                output_path,
                e
            )
        })?;

        Ok(())
    }

    #[doc = r#"
        페이지에 내장된 래스터 이미지를 찾아 디코딩하는 함수.

        차트 문서의 페이지는 DCTDecode 이미지 XObject 한 장으로 구성되므로
        페이지 리소스에서 첫 번째 이미지 XObject 를 디코딩해 반환한다.
        디코딩 가능한 이미지가 없는 페이지는 오류다.
    "#]
    fn extract_page_image(doc: &Document, page_id: ObjectId) -> anyhow::Result<RgbImage> {
        let page_dict: &Dictionary = doc.get_object(page_id)?.as_dict()?;

        let resources: &Dictionary =
            resolve_object(doc, page_dict.get(b"Resources")?).as_dict()?;
        let xobjects: &Dictionary = resolve_object(doc, resources.get(b"XObject")?).as_dict()?;

        for (_name, candidate) in xobjects.iter() {
            let stream = match resolve_object(doc, candidate) {
                Object::Stream(stream) => stream,
                _ => continue,
            };

            let is_image: bool = stream
                .dict
                .get(b"Subtype")
                .and_then(|subtype| subtype.as_name())
                .map(|name| name == &b"Image"[..])
                .unwrap_or(false);

            if !is_image {
                continue;
            }

            let decoded = image::load_from_memory_with_format(&stream.content, ImageFormat::Jpeg)
                .map_err(|e| {
                    anyhow!(
                        "[ReportServiceImpl->extract_page_image] Failed to decode the page raster: {:?}",
                        e
                    )
                })?;

            return Ok(decoded.to_rgb8());
        }

        Err(anyhow!(
            "[ReportServiceImpl->extract_page_image] Page has no decodable raster image"
        ))
    }

    #[doc = "문서의 모든 페이지를 페이지 순서대로 래스터로 변환 (동기) - 페이지 0건은 오류"]
    fn rasterize_blocking(document_path: &Path) -> anyhow::Result<Vec<RgbImage>> {
        let doc: Document = Document::load(document_path).map_err(|e| {
            anyhow!(
                "[ReportServiceImpl->rasterize_document] Failed to load {:?}: {:?}",
                document_path,
                e
            )
        })?;

        let pages: BTreeMap<u32, ObjectId> = doc.get_pages();

        if pages.is_empty() {
            return Err(anyhow!(
                "[ReportServiceImpl->rasterize_document] Document {:?} has no pages",
                document_path
            ));
        }

        let mut page_images: Vec<RgbImage> = Vec::new();

        for (page_number, page_id) in pages {
            let page_image: RgbImage = Self::extract_page_image(&doc, page_id).map_err(|e| {
                anyhow!(
                    "[ReportServiceImpl->rasterize_document] Page {} of {:?}: {:?}",
                    page_number,
                    document_path,
                    e
                )
            })?;

            page_images.push(page_image);
        }

        Ok(page_images)
    }

    #[doc = r#"
        페이지 이미지들을 세로로 이어붙이는 함수 (동기).

        1. 가장 좁은 페이지 폭을 기준 폭으로 잡는다
        2. 기준 폭보다 넓은 페이지는 종횡비를 유지한 채 축소한다 (크롭 없음)
        3. 위에서 아래로 페이지 순서대로 이어붙여 PNG 로 저장한다
    "#]
    fn stack_blocking(page_images: Vec<RgbImage>, output_path: &Path) -> anyhow::Result<()> {
        if page_images.is_empty() {
            return Err(anyhow!(
                "[ReportServiceImpl->stack_pages_vertically] There are no page images to stack"
            ));
        }

        let min_width: u32 = page_images
            .iter()
            .map(|page| page.width())
            .min()
            .unwrap_or(0);

        if min_width == 0 {
            return Err(anyhow!(
                "[ReportServiceImpl->stack_pages_vertically] Page images have zero width"
            ));
        }

        let resized: Vec<RgbImage> = page_images
            .into_iter()
            .map(|page| {
                if page.width() == min_width {
                    page
                } else {
                    let scaled_height: u32 = ((page.height() as u64 * min_width as u64)
                        / page.width() as u64)
                        .max(1) as u32;

                    imageops::resize(&page, min_width, scaled_height, FilterType::CatmullRom)
                }
            })
            .collect();

        let total_height: u32 = resized.iter().map(|page| page.height()).sum();
        let mut stacked: RgbImage = RgbImage::new(min_width, total_height);

        let mut y_offset: i64 = 0;
        for page in &resized {
            imageops::replace(&mut stacked, page, 0, y_offset);
            y_offset += page.height() as i64;
        }

        stacked.save(output_path).map_err(|e| {
            anyhow!(
                "[ReportServiceImpl->stack_pages_vertically] Failed to save {:?}: {:?}",
                output_path,
                e
            )
        })?;

        Ok(())
    }
}

#[async_trait]
impl ReportService for ReportServiceImpl {
    async fn merge_documents(
        &self,
        input_paths: &[PathBuf],
        output_path: &Path,
        title: &str,
    ) -> anyhow::Result<()> {
        let input_paths: Vec<PathBuf> = input_paths.to_vec();
        let output_path_buf: PathBuf = output_path.to_path_buf();
        let title: String = title.to_string();

        let handle: tokio::task::JoinHandle<Result<(), anyhow::Error>> =
            tokio::task::spawn_blocking(move || {
                Self::merge_documents_blocking(&input_paths, &output_path_buf, &title)
            });

        handle
            .await
            .context("[ReportServiceImpl->merge_documents] blocking task join failed")??;

        info!("Documents merged successfully: {:?}", output_path);

        Ok(())
    }

    async fn rasterize_document(&self, document_path: &Path) -> anyhow::Result<Vec<RgbImage>> {
        let document_path_buf: PathBuf = document_path.to_path_buf();

        let handle: tokio::task::JoinHandle<Result<Vec<RgbImage>, anyhow::Error>> =
            tokio::task::spawn_blocking(move || Self::rasterize_blocking(&document_path_buf));

        let page_images: Vec<RgbImage> = handle
            .await
            .context("[ReportServiceImpl->rasterize_document] blocking task join failed")??;

        info!(
            "Document rasterized into {} page image(s): {:?}",
            page_images.len(),
            document_path
        );

        Ok(page_images)
    }

    async fn stack_pages_vertically(
        &self,
        page_images: Vec<RgbImage>,
        output_path: &Path,
    ) -> anyhow::Result<()> {
        let output_path_buf: PathBuf = output_path.to_path_buf();

        let handle: tokio::task::JoinHandle<Result<(), anyhow::Error>> =
            tokio::task::spawn_blocking(move || {
                Self::stack_blocking(page_images, &output_path_buf)
            });

        handle
            .await
            .context("[ReportServiceImpl->stack_pages_vertically] blocking task join failed")??;

        info!("Stacked report image saved: {:?}", output_path);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::utils_modules::pdf_utils::{read_document_title, write_single_image_pdf};

    use image::Rgb;

    #[doc = "단색 프레임을 JPEG 로 인코딩해주는 테스트 헬퍼"]
    fn solid_jpeg(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
        let frame: RgbImage = RgbImage::from_pixel(width, height, Rgb(color));

        let mut jpeg_bytes: Vec<u8> = Vec::new();
        let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg_bytes, 90);
        encoder
            .encode(frame.as_raw(), width, height, image::ColorType::Rgb8)
            .unwrap();

        jpeg_bytes
    }

    fn write_solid_page(path: &Path, width: u32, height: u32, color: [u8; 3], title: &str) {
        write_single_image_pdf(solid_jpeg(width, height, color), width, height, title, path)
            .unwrap();
    }

    #[tokio::test]
    async fn merging_two_one_page_documents_yields_two_pages_in_order() {
        let service: ReportServiceImpl = ReportServiceImpl::new();
        let scratch = tempfile::tempdir().unwrap();

        let first: PathBuf = scratch.path().join("first.pdf");
        let second: PathBuf = scratch.path().join("second.pdf");
        let merged: PathBuf = scratch.path().join("merged.pdf");

        write_solid_page(&first, 200, 100, [220, 30, 30], "first page");
        write_solid_page(&second, 200, 100, [30, 30, 220], "second page");

        service
            .merge_documents(&[first, second], &merged, "Acme One")
            .await
            .unwrap();

        let doc = lopdf::Document::load(&merged).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
        assert_eq!(
            read_document_title(&merged).unwrap().as_deref(),
            Some("Acme One")
        );

        /* 페이지 순서 확인 - 첫 페이지는 붉은 계열, 둘째 페이지는 푸른 계열 */
        let page_images: Vec<RgbImage> = service.rasterize_document(&merged).await.unwrap();
        assert_eq!(page_images.len(), 2);

        let first_pixel = page_images[0].get_pixel(100, 50);
        assert!(first_pixel[0] > 150 && first_pixel[2] < 100);

        let second_pixel = page_images[1].get_pixel(100, 50);
        assert!(second_pixel[2] > 150 && second_pixel[0] < 100);
    }

    #[tokio::test]
    async fn merging_nothing_fails_loudly() {
        let service: ReportServiceImpl = ReportServiceImpl::new();
        let scratch = tempfile::tempdir().unwrap();
        let merged: PathBuf = scratch.path().join("merged.pdf");

        assert!(
            service
                .merge_documents(&[], &merged, "Acme One")
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn stacking_normalizes_to_the_narrowest_width() {
        let service: ReportServiceImpl = ReportServiceImpl::new();
        let scratch = tempfile::tempdir().unwrap();
        let output: PathBuf = scratch.path().join("stacked.png");

        let narrow: RgbImage = RgbImage::from_pixel(100, 50, Rgb([10, 10, 10]));
        let wide: RgbImage = RgbImage::from_pixel(200, 80, Rgb([200, 200, 200]));

        service
            .stack_pages_vertically(vec![narrow, wide], &output)
            .await
            .unwrap();

        let stacked = image::open(&output).unwrap().to_rgb8();

        /* 200x80 은 100x40 으로 정규화되어 총 높이는 50 + 40 */
        assert_eq!(stacked.width(), 100);
        assert_eq!(stacked.height(), 90);
    }

    #[tokio::test]
    async fn stacking_an_empty_page_list_is_an_error() {
        let service: ReportServiceImpl = ReportServiceImpl::new();
        let scratch = tempfile::tempdir().unwrap();
        let output: PathBuf = scratch.path().join("stacked.png");

        assert!(
            service
                .stack_pages_vertically(Vec::new(), &output)
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn assembler_end_to_end_height_is_the_sum_of_normalized_heights() {
        let service: ReportServiceImpl = ReportServiceImpl::new();
        let scratch = tempfile::tempdir().unwrap();

        let first: PathBuf = scratch.path().join("trend.pdf");
        let second: PathBuf = scratch.path().join("density.pdf");
        let merged: PathBuf = scratch.path().join("report.pdf");
        let output: PathBuf = scratch.path().join("report_out.png");

        write_solid_page(&first, 400, 150, [90, 90, 90], "trend");
        write_solid_page(&second, 200, 120, [120, 120, 120], "density");

        service
            .merge_documents(&[first, second], &merged, "Acme One")
            .await
            .unwrap();

        let page_images: Vec<RgbImage> = service.rasterize_document(&merged).await.unwrap();
        service
            .stack_pages_vertically(page_images, &output)
            .await
            .unwrap();

        let stacked = image::open(&output).unwrap().to_rgb8();

        /* 400x150 → 200x75 로 정규화, 총 높이 75 + 120 */
        assert_eq!(stacked.width(), 200);
        assert_eq!(stacked.height(), 195);
    }
}
