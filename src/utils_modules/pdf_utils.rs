use crate::common::*;

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, dictionary};

#[doc = r#"
    렌더링된 차트 프레임(JPEG) 한 장을 단일 페이지 PDF 문서로 저장해주는 함수.

    1. 이미지 XObject(DCTDecode)로 프레임을 내장
    2. 페이지 전체를 이미지로 채우는 content stream 구성
    3. 문서 Info 사전의 Title 에 차트 제목을 기록

    # Arguments
    * `jpeg_bytes` - JPEG 로 인코딩된 차트 프레임
    * `width` / `height` - 프레임 픽셀 크기 (페이지 크기로도 사용)
    * `title` - 문서 제목 (엔터티명 + 차트 종류)
    * `output_path` - 저장할 PDF 경로

    # Returns
    * `anyhow::Result<()>` - 저장 실패 시 오류
"#]
pub fn write_single_image_pdf(
    jpeg_bytes: Vec<u8>,
    width: u32,
    height: u32,
    title: &str,
    output_path: &Path,
) -> anyhow::Result<()> {
    let mut doc: Document = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let image_stream: Stream = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "DCTDecode",
        },
        jpeg_bytes,
    );
    let image_id = doc.add_object(image_stream);

    let content: Content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    (width as i64).into(),
                    0.into(),
                    0.into(),
                    (height as i64).into(),
                    0.into(),
                    0.into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };

    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), (width as i64).into(), (height as i64).into()],
        "Resources" => dictionary! {
            "XObject" => dictionary! { "Im0" => image_id },
        },
        "Contents" => content_id,
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(title),
    });
    doc.trailer.set("Info", info_id);

    doc.save(output_path).map_err(|e| {
        anyhow!(
            "[pdf_utils->write_single_image_pdf] Failed to save document {:?}: {:?}",
            output_path,
            e
        )
    })?;

    Ok(())
}

#[doc = "문서 Info 사전의 Title 값을 읽어주는 함수 - Title 이 없으면 None"]
pub fn read_document_title(path: &Path) -> anyhow::Result<Option<String>> {
    let doc: Document = Document::load(path)
        .map_err(|e| anyhow!("[pdf_utils->read_document_title] Failed to load {:?}: {:?}", path, e))?;

    let info_obj: &Object = match doc.trailer.get(b"Info") {
        Ok(obj) => obj,
        Err(_) => return Ok(None),
    };

    let info_dict: &Dictionary = match info_obj {
        Object::Reference(id) => doc.get_object(*id)?.as_dict()?,
        Object::Dictionary(dict) => dict,
        _ => return Ok(None),
    };

    match info_dict.get(b"Title") {
        Ok(Object::String(bytes, _)) => Ok(Some(String::from_utf8_lossy(bytes).into_owned())),
        _ => Ok(None),
    }
}

#[doc = "간접 참조일 수 있는 오브젝트를 실제 오브젝트로 해석해주는 함수"]
pub fn resolve_object<'a>(doc: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(object),
        _ => object,
    }
}
