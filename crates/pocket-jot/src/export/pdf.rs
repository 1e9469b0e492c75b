//! PDF assembly for the composed sheet
//!
//! The sheet becomes a single landscape page. Every placed page is embedded
//! as a JPEG image XObject and drawn into its cell with a placement matrix;
//! the fold guides are drawn on top.

use image::{Rgb, RgbImage, RgbaImage};
use image::codecs::jpeg::JpegEncoder;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use crate::compose::{ComposedSheet, PlacedPage};
use crate::constants::{DOCUMENT_TITLE, mm_to_pt};
use crate::marks::generate_fold_lines;
use crate::types::Result;

const PRODUCER: &str = concat!("pocket-jot ", env!("CARGO_PKG_VERSION"));

/// Build the booklet document
pub(crate) fn build_document(sheet: &ComposedSheet, jpeg_quality: u8) -> Result<Document> {
    let sheet_width_pt = mm_to_pt(sheet.geometry.width_mm);
    let sheet_height_pt = mm_to_pt(sheet.geometry.height_mm);

    let mut output = Document::with_version("1.7");
    let pages_tree_id = output.new_object_id();

    let mut content_ops = Vec::new();
    let mut xobjects = Dictionary::new();

    for (idx, placed) in sheet.pages.iter().enumerate() {
        let name = format!("Im{}", idx);
        let image_id = add_image_xobject(&mut output, &placed.image, jpeg_quality)?;
        xobjects.set(name.as_bytes(), Object::Reference(image_id));
        content_ops.push(placement_ops(placed, &name, sheet.geometry.height_mm));
    }

    content_ops.push(generate_fold_lines(
        &sheet.fold_guides,
        sheet.geometry.height_mm,
    ));

    let mut resources = Dictionary::new();
    resources.set("XObject", Object::Dictionary(xobjects));

    let content = content_ops.join("");
    let content_id = output.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

    let page_id = output.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Page".to_vec())),
        ("Parent", Object::Reference(pages_tree_id)),
        (
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(sheet_width_pt),
                Object::Real(sheet_height_pt),
            ]),
        ),
        ("Contents", Object::Reference(content_id)),
        ("Resources", Object::Dictionary(resources)),
    ]));

    // Create pages tree
    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(vec![Object::Reference(page_id)])),
        ("Count", Object::Integer(1)),
    ]);
    output
        .objects
        .insert(pages_tree_id, Object::Dictionary(pages_dict));

    // Create catalog
    let catalog_id = output.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_tree_id)),
    ]));

    let info_id = output.add_object(Dictionary::from_iter(vec![
        ("Title", Object::string_literal(DOCUMENT_TITLE)),
        ("Producer", Object::string_literal(PRODUCER)),
    ]));

    output.trailer.set("Root", catalog_id);
    output.trailer.set("Info", info_id);

    Ok(output)
}

/// Serialize a document to bytes
pub(crate) fn document_bytes(mut doc: Document) -> Result<Vec<u8>> {
    let mut writer = Vec::new();
    doc.save_to(&mut writer)?;
    Ok(writer)
}

/// Embed a page image as a DCT-encoded image XObject
fn add_image_xobject(output: &mut Document, image: &RgbaImage, quality: u8) -> Result<ObjectId> {
    // Pages are opaque; alpha is dropped
    let rgb = RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, _] = image.get_pixel(x, y).0;
        Rgb([r, g, b])
    });

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, quality).encode_image(&rgb)?;

    let dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"XObject".to_vec())),
        ("Subtype", Object::Name(b"Image".to_vec())),
        ("Width", Object::Integer(i64::from(rgb.width()))),
        ("Height", Object::Integer(i64::from(rgb.height()))),
        ("ColorSpace", Object::Name(b"DeviceRGB".to_vec())),
        ("BitsPerComponent", Object::Integer(8)),
        ("Filter", Object::Name(b"DCTDecode".to_vec())),
    ]);

    Ok(output.add_object(Stream::new(dict, jpeg).with_compression(false)))
}

/// Draw an image XObject scaled into its cell
fn placement_ops(placed: &PlacedPage, name: &str, sheet_height_mm: f32) -> String {
    let rect = &placed.rect_mm;
    let x = mm_to_pt(rect.x);
    let y = mm_to_pt(sheet_height_mm - rect.bottom());
    let width = mm_to_pt(rect.width);
    let height = mm_to_pt(rect.height);

    format!(
        "q {:.4} 0 0 {:.4} {:.4} {:.4} cm /{} Do Q\n",
        width, height, x, y, name
    )
}
