use image::{Rgba, RgbaImage};
use lopdf::{Document, Object};
use pocket_jot::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Rasterizer producing flat pages and counting surface usage
#[derive(Default)]
struct FakeRasterizer {
    attached: AtomicUsize,
    detached: AtomicUsize,
    rendered: AtomicUsize,
    fail_on_page: Option<usize>,
}

impl FakeRasterizer {
    fn failing_on(page: usize) -> Self {
        Self {
            fail_on_page: Some(page),
            ..Self::default()
        }
    }
}

impl Rasterizer for FakeRasterizer {
    fn attach(&self) -> Result<()> {
        self.attached.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn rasterize(&self, markup: &PrintMarkup, spec: &RasterSpec) -> Result<RgbaImage> {
        let page = self.rendered.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on_page == Some(page) {
            return Err(BookletError::Raster(format!("page {} failed", page)));
        }
        let (width, height) = spec.pixel_size();
        let shade = if markup.is_framed() { 0 } else { 255 };
        Ok(RgbaImage::from_pixel(width, height, Rgba([shade, shade, shade, 255])))
    }

    fn detach(&self) {
        self.detached.fetch_add(1, Ordering::SeqCst);
    }
}

fn small_options() -> ExportOptions {
    ExportOptions {
        pixel_ratio: 0.25,
        ..ExportOptions::default()
    }
}

fn sample_pages() -> Vec<PageContent> {
    parse_into_pages(pocket_jot::constants::DEFAULT_CONTENT)
}

fn image_xobject_count(doc: &Document) -> usize {
    doc.objects
        .values()
        .filter_map(|obj| obj.as_stream().ok())
        .filter(|stream| {
            stream
                .dict
                .get(b"Subtype")
                .and_then(Object::as_name)
                .is_ok_and(|name| name == b"Image")
        })
        .count()
}

fn page_content(doc: &Document) -> String {
    let page_id = *doc.get_pages().values().next().unwrap();
    String::from_utf8(doc.get_page_content(page_id).unwrap()).unwrap()
}

#[tokio::test]
async fn test_export_produces_single_landscape_page() {
    let rasterizer = Arc::new(FakeRasterizer::default());
    let bytes = generate_booklet(&sample_pages(), &small_options(), rasterizer.clone())
        .await
        .unwrap();

    assert!(bytes.starts_with(b"%PDF-"));

    let doc = Document::load_mem(&bytes).unwrap();
    let pages = doc.get_pages();
    assert_eq!(pages.len(), 1);

    let page = doc.get_dictionary(*pages.values().next().unwrap()).unwrap();
    let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
    let width = media_box[2].as_float().unwrap();
    let height = media_box[3].as_float().unwrap();
    assert!((width - 841.89).abs() < 0.01);
    assert!((height - 595.28).abs() < 0.01);

    assert_eq!(image_xobject_count(&doc), 8);
    assert_eq!(rasterizer.rendered.load(Ordering::SeqCst), 8);
}

#[tokio::test]
async fn test_surface_released_after_success() {
    let rasterizer = Arc::new(FakeRasterizer::default());
    generate_booklet(&sample_pages(), &small_options(), rasterizer.clone())
        .await
        .unwrap();

    assert_eq!(rasterizer.attached.load(Ordering::SeqCst), 1);
    assert_eq!(rasterizer.detached.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_surface_released_after_failure() {
    let rasterizer = Arc::new(FakeRasterizer::failing_on(3));
    let result = generate_booklet(&sample_pages(), &small_options(), rasterizer.clone()).await;

    match result {
        Err(BookletError::Raster(message)) => assert_eq!(message, "page 3 failed"),
        other => panic!("expected a raster error, got {:?}", other.map(|b| b.len())),
    }
    assert_eq!(rasterizer.rendered.load(Ordering::SeqCst), 3);
    assert_eq!(rasterizer.attached.load(Ordering::SeqCst), 1);
    assert_eq!(rasterizer.detached.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_invalid_options_rejected_before_rendering() {
    let rasterizer = Arc::new(FakeRasterizer::default());
    let options = ExportOptions {
        pixel_ratio: 0.0,
        ..ExportOptions::default()
    };

    let result = generate_booklet(&sample_pages(), &options, rasterizer.clone()).await;
    assert!(matches!(result, Err(BookletError::Config(_))));
    assert_eq!(rasterizer.attached.load(Ordering::SeqCst), 0);
    assert_eq!(rasterizer.rendered.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_fold_lines_option() {
    let with_lines = generate_booklet(
        &sample_pages(),
        &small_options(),
        Arc::new(FakeRasterizer::default()),
    )
    .await
    .unwrap();
    let content = page_content(&Document::load_mem(&with_lines).unwrap());
    assert_eq!(content.matches(" Do Q").count(), 8);
    assert!(content.contains("] 0 d"));
    assert_eq!(content.matches(" l S").count(), 4);

    let options = ExportOptions {
        show_fold_lines: false,
        ..small_options()
    };
    let without_lines =
        generate_booklet(&sample_pages(), &options, Arc::new(FakeRasterizer::default()))
            .await
            .unwrap();
    let content = page_content(&Document::load_mem(&without_lines).unwrap());
    assert!(!content.contains(" l S"));
}

#[tokio::test]
async fn test_short_page_list_is_padded() {
    let rasterizer = Arc::new(FakeRasterizer::default());
    let pages = vec![PageContent::new(1, "only page")];

    let bytes = generate_booklet(&pages, &small_options(), rasterizer.clone())
        .await
        .unwrap();
    let doc = Document::load_mem(&bytes).unwrap();
    assert_eq!(image_xobject_count(&doc), 8);
    assert_eq!(rasterizer.rendered.load(Ordering::SeqCst), 8);
}

#[tokio::test]
async fn test_save_and_load_booklet() {
    use tempfile::TempDir;

    let bytes = generate_booklet(
        &sample_pages(),
        &small_options(),
        Arc::new(FakeRasterizer::default()),
    )
    .await
    .unwrap();

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pocket-jot.pdf");
    save_pdf(&bytes, &path).await.unwrap();

    let doc = load_document(&path).await.unwrap();
    assert_eq!(doc.get_pages().len(), 1);
    assert_eq!(image_xobject_count(&doc), 8);
}

#[test]
fn test_svg_rasterizer_requires_attach() {
    let rasterizer = SvgRasterizer::new();
    let markup = PrintMarkup::from_markdown("text");

    let result = rasterizer.rasterize(&markup, &RasterSpec::default());
    assert!(matches!(result, Err(BookletError::Raster(_))));
}

#[test]
fn test_svg_rasterizer_page_size_and_background() {
    let rasterizer = SvgRasterizer::new();
    rasterizer.attach().unwrap();
    assert!(rasterizer.is_attached());

    let markup = PrintMarkup::from_markdown("# Hello\n\n- one\n- two");
    let light = rasterizer
        .rasterize(
            &markup,
            &RasterSpec {
                pixel_ratio: 1.0,
                ..RasterSpec::default()
            },
        )
        .unwrap();
    assert_eq!(light.dimensions(), (222, 315));
    assert_eq!(light.get_pixel(1, 1), &Rgba([255, 255, 255, 255]));

    let dark = rasterizer
        .rasterize(
            &markup,
            &RasterSpec {
                pixel_ratio: 2.0,
                theme: Theme::Dark,
                ..RasterSpec::default()
            },
        )
        .unwrap();
    assert_eq!(dark.dimensions(), (444, 630));
    assert_eq!(dark.get_pixel(1, 1), &Rgba([0x1f, 0x29, 0x37, 255]));

    rasterizer.detach();
    assert!(!rasterizer.is_attached());
}

#[test]
fn test_svg_rasterizer_keeps_wide_text_inside_page() {
    let rasterizer = SvgRasterizer::new();
    rasterizer.attach().unwrap();

    let text = format!(
        "{}\n**{}**\nincomprehensibilities {}",
        "W".repeat(38),
        "M".repeat(30),
        "abcdefghijklmnopqrstuvwxyz".repeat(3)
    );
    let image = rasterizer
        .rasterize(
            &PrintMarkup::from_markdown(&text),
            &RasterSpec {
                pixel_ratio: 1.0,
                ..RasterSpec::default()
            },
        )
        .unwrap();
    rasterizer.detach();

    // Right padding starts at 210px; allow one pixel of antialiasing
    let (width, height) = image.dimensions();
    for x in 211..width {
        for y in 0..height {
            assert_eq!(image.get_pixel(x, y), &Rgba([255, 255, 255, 255]), "ink at {},{}", x, y);
        }
    }
}

#[tokio::test]
async fn test_export_with_svg_rasterizer() {
    let bytes = generate_booklet(
        &sample_pages(),
        &ExportOptions {
            pixel_ratio: 0.5,
            highlight_cover: true,
            ..ExportOptions::default()
        },
        Arc::new(SvgRasterizer::new()),
    )
    .await
    .unwrap();

    let doc = Document::load_mem(&bytes).unwrap();
    assert_eq!(image_xobject_count(&doc), 8);
}
