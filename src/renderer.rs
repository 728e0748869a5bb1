use crate::controller::{Frame, InfoPanel, Layout, INFO_PANEL_SIZE};
use crate::error::{Error, Result};
use crate::viewport::{Rect, Region};

use html_escaper::Escape;
use image::{ImageBuffer, Rgba, RgbaImage};
use tiny_skia::{PixmapMut, Transform, BYTES_PER_PIXEL};
use usvg::Tree;

use std::fmt;
use std::path::Path;
use std::time::Instant;

use log::info;

const LOCATION_WRAP: usize = 24;
const LINE_HEIGHT: f64 = 28.0;
// viewports beyond this are refused rather than allocated
const MAX_SIDE: u32 = 16_384;

struct Text<'a>(&'a str);

impl fmt::Display for Text<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.escape(f, false)
    }
}

fn format_bands(template: String, frame: &Frame) -> String {
    let mut template = template;

    let empty = Rect {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };
    let (night, day) = frame.bands.unwrap_or((empty, empty));

    template = template.replace("#width", &frame.viewport.width.to_string());
    template = template.replace("#height", &frame.viewport.height.to_string());

    for (prefix, rect) in [("#night", night), ("#day", day)] {
        template = template.replace(&format!("{prefix}_x"), &format!("{:.2}", rect.x));
        template = template.replace(&format!("{prefix}_y"), &format!("{:.2}", rect.y));
        template = template.replace(&format!("{prefix}_w"), &format!("{:.2}", rect.width));
        template = template.replace(&format!("{prefix}_h"), &format!("{:.2}", rect.height));
    }

    template
}

fn info_fragment(panel: &InfoPanel) -> String {
    // text contrasts with the band underneath
    let color = match panel.region {
        Region::Daytime => "#000000",
        Region::Nighttime => "#ffffff",
    };
    let (x, y) = panel.position;
    let cx = x + INFO_PANEL_SIZE.0 / 2.0;

    let mut lines = vec![format!(
        r#"<text x="{cx:.2}" y="{:.2}" font-size="34">{}</text>"#,
        y + LINE_HEIGHT + 6.0,
        panel.icon()
    )];

    let mut row = 2.0;
    for line in panel.lines() {
        lines.push(format!(
            r#"<text x="{cx:.2}" y="{:.2}">{}</text>"#,
            y + row * LINE_HEIGHT,
            Text(&line)
        ));
        row += 1.0;
    }
    for line in textwrap::wrap(&panel.location_line(), LOCATION_WRAP) {
        lines.push(format!(
            r#"<text x="{cx:.2}" y="{:.2}" font-size="14">{}</text>"#,
            y + row * LINE_HEIGHT - 6.0,
            Text(&line)
        ));
        row += 0.6;
    }

    format!(
        r#"<g fill="{color}" text-anchor="middle">{}</g>"#,
        lines.join("")
    )
}

fn format_info(template: String, frame: &Frame) -> String {
    let fragments = match &frame.layout {
        Some(Layout::Desktop { info: Some(panel) }) => info_fragment(panel),
        Some(Layout::Mobile { night, day }) => {
            format!("{}{}", info_fragment(night), info_fragment(day))
        }
        Some(Layout::Desktop { info: None }) | None => String::new(),
    };
    template.replace("#info", &fragments)
}

fn format_status(template: String, frame: &Frame) -> String {
    let status = match frame.status.message() {
        Some(message) => format!(
            r#"<text x="{:.2}" y="{:.2}">{}</text>"#,
            frame.viewport.width as f64 / 2.0,
            frame.viewport.height as f64 / 2.0,
            Text(message)
        ),
        None => String::new(),
    };
    template.replace("#status", &status)
}

pub fn create_output_svg(frame: &Frame) -> String {
    let mut template = include_str!("template.svg").to_string();

    template = format_bands(template, frame);
    template = format_info(template, frame);
    template = format_status(template, frame);

    template
}

pub fn render_svg(template: &str) -> Result<RgbaImage> {
    let mut fontdb = usvg::fontdb::Database::new();
    fontdb.load_system_fonts();

    let mut options = usvg::Options::default();
    options.fontdb = std::sync::Arc::new(fontdb);

    let svg_tree = Tree::from_str(template, &options)?;

    let size = svg_tree.size();
    let (width, height) = (size.width() as u32, size.height() as u32);

    if width == 0 || height == 0 || width > MAX_SIDE || height > MAX_SIDE {
        return Err(Error::Render(format!("cannot draw into {width}x{height}")));
    }
    let mut image: Vec<u8> = vec![0; width as usize * height as usize * BYTES_PER_PIXEL];

    info!("Rendering the svg...");
    let now = Instant::now();
    let mut pixmap = PixmapMut::from_bytes(&mut image, width, height)
        .ok_or_else(|| Error::Render(format!("cannot draw into {width}x{height}")))?;
    resvg::render(&svg_tree, Transform::identity(), &mut pixmap);
    let elapsed = format!("{:.2?}", now.elapsed());
    info!("Rendering took {elapsed}");

    let img_buffer: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::from_raw(width, height, image)
        .ok_or_else(|| Error::Render("pixel buffer size mismatch".to_string()))?;
    Ok(img_buffer)
}

pub fn save(image: &RgbaImage, output_path: &Path) -> Result<()> {
    info!("Saving the rendering...");
    let now = Instant::now();
    image.save(output_path)?;
    let elapsed = format!("{:.2?}", now.elapsed());
    info!("Saving took {elapsed} {}", output_path.display());
    Ok(())
}

pub fn render_png(frame: &Frame, output_path: &Path) -> Result<()> {
    let start = Instant::now();

    let template = create_output_svg(frame);
    let image = render_svg(&template)?;
    save(&image, output_path)?;

    let elapsed = format!("{:.2?}", start.elapsed());
    info!("Finished in {elapsed}");
    Ok(())
}
