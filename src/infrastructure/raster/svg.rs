use super::{RasterError, SlideRasterizer};
use crate::domain::deck::{Deck, Slide};
use crate::domain::media::{frame_file_name, RasterFrame};
use crate::infrastructure::config::PipelineSettings;
use std::path::Path;
use std::sync::Arc;

/// Extra pixels between wrapped lines.
const LINE_SPACING: f32 = 4.0;

#[derive(Debug, Clone, PartialEq)]
pub struct RasterSettings {
    pub width: u32,
    pub height: u32,
    pub wrap_width: usize,
    pub font_family: String,
    pub font_size: f32,
    pub title_offset: (f32, f32),
    pub body_offset: (f32, f32),
}

impl From<&PipelineSettings> for RasterSettings {
    fn from(settings: &PipelineSettings) -> Self {
        Self {
            width: settings.slide_width,
            height: settings.slide_height,
            wrap_width: settings.wrap_width,
            font_family: settings.font_family.clone(),
            font_size: settings.font_size,
            title_offset: settings.title_offset,
            body_offset: settings.body_offset,
        }
    }
}

/// Renders each slide as an SVG document (white canvas, black wrapped text) through resvg.
pub struct SvgSlideRasterizer {
    settings: RasterSettings,
    fontdb: Arc<usvg::fontdb::Database>,
}

impl SvgSlideRasterizer {
    pub fn new(settings: RasterSettings, font_dir: Option<&Path>) -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        if let Some(dir) = font_dir {
            load_fonts_from_dir(&mut db, dir);
        }

        let has_family = db.faces().any(|face| {
            face.families
                .iter()
                .any(|(name, _)| name.eq_ignore_ascii_case(&settings.font_family))
        });
        if !has_family {
            tracing::warn!(
                font_family = %settings.font_family,
                face_count = db.len(),
                "Slide font not found, falling back to a default face"
            );
        }

        Self {
            settings,
            fontdb: Arc::new(db),
        }
    }

    /// SVG document for one slide.
    pub fn slide_document(&self, slide: &Slide) -> String {
        let s = &self.settings;
        let mut svg = format!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><rect x="0" y="0" width="{w}" height="{h}" fill="#ffffff"/>"##,
            w = s.width,
            h = s.height
        );
        self.push_text_block(&mut svg, &slide.title, s.title_offset);
        self.push_text_block(&mut svg, &slide.body, s.body_offset);
        svg.push_str("</svg>");
        svg
    }

    fn push_text_block(&self, svg: &mut String, text: &str, (x, y): (f32, f32)) {
        let lines = wrap_lines(text, self.settings.wrap_width);
        if lines.iter().all(|line| line.trim().is_empty()) {
            return;
        }

        let size = self.settings.font_size;
        svg.push_str(&format!(
            r##"<text font-family="{}" font-size="{}" fill="#000000" xml:space="preserve">"##,
            escape_xml(&self.settings.font_family),
            size
        ));
        for (i, line) in lines.iter().enumerate() {
            // `y` is the top of the block; SVG positions text by its baseline.
            let baseline = y + size + i as f32 * (size + LINE_SPACING);
            svg.push_str(&format!(
                r#"<tspan x="{}" y="{}">{}</tspan>"#,
                x,
                baseline,
                escape_xml(line)
            ));
        }
        svg.push_str("</text>");
    }

    fn render_slide(&self, index: usize, slide: &Slide, path: &Path) -> Result<(), RasterError> {
        let document = self.slide_document(slide);

        let options = usvg::Options {
            fontdb: self.fontdb.clone(),
            font_resolver: font_resolver(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(&document, &options).map_err(|e| {
            RasterError::Document {
                index,
                message: e.to_string(),
            }
        })?;

        let (width, height) = (self.settings.width, self.settings.height);
        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
            .ok_or(RasterError::Canvas { width, height })?;
        resvg::render(&tree, resvg::tiny_skia::Transform::identity(), &mut pixmap.as_mut());

        // The canvas is fully opaque, so premultiplied and straight RGBA agree.
        let image = image::RgbaImage::from_raw(width, height, pixmap.take())
            .ok_or(RasterError::Canvas { width, height })?;
        image.save(path).map_err(|e| RasterError::Write {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

impl SlideRasterizer for SvgSlideRasterizer {
    fn rasterize(&self, deck: &Deck, out_dir: &Path) -> Result<Vec<RasterFrame>, RasterError> {
        std::fs::create_dir_all(out_dir).map_err(|source| RasterError::Io {
            path: out_dir.display().to_string(),
            source,
        })?;

        let mut frames = Vec::with_capacity(deck.len());
        for (index, slide) in deck.slides().iter().enumerate() {
            let path = out_dir.join(frame_file_name(index));
            self.render_slide(index, slide, &path)?;
            tracing::debug!(slide = index + 1, path = %path.display(), "Slide rasterized");
            frames.push(RasterFrame { index, path });
        }

        Ok(frames)
    }
}

const TAB_SIZE: usize = 8;

/// Wraps text by character count. Tabs first expand to the next multiple of eight
/// columns, then every whitespace character, line breaks included, counts as a plain
/// space. Words longer than the column are broken.
pub fn wrap_lines(text: &str, width: usize) -> Vec<String> {
    let flattened: String = expand_tabs(text)
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .collect();

    textwrap::wrap(&flattened, textwrap::Options::new(width).break_words(true))
        .into_iter()
        .map(|line| line.into_owned())
        .collect()
}

fn expand_tabs(text: &str) -> String {
    let mut expanded = String::with_capacity(text.len());
    let mut column = 0;
    for c in text.chars() {
        match c {
            '\t' => {
                let pad = TAB_SIZE - column % TAB_SIZE;
                expanded.extend(std::iter::repeat(' ').take(pad));
                column += pad;
            }
            '\n' | '\r' => {
                expanded.push(c);
                column = 0;
            }
            _ => {
                expanded.push(c);
                column += 1;
            }
        }
    }
    expanded
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c if c.is_control() => {}
            c => escaped.push(c),
        }
    }
    escaped
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        tracing::warn!(dir = %dir.display(), "Font directory is not readable");
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let is_font = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc"))
            .unwrap_or(false);
        if is_font && db.load_font_file(&path).is_err() {
            tracing::warn!(path = %path.display(), "Skipping unreadable font file");
        }
    }
}

/// Picks the requested family, then any generic family, then any face at all.
fn font_resolver() -> usvg::FontResolver<'static> {
    usvg::FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families = Vec::<usvg::fontdb::Family<'_>>::new();
            for family in font.families() {
                families.push(match family {
                    usvg::FontFamily::Serif => usvg::fontdb::Family::Serif,
                    usvg::FontFamily::SansSerif => usvg::fontdb::Family::SansSerif,
                    usvg::FontFamily::Cursive => usvg::fontdb::Family::Cursive,
                    usvg::FontFamily::Fantasy => usvg::fontdb::Family::Fantasy,
                    usvg::FontFamily::Monospace => usvg::fontdb::Family::Monospace,
                    usvg::FontFamily::Named(name) => usvg::fontdb::Family::Name(name),
                });
            }
            families.push(usvg::fontdb::Family::SansSerif);
            families.push(usvg::fontdb::Family::Serif);
            families.push(usvg::fontdb::Family::Monospace);

            let query = usvg::fontdb::Query {
                families: &families,
                weight: usvg::fontdb::Weight(font.weight()),
                ..Default::default()
            };

            fontdb
                .query(&query)
                .or_else(|| fontdb.faces().next().map(|face| face.id))
        }),
        select_fallback: usvg::FontResolver::default_fallback_selector(),
    }
}
