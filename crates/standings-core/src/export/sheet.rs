// Production rasterizer: lays the league out on the fixed 1080x1080 sheet.
//
// +----+---------------------------------------------+
// |    | TITLE                              Match Day N |
// | S  | SUBTITLE                                 date |
// | T  | +-----------------------------------------+  |
// | A  | | GROUP A      P  W  D  L  F  A  GD  PTS   |  |
// | N  | | (o) Team      0  0  0  0  0  0   0   0   |  |
// | D  | +-----------------------------------------+  |
// | .. |   ... one panel per group ...                |
// |    | footer text                    [logo] [logo] |
// +----+---------------------------------------------+

use image::RgbaImage;
use tracing::debug;

use crate::export::canvas::{Canvas, Rgb};
use crate::export::{ExportError, ExportFormat, Rasterizer, CANVAS_SIZE, EXPORT_SCALE};
use crate::league::{format_goal_difference, Group, LeagueData, StatColumn, HEADER_LABELS};
use crate::upload::{ImageRef, ImageShape};

const BACKGROUND: Rgb = Rgb::hex(0x0d1117);
const ACCENT: Rgb = Rgb::hex(0x14f1d9);
const PANEL: Rgb = Rgb::hex(0x18181b);
const TEXT: Rgb = Rgb::hex(0xffffff);
const MUTED: Rgb = Rgb::hex(0x9ca3af);
const DIVIDER: Rgb = Rgb::hex(0x374151);
const PLACEHOLDER: Rgb = Rgb::hex(0x374151);
const FOOTER_PLACEHOLDER: Rgb = Rgb::hex(0x1f2937);

const BAND_WIDTH: f32 = 80.0;
const PADDING: f32 = 48.0;
const PANEL_PADDING: f32 = 24.0;
const GROUP_GAP: f32 = 32.0;
const COLUMN_GAP: f32 = 16.0;
const MAX_ROW_HEIGHT: f32 = 56.0;
const TEAM_LOGO: f32 = 32.0;
const FOOTER_LOGO_W: f32 = 160.0;
const FOOTER_LOGO_H: f32 = 80.0;

/// Paints the sheet and encodes it.
#[derive(Debug, Clone, Copy)]
pub struct SheetRasterizer {
    scale: f32,
}

impl Default for SheetRasterizer {
    fn default() -> Self {
        SheetRasterizer {
            scale: EXPORT_SCALE as f32,
        }
    }
}

impl SheetRasterizer {
    pub fn with_scale(scale: f32) -> Self {
        SheetRasterizer { scale }
    }

    /// Paint the sheet without encoding it.
    pub fn paint(&self, league: &LeagueData) -> Result<Canvas, ExportError> {
        // Decode every embedded image first so a bad one aborts before any
        // painting happens.
        let logos = DecodedLogos::load(league)?;

        let mut canvas = Canvas::new(CANVAS_SIZE, CANVAS_SIZE, self.scale)?;
        canvas.fill(BACKGROUND);
        paint_band(&mut canvas);

        let left = BAND_WIDTH + PADDING;
        let right = CANVAS_SIZE as f32 - PADDING;
        let header_bottom = paint_header(&mut canvas, league, left, right);
        let footer_top = CANVAS_SIZE as f32 - PADDING - FOOTER_LOGO_H;
        paint_groups(
            &mut canvas,
            league,
            &logos,
            left,
            right,
            header_bottom + GROUP_GAP,
            footer_top - GROUP_GAP,
        );
        paint_footer(&mut canvas, league, &logos, left, right, footer_top);
        Ok(canvas)
    }
}

impl Rasterizer for SheetRasterizer {
    fn rasterize(&self, league: &LeagueData, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
        let canvas = self.paint(league)?;
        let bytes = canvas.encode(format)?;
        debug!(
            "Rasterized {}x{} sheet to {} bytes of {}",
            canvas.width(),
            canvas.height(),
            bytes.len(),
            format
        );
        Ok(bytes)
    }
}

// ---------------------------------------------------------------------------
// Embedded images
// ---------------------------------------------------------------------------

struct DecodedLogos {
    /// Indexed like `league.groups[g].teams[t]`.
    teams: Vec<Vec<Option<RgbaImage>>>,
    footer: [Option<RgbaImage>; 2],
}

impl DecodedLogos {
    fn load(league: &LeagueData) -> Result<Self, ExportError> {
        let teams = league
            .groups
            .iter()
            .map(|group| {
                group
                    .teams
                    .iter()
                    .map(|team| decode_logo(team.logo.as_ref(), &format!("team `{}`", team.name)))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        let footer = [
            decode_logo(league.footer_logo.as_ref(), "footer logo 1")?,
            decode_logo(league.footer_logo_2.as_ref(), "footer logo 2")?,
        ];
        Ok(DecodedLogos { teams, footer })
    }

    fn team(&self, group: usize, team: usize) -> Option<&RgbaImage> {
        self.teams.get(group)?.get(team)?.as_ref()
    }
}

fn decode_logo(logo: Option<&ImageRef>, owner: &str) -> Result<Option<RgbaImage>, ExportError> {
    let Some(logo) = logo else {
        return Ok(None);
    };
    let embedded = |reason: String| ExportError::EmbeddedImage {
        owner: owner.to_string(),
        reason,
    };
    let (_, bytes) = logo.decode().map_err(|e| embedded(e.to_string()))?;
    let image = image::load_from_memory(&bytes).map_err(|e| embedded(e.to_string()))?;
    Ok(Some(image.to_rgba8()))
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

fn paint_band(canvas: &mut Canvas) {
    let label = "STANDINGS";
    let size = 36.0;
    canvas.fill_rect(0.0, 0.0, BAND_WIDTH, CANVAS_SIZE as f32, ACCENT);
    let length = Canvas::text_width(label, size);
    let x = (BAND_WIDTH - size) / 2.0;
    let bottom = (CANVAS_SIZE as f32 + length) / 2.0;
    canvas.draw_text_vertical(label, x, bottom, size, BACKGROUND);
}

/// Paint title block and match-day block. Returns the header's bottom edge.
fn paint_header(canvas: &mut Canvas, league: &LeagueData, left: f32, right: f32) -> f32 {
    let top = PADDING;
    let match_day = format!("Match Day {}", league.match_day);
    let side_width = Canvas::text_width(&match_day, 24.0)
        .max(Canvas::text_width(&league.date, 18.0))
        .min((right - left) / 3.0);
    let main_width = right - left - side_width - COLUMN_GAP;

    let title_size = Canvas::fit_size(&league.title, 60.0, main_width);
    canvas.draw_text(&league.title, left, top, title_size, TEXT);
    let sub_top = top + title_size + 8.0;
    let sub_size = Canvas::fit_size(&league.sub_title, 48.0, main_width);
    canvas.draw_text(&league.sub_title, left, sub_top, sub_size, TEXT);

    let day_size = Canvas::fit_size(&match_day, 24.0, side_width);
    canvas.draw_text_right(&match_day, right, top, day_size, ACCENT);
    let date_size = Canvas::fit_size(&league.date, 18.0, side_width);
    canvas.draw_text_right(&league.date, right, top + day_size + 12.0, date_size, MUTED);

    sub_top + sub_size
}

/// Column x-positions and widths for the `3fr repeat(8, 1fr)` grid.
struct Columns {
    name_x: f32,
    name_w: f32,
    cell_w: f32,
    first_cell_x: f32,
}

impl Columns {
    fn new(x: f32, width: f32) -> Self {
        let fr = (width - COLUMN_GAP * 8.0) / 11.0;
        Columns {
            name_x: x,
            name_w: fr * 3.0,
            cell_w: fr,
            first_cell_x: x + fr * 3.0 + COLUMN_GAP,
        }
    }

    fn cell_x(&self, index: usize) -> f32 {
        self.first_cell_x + index as f32 * (self.cell_w + COLUMN_GAP)
    }
}

fn paint_groups(
    canvas: &mut Canvas,
    league: &LeagueData,
    logos: &DecodedLogos,
    left: f32,
    right: f32,
    top: f32,
    bottom: f32,
) {
    let count = league.groups.len();
    if count == 0 {
        return;
    }
    let available = (bottom - top - GROUP_GAP * (count as f32 - 1.0)) / count as f32;
    let mut y = top;
    for (gi, group) in league.groups.iter().enumerate() {
        let height = paint_group(canvas, group, gi, logos, left, right, y, available);
        y += height + GROUP_GAP;
    }
}

/// Paint one group panel. Returns its height.
#[allow(clippy::too_many_arguments)]
fn paint_group(
    canvas: &mut Canvas,
    group: &Group,
    group_index: usize,
    logos: &DecodedLogos,
    left: f32,
    right: f32,
    top: f32,
    max_height: f32,
) -> f32 {
    let header_h = 32.0;
    let header_gap = 12.0;
    let rows = group.teams.len().max(1) as f32;
    let row_h = ((max_height - PANEL_PADDING * 2.0 - header_h - header_gap) / rows)
        .clamp(16.0, MAX_ROW_HEIGHT);
    let height = PANEL_PADDING * 2.0 + header_h + header_gap + row_h * group.teams.len() as f32;

    canvas.fill_rounded_rect(left, top, right - left, height, 16.0, PANEL);

    let inner_x = left + PANEL_PADDING;
    let cols = Columns::new(inner_x, right - left - PANEL_PADDING * 2.0);

    // Header row.
    let y = top + PANEL_PADDING;
    let name_size = Canvas::fit_size(&group.name, 24.0, cols.name_w);
    canvas.draw_text(&group.name, cols.name_x, y + (header_h - name_size) / 2.0, name_size, ACCENT);
    for (i, label) in HEADER_LABELS.iter().enumerate() {
        let color = if *label == "PTS" { ACCENT } else { MUTED };
        let size = Canvas::fit_size(label, 16.0, cols.cell_w);
        canvas.draw_text_centered(label, cols.cell_x(i), cols.cell_w, y + (header_h - size) / 2.0, size, color);
    }

    // Team rows.
    let mut row_y = y + header_h + header_gap;
    for (ti, team) in group.teams.iter().enumerate() {
        let logo_size = TEAM_LOGO.min(row_h - 4.0);
        let logo_y = row_y + (row_h - logo_size) / 2.0;
        match logos.team(group_index, ti) {
            Some(logo) => canvas.draw_image(logo, ImageShape::Circle, cols.name_x, logo_y, logo_size, logo_size),
            None => paint_placeholder(canvas, ImageShape::Circle, cols.name_x, logo_y, logo_size, logo_size, PLACEHOLDER),
        }

        let text_size = 20.0_f32.min(row_h * 0.5);
        let text_y = row_y + (row_h - text_size) / 2.0;
        let name_x = cols.name_x + logo_size + 16.0;
        let name_size = Canvas::fit_size(&team.name, text_size, cols.name_w - logo_size - 16.0);
        canvas.draw_text(&team.name, name_x, row_y + (row_h - name_size) / 2.0, name_size, TEXT);

        let mut cells: Vec<(String, Rgb)> = StatColumn::ALL
            .iter()
            .map(|c| (team.stat(*c).to_string(), TEXT))
            .collect();
        cells.push((format_goal_difference(team.goal_difference()), TEXT));
        cells.push((team.points().to_string(), ACCENT));
        for (i, (text, color)) in cells.iter().enumerate() {
            let size = Canvas::fit_size(text, text_size, cols.cell_w);
            canvas.draw_text_centered(text, cols.cell_x(i), cols.cell_w, text_y, size, *color);
        }
        // Points are bold: overdraw shifted by one cell fraction.
        let pts = &cells[7].0;
        let size = Canvas::fit_size(pts, text_size, cols.cell_w);
        canvas.draw_text_centered(pts, cols.cell_x(7) + size / 16.0, cols.cell_w, text_y, size, ACCENT);

        if ti + 1 < group.teams.len() {
            canvas.fill_rect(inner_x, row_y + row_h - 1.0, right - left - PANEL_PADDING * 2.0, 1.0, DIVIDER);
        }
        row_y += row_h;
    }

    height
}

fn paint_footer(
    canvas: &mut Canvas,
    league: &LeagueData,
    logos: &DecodedLogos,
    left: f32,
    right: f32,
    top: f32,
) {
    let logos_left = right - FOOTER_LOGO_W * 2.0 - COLUMN_GAP;
    let text_size = Canvas::fit_size(&league.footer_text, 18.0, logos_left - left - COLUMN_GAP);
    canvas.draw_text(
        &league.footer_text,
        left,
        top + FOOTER_LOGO_H - text_size,
        text_size,
        MUTED,
    );

    for (i, logo) in logos.footer.iter().enumerate() {
        let x = logos_left + i as f32 * (FOOTER_LOGO_W + COLUMN_GAP);
        match logo {
            Some(image) => canvas.draw_image(image, ImageShape::Rectangle, x, top, FOOTER_LOGO_W, FOOTER_LOGO_H),
            None => paint_placeholder(canvas, ImageShape::Rectangle, x, top, FOOTER_LOGO_W, FOOTER_LOGO_H, FOOTER_PLACEHOLDER),
        }
    }
}

/// Empty image slot: a filled frame with a `+` in the middle.
fn paint_placeholder(canvas: &mut Canvas, shape: ImageShape, x: f32, y: f32, w: f32, h: f32, fill: Rgb) {
    match shape {
        ImageShape::Circle => canvas.fill_circle(x + w / 2.0, y + h / 2.0, w.min(h) / 2.0, fill),
        ImageShape::Rectangle => canvas.fill_rounded_rect(x, y, w, h, 6.0, fill),
    }
    let size = 16.0_f32.min(w.min(h) / 2.0);
    canvas.draw_text_centered("+", x, w, y + (h - size) / 2.0, size, MUTED);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::{seed, LeagueUpdate, TeamPatch};
    use crate::upload::{ImageMime, ImageRef};
    use image::ImageEncoder;

    fn png_logo() -> ImageRef {
        let img = RgbaImage::from_pixel(6, 6, image::Rgba([200, 30, 30, 255]));
        let mut bytes = Vec::new();
        image::codecs::png::PngEncoder::new(&mut bytes)
            .write_image(img.as_raw(), 6, 6, image::ExtendedColorType::Rgba8)
            .unwrap();
        ImageRef::from_bytes(ImageMime::Png, &bytes)
    }

    #[test]
    fn png_export_is_double_resolution() {
        let bytes = SheetRasterizer::default()
            .rasterize(&seed(), ExportFormat::Png)
            .unwrap();
        assert!(bytes.starts_with(b"\x89PNG"));
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), 2160);
        assert_eq!(decoded.height(), 2160);
    }

    #[test]
    fn jpeg_export() {
        let bytes = SheetRasterizer::with_scale(1.0)
            .rasterize(&seed(), ExportFormat::Jpeg)
            .unwrap();
        assert!(bytes.starts_with(&[0xFF, 0xD8, 0xFF]));
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), 1080);
    }

    #[test]
    fn band_and_background_colors() {
        let canvas = SheetRasterizer::with_scale(1.0).paint(&seed()).unwrap();
        let bytes = canvas.encode(ExportFormat::Png).unwrap();
        let img = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert_eq!(img.get_pixel(2, 2).0, [0x14, 0xf1, 0xd9]);
        assert_eq!(img.get_pixel(1070, 5).0, [0x0d, 0x11, 0x17]);
    }

    #[test]
    fn embedded_logos_are_drawn() {
        let league = seed()
            .with_team(0, 0, &TeamPatch::logo(Some(png_logo())))
            .unwrap()
            .with_field(LeagueUpdate::FooterLogo(Some(png_logo())));
        let bytes = SheetRasterizer::with_scale(1.0)
            .rasterize(&league, ExportFormat::Png)
            .unwrap();
        assert!(!bytes.is_empty());
    }

    #[test]
    fn paints_at_any_scale() {
        let league = seed()
            .with_team(1, 2, &TeamPatch::logo(Some(png_logo())))
            .unwrap()
            .with_field(LeagueUpdate::FooterLogo2(Some(png_logo())));
        for scale in [0.5_f32, 0.75, 1.0, 1.25, 1.5, 3.0] {
            let canvas = SheetRasterizer::with_scale(scale).paint(&league).unwrap();
            assert_eq!(canvas.width(), (CANVAS_SIZE as f32 * scale).round() as u32);
        }
    }

    #[test]
    fn undecodable_logo_fails_without_output() {
        // Valid data URI wrapping bytes that are not an image.
        let broken = ImageRef::from_bytes(ImageMime::Png, b"\x89PNG\r\n\x1a\ngarbage");
        let league = seed()
            .with_team(1, 3, &TeamPatch::logo(Some(broken)))
            .unwrap();
        let err = SheetRasterizer::default()
            .rasterize(&league, ExportFormat::Png)
            .unwrap_err();
        match err {
            ExportError::EmbeddedImage { owner, .. } => assert!(owner.contains("FC Darngawn")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn columns_fill_the_width() {
        let cols = Columns::new(0.0, 856.0);
        let last_edge = cols.cell_x(7) + cols.cell_w;
        assert!((last_edge - 856.0).abs() < 0.01);
        assert!((cols.name_w - cols.cell_w * 3.0).abs() < 0.01);
    }
}
