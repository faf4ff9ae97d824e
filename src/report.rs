//! Per-course attendance report rendered as a single fixed-layout PDF page.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use printpdf::image_crate::{self, GenericImageView};
use printpdf::{BuiltinFont, Image, ImageTransform, Mm, PdfDocument, PdfLayerReference, Pt};

/// One report line, as produced by the store's left join: `attended` is
/// `None` for students never matched in any session.
#[derive(Debug, Clone)]
pub struct ReportRow {
    pub full_name: String,
    pub student_number: Option<String>,
    pub photo_path: Option<String>,
    pub attended: Option<bool>,
}

// Letter page, coordinates in points from the bottom-left corner.
const PAGE_WIDTH_MM: f32 = 215.9;
const PAGE_HEIGHT_MM: f32 = 279.4;
const TEXT_X_PT: f32 = 100.0;
const TITLE_Y_PT: f32 = 750.0;
const FIRST_ROW_Y_PT: f32 = 700.0;
const ROW_STEP_PT: f32 = 60.0;
const THUMB_X_PT: f32 = 300.0;
const THUMB_SIZE_PT: f32 = 50.0;
const FONT_SIZE: f32 = 12.0;

pub fn report_file_name(course_id: i64) -> String {
    format!("attendance_report_course_{}.pdf", course_id)
}

/// Render the report into `out_dir` and return the file path. The name is
/// derived from the course id alone, so regenerating overwrites the previous
/// file. Everything goes on one page; a roster taller than the page simply
/// runs off the bottom.
pub fn generate(
    out_dir: &Path,
    course_id: i64,
    course_name: &str,
    rows: &[ReportRow],
) -> anyhow::Result<PathBuf> {
    let (doc, page, layer) = PdfDocument::new(
        format!("Attendance Report - {}", course_name),
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "report",
    );
    let layer = doc.get_page(page).get_layer(layer);
    let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;

    layer.use_text(
        format!("Attendance Report - Course: {}", course_name),
        FONT_SIZE,
        Mm::from(Pt(TEXT_X_PT)),
        Mm::from(Pt(TITLE_Y_PT)),
        &font,
    );

    let mut y = FIRST_ROW_Y_PT;
    for row in rows {
        let status = if row.attended.unwrap_or(false) {
            "Present"
        } else {
            "Absent"
        };
        let number = row.student_number.as_deref().unwrap_or("");
        layer.use_text(
            format!("{} ({}): {}", row.full_name, number, status),
            FONT_SIZE,
            Mm::from(Pt(TEXT_X_PT)),
            Mm::from(Pt(y)),
            &font,
        );

        if let Some(photo) = row.photo_path.as_deref() {
            draw_thumbnail(&layer, Path::new(photo), y);
        }

        y -= ROW_STEP_PT;
    }

    let path = out_dir.join(report_file_name(course_id));
    doc.save(&mut BufWriter::new(File::create(&path)?))?;
    Ok(path)
}

/// Draw the photo beside a report line, scaled to 50x50 pt. A missing file is
/// skipped without comment; a file that exists but does not decode is logged
/// and skipped.
fn draw_thumbnail(layer: &PdfLayerReference, photo: &Path, line_y: f32) {
    if !photo.exists() {
        return;
    }
    let decoded = match image_crate::open(photo) {
        Ok(img) => img,
        Err(e) => {
            log::warn!("skipping thumbnail {}: {}", photo.display(), e);
            return;
        }
    };
    let (width, height) = decoded.dimensions();
    if width == 0 || height == 0 {
        return;
    }

    // At `dpi` dots per inch one pixel covers 72/dpi points; scale each axis
    // so the drawn image lands at exactly THUMB_SIZE_PT.
    let dpi = 300.0;
    let scale_x = THUMB_SIZE_PT / (width as f32 * 72.0 / dpi);
    let scale_y = THUMB_SIZE_PT / (height as f32 * 72.0 / dpi);

    Image::from_dynamic_image(&decoded).add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm::from(Pt(THUMB_X_PT))),
            translate_y: Some(Mm::from(Pt(line_y - 20.0))),
            scale_x: Some(scale_x),
            scale_y: Some(scale_y),
            dpi: Some(dpi),
            ..Default::default()
        },
    );
}
