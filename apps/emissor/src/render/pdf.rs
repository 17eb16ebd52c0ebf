//! # PDF Export
//!
//! Lays an [`InvoiceDocument`] out with genpdf.
//!
//! genpdf embeds TrueType fonts, so the family named in the export
//! settings must be present in `fonts_dir` as
//! `<Family>-Regular.ttf`, `-Bold.ttf`, `-Italic.ttf` and `-BoldItalic.ttf`.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ TUDBOOM                              NOTA    │
//! │ Produtos Personalizados  (Sem validade fiscal)│
//! │──────────────────────────────────────────────│
//! │ DADOS DA EMPRESA / DA NOTA / DO CLIENTE      │
//! │                                              │
//! │ ┌──────────────┬─────┬────────────┬────────┐ │
//! │ │ Descrição    │ Qtd │ Valor Unit.│ Total  │ │
//! │ └──────────────┴─────┴────────────┴────────┘ │
//! │                         Subtotal: R$ 157.70  │
//! │                         Impostos:  R$ 15.77  │
//! │                            Total: R$ 173.47  │
//! │        Esta é uma nota fiscal sem validade   │
//! └──────────────────────────────────────────────┘
//! ```

use genpdf::{elements, style, Alignment, Element};
use tracing::debug;
use tudboom_core::document::InfoBlock;
use tudboom_core::InvoiceDocument;

use super::ExportError;
use crate::state::ExportSettings;

/// Renders `document` to PDF bytes.
pub fn render_pdf(document: &InvoiceDocument, settings: &ExportSettings) -> Result<Vec<u8>, ExportError> {
    let fonts_missing = || ExportError::FontsMissing {
        dir: settings.fonts_dir.clone(),
        family: settings.font_family.clone(),
    };

    if !settings.fonts_dir.is_dir() {
        return Err(fonts_missing());
    }

    let font_family = genpdf::fonts::from_files(&settings.fonts_dir, &settings.font_family, None)
        .map_err(|e| {
            debug!(error = %e, "Font family could not be loaded");
            fonts_missing()
        })?;

    let mut doc = genpdf::Document::new(font_family);
    doc.set_title(document.file_stem.clone());
    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(10);
    doc.set_page_decorator(decorator);

    let bold = style::Style::new().bold();

    // Header
    doc.push(
        elements::Paragraph::new(document.company_name.clone())
            .styled(style::Style::new().bold().with_font_size(18)),
    );
    doc.push(
        elements::Paragraph::new(document.company_tagline.clone())
            .styled(style::Style::new().with_font_size(10)),
    );
    doc.push(
        elements::Paragraph::new(document.title.clone())
            .aligned(Alignment::Right)
            .styled(style::Style::new().bold().with_font_size(16)),
    );
    doc.push(
        elements::Paragraph::new(document.subtitle.clone())
            .aligned(Alignment::Right)
            .styled(style::Style::new().italic().with_font_size(9)),
    );
    doc.push(elements::Break::new(1.5));

    for block in [&document.issuer, &document.invoice, &document.client] {
        push_block(&mut doc, block);
        doc.push(elements::Break::new(1));
    }

    // Items
    doc.push(elements::Paragraph::new(document.items_heading.clone()).styled(bold));
    let mut table = elements::TableLayout::new(vec![4, 1, 2, 2]);
    table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

    let mut header = table.row();
    for column in &document.item_columns {
        header = header.element(elements::Paragraph::new(column.clone()).styled(bold));
    }
    header.push().map_err(|e| ExportError::Pdf(e.to_string()))?;

    for item in &document.items {
        table
            .row()
            .element(elements::Paragraph::new(item.description.clone()))
            .element(elements::Paragraph::new(item.quantity.clone()).aligned(Alignment::Right))
            .element(elements::Paragraph::new(item.unit_price.clone()).aligned(Alignment::Right))
            .element(elements::Paragraph::new(item.total.clone()).aligned(Alignment::Right))
            .push()
            .map_err(|e| ExportError::Pdf(e.to_string()))?;
    }
    doc.push(table);
    doc.push(elements::Break::new(1.5));

    // Totals
    for line in &document.totals {
        let paragraph = elements::Paragraph::new(format!("{} {}", line.label, line.value))
            .aligned(Alignment::Right);
        if line.emphasized {
            doc.push(paragraph.styled(style::Style::new().bold().with_font_size(12)));
        } else {
            doc.push(paragraph);
        }
    }

    // Footer
    doc.push(elements::Break::new(2));
    for line in &document.footer {
        doc.push(
            elements::Paragraph::new(line.clone())
                .aligned(Alignment::Center)
                .styled(style::Style::new().italic().with_font_size(8)),
        );
    }

    let mut buffer = Vec::new();
    doc.render(&mut buffer)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;

    Ok(buffer)
}

fn push_block(doc: &mut genpdf::Document, block: &InfoBlock) {
    doc.push(
        elements::Paragraph::new(block.heading.clone()).styled(style::Style::new().bold().with_font_size(11)),
    );
    for line in &block.lines {
        let text = match &line.label {
            Some(label) => format!("{}: {}", label, line.value),
            None => line.value.clone(),
        };
        let paragraph = elements::Paragraph::new(text);
        if line.strong {
            doc.push(paragraph.styled(style::Style::new().bold()));
        } else {
            doc.push(paragraph);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::test_support::sample_invoice;
    use crate::render::{export_invoice, ExportFormat};
    use std::path::PathBuf;
    use tudboom_core::Issuer;

    /// Export settings pointing at `TUDBOOM_FONTS_DIR`, when it holds the
    /// whole default family.
    fn installed_fonts() -> Option<ExportSettings> {
        let settings = ExportSettings {
            fonts_dir: PathBuf::from(std::env::var_os("TUDBOOM_FONTS_DIR")?),
            ..ExportSettings::default()
        };
        let complete = ["Regular", "Bold", "Italic", "BoldItalic"].iter().all(|style| {
            settings
                .fonts_dir
                .join(format!("{}-{}.ttf", settings.font_family, style))
                .is_file()
        });
        complete.then_some(settings)
    }

    #[test]
    fn test_missing_fonts_dir_is_typed_error() {
        let settings = ExportSettings {
            fonts_dir: "/definitely/not/here".into(),
            ..ExportSettings::default()
        };
        let document = InvoiceDocument::build(&sample_invoice(), &Issuer::default());

        let err = render_pdf(&document, &settings).unwrap_err();
        assert!(matches!(err, ExportError::FontsMissing { .. }));
    }

    #[test]
    fn test_empty_fonts_dir_is_typed_error() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ExportSettings {
            fonts_dir: dir.path().to_path_buf(),
            ..ExportSettings::default()
        };
        let document = InvoiceDocument::build(&sample_invoice(), &Issuer::default());

        let err = render_pdf(&document, &settings).unwrap_err();
        assert!(
            matches!(err, ExportError::FontsMissing { ref family, .. } if family == "LiberationSans")
        );
    }

    #[test]
    fn test_pdf_export_writes_pdf_file() {
        let Some(settings) = installed_fonts() else {
            eprintln!("skipping: TUDBOOM_FONTS_DIR does not hold the LiberationSans TTF files");
            return;
        };
        let dir = tempfile::tempdir().unwrap();

        let path = export_invoice(
            &sample_invoice(),
            &Issuer::default(),
            &settings,
            ExportFormat::Pdf,
            dir.path(),
        )
        .unwrap();

        assert_eq!(path, dir.path().join("NF-000042.pdf"));
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 1000);
    }
}
