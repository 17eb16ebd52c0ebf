//! Print layout: an [`InvoiceDocument`] rendered to a standalone HTML page
//! with tera. The template is compiled into the binary.

use tera::{Context, Tera};
use tudboom_core::InvoiceDocument;

use super::ExportError;

const TEMPLATE_NAME: &str = "nota.html";
const NOTA_TEMPLATE: &str = include_str!("../../templates/nota.html.tera");

/// Renders the print page. Document text is HTML-escaped.
pub fn render_html(document: &InvoiceDocument) -> Result<String, ExportError> {
    let mut tera = Tera::default();
    tera.add_raw_template(TEMPLATE_NAME, NOTA_TEMPLATE)
        .map_err(|e| ExportError::Template(e.to_string()))?;

    let context =
        Context::from_serialize(document).map_err(|e| ExportError::Template(e.to_string()))?;

    tera.render(TEMPLATE_NAME, &context)
        .map_err(|e| ExportError::Template(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::test_support::sample_invoice;
    use tudboom_core::Issuer;

    fn rendered() -> String {
        let document = InvoiceDocument::build(&sample_invoice(), &Issuer::default());
        render_html(&document).unwrap()
    }

    #[test]
    fn test_page_has_header_and_totals() {
        let html = rendered();
        assert!(html.contains("<title>NF-000042</title>"));
        assert!(html.contains("(Sem validade fiscal)"));
        assert!(html.contains("TUDBOOM LTDA"));
        assert!(html.contains("R$ 157.70"));
        assert!(html.contains("R$ 15.77"));
        assert!(html.contains("R$ 173.47"));
    }

    #[test]
    fn test_one_row_per_item() {
        let html = rendered();
        assert_eq!(html.matches("<tr class=\"item\">").count(), 2);
    }

    #[test]
    fn test_client_text_is_escaped() {
        let html = rendered();
        assert!(html.contains("Maria &lt;Silva&gt;"));
        assert!(!html.contains("Maria <Silva>"));
    }
}
