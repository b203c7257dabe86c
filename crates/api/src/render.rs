//! Document rendering boundary.
//!
//! Consolidation hands a fully assembled [`InvoiceDocument`] and an
//! output path to a [`DocumentRenderer`]; the renderer has no
//! visibility into billing state and reports only success or failure.
//! The built-in [`PdfRenderer`] writes a minimal single-page PDF —
//! layout is deliberately plain, it is not part of the billing core.

use std::path::Path;

use chrono::NaiveDate;
use tally_core::error::CoreError;
use tally_db::models::business_info::BusinessInfo;
use tally_db::models::client::Client;
use tally_db::models::payment_details::PaymentDetails;
use tally_db::models::recipient::Recipient;

/// One line item: a billed time entry with the rate it was billed at.
#[derive(Debug, Clone)]
pub struct InvoiceLine {
    pub date: NaiveDate,
    pub description: Option<String>,
    pub contract_number: String,
    pub hours: f64,
    pub hourly_rate: f64,
    pub currency: String,
    pub amount: f64,
}

/// Everything a renderer needs: the invoicing party, the billed
/// client, recipients (primary first), payment details, and the
/// ordered line items with totals.
#[derive(Debug, Clone)]
pub struct InvoiceDocument {
    pub invoice_number: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub total_hours: f64,
    pub total_amount: f64,
    pub business: BusinessInfo,
    pub client: Client,
    pub recipients: Vec<Recipient>,
    pub payment: PaymentDetails,
    pub lines: Vec<InvoiceLine>,
}

/// Renders an assembled invoice to a file.
pub trait DocumentRenderer: Send + Sync {
    fn render(&self, doc: &InvoiceDocument, output: &Path) -> Result<(), CoreError>;
}

/// Built-in renderer producing a minimal single-page PDF.
pub struct PdfRenderer;

impl DocumentRenderer for PdfRenderer {
    fn render(&self, doc: &InvoiceDocument, output: &Path) -> Result<(), CoreError> {
        let bytes = build_pdf(&document_lines(doc));
        std::fs::write(output, bytes)
            .map_err(|e| CoreError::Render(format!("{}: {e}", output.display())))
    }
}

/// Flatten the document into the text lines the page shows.
fn document_lines(doc: &InvoiceDocument) -> Vec<String> {
    let mut lines = vec![
        format!("{}  --  INVOICE {}", doc.business.business_name, doc.invoice_number),
        format!("Contact: {} <{}>", doc.business.contact_name, doc.business.email),
        format!(
            "Issued: {}    Due: {}",
            doc.issue_date.format("%Y-%m-%d"),
            doc.due_date.format("%Y-%m-%d")
        ),
        String::new(),
        format!("Bill to: {}", doc.client.name),
    ];

    for part in [&doc.client.address, &doc.client.city, &doc.client.country]
        .into_iter()
        .flatten()
    {
        lines.push(format!("         {part}"));
    }

    for recipient in &doc.recipients {
        lines.push(format!("Attn: {} <{}>", recipient.name, recipient.email));
    }

    lines.push(String::new());
    for line in &doc.lines {
        lines.push(format!(
            "{}  [{}]  {:.2} h @ {:.2} {} = {:.2}  {}",
            line.date.format("%Y-%m-%d"),
            line.contract_number,
            line.hours,
            line.hourly_rate,
            line.currency,
            line.amount,
            line.description.as_deref().unwrap_or(""),
        ));
    }

    lines.push(String::new());
    lines.push(format!(
        "Total: {:.2} ({:.2} hours)",
        doc.total_amount, doc.total_hours
    ));

    if let Some(bank) = &doc.payment.bank_name {
        lines.push(format!("Payment: {bank}"));
    }
    if let Some(account) = &doc.payment.account_number {
        lines.push(format!("Account: {account}"));
    }
    if let Some(terms) = &doc.payment.payment_terms {
        lines.push(format!("Terms: {terms}"));
    }

    lines
}

/// Assemble a one-page PDF (Letter, Helvetica) from text lines.
fn build_pdf(lines: &[String]) -> Vec<u8> {
    let mut content = String::from("BT /F1 10 Tf 50 760 Td 14 TL\n");
    for line in lines {
        content.push('(');
        for c in line.chars() {
            match c {
                '(' | ')' | '\\' => {
                    content.push('\\');
                    content.push(c);
                }
                c if c.is_ascii() => content.push(c),
                // Helvetica via this path is ASCII-only.
                _ => content.push('?'),
            }
        }
        content.push_str(") Tj T*\n");
    }
    content.push_str("ET\n");

    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
         /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>"
            .to_string(),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        format!("<< /Length {} >>\nstream\n{content}endstream", content.len()),
    ];

    let mut pdf = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.push_str(&format!("{} 0 obj\n{body}\nendobj\n", i + 1));
    }

    let xref_offset = pdf.len();
    pdf.push_str(&format!("xref\n0 {}\n", objects.len() + 1));
    pdf.push_str("0000000000 65535 f \n");
    for offset in offsets {
        pdf.push_str(&format!("{offset:010} 00000 n \n"));
    }
    pdf.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
        objects.len() + 1
    ));

    pdf.into_bytes()
}
