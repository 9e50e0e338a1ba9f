//! Invoice display formatting

use crate::models::Invoice;

/// Format invoices one per line
pub fn format_invoice_list(invoices: &[Invoice]) -> String {
    if invoices.is_empty() {
        return "No invoices found.\n".to_string();
    }

    let mut output = String::new();
    for invoice in invoices {
        output.push_str(&invoice.to_string());
        output.push('\n');
    }
    output
}

/// Format the full details of one invoice
pub fn format_invoice_details(invoice: &Invoice) -> String {
    let mut output = String::new();

    output.push_str(&format!("Invoice:     {}\n", invoice.id));
    output.push_str(&format!("Date:        {}\n", invoice.date));
    if let Some(due) = invoice.due_date {
        output.push_str(&format!("Due:         {}\n", due));
    }
    output.push_str(&format!("Amount:      {}\n", invoice.amount));
    if !invoice.tax.is_zero() {
        output.push_str(&format!("Tax:         {}\n", invoice.tax));
    }
    output.push_str(&format!("From:        {}\n", invoice.from));
    output.push_str(&format!("To:          {}\n", invoice.to));
    output.push_str(&format!("Counterpart: {}\n", invoice.ext_name));
    if let Some(description) = &invoice.description {
        output.push_str(&format!("Description: {}\n", description));
    }
    if let Some(attachment) = &invoice.attachment {
        output.push_str(&format!("Attachment:  {}\n", attachment));
    }

    output
}
