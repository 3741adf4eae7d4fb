// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use marea_app::Quote;

use crate::html::{Element, el, render_document};
use crate::{DocumentKind, PrintDocument, ShopProfile, format_money};

const STYLE: &str = "
body { font-family: Arial, sans-serif; padding: 20px; max-width: 800px; margin: 0 auto; }
.header { text-align: center; margin-bottom: 30px; border-bottom: 2px solid #0284c7; padding-bottom: 20px; }
.logo { margin-bottom: 10px; }
.company-info { margin-bottom: 20px; }
.quote-details { margin-bottom: 30px; }
.quote-table { width: 100%; border-collapse: collapse; margin: 20px 0; }
.quote-table th, .quote-table td { border: 1px solid #ddd; padding: 8px; text-align: left; }
.quote-table th { background-color: #f8fafc; }
.total { text-align: right; margin-top: 20px; font-weight: bold; }
.footer { margin-top: 40px; text-align: center; font-size: 0.9em; color: #64748b; }
@media print {
  button { display: none; }
  body { padding: 0; }
  .header { border-bottom-color: #000; }
}
";

struct LineItem {
    description: &'static str,
    quantity: i64,
    unit_price_cents: i64,
}

impl LineItem {
    fn total_cents(&self) -> i64 {
        self.quantity * self.unit_price_cents
    }
}

// Pricing is filled in by hand on the printout until the desk tracks parts.
const LINE_ITEMS: [LineItem; 1] = [LineItem {
    description: "Servicio de diagnóstico",
    quantity: 1,
    unit_price_cents: 0,
}];

/// Client-facing quote: letterhead, quote metadata, line items with tax and
/// total, validity notice and a print button.
pub fn client_quote(quote: &Quote, shop: &ShopProfile) -> PrintDocument {
    let subtotal: i64 = LINE_ITEMS.iter().map(LineItem::total_cents).sum();
    let tax = subtotal * i64::from(shop.tax_rate_percent) / 100;
    let total = subtotal + tax;
    let title = format!("Cotización Cliente - {}", quote.client);

    let head = el("head")
        .child(el("meta").attr("charset", "utf-8"))
        .child(el("title").text(title.clone()))
        .child(el("style").trusted(STYLE));

    let header = el("div")
        .class("header")
        .child(el("div").class("logo").child(el("h1").text(shop.name.clone())))
        .child(
            el("div")
                .class("company-info")
                .child(el("p").text(shop.tagline.clone()))
                .child(el("p").text(format!("Tel: {}", shop.phone))),
        );

    let details = el("div")
        .class("quote-details")
        .child(el("h2").text("Cotización para Cliente"))
        .child(detail("No. Cotización:", &quote.document))
        .child(detail("Fecha:", &quote.date))
        .child(detail("Cliente:", &quote.client))
        .child(detail("Unidad:", &quote.unit))
        .child(detail("No. Recepción:", &quote.reception));

    let head_row = el("tr").children(
        ["Descripción", "Cantidad", "Precio Unitario", "Total"]
            .into_iter()
            .map(|label| el("th").text(label)),
    );
    let body_rows = LINE_ITEMS.iter().map(|item| {
        el("tr")
            .child(el("td").text(item.description))
            .child(el("td").text(item.quantity.to_string()))
            .child(el("td").text(format_money(item.unit_price_cents)))
            .child(el("td").text(format_money(item.total_cents())))
    });
    let table = el("table")
        .class("quote-table")
        .child(el("thead").child(head_row))
        .child(el("tbody").children(body_rows));

    let totals = el("div")
        .class("total")
        .child(el("p").text(format!("Subtotal: {}", format_money(subtotal))))
        .child(el("p").text(format!(
            "IVA ({}%): {}",
            shop.tax_rate_percent,
            format_money(tax)
        )))
        .child(el("p").text(format!("Total: {}", format_money(total))));

    let footer = el("div")
        .class("footer")
        .child(el("p").text(format!(
            "Esta cotización tiene una validez de {} días.",
            shop.validity_days
        )))
        .child(el("p").text(format!("Gracias por confiar en {}", shop.name)));

    let body = el("body")
        .child(header)
        .child(details)
        .child(table)
        .child(totals)
        .child(footer)
        .child(el("button").attr("onclick", "window.print()").text("Imprimir"));

    let root = el("html").attr("lang", "es").child(head).child(body);
    PrintDocument {
        kind: DocumentKind::ClientQuote,
        quote_id: quote.id,
        title,
        html: render_document(&root),
    }
}

fn detail(label: &str, value: &str) -> Element {
    el("p")
        .child(el("strong").text(label))
        .text(format!(" {value}"))
}
