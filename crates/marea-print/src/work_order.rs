// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use marea_app::Quote;

use crate::html::{Element, el, render_document};
use crate::{DocumentKind, PrintDocument, ShopProfile};

const STYLE: &str = "
body { font-family: Arial, sans-serif; padding: 20px; max-width: 800px; margin: 0 auto; }
.header { text-align: center; margin-bottom: 30px; }
.work-order { margin-bottom: 30px; }
.inspection-list { margin-bottom: 30px; }
.parts-list { margin-bottom: 30px; }
.notes { margin-bottom: 30px; }
.signature { margin-top: 50px; text-align: center; }
.checklist { list-style: none; padding: 0; }
.checklist li { margin: 10px 0; padding-left: 25px; position: relative; }
.checklist li:before { content: \"\\25A1\"; position: absolute; left: 0; }
@media print {
  button { display: none; }
}
";

const CELL_STYLE: &str = "border: 1px solid #000; padding: 5px;";
const NOTES_STYLE: &str = "border: 1px solid #000; padding: 10px; min-height: 100px;";
const SIGNATURE_STYLE: &str = "margin-top: 50px; border-top: 1px solid #000; width: 200px; margin: 0 auto;";

pub const INSPECTION_CHECKLIST: [&str; 5] = [
    "Revisión de motor",
    "Sistema eléctrico",
    "Sistema de propulsión",
    "Casco y estructura",
    "Sistema de refrigeración",
];

const BLANK_PART_ROWS: usize = 2;
const NOTE_LINES: usize = 3;

/// Mechanic-facing work order: inspection checklist plus blank parts, notes
/// and signature areas to fill in on paper.
pub fn work_order(quote: &Quote, shop: &ShopProfile) -> PrintDocument {
    let title = format!("Cotización Mecánico - {}", quote.client);

    let head = el("head")
        .child(el("meta").attr("charset", "utf-8"))
        .child(el("title").text(title.clone()))
        .child(el("style").trusted(STYLE));

    let header = el("div")
        .class("header")
        .child(el("h1").text(shop.name.clone()))
        .child(el("h2").text("Orden de Trabajo - Mecánico"));

    let general = el("div")
        .class("work-order")
        .child(el("h3").text("Información General"))
        .child(detail("No. Recepción:", &quote.reception))
        .child(detail("Fecha:", &quote.date))
        .child(detail("Unidad:", &quote.unit))
        .child(detail("No. Documento:", &quote.document));

    let inspection = el("div")
        .class("inspection-list")
        .child(el("h3").text("Lista de Inspección"))
        .child(
            el("ul")
                .class("checklist")
                .children(INSPECTION_CHECKLIST.iter().map(|item| el("li").text(*item))),
        );

    let header_row = el("tr").children(
        ["Descripción", "Cantidad", "No. Parte"]
            .into_iter()
            .map(|label| el("th").style(CELL_STYLE).text(label)),
    );
    let blank_rows = (0..BLANK_PART_ROWS).map(|_| {
        el("tr")
            .child(el("td").style(CELL_STYLE).text("_____________"))
            .child(el("td").style(CELL_STYLE).text("_______"))
            .child(el("td").style(CELL_STYLE).text("_______"))
    });
    let parts = el("div")
        .class("parts-list")
        .child(el("h3").text("Lista de Repuestos Necesarios"))
        .child(
            el("table")
                .style("width: 100%; border-collapse: collapse;")
                .child(header_row)
                .children(blank_rows),
        );

    let rule = "_".repeat(60);
    let notes = el("div")
        .class("notes")
        .child(el("h3").text("Notas y Observaciones Técnicas"))
        .child(
            el("p")
                .style(NOTES_STYLE)
                .text(vec![rule; NOTE_LINES].join("\n")),
        );

    let signature = el("div").class("signature").child(
        el("div")
            .style(SIGNATURE_STYLE)
            .child(el("p").text("Firma del Mecánico")),
    );

    let body = el("body")
        .child(header)
        .child(general)
        .child(inspection)
        .child(parts)
        .child(notes)
        .child(signature)
        .child(el("button").attr("onclick", "window.print()").text("Imprimir"));

    let root = el("html").attr("lang", "es").child(head).child(body);
    PrintDocument {
        kind: DocumentKind::WorkOrder,
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
