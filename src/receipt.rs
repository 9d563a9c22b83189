//! Boucher (closing receipt) rendering.
//!
//! A [`BoucherDoc`] is a pure projection of a saved report — every figure on
//! the receipt comes straight off the record, no arithmetic happens here.
//! Rendering targets a fixed-width layout for 58/80 mm receipt paper and a
//! self-contained printable HTML document.

use serde::{Deserialize, Serialize};

use crate::calc::round_currency;
use crate::catalog::UnitKind;
use crate::report::{ReportRecord, VarianceClass};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperWidth {
    Mm58,
    Mm80,
}

impl PaperWidth {
    fn columns(self) -> usize {
        match self {
            Self::Mm58 => 32,
            Self::Mm80 => 42,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LayoutConfig {
    pub paper_width: PaperWidth,
    pub organization_name: String,
    pub footer_text: Option<String>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            paper_width: PaperWidth::Mm80,
            organization_name: "Caja Diaria".to_string(),
            footer_text: Some("Gracias por usar el sistema de reportes".to_string()),
        }
    }
}

/// One detail row of the boucher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoucherLine {
    pub product_name: String,
    pub unit_kind: UnitKind,
    pub unit_price: f64,
    pub quantity_sold: u32,
    pub quantity_returned: u32,
    pub line_total: i64,
}

/// The printable closing receipt for one saved report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoucherDoc {
    pub pos_name: String,
    pub date: String,
    pub created_at: String,
    /// Only rows with movement (something sold or something returned).
    pub lines: Vec<BoucherLine>,
    pub merchandise_total: i64,
    pub transfers_received: i64,
    pub other_income: i64,
    pub expenses: i64,
    pub expected_sales: i64,
    pub cash_counted: i64,
    pub cash_variance: i64,
}

impl BoucherDoc {
    /// Project a saved report into its printable form. Rows without any
    /// movement stay off the detail section.
    pub fn from_record(record: &ReportRecord) -> Self {
        let lines = record
            .line_items
            .iter()
            .filter(|item| item.quantity_sold > 0 || item.quantity_returned > 0)
            .map(|item| BoucherLine {
                product_name: item.product_name.clone(),
                unit_kind: item.unit_kind,
                unit_price: item.unit_price,
                quantity_sold: item.quantity_sold,
                quantity_returned: item.quantity_returned,
                line_total: item.line_total,
            })
            .collect();

        Self {
            pos_name: record.pos_name.clone(),
            date: record.date.clone(),
            created_at: record.created_at.clone(),
            lines,
            merchandise_total: record.merchandise_total,
            transfers_received: record.transfers_received,
            other_income: record.other_income,
            expenses: record.expenses,
            expected_sales: record.expected_sales,
            cash_counted: record.cash_counted,
            cash_variance: record.cash_variance,
        }
    }

    pub fn variance_class(&self) -> VarianceClass {
        VarianceClass::of(self.cash_variance)
    }
}

fn unit_suffix(kind: UnitKind) -> &'static str {
    match kind {
        UnitKind::WeightInGrams => "gr",
        UnitKind::Discrete => "unid.",
    }
}

fn variance_label(class: VarianceClass) -> &'static str {
    match class {
        VarianceClass::Surplus => "SALDO A FAVOR",
        VarianceClass::Shortage => "SALDO FALTANTE",
        VarianceClass::Balanced => "SALDO CERO",
    }
}

/// Whole Colombian pesos: `$` prefix, `.` thousands grouping.
fn money(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    if value < 0 {
        format!("-$ {grouped}")
    } else {
        format!("$ {grouped}")
    }
}

fn esc(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut line = String::new();
    for token in text.split_whitespace() {
        if line.is_empty() {
            line.push_str(token);
            continue;
        }
        let next_len = line.chars().count() + 1 + token.chars().count();
        if next_len > width.max(8) {
            out.push(line);
            line = token.to_string();
        } else {
            line.push(' ');
            line.push_str(token);
        }
    }
    if !line.is_empty() {
        out.push(line);
    }
    if out.is_empty() {
        out.push(String::new());
    }
    out
}

fn push_centered(out: &mut String, text: &str, width: usize) {
    for line in wrap(text, width) {
        let len = line.chars().count();
        let pad = width.saturating_sub(len) / 2;
        out.push_str(&" ".repeat(pad));
        out.push_str(&line);
        out.push('\n');
    }
}

/// Label left, value right-aligned. Falls back to two lines when the pair
/// does not fit the paper.
fn push_pair(out: &mut String, label: &str, value: &str, width: usize) {
    let label_len = label.chars().count();
    let value_len = value.chars().count();
    if label_len + 1 + value_len <= width {
        out.push_str(label);
        out.push_str(&" ".repeat(width - label_len - value_len));
        out.push_str(value);
        out.push('\n');
    } else {
        for line in wrap(label, width) {
            out.push_str(&line);
            out.push('\n');
        }
        let pad = width.saturating_sub(value_len);
        out.push_str(&" ".repeat(pad));
        out.push_str(value);
        out.push('\n');
    }
}

fn push_separator(out: &mut String, width: usize) {
    out.push_str(&"-".repeat(width));
    out.push('\n');
}

/// Render the boucher as fixed-width receipt text.
pub fn render_text(doc: &BoucherDoc, cfg: &LayoutConfig) -> String {
    let width = cfg.paper_width.columns();
    let mut out = String::new();

    push_centered(&mut out, &cfg.organization_name, width);
    push_centered(&mut out, &doc.pos_name, width);
    push_pair(&mut out, "Fecha", &doc.date, width);
    push_pair(&mut out, "Guardado", &doc.created_at, width);

    push_separator(&mut out, width);
    push_centered(&mut out, "DETALLE", width);
    if doc.lines.is_empty() {
        push_centered(&mut out, "Sin movimientos de inventario", width);
    }
    for line in &doc.lines {
        let suffix = unit_suffix(line.unit_kind);
        for wrapped in wrap(&line.product_name, width) {
            out.push_str(&wrapped);
            out.push('\n');
        }
        push_pair(
            &mut out,
            &format!(
                "  {} {} x {}",
                line.quantity_sold,
                suffix,
                money(round_currency(line.unit_price))
            ),
            &money(line.line_total),
            width,
        );
        if line.quantity_returned > 0 {
            out.push_str(&format!("  Sobrante: {} {}\n", line.quantity_returned, suffix));
        }
    }

    push_separator(&mut out, width);
    push_centered(&mut out, "RESUMEN", width);
    push_pair(&mut out, "Total Mercancia", &money(doc.merchandise_total), width);
    push_pair(&mut out, "+ Transferencias", &money(doc.transfers_received), width);
    push_pair(&mut out, "+ Otros Ingresos", &money(doc.other_income), width);
    push_pair(&mut out, "- Gastos del Dia", &money(doc.expenses), width);
    push_pair(&mut out, "TOTAL VENTAS", &money(doc.expected_sales), width);
    push_pair(&mut out, "DINERO EN CAJA", &money(doc.cash_counted), width);
    push_pair(
        &mut out,
        variance_label(doc.variance_class()),
        &money(doc.cash_variance.abs()),
        width,
    );

    if let Some(footer) = cfg
        .footer_text
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        push_separator(&mut out, width);
        push_centered(&mut out, footer, width);
    }

    out
}

fn html_shell(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="es">
<head>
<meta charset="UTF-8"/>
<meta name="viewport" content="width=device-width, initial-scale=1.0"/>
<title>{}</title>
<style>
body {{ font-family: ui-monospace, SFMono-Regular, Menlo, monospace; margin: 0; padding: 12px; background: #fff; color: #111; }}
.line {{ display: flex; justify-content: space-between; gap: 8px; font-size: 10px; }}
.line strong {{ font-size: 11px; }}
.section {{ margin-top: 8px; border-top: 1px dashed #111; padding-top: 6px; }}
.section h3 {{ margin: 0 0 4px 0; font-size: 11px; text-transform: uppercase; }}
.note {{ color: #666; font-size: 9px; }}
.center {{ text-align: center; }}
</style>
</head>
<body>{}</body>
</html>"#,
        esc(title),
        body
    )
}

/// Render the boucher as a printable HTML document.
pub fn render_html(doc: &BoucherDoc, cfg: &LayoutConfig) -> String {
    let mut body = format!(
        "<div class=\"center\"><strong>{}</strong></div>\
         <div class=\"center\">{}</div>\
         <div class=\"center note\">Fecha: {}</div>\
         <div class=\"center note\">Guardado: {}</div>",
        esc(&cfg.organization_name),
        esc(&doc.pos_name),
        esc(&doc.date),
        esc(&doc.created_at)
    );

    body.push_str("<div class=\"section\"><h3>Detalle</h3>");
    if doc.lines.is_empty() {
        body.push_str("<div class=\"note\">Sin movimientos de inventario</div>");
    }
    for line in &doc.lines {
        let suffix = unit_suffix(line.unit_kind);
        body.push_str(&format!(
            "<div class=\"line\"><span>{} {} x {}</span><span>{}</span></div>",
            line.quantity_sold,
            suffix,
            esc(&line.product_name),
            money(line.line_total)
        ));
        body.push_str(&format!(
            "<div class=\"note\">Precio: {}</div>",
            money(round_currency(line.unit_price))
        ));
        if line.quantity_returned > 0 {
            body.push_str(&format!(
                "<div class=\"note\">Sobrante: {} {}</div>",
                line.quantity_returned, suffix
            ));
        }
    }
    body.push_str("</div>");

    body.push_str("<div class=\"section\"><h3>Resumen</h3>");
    body.push_str(&format!(
        "<div class=\"line\"><span>1. Valor Total Mercancia</span><span>{}</span></div>\
         <div class=\"line\"><span>2. + Transferencias Recibidas</span><span>{}</span></div>\
         <div class=\"line\"><span>3. + Otros Ingresos</span><span>{}</span></div>\
         <div class=\"line\"><span>4. - Gastos del Dia</span><span>{}</span></div>\
         <div class=\"line\"><strong>TOTAL VENTAS</strong><strong>{}</strong></div>\
         <div class=\"line\"><strong>DINERO EN CAJA</strong><strong>{}</strong></div>\
         <div class=\"line\"><strong>{}</strong><strong>{}</strong></div>",
        money(doc.merchandise_total),
        money(doc.transfers_received),
        money(doc.other_income),
        money(doc.expenses),
        money(doc.expected_sales),
        money(doc.cash_counted),
        esc(variance_label(doc.variance_class())),
        money(doc.cash_variance.abs())
    ));
    body.push_str("</div>");

    if let Some(footer) = cfg
        .footer_text
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        body.push_str(&format!(
            "<div class=\"section center note\">{}</div>",
            esc(footer)
        ));
    }

    html_shell("Boucher de Cierre", &body)
}
