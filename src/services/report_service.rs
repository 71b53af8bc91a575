// src/services/report_service.rs

use std::path::PathBuf;

use chrono::{FixedOffset, Utc};
use genpdf::{elements, style, Element};
use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    db::ReportRepository,
    models::reports::{DailySummary, GeneralReport, ShiftReportRow},
    services::{document_service::load_fonts, shift::Shift},
};

/// Agrupa os cortes por dia, separando turno de dia e de noite.
pub fn summarize(rows: &[ShiftReportRow], goal: Decimal, days: u32) -> GeneralReport {
    let mut report = GeneralReport { days, ..GeneralReport::default() };

    for row in rows {
        let day = report.summary.entry(row.date).or_insert_with(|| DailySummary {
            goal,
            ..DailySummary::default()
        });

        if row.shift == Shift::Day.code() {
            day.day_shift += row.gross_sales;
            report.total_day += row.gross_sales;
        } else if row.shift == Shift::Night.code() {
            day.night_shift += row.gross_sales;
            report.total_night += row.gross_sales;
        }

        day.total = day.day_shift + day.night_shift;
        day.goal_met = day.total >= day.goal;
    }

    report.total = report.total_day + report.total_night;
    report
}

#[derive(Clone)]
pub struct ReportService {
    report_repo: ReportRepository,
    daily_goal: Decimal,
    offset: FixedOffset,
    fonts_dir: PathBuf,
    font_family: String,
}

impl ReportService {
    pub fn new(
        report_repo: ReportRepository,
        daily_goal: Decimal,
        offset: FixedOffset,
        fonts_dir: PathBuf,
        font_family: String,
    ) -> Self {
        Self { report_repo, daily_goal, offset, fonts_dir, font_family }
    }

    pub async fn shift_report(&self, days: u32) -> Result<Vec<ShiftReportRow>, AppError> {
        self.report_repo
            .closed_shifts_since(days, self.offset.local_minus_utc() / 3600)
            .await
    }

    pub async fn general(&self, days: u32) -> Result<GeneralReport, AppError> {
        let rows = self.shift_report(days).await?;
        Ok(summarize(&rows, self.daily_goal, days))
    }

    pub async fn general_pdf(&self, days: u32) -> Result<Vec<u8>, AppError> {
        let report = self.general(days).await?;
        let fonts_dir = self.fonts_dir.clone();
        let font_family = self.font_family.clone();
        let generated = Utc::now().with_timezone(&self.offset).format("%d/%m/%Y").to_string();

        tokio::task::spawn_blocking(move || {
            render_general_pdf(&report, &fonts_dir, &font_family, &generated)
        })
        .await
        .map_err(|e| AppError::InternalServerError(anyhow::Error::new(e)))?
    }
}

fn render_general_pdf(
    report: &GeneralReport,
    fonts_dir: &std::path::Path,
    font_family: &str,
    generated: &str,
) -> Result<Vec<u8>, AppError> {
    let to_internal =
        |e: genpdf::error::Error| AppError::InternalServerError(anyhow::Error::msg(e.to_string()));

    let font_family = load_fonts(fonts_dir, font_family)?;
    let mut doc = genpdf::Document::new(font_family);
    doc.set_title("Reporte general de ventas");
    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(10);
    doc.set_page_decorator(decorator);

    doc.push(
        elements::Paragraph::new("REPORTE GENERAL DE VENTAS")
            .styled(style::Style::new().bold().with_font_size(18)),
    );
    doc.push(elements::Paragraph::new(format!("Últimos {} días", report.days)));
    doc.push(elements::Paragraph::new(format!("Generado: {}", generated)));
    doc.push(elements::Break::new(2));

    // Fecha (2), Día (2), Noche (2), Total (2), Meta (2), Estado (2)
    let mut table = elements::TableLayout::new(vec![2, 2, 2, 2, 2, 2]);
    table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

    let bold = style::Style::new().bold();
    let mut header = table.row();
    for title in ["Fecha", "Día", "Noche", "Total", "Meta", "Estado"] {
        header = header.element(elements::Paragraph::new(title).styled(bold));
    }
    header.push().map_err(to_internal)?;

    for (date, day) in &report.summary {
        table
            .row()
            .element(elements::Paragraph::new(date.format("%d/%m/%Y").to_string()))
            .element(elements::Paragraph::new(format!("L {:.2}", day.day_shift)))
            .element(elements::Paragraph::new(format!("L {:.2}", day.night_shift)))
            .element(elements::Paragraph::new(format!("L {:.2}", day.total)))
            .element(elements::Paragraph::new(format!("L {:.2}", day.goal)))
            .element(elements::Paragraph::new(if day.goal_met { "Cumplido" } else { "No cumplido" }))
            .push()
            .map_err(to_internal)?;
    }
    doc.push(table);
    doc.push(elements::Break::new(2));

    // --- RESUMO ---
    doc.push(
        elements::Paragraph::new("RESUMEN DE TOTALES")
            .styled(style::Style::new().bold().with_font_size(11)),
    );
    for (label, value) in [
        ("Total Turno Día", report.total_day),
        ("Total Turno Noche", report.total_night),
        ("TOTAL GENERAL", report.total),
    ] {
        doc.push(elements::Paragraph::new(format!("{}: L {:.2}", label, value)));
    }

    let mut buffer = Vec::new();
    doc.render(&mut buffer).map_err(to_internal)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(day: u32, shift: i16, amount: i64) -> ShiftReportRow {
        ShiftReportRow {
            date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            shift,
            gross_sales: Decimal::from(amount),
        }
    }

    #[test]
    fn groups_by_day_and_shift() {
        let rows = vec![row(3, 1, 900), row(3, 2, 700), row(3, 1, 100), row(4, 2, 400)];
        let report = summarize(&rows, Decimal::from(1500), 30);

        let monday = &report.summary[&NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()];
        assert_eq!(monday.day_shift, Decimal::from(1000));
        assert_eq!(monday.night_shift, Decimal::from(700));
        assert_eq!(monday.total, Decimal::from(1700));
        assert!(monday.goal_met);

        let tuesday = &report.summary[&NaiveDate::from_ymd_opt(2025, 3, 4).unwrap()];
        assert_eq!(tuesday.total, Decimal::from(400));
        assert!(!tuesday.goal_met);

        assert_eq!(report.total_day, Decimal::from(1000));
        assert_eq!(report.total_night, Decimal::from(1100));
        assert_eq!(report.total, Decimal::from(2100));
        assert_eq!(report.days, 30);
    }

    #[test]
    fn goal_is_met_on_equality() {
        let report = summarize(&[row(5, 1, 1500)], Decimal::from(1500), 7);
        assert!(report.summary.values().all(|d| d.goal_met));
    }

    #[test]
    fn empty_period_has_zero_totals() {
        let report = summarize(&[], Decimal::from(1500), 7);
        assert!(report.summary.is_empty());
        assert_eq!(report.total, Decimal::ZERO);
    }
}
