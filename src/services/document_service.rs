// src/services/document_service.rs

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use chrono::FixedOffset;
use genpdf::{elements, style, Alignment, Element};
use image::Luma;
use qrcode::QrCode;
use rust_decimal::Decimal;
use tokio::io::AsyncWriteExt;

use crate::{
    common::error::AppError,
    models::sales::{Sale, SaleItem},
    services::amount_words::amount_in_words,
};

pub const DEFAULT_CUSTOMER: &str = "CONSUMIDOR FINAL";

/// Dados fixos do cabeçalho e rodapé da fatura.
#[derive(Debug, Clone)]
pub struct CompanyProfile {
    pub name: String,
    pub header_lines: Vec<String>,
    pub qr_payload: Option<String>,
    pub footer_lines: Vec<String>,
}

impl Default for CompanyProfile {
    fn default() -> Self {
        Self {
            name: "TECNOMART".to_string(),
            header_lines: vec![
                "Tecnología avanzada en Informática".to_string(),
                "Ubicados en la Col. Hato de Enmedio - Plazita - Sector #6".to_string(),
                "Edificio 2do nivel - frente a SUPERCARNES".to_string(),
                "Tel: 9841-1640 • tecnomart67@gmail.com".to_string(),
            ],
            qr_payload: None,
            footer_lines: vec![
                "La factura es beneficio de todos. ¡EXÍJALA!".to_string(),
                "¡GRACIAS POR SU COMPRA!".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceLine {
    pub quantity: i32,
    pub description: String,
    pub line_total: Decimal,
}

/// Conteúdo da fatura, independente do formato de saída.
#[derive(Debug, Clone)]
pub struct InvoiceDocument {
    pub company: CompanyProfile,
    pub customer: String,
    pub rtn: String,
    pub date: String,
    pub time: String,
    pub invoice_number: i64,
    pub seller: String,
    pub lines: Vec<InvoiceLine>,
    pub total: Decimal,
    pub amount_in_words: String,
}

impl InvoiceDocument {
    pub fn build(
        company: &CompanyProfile,
        sale: &Sale,
        items: &[SaleItem],
        offset: FixedOffset,
    ) -> Self {
        let local = sale.created_at.with_timezone(&offset);

        let customer = sale
            .customer_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_CUSTOMER)
            .to_string();

        let lines = items
            .iter()
            .map(|item| InvoiceLine {
                quantity: item.quantity,
                description: item.description.clone(),
                line_total: item.unit_price * Decimal::from(item.quantity),
            })
            .collect();

        Self {
            company: company.clone(),
            customer,
            rtn: sale.customer_rtn.clone().unwrap_or_default(),
            date: local.format("%d/%m/%Y").to_string(),
            time: local.format("%H:%M:%S").to_string(),
            invoice_number: sale.invoice_number,
            seller: sale.seller_name.clone(),
            lines,
            total: sale.total,
            amount_in_words: amount_in_words(sale.total),
        }
    }

    pub fn file_name(&self) -> String {
        invoice_file_name(self.invoice_number)
    }
}

pub fn invoice_file_name(invoice_number: i64) -> String {
    format!("{}.pdf", invoice_number)
}

// ---
// Renderização
// ---

#[async_trait]
pub trait InvoiceRenderer: Send + Sync {
    async fn render(&self, document: &InvoiceDocument) -> Result<Vec<u8>, AppError>;
}

/// Renderiza o ticket com genpdf (fontes carregadas de `fonts_dir`).
#[derive(Debug, Clone)]
pub struct GenpdfInvoiceRenderer {
    fonts_dir: PathBuf,
    font_family: String,
    logo: Option<PathBuf>,
}

impl GenpdfInvoiceRenderer {
    pub fn new(fonts_dir: PathBuf, font_family: String, logo: Option<PathBuf>) -> Self {
        Self { fonts_dir, font_family, logo }
    }
}

#[async_trait]
impl InvoiceRenderer for GenpdfInvoiceRenderer {
    async fn render(&self, document: &InvoiceDocument) -> Result<Vec<u8>, AppError> {
        let renderer = self.clone();
        let document = document.clone();

        // genpdf é síncrono e pesado: fora do runtime
        tokio::task::spawn_blocking(move || renderer.render_blocking(&document))
            .await
            .map_err(|e| AppError::InternalServerError(anyhow::Error::new(e)))?
    }
}

fn pdf_error(e: impl std::fmt::Display) -> AppError {
    AppError::InternalServerError(anyhow::Error::msg(e.to_string()))
}

fn centered(text: String, font_size: u8, bold: bool) -> impl Element {
    let mut paragraph = elements::Paragraph::new(text);
    paragraph.set_alignment(Alignment::Center);
    let mut style = style::Style::new().with_font_size(font_size);
    if bold {
        style = style.bold();
    }
    paragraph.styled(style)
}

pub fn load_fonts(
    fonts_dir: &Path,
    font_family: &str,
) -> Result<genpdf::fonts::FontFamily<genpdf::fonts::FontData>, AppError> {
    genpdf::fonts::from_files(fonts_dir, font_family, None).map_err(|_| {
        AppError::FontNotFound(format!(
            "Fonte {} não encontrada na pasta {}",
            font_family,
            fonts_dir.display()
        ))
    })
}

impl GenpdfInvoiceRenderer {
    fn render_blocking(&self, invoice: &InvoiceDocument) -> Result<Vec<u8>, AppError> {
        let font_family = load_fonts(&self.fonts_dir, &self.font_family)?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(format!("Factura #{}", invoice.invoice_number));

        // Papel de ticket: largura fixa, altura cresce com as linhas
        let height_mm = 150.0 + invoice.lines.len() as f64 * 6.0;
        doc.set_paper_size(genpdf::Size::new(80.0, height_mm));

        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(4);
        doc.set_page_decorator(decorator);

        // --- LOGO ---
        if let Some(logo) = self.logo.as_ref().filter(|p| p.exists()) {
            match elements::Image::from_path(logo) {
                Ok(image) => {
                    doc.push(
                        image
                            .with_alignment(Alignment::Center)
                            .with_scale(genpdf::Scale::new(0.4, 0.4)),
                    );
                }
                Err(e) => tracing::warn!("Logo ignorado ({}): {}", logo.display(), e),
            }
        }

        // --- CABEÇALHO ---
        doc.push(centered(invoice.company.name.clone(), 10, true));
        for line in &invoice.company.header_lines {
            doc.push(centered(line.clone(), 7, false));
        }
        doc.push(elements::Break::new(1));

        // --- CLIENTE ---
        let small = style::Style::new().with_font_size(8);
        for line in [
            format!("CLIENTE: {}", invoice.customer),
            format!("RTN: {}", invoice.rtn),
            format!("FECHA: {}", invoice.date),
            format!("HORA: {}", invoice.time),
            format!("FACTURA: {}", invoice.invoice_number),
            format!("VENDEDOR: {}", invoice.seller),
        ] {
            doc.push(elements::Paragraph::new(line).styled(small));
        }
        doc.push(elements::Break::new(1));

        // --- ITENS ---
        // Pesos das colunas: Qtd (1), Descrição (4), Total (2)
        let mut table = elements::TableLayout::new(vec![1, 4, 2]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(false, true, false));

        let bold = small.bold();
        let mut total_header = elements::Paragraph::new("TOTAL");
        total_header.set_alignment(Alignment::Right);
        table
            .row()
            .element(elements::Paragraph::new("CANT").styled(bold))
            .element(elements::Paragraph::new("DESCRIPCIÓN").styled(bold))
            .element(total_header.styled(bold))
            .push()
            .map_err(pdf_error)?;

        for line in &invoice.lines {
            let mut amount = elements::Paragraph::new(format!("L. {:.2}", line.line_total));
            amount.set_alignment(Alignment::Right);
            table
                .row()
                .element(elements::Paragraph::new(line.quantity.to_string()).styled(small))
                .element(elements::Paragraph::new(line.description.clone()).styled(small))
                .element(amount.styled(small))
                .push()
                .map_err(pdf_error)?;
        }
        doc.push(table);
        doc.push(elements::Break::new(1));

        // --- TOTAIS ---
        doc.push(
            elements::Paragraph::new(format!("TOTAL A PAGAR: L. {:.2}", invoice.total))
                .styled(style::Style::new().bold().with_font_size(9)),
        );
        doc.push(
            elements::Paragraph::new(format!("SON: {}", invoice.amount_in_words)).styled(small),
        );
        doc.push(elements::Break::new(1));

        // --- QR ---
        if let Some(payload) = &invoice.company.qr_payload {
            let code = QrCode::new(payload.as_bytes()).map_err(pdf_error)?;
            let image_buffer = code.render::<Luma<u8>>().build();
            let dynamic_image = image::DynamicImage::ImageLuma8(image_buffer);

            let pdf_image = elements::Image::from_dynamic_image(dynamic_image)
                .map_err(pdf_error)?
                .with_alignment(Alignment::Center)
                .with_scale(genpdf::Scale::new(0.4, 0.4));
            doc.push(pdf_image);
            doc.push(elements::Break::new(1));
        }

        // --- RODAPÉ ---
        for line in &invoice.company.footer_lines {
            doc.push(centered(line.clone(), 7, false));
        }

        let mut buffer = Vec::new();
        doc.render(&mut buffer).map_err(pdf_error)?;
        Ok(buffer)
    }
}

// ---
// Armazenamento
// ---

#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Grava o arquivo de forma durável e devolve o caminho final.
    async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, AppError>;

    async fn load(&self, file_name: &str) -> Result<Option<Vec<u8>>, AppError>;
}

/// fsync do diretório, para persistir as entradas criadas ou renomeadas nele.
#[cfg(unix)]
async fn sync_dir(dir: &Path) -> std::io::Result<()> {
    tokio::fs::File::open(dir).await?.sync_all().await
}

#[cfg(not(unix))]
async fn sync_dir(_dir: &Path) -> std::io::Result<()> {
    Ok(())
}

#[derive(Debug, Clone)]
pub struct FsInvoiceStore {
    dir: PathBuf,
}

impl FsInvoiceStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

#[async_trait]
impl InvoiceStore for FsInvoiceStore {
    async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, AppError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| AppError::InternalServerError(e.into()))?;

        let final_path = self.dir.join(file_name);
        let tmp_path = self
            .dir
            .join(format!(".{}.{}.tmp", file_name, uuid::Uuid::new_v4()));

        // Temporário + fsync + rename: o arquivo final nunca fica pela metade
        let write = async {
            let mut file = tokio::fs::File::create(&tmp_path).await?;
            file.write_all(bytes).await?;
            file.sync_all().await?;
            tokio::fs::rename(&tmp_path, &final_path).await?;
            // O rename só sobrevive a uma queda de energia depois do fsync do diretório
            sync_dir(&self.dir).await
        };

        if let Err(e) = write.await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(AppError::InternalServerError(e.into()));
        }

        Ok(final_path)
    }

    async fn load(&self, file_name: &str) -> Result<Option<Vec<u8>>, AppError> {
        match tokio::fs::read(self.dir.join(file_name)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::InternalServerError(e.into())),
        }
    }
}

// ---
// Serviço
// ---

#[derive(Clone)]
pub struct InvoiceService {
    renderer: Arc<dyn InvoiceRenderer>,
    store: Arc<dyn InvoiceStore>,
    profile: CompanyProfile,
    offset: FixedOffset,
}

impl InvoiceService {
    pub fn new(
        renderer: Arc<dyn InvoiceRenderer>,
        store: Arc<dyn InvoiceStore>,
        profile: CompanyProfile,
        offset: FixedOffset,
    ) -> Self {
        Self { renderer, store, profile, offset }
    }

    /// Renderiza e grava a fatura; devolve o nome do arquivo.
    /// Pode ser repetido: o arquivo é sobrescrito atomicamente.
    pub async fn generate(&self, sale: &Sale, items: &[SaleItem]) -> Result<String, AppError> {
        let document = InvoiceDocument::build(&self.profile, sale, items, self.offset);
        let file_name = document.file_name();

        let failed = |e: AppError| {
            tracing::error!(
                invoice_number = sale.invoice_number,
                "Falha ao gerar a fatura: {}",
                e
            );
            AppError::InvoiceGenerationFailed {
                invoice_number: sale.invoice_number,
                reason: e.to_string(),
            }
        };

        let bytes = self.renderer.render(&document).await.map_err(failed)?;
        self.store.save(&file_name, &bytes).await.map_err(failed)?;

        Ok(file_name)
    }

    pub async fn load(&self, invoice_number: i64) -> Result<Option<Vec<u8>>, AppError> {
        self.store.load(&invoice_file_name(invoice_number)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sales::{InvoiceStatus, PaymentMethod};
    use chrono::{TimeZone, Utc};

    fn sale(customer: Option<&str>) -> Sale {
        Sale {
            id: 1,
            invoice_number: 1042,
            user_id: 3,
            created_at: Utc.with_ymd_and_hms(2025, 3, 4, 20, 30, 0).unwrap(),
            payment_method: PaymentMethod::Efectivo,
            total: Decimal::new(12550, 2),
            final_total: Decimal::new(12550, 2),
            status: "completada".into(),
            customer_name: customer.map(str::to_string),
            customer_rtn: None,
            seller_name: "Ana".into(),
            invoice_status: InvoiceStatus::Pendiente,
            invoice_file: None,
        }
    }

    fn item(description: &str, quantity: i32, unit_price: Decimal) -> SaleItem {
        SaleItem {
            id: 0,
            sale_id: 1,
            product_id: Some(1),
            service_code: None,
            description: description.into(),
            quantity,
            unit_price,
            line_total: unit_price * Decimal::from(quantity),
        }
    }

    fn honduras() -> FixedOffset {
        FixedOffset::west_opt(6 * 3600).unwrap()
    }

    #[test]
    fn document_defaults_customer_and_spells_total() {
        let items = [item("Mouse", 2, Decimal::from(50)), item("Pad", 1, Decimal::new(2550, 2))];
        let doc = InvoiceDocument::build(&CompanyProfile::default(), &sale(Some("  ")), &items, honduras());

        assert_eq!(doc.customer, DEFAULT_CUSTOMER);
        assert_eq!(doc.rtn, "");
        assert_eq!(doc.date, "04/03/2025");
        assert_eq!(doc.time, "14:30:00");
        assert_eq!(doc.lines[0].line_total, Decimal::from(100));
        assert_eq!(doc.amount_in_words, "CIENTO VEINTE Y CINCO LEMPIRAS CON 50/100");
        assert_eq!(doc.file_name(), "1042.pdf");
        assert_eq!(doc.company.name, "TECNOMART");
    }

    #[test]
    fn document_keeps_named_customer() {
        let doc = InvoiceDocument::build(&CompanyProfile::default(), &sale(Some("Luis")), &[], honduras());
        assert_eq!(doc.customer, "Luis");
    }

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("facturas-{}", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn fs_store_writes_and_reads_back() {
        let dir = temp_dir();
        let store = FsInvoiceStore::new(dir.clone());

        let path = store.save("7.pdf", b"%PDF-1.4").await.unwrap();
        assert_eq!(path, dir.join("7.pdf"));
        assert_eq!(store.load("7.pdf").await.unwrap().as_deref(), Some(&b"%PDF-1.4"[..]));
        assert!(store.load("8.pdf").await.unwrap().is_none());

        // Nenhum temporário sobra no diretório
        let mut entries = tokio::fs::read_dir(&dir).await.unwrap();
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
        assert_eq!(names, vec!["7.pdf".to_string()]);

        tokio::fs::remove_dir_all(dir).await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn directory_fsync_needs_an_existing_directory() {
        let dir = temp_dir();
        assert!(sync_dir(&dir).await.is_err());

        tokio::fs::create_dir_all(&dir).await.unwrap();
        sync_dir(&dir).await.unwrap();

        tokio::fs::remove_dir_all(dir).await.unwrap();
    }

    struct FixedRenderer;

    #[async_trait]
    impl InvoiceRenderer for FixedRenderer {
        async fn render(&self, document: &InvoiceDocument) -> Result<Vec<u8>, AppError> {
            Ok(format!("factura {}", document.invoice_number).into_bytes())
        }
    }

    struct BrokenRenderer;

    #[async_trait]
    impl InvoiceRenderer for BrokenRenderer {
        async fn render(&self, _document: &InvoiceDocument) -> Result<Vec<u8>, AppError> {
            Err(AppError::FontNotFound("Roboto".into()))
        }
    }

    #[tokio::test]
    async fn generate_is_idempotent() {
        let dir = temp_dir();
        let service = InvoiceService::new(
            Arc::new(FixedRenderer),
            Arc::new(FsInvoiceStore::new(dir.clone())),
            CompanyProfile::default(),
            honduras(),
        );

        let s = sale(None);
        assert_eq!(service.generate(&s, &[]).await.unwrap(), "1042.pdf");
        assert_eq!(service.generate(&s, &[]).await.unwrap(), "1042.pdf");
        assert_eq!(
            service.load(1042).await.unwrap().as_deref(),
            Some(&b"factura 1042"[..])
        );

        tokio::fs::remove_dir_all(dir).await.unwrap();
    }

    #[tokio::test]
    async fn render_failure_reports_the_invoice_number() {
        let dir = temp_dir();
        let service = InvoiceService::new(
            Arc::new(BrokenRenderer),
            Arc::new(FsInvoiceStore::new(dir.clone())),
            CompanyProfile::default(),
            honduras(),
        );

        let err = service.generate(&sale(None), &[]).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::InvoiceGenerationFailed { invoice_number: 1042, .. }
        ));
        assert!(service.load(1042).await.unwrap().is_none());
    }
}
