use crate::config::toml_config::{DefaultsConfig, SchemaConfig, ValidationConfig};
use crate::core::date_parser::parse_date_text;
use crate::domain::model::{ExtractionReport, ExtractionStats, JobApplication};
use crate::utils::error::{EtlError, Result};
use chrono::NaiveDateTime;
use scraper::{ElementRef, Html, Selector};

/// Logical card fields that `[validation] required_fields` may name.
pub const FIELD_NAMES: [&str; 5] = ["title", "company", "location", "status", "date"];

/// 編譯後的 selector 組
#[derive(Debug)]
pub struct CompiledSchema {
    card: Selector,
    title: Selector,
    company_location: Selector,
    company_location_item: Selector,
    status: Selector,
    date: Selector,
    title_suffixes: Vec<String>,
}

impl CompiledSchema {
    pub fn compile(schema: &SchemaConfig) -> Result<Self> {
        Ok(Self {
            card: compile_selector("schema.card", &schema.card)?,
            title: compile_selector("schema.title", &schema.title)?,
            company_location: compile_selector(
                "schema.company_location",
                &schema.company_location,
            )?,
            company_location_item: compile_selector(
                "schema.company_location_item",
                &schema.company_location_item,
            )?,
            status: compile_selector("schema.status", &schema.status)?,
            date: compile_selector("schema.date", &schema.date)?,
            title_suffixes: schema
                .title_suffixes
                .iter()
                .filter(|s| !s.trim().is_empty())
                .cloned()
                .collect(),
        })
    }
}

fn compile_selector(field: &str, selector: &str) -> Result<Selector> {
    if selector.trim().is_empty() {
        return Err(EtlError::SelectorError {
            field: field.to_string(),
            selector: selector.to_string(),
            reason: "selector cannot be empty".to_string(),
        });
    }

    Selector::parse(selector).map_err(|e| EtlError::SelectorError {
        field: field.to_string(),
        selector: selector.to_string(),
        reason: format!("{:?}", e),
    })
}

/// 單張卡片的擷取結果，`defaulted` 記錄哪些欄位使用了預設值
struct ExtractedCard {
    application: JobApplication,
    defaulted: Vec<&'static str>,
}

/// 擷取所需的設定，可在 async 邊界之間傳遞
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionSettings {
    pub schema: SchemaConfig,
    pub defaults: DefaultsConfig,
    pub validation: ValidationConfig,
}

pub struct CardExtractor {
    schema: CompiledSchema,
    defaults: DefaultsConfig,
    validation: ValidationConfig,
}

impl CardExtractor {
    pub fn new(
        schema: &SchemaConfig,
        defaults: DefaultsConfig,
        validation: ValidationConfig,
    ) -> Result<Self> {
        Ok(Self {
            schema: CompiledSchema::compile(schema)?,
            defaults,
            validation,
        })
    }

    pub fn from_settings(settings: &ExtractionSettings) -> Result<Self> {
        Self::new(
            &settings.schema,
            settings.defaults.clone(),
            settings.validation.clone(),
        )
    }

    /// 解析整份 HTML 並擷取所有卡片
    pub fn extract_html(&self, html: &str, now: NaiveDateTime) -> ExtractionReport {
        let document = Html::parse_document(html);
        self.extract(&document, now)
    }

    /// 依文件順序擷取卡片；單張失敗只記錄並略過
    pub fn extract(&self, document: &Html, now: NaiveDateTime) -> ExtractionReport {
        let cards: Vec<ElementRef<'_>> = document.select(&self.schema.card).collect();
        let mut stats = ExtractionStats {
            total_cards: cards.len(),
            ..Default::default()
        };

        tracing::info!("🔎 Found {} job cards. Processing...", cards.len());

        let mut applications = Vec::with_capacity(cards.len());

        for (index, card) in cards.into_iter().enumerate() {
            let index = index + 1;
            match self.extract_card(index, card, now) {
                Ok(extracted) => {
                    if !extracted.defaulted.is_empty() {
                        tracing::warn!(
                            "⚠️ Card {} used defaults for: {}",
                            index,
                            extracted.defaulted.join(", ")
                        );
                        stats.warnings += 1;
                    }
                    applications.push(extracted.application);
                    stats.successful += 1;
                }
                Err(e) => {
                    tracing::error!("❌ Error processing card {}: {}", index, e);
                    stats.errors += 1;
                }
            }
        }

        ExtractionReport {
            applications,
            stats,
        }
    }

    fn extract_card(
        &self,
        index: usize,
        card: ElementRef<'_>,
        now: NaiveDateTime,
    ) -> Result<ExtractedCard> {
        let mut defaulted = Vec::new();

        let title = first_text(card, &self.schema.title)
            .map(|raw| self.strip_title_suffixes(&raw))
            .filter(|t| !t.is_empty());
        let title = self.or_default("title", title, &self.defaults.title, &mut defaulted);

        let parts: Vec<String> = card
            .select(&self.schema.company_location)
            .next()
            .map(|container| {
                container
                    .select(&self.schema.company_location_item)
                    .map(element_text)
                    .collect()
            })
            .unwrap_or_default();
        let mut parts = parts.into_iter().map(|p| Some(p).filter(|p| !p.is_empty()));
        let company = parts.next().flatten();
        let location = parts.next().flatten();
        let company = self.or_default("company", company, &self.defaults.company, &mut defaulted);
        let location =
            self.or_default("location", location, &self.defaults.location, &mut defaulted);

        let status = first_text(card, &self.schema.status).filter(|s| !s.is_empty());
        let status = self.or_default("status", status, &self.defaults.status, &mut defaulted);

        let date_text = first_text(card, &self.schema.date).filter(|d| !d.is_empty());
        let date_text = self.or_default("date", date_text, &self.defaults.date_text, &mut defaulted);

        for field in &self.validation.required_fields {
            if defaulted.iter().any(|d| *d == field.as_str()) {
                return Err(EtlError::CardError {
                    index,
                    message: format!("required field '{}' is missing", field),
                });
            }
        }

        if let Some(max) = self.validation.max_title_length {
            let length = title.chars().count();
            if length > max {
                return Err(EtlError::CardError {
                    index,
                    message: format!("title is {} characters long (max {})", length, max),
                });
            }
        }

        Ok(ExtractedCard {
            application: JobApplication {
                id: index,
                title,
                company,
                location,
                status,
                date_applied: parse_date_text(&date_text, now),
            },
            defaulted,
        })
    }

    fn or_default(
        &self,
        field: &'static str,
        value: Option<String>,
        default: &str,
        defaulted: &mut Vec<&'static str>,
    ) -> String {
        value.unwrap_or_else(|| {
            defaulted.push(field);
            default.to_string()
        })
    }

    fn strip_title_suffixes(&self, raw: &str) -> String {
        let stripped = self
            .schema
            .title_suffixes
            .iter()
            .fold(raw.to_string(), |title, suffix| title.replace(suffix.as_str(), ""));
        normalize_ws(&stripped)
    }
}

fn first_text(card: ElementRef<'_>, selector: &Selector) -> Option<String> {
    card.select(selector).next().map(element_text)
}

/// 與 DOM textContent 相同，文字節點直接相接
fn element_text(element: ElementRef<'_>) -> String {
    normalize_ws(&element.text().collect::<String>())
}

fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
