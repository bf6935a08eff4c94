//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults
//! describe the complete Titanium Maker landing page; a user `config.toml` in
//! the content directory overrides any subset of them.
//!
//! ## Config File Location
//!
//! ```text
//! content/
//! ├── config.toml     # Overrides stock defaults (optional)
//! └── assets/         # Copied verbatim to the output root (optional)
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! [site]
//! title = "Titanium Maker | Impressão 3D"
//! lang = "pt-BR"
//!
//! [contact]
//! whatsapp_phone = "5511999999999"
//! whatsapp_message = "Olá! Gostaria de fazer um orçamento."
//!
//! [lazy_media]
//! threshold = 0.1           # Visible fraction that triggers video loading
//!
//! [portfolio]
//! show_featured = false     # Drop the stock featured project
//!
//! [[portfolio.entries]]
//! title = "Mascote do Vascão"
//! description = "..."
//! media_url = "https://i.imgur.com/YKKKllU.mp4"
//! link = "https://www.instagram.com/titanium.maker/"
//! ```
//!
//! Run `titanium-site gen-config` for every key with its default.
//!
//! ## Partial Configuration
//!
//! Tables merge key by key; arrays (cards, steps, portfolio entries) replace
//! the default list as a whole. Unknown keys are rejected to catch typos early.

use crate::lazy_media::{DEFAULT_FALLBACK_TEXT, DEFAULT_THRESHOLD, LoaderOptions};
use crate::types::{Card, PortfolioEntry, Step};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Document metadata (`<title>`, `lang`, description).
    pub site: SiteMeta,
    /// Two-tone logo text.
    pub brand: BrandConfig,
    /// WhatsApp and Instagram contact points.
    pub contact: ContactConfig,
    pub hero: HeroConfig,
    pub services: CardSection,
    pub differentiators: CardSection,
    pub steps: StepsSection,
    pub portfolio: PortfolioConfig,
    pub final_cta: FinalCtaConfig,
    pub footer: FooterConfig,
    /// Deferred video loading in the portfolio gallery.
    pub lazy_media: LazyMediaConfig,
    pub colors: ColorConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site: SiteMeta::default(),
            brand: BrandConfig::default(),
            contact: ContactConfig::default(),
            hero: HeroConfig::default(),
            services: CardSection::default_services(),
            differentiators: CardSection::default_differentiators(),
            steps: StepsSection::default(),
            portfolio: PortfolioConfig::default(),
            final_cta: FinalCtaConfig::default(),
            footer: FooterConfig::default(),
            lazy_media: LazyMediaConfig::default(),
            colors: ColorConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.lang.trim().is_empty() {
            return Err(ConfigError::Validation("site.lang must not be empty".into()));
        }
        if self.lazy_media.to_loader_options().validate().is_err() {
            return Err(ConfigError::Validation(
                "lazy_media.threshold must be greater than 0 and at most 1".into(),
            ));
        }
        if !self.contact.whatsapp_phone.chars().any(|c| c.is_ascii_digit()) {
            return Err(ConfigError::Validation(
                "contact.whatsapp_phone must contain digits".into(),
            ));
        }
        for (name, section) in [
            ("services", &self.services),
            ("differentiators", &self.differentiators),
        ] {
            if section.anchor.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "{name}.anchor must not be empty"
                )));
            }
            if section.cards.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "{name}.cards must not be empty"
                )));
            }
        }
        if self.steps.items.is_empty() {
            return Err(ConfigError::Validation(
                "steps.items must not be empty".into(),
            ));
        }
        if self.portfolio.anchor.trim().is_empty() {
            return Err(ConfigError::Validation(
                "portfolio.anchor must not be empty".into(),
            ));
        }
        if let Some(featured) = self.portfolio.featured_entry() {
            validate_entry("portfolio.featured", featured)?;
        }
        for (i, entry) in self.portfolio.entries.iter().enumerate() {
            validate_entry(&format!("portfolio.entries[{i}]"), entry)?;
        }
        Ok(())
    }
}

fn validate_entry(label: &str, entry: &PortfolioEntry) -> Result<(), ConfigError> {
    if entry.media_url.trim().is_empty() {
        return Err(ConfigError::Validation(format!(
            "{label}.media_url must not be empty"
        )));
    }
    if entry.link.trim().is_empty() {
        return Err(ConfigError::Validation(format!(
            "{label}.link must not be empty"
        )));
    }
    Ok(())
}

/// Document-level metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteMeta {
    /// Contents of `<title>`.
    pub title: String,
    /// `lang` attribute of the `<html>` element.
    pub lang: String,
    /// `<meta name="description">` content.
    pub description: String,
    /// Icon font stylesheet URL (Font Awesome). Omit to ship without icons.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_stylesheet: Option<String>,
}

impl Default for SiteMeta {
    fn default() -> Self {
        Self {
            title: "Titanium Maker | Impressão 3D".to_string(),
            lang: "pt-BR".to_string(),
            description: "Serviços de impressão 3D de alta precisão para protótipos, peças personalizadas e colecionáveis.".to_string(),
            icon_stylesheet: Some(
                "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.5.2/css/all.min.css"
                    .to_string(),
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrandConfig {
    /// First half of the logo, rendered muted.
    pub primary: String,
    /// Second half of the logo, rendered in the accent color.
    pub accent: String,
}

impl BrandConfig {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.primary, self.accent)
    }
}

impl Default for BrandConfig {
    fn default() -> Self {
        Self {
            primary: "Titanium".to_string(),
            accent: "Maker".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContactConfig {
    /// WhatsApp number; anything but digits is ignored.
    pub whatsapp_phone: String,
    /// Message prefilled in the chat opened by call-to-action buttons.
    pub whatsapp_message: String,
    pub instagram_url: String,
    /// Label of the header call-to-action button.
    pub quote_label: String,
}

impl ContactConfig {
    pub fn whatsapp_link(&self) -> String {
        crate::contact::whatsapp_link(&self.whatsapp_phone, &self.whatsapp_message)
    }
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            whatsapp_phone: "5511999999999".to_string(),
            whatsapp_message: "Olá! Gostaria de fazer um orçamento.".to_string(),
            instagram_url: "https://www.instagram.com/titanium.maker/".to_string(),
            quote_label: "Orçamento".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeroConfig {
    pub headline: String,
    /// Second headline line, rendered in the accent color.
    pub tagline: String,
    pub lead: String,
    pub cta_label: String,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            headline: "Suas Ideias, Nossa Impressão.".to_string(),
            tagline: "Realidade em 3D.".to_string(),
            lead: "Serviços de impressão 3D de alta precisão para protótipos, peças personalizadas e projetos inovadores. Da imaginação à materialização.".to_string(),
            cta_label: "Solicitar Orçamento Agora".to_string(),
        }
    }
}

/// A titled grid of icon cards, linked from the header navigation.
///
/// Every key is required when the section is given in full; partial tables in
/// `config.toml` are merged onto the stock section instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CardSection {
    /// Element id, used as the `#anchor` target.
    pub anchor: String,
    /// Header navigation label. Empty hides the section from navigation.
    pub nav_label: String,
    pub title: String,
    pub subtitle: String,
    pub cards: Vec<Card>,
}

fn card(icon: &str, title: &str, text: &str) -> Card {
    Card {
        icon: icon.to_string(),
        title: title.to_string(),
        text: text.to_string(),
    }
}

impl CardSection {
    pub fn default_services() -> Self {
        Self {
            anchor: "services".to_string(),
            nav_label: "Serviços".to_string(),
            title: "O Que Fazemos".to_string(),
            subtitle: "Soluções completas em impressão 3D para todas as necessidades.".to_string(),
            cards: vec![
                card(
                    "cube",
                    "Prototipagem Rápida",
                    "Valide seus projetos com protótipos funcionais e de alta fidelidade.",
                ),
                card(
                    "gear",
                    "Peças Personalizadas",
                    "Criação de peças únicas, de itens de decoração a componentes específicos.",
                ),
                card(
                    "users",
                    "Miniaturas e Colecionáveis",
                    "Dê vida aos seus personagens e modelos favoritos com detalhes incríveis.",
                ),
            ],
        }
    }

    pub fn default_differentiators() -> Self {
        Self {
            anchor: "diferenciais".to_string(),
            nav_label: "Diferenciais".to_string(),
            title: "Nossos Diferenciais".to_string(),
            subtitle: "Por que escolher a Titanium Maker?".to_string(),
            cards: vec![
                card(
                    "shield-halved",
                    "Qualidade Superior",
                    "Utilizamos apenas materiais premium para garantir durabilidade e acabamento impecável.",
                ),
                card(
                    "flask-vial",
                    "Precisão Milimétrica",
                    "Nossa tecnologia de ponta assegura que cada detalhe do seu projeto seja perfeito.",
                ),
                card(
                    "comments",
                    "Suporte Dedicado",
                    "Acompanhamos você do início ao fim, garantindo que sua visão se torne realidade.",
                ),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StepsSection {
    pub title: String,
    pub subtitle: String,
    pub items: Vec<Step>,
}

impl Default for StepsSection {
    fn default() -> Self {
        let step = |title: &str, text: &str| Step {
            title: title.to_string(),
            text: text.to_string(),
        };
        Self {
            title: "Como Funciona?".to_string(),
            subtitle: "Nosso processo é simples, rápido e transparente.".to_string(),
            items: vec![
                step("Envie sua Ideia", "Conte sua ideia ou envie o modelo 3D."),
                step("Orçamento", "Analisamos e enviamos um orçamento detalhado."),
                step(
                    "Impressão",
                    "Produzimos sua peça com materiais de alta qualidade.",
                ),
                step("Receba em Casa", "Enviamos para todo o Brasil com segurança."),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PortfolioConfig {
    pub anchor: String,
    pub nav_label: String,
    pub title: String,
    pub subtitle: String,
    /// Render `featured` ahead of the entries. Set to `false` to drop it
    /// without restating the whole table.
    pub show_featured: bool,
    /// Highlighted project shown before the regular entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<PortfolioEntry>,
    pub entries: Vec<PortfolioEntry>,
}

impl PortfolioConfig {
    /// The featured entry when enabled, shown first.
    pub fn featured_entry(&self) -> Option<&PortfolioEntry> {
        self.featured.as_ref().filter(|_| self.show_featured)
    }

    /// Featured entry first, then the regular entries, in config order.
    pub fn all_entries(&self) -> impl Iterator<Item = &PortfolioEntry> {
        self.featured_entry().into_iter().chain(self.entries.iter())
    }
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        let instagram = "https://www.instagram.com/titanium.maker/";
        let entry = |title: &str, description: &str, media_url: &str| PortfolioEntry {
            title: title.to_string(),
            description: description.to_string(),
            media_url: media_url.to_string(),
            link: instagram.to_string(),
        };
        Self {
            anchor: "portfolio".to_string(),
            nav_label: "Portfólio".to_string(),
            title: "Projetos em Destaque".to_string(),
            subtitle: "Confira alguns dos nossos trabalhos incríveis.".to_string(),
            show_featured: true,
            featured: Some(PortfolioEntry {
                title: "Escultura Personalizada".to_string(),
                description: "Action figure de mascote do Flamengo com asas. Clique para ver o vídeo da peça no Instagram.".to_string(),
                media_url: "https://i.imgur.com/4wurvfO.mp4".to_string(),
                link: "https://www.instagram.com/reel/DPzRsMVjwYE/".to_string(),
            }),
            entries: vec![
                entry(
                    "Mascote do Vascão",
                    "Mascote do Vasco da Gama impresso em resina 8K para colecionadores e torcedores apaixonados.",
                    "https://i.imgur.com/YKKKllU.mp4",
                ),
                entry(
                    "Tributo ao Krav Magá",
                    "Kimono personalizado do lutador de Krav Magá - Faixa Azul, Edson Macena. Impressão 3D com acabamento manual e riqueza de detalhes.",
                    "https://i.imgur.com/EVu0FRi.mp4",
                ),
                entry(
                    "Mascote do Botafogo",
                    "Estátua do mascote do Botafogo, impressa com alta definição para torcedores e colecionadores.",
                    "https://i.imgur.com/TdHq2wk.mp4",
                ),
                entry(
                    "Mascote do Grêmio",
                    "Estátua do mascote do Grêmio, para a coleção de todos os torcedores do imortal tricolor.",
                    "https://i.imgur.com/wc5psw6.mp4",
                ),
                entry(
                    "Mascote do Fluminense",
                    "Estátua do mascote do Fluminense, o guerreiro tricolor, para celebrar as vitórias do nense.",
                    "https://i.imgur.com/JrFVOMj.mp4",
                ),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FinalCtaConfig {
    pub title: String,
    pub text: String,
    pub button_label: String,
}

impl Default for FinalCtaConfig {
    fn default() -> Self {
        Self {
            title: "Pronto para dar vida ao seu projeto?".to_string(),
            text: "Entre em contato conosco hoje mesmo e vamos transformar sua ideia em um objeto real.".to_string(),
            button_label: "Fale Conosco no WhatsApp".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FooterConfig {
    /// Company name in the copyright line.
    pub company: String,
    pub rights: String,
    /// Inline markdown, e.g. a contact link.
    pub contact_line: String,
    /// Copyright year. Defaults to the year the site is built.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

impl Default for FooterConfig {
    fn default() -> Self {
        Self {
            company: "Titanium Maker".to_string(),
            rights: "Todos os direitos reservados.".to_string(),
            contact_line: "Contato via [Instagram](http://instagram.com/titanium.maker)".to_string(),
            year: None,
        }
    }
}

/// Resolve the copyright year: configured value or the current UTC year.
pub fn effective_year(footer: &FooterConfig) -> i32 {
    footer.year.unwrap_or_else(|| chrono::Utc::now().year())
}

/// Deferred video loading settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LazyMediaConfig {
    /// Visible fraction of a card (0 < t <= 1) that triggers loading its video.
    pub threshold: f64,
    /// Text for browsers that cannot play the video.
    pub fallback_text: String,
}

impl LazyMediaConfig {
    pub fn to_loader_options(&self) -> LoaderOptions {
        LoaderOptions {
            threshold: self.threshold,
            fallback_text: self.fallback_text.clone(),
        }
    }
}

impl Default for LazyMediaConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            fallback_text: DEFAULT_FALLBACK_TEXT.to_string(),
        }
    }
}

/// Page colors. The page has a single dark scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Page background.
    pub background: String,
    /// Cards and placeholders.
    pub surface: String,
    /// Background of alternating sections.
    pub surface_alt: String,
    pub border: String,
    pub text: String,
    /// Subtitles and card body text.
    pub text_muted: String,
    /// Headings, icons, logo accent.
    pub accent: String,
    /// Call-to-action button background.
    pub button: String,
    pub button_hover: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            background: "#111827".to_string(),
            surface: "#1f2937".to_string(),
            surface_alt: "#030712".to_string(),
            border: "#374151".to_string(),
            text: "#ffffff".to_string(),
            text_muted: "#9ca3af".to_string(),
            accent: "#22d3ee".to_string(),
            button: "#0891b2".to_string(),
            button_hover: "#0e7490".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key by key; any other overlay value (arrays included)
/// replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no `config.toml`.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory, on top of the stock
/// defaults.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

const STOCK_HEADER: &str = "\
# Titanium Site Configuration
# ===========================
# All settings are optional. Values below are the defaults.
# Place this file at <source>/config.toml and keep only what you change.
#
# Tables merge key by key. Arrays ([[services.cards]], [[steps.items]],
# [[portfolio.entries]]) replace the default list as a whole.
# Unknown keys will cause an error.
#
# [lazy_media] threshold is the visible fraction (0 < t <= 1) of a portfolio
# card that triggers loading its video.
# [portfolio] show_featured = false drops the featured project.
# [footer] year defaults to the build year; set it to pin the copyright.
";

/// Returns the stock `config.toml`: a commented header plus every default.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> String {
    let body = toml::to_string_pretty(&SiteConfig::default())
        .expect("default config must serialize");
    format!("{STOCK_HEADER}\n{body}")
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {background};
    --color-surface: {surface};
    --color-surface-alt: {surface_alt};
    --color-border: {border};
    --color-text: {text};
    --color-text-muted: {text_muted};
    --color-accent: {accent};
    --color-button: {button};
    --color-button-hover: {button_hover};
}}"#,
        background = colors.background,
        surface = colors.surface,
        surface_alt = colors.surface_alt,
        border = colors.border,
        text = colors.text,
        text_muted = colors.text_muted,
        accent = colors.accent,
        button = colors.button,
        button_hover = colors.button_hover,
    )
}
