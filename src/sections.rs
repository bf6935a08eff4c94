//! Landing page sections.
//!
//! Each section is a pure function from its slice of [`SiteConfig`] to Maud
//! markup. Only the portfolio carries behavior, through the [`Gallery`] it is
//! handed; everything else is static layout.

use crate::config::{self, CardSection, SiteConfig};
use crate::gallery::Gallery;
use maud::{Markup, PreEscaped, html};
use pulldown_cmark::{Event, Parser, Tag, TagEnd, html as md_html};

/// Sticky top bar: logo, in-page navigation, quote button.
pub fn header(config: &SiteConfig) -> Markup {
    let nav = [
        (&config.services.anchor, &config.services.nav_label),
        (&config.differentiators.anchor, &config.differentiators.nav_label),
        (&config.portfolio.anchor, &config.portfolio.nav_label),
    ];

    html! {
        header.site-header {
            (logo(config))
            nav.site-nav {
                @for (anchor, label) in nav {
                    @if !label.is_empty() {
                        a href={ "#" (anchor) } { (label) }
                    }
                }
            }
            (whatsapp_button(config, "button button-small", html! { (config.contact.quote_label) }))
        }
    }
}

fn logo(config: &SiteConfig) -> Markup {
    html! {
        a.logo href="#" {
            span.logo-primary { (config.brand.primary) }
            span.logo-accent { (config.brand.accent) }
        }
    }
}

fn whatsapp_button(config: &SiteConfig, class: &str, label: Markup) -> Markup {
    html! {
        a class=(class) href=(config.contact.whatsapp_link()) target="_blank" rel="noopener noreferrer" {
            (label)
        }
    }
}

pub fn hero(config: &SiteConfig) -> Markup {
    let hero = &config.hero;
    html! {
        section.hero {
            div.hero-grid aria-hidden="true" {}
            div.hero-content {
                h1 {
                    span.hero-headline { (hero.headline) }
                    span.hero-tagline { (hero.tagline) }
                }
                p.lead { (hero.lead) }
                (whatsapp_button(config, "button button-large", html! { (hero.cta_label) }))
            }
        }
    }
}

fn section_heading(title: &str, subtitle: &str) -> Markup {
    html! {
        div.section-heading {
            h2 { (title) }
            @if !subtitle.is_empty() {
                p { (subtitle) }
            }
        }
    }
}

fn card_grid(section: &CardSection, class: &str) -> Markup {
    html! {
        section id=(section.anchor) class=(class) {
            (section_heading(&section.title, &section.subtitle))
            div.card-grid {
                @for card in &section.cards {
                    div.card {
                        i class={ "fa-solid fa-" (card.icon) " card-icon" } {}
                        h3 { (card.title) }
                        p { (card.text) }
                    }
                }
            }
        }
    }
}

pub fn services(config: &SiteConfig) -> Markup {
    card_grid(&config.services, "section section-alt")
}

pub fn differentiators(config: &SiteConfig) -> Markup {
    card_grid(&config.differentiators, "section")
}

/// Numbered process steps joined by a connector line.
pub fn how_it_works(config: &SiteConfig) -> Markup {
    let steps = &config.steps;
    html! {
        section.section.section-alt {
            (section_heading(&steps.title, &steps.subtitle))
            div.steps style={ "--step-count: " (steps.items.len()) } {
                div.steps-line aria-hidden="true" {}
                @for (i, step) in steps.items.iter().enumerate() {
                    div.step {
                        div.step-number { (i + 1) }
                        h3 { (step.title) }
                        p { (step.text) }
                    }
                }
            }
        }
    }
}

pub fn portfolio(config: &SiteConfig, gallery: &Gallery) -> Markup {
    let portfolio = &config.portfolio;
    html! {
        section.section id=(portfolio.anchor) {
            (section_heading(&portfolio.title, &portfolio.subtitle))
            (gallery.render())
        }
    }
}

pub fn final_cta(config: &SiteConfig) -> Markup {
    let cta = &config.final_cta;
    html! {
        section.section.section-alt.final-cta {
            h2 { (cta.title) }
            p.lead { (cta.text) }
            (whatsapp_button(config, "button button-large", html! {
                i.fa-brands.fa-whatsapp {}
                " "
                (cta.button_label)
            }))
        }
    }
}

pub fn footer(config: &SiteConfig) -> Markup {
    let footer = &config.footer;
    html! {
        footer.site-footer {
            p { "© " (config::effective_year(footer)) " " (footer.company) ". " (footer.rights) }
            @if !footer.contact_line.is_empty() {
                (PreEscaped(inline_markdown(&footer.contact_line)))
            }
        }
    }
}

/// Render markdown to HTML, opening links in a new tab.
///
/// Link text goes through the markdown renderer; the anchor itself is built
/// with Maud so the destination is attribute-escaped.
fn inline_markdown(source: &str) -> String {
    let mut out = String::new();
    let mut events = Parser::new(source);
    while let Some(event) = events.next() {
        match event {
            Event::Start(Tag::Link { dest_url, .. }) => {
                let label: Vec<Event> = events
                    .by_ref()
                    .take_while(|e| !matches!(e, Event::End(TagEnd::Link)))
                    .collect();
                let mut text = String::new();
                md_html::push_html(&mut text, label.into_iter());
                let anchor = html! {
                    a href=(&*dest_url) target="_blank" rel="noopener noreferrer" { (PreEscaped(text)) }
                };
                out.push_str(&anchor.into_string());
            }
            other => md_html::push_html(&mut out, std::iter::once(other)),
        }
    }
    out
}

/// The whole page body, in display order.
pub fn landing_page(config: &SiteConfig, gallery: &Gallery) -> Markup {
    html! {
        div.page {
            (header(config))
            main {
                (hero(config))
                (services(config))
                (differentiators(config))
                (how_it_works(config))
                (portfolio(config, gallery))
                (final_cta(config))
            }
            (footer(config))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::sample_entries;

    fn default_gallery(config: &SiteConfig) -> Gallery {
        Gallery::new(
            config.portfolio.all_entries(),
            &config.lazy_media.to_loader_options(),
        )
        .unwrap()
    }

    #[test]
    fn header_links_sections_and_whatsapp() {
        let html = header(&SiteConfig::default()).into_string();
        assert!(html.contains(r##"href="#services""##));
        assert!(html.contains(r##"href="#diferenciais""##));
        assert!(html.contains(r##"href="#portfolio""##));
        assert!(html.contains("https://wa.me/5511999999999?text="));
        assert!(html.contains("Orçamento"));
    }

    #[test]
    fn header_skips_sections_without_nav_label() {
        let mut config = SiteConfig::default();
        config.differentiators.nav_label.clear();
        let html = header(&config).into_string();
        assert!(!html.contains(r##"href="#diferenciais""##));
        assert!(html.contains(r##"href="#services""##));
    }

    #[test]
    fn header_renders_two_tone_logo() {
        let html = header(&SiteConfig::default()).into_string();
        assert!(html.contains(r#"<span class="logo-primary">Titanium</span>"#));
        assert!(html.contains(r#"<span class="logo-accent">Maker</span>"#));
    }

    #[test]
    fn hero_has_headline_and_cta() {
        let html = hero(&SiteConfig::default()).into_string();
        assert!(html.contains("Suas Ideias, Nossa Impressão."));
        assert!(html.contains("Realidade em 3D."));
        assert!(html.contains("Solicitar Orçamento Agora"));
        assert!(html.contains("wa.me"));
    }

    #[test]
    fn card_sections_render_anchor_and_icons() {
        let config = SiteConfig::default();
        let html = services(&config).into_string();
        assert!(html.contains(r#"id="services""#));
        assert!(html.contains("fa-solid fa-cube card-icon"));
        assert_eq!(html.matches(r#"class="card""#).count(), 3);

        let html = differentiators(&config).into_string();
        assert!(html.contains(r#"id="diferenciais""#));
        assert!(html.contains("Precisão Milimétrica"));
    }

    #[test]
    fn steps_numbered_by_position() {
        let html = how_it_works(&SiteConfig::default()).into_string();
        for n in 1..=4 {
            assert!(html.contains(&format!(r#"<div class="step-number">{n}</div>"#)));
        }
        assert!(html.contains("--step-count: 4"));
        assert!(html.contains("Receba em Casa"));
    }

    #[test]
    fn portfolio_renders_one_card_per_entry() {
        let config = SiteConfig::default();
        let gallery = default_gallery(&config);
        let html = portfolio(&config, &gallery).into_string();
        assert!(html.contains(r#"id="portfolio""#));
        assert_eq!(html.matches("data-lazy-media").count(), 6);
        assert!(html.contains("https://www.instagram.com/reel/DPzRsMVjwYE/"));
        // No video is bound outside its template before the page loads.
        assert_eq!(html.matches("<video").count(), html.matches("<template>").count());
    }

    #[test]
    fn portfolio_passes_entry_text_through() {
        let config = SiteConfig::default();
        let entries = sample_entries(3);
        let gallery = Gallery::new(&entries, &config.lazy_media.to_loader_options()).unwrap();
        let html = portfolio(&config, &gallery).into_string();
        for entry in &entries {
            assert!(html.contains(&entry.title));
            assert!(html.contains(&entry.description));
            assert!(html.contains(&entry.link));
        }
    }

    #[test]
    fn final_cta_has_whatsapp_icon() {
        let html = final_cta(&SiteConfig::default()).into_string();
        assert!(html.contains("fa-brands fa-whatsapp"));
        assert!(html.contains("Fale Conosco no WhatsApp"));
    }

    #[test]
    fn footer_uses_configured_year_and_markdown_link() {
        let mut config = SiteConfig::default();
        config.footer.year = Some(2025);
        let html = footer(&config).into_string();
        assert!(html.contains("© 2025 Titanium Maker. Todos os direitos reservados."));
        assert!(html.contains(
            r#"<a href="http://instagram.com/titanium.maker" target="_blank" rel="noopener noreferrer">Instagram</a>"#
        ));
    }

    #[test]
    fn footer_omits_empty_contact_line() {
        let mut config = SiteConfig::default();
        config.footer.contact_line.clear();
        let html = footer(&config).into_string();
        assert!(!html.contains("<a "));
    }

    #[test]
    fn inline_markdown_escapes_link_targets() {
        let html = inline_markdown(r#"[x](https://e.com/?a=1&b="2")"#);
        assert!(html.contains("a=1&amp;b=&quot;2&quot;"));
        assert!(!html.contains(r#"b="2""#));
    }

    #[test]
    fn inline_markdown_keeps_paragraph_and_link_text() {
        let html = inline_markdown("Fale com a [*equipe*](https://e.com) agora");
        assert_eq!(
            html.trim_end(),
            r#"<p>Fale com a <a href="https://e.com" target="_blank" rel="noopener noreferrer"><em>equipe</em></a> agora</p>"#
        );
    }

    #[test]
    fn config_text_is_escaped() {
        let mut config = SiteConfig::default();
        config.hero.headline = "<script>alert('xss')</script>".to_string();
        let html = hero(&config).into_string();
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn landing_page_orders_sections() {
        let config = SiteConfig::default();
        let gallery = default_gallery(&config);
        let html = landing_page(&config, &gallery).into_string();
        let pos = |needle: &str| html.find(needle).unwrap_or_else(|| panic!("missing {needle}"));
        assert!(pos("site-header") < pos("hero"));
        assert!(pos("hero") < pos(r#"id="services""#));
        assert!(pos(r#"id="services""#) < pos(r#"id="diferenciais""#));
        assert!(pos(r#"id="diferenciais""#) < pos("steps"));
        assert!(pos("steps") < pos(r#"id="portfolio""#));
        assert!(pos(r#"id="portfolio""#) < pos("final-cta"));
        assert!(pos("final-cta") < pos("site-footer"));
    }
}
