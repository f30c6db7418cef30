//! DOM extraction for the review site's search, detail, and photo pages.
//!
//! All extraction runs over HTML the browser engine already rendered; the
//! selectors here target the post-challenge page, not the "please wait"
//! shell served to non-browser clients.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use mealmap_core::RestaurantImage;

use crate::error::ScrapeError;

/// One entry from the search results page.
#[derive(Debug, Clone)]
pub struct SearchCandidate {
    pub name: String,
    /// Absolute detail-page URL, with any `/photos` or `/reviews` suffix
    /// stripped.
    pub url: String,
    pub source_id: Option<String>,
    pub district: Option<String>,
    pub cuisine_types: Vec<String>,
    pub price_range: Option<String>,
    pub smile_count: Option<u32>,
    pub main_image: Option<String>,
}

/// Metadata extracted from a restaurant detail page.
#[derive(Debug, Clone, Default)]
pub struct DetailData {
    pub address: Option<String>,
    pub phone: Option<String>,
    pub rating: Option<f64>,
    pub review_count: Option<u32>,
    pub review_texts: Vec<String>,
}

fn source_id_of(href: &str) -> Option<String> {
    let re = Regex::new(r"/r-([^/?#]+)").expect("valid source id regex");
    re.captures(href)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_owned())
}

fn selector(src: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(src).map_err(|e| ScrapeError::Parse(format!("invalid CSS selector '{src}': {e}")))
}

fn text_of(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn digits_of(text: &str) -> Option<u32> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}

fn absolute_url(href: &str, base_url: &str) -> String {
    if href.starts_with('/') {
        format!("{}{href}", base_url.trim_end_matches('/'))
    } else {
        href.to_owned()
    }
}

/// Strips photo/review sub-page suffixes so the URL points at the main
/// detail page.
fn clean_detail_href(href: &str) -> &str {
    let href = href.split("/photos").next().unwrap_or(href);
    href.split("/reviews").next().unwrap_or(href)
}

/// Parses the search results page into candidate entries.
///
/// Tries the standard result cells first, then falls back to the desktop
/// main-section layout some result pages use.
///
/// # Errors
///
/// Returns [`ScrapeError::Parse`] only for selector construction failures;
/// an empty or unrecognized page yields an empty list.
pub fn search_results(html: &str, base_url: &str) -> Result<Vec<SearchCandidate>, ScrapeError> {
    let document = Html::parse_document(html);

    let cell_sel = selector("div.poi-list-cell")?;
    let mut candidates: Vec<SearchCandidate> = document
        .select(&cell_sel)
        .filter_map(|cell| parse_search_cell(cell, base_url).transpose())
        .collect::<Result<_, _>>()?;

    if candidates.is_empty() {
        candidates = parse_desktop_sections(&document, base_url)?;
    }

    Ok(candidates)
}

fn parse_search_cell(
    cell: ElementRef<'_>,
    base_url: &str,
) -> Result<Option<SearchCandidate>, ScrapeError> {
    let name_sel = selector("div.poi-name")?;
    let link_sel = selector("a[href*='/r-']")?;
    let district_sel = selector("div.poi-addr")?;
    let cuisine_sel = selector("div.poi-cuisine-short")?;
    let price_sel = selector("div.poi-price")?;
    let smile_sel = selector("span.smile-face")?;
    let image_sel = selector("img.poi-list-cell-img")?;

    let Some(name_el) = cell.select(&name_sel).next() else {
        return Ok(None);
    };
    let name = text_of(name_el);
    if name.is_empty() {
        return Ok(None);
    }

    // Prefer the main restaurant link over /photos or /reviews sub-links.
    let mut href: Option<&str> = None;
    for link in cell.select(&link_sel) {
        if let Some(h) = link.value().attr("href") {
            if !h.contains("/photos") && !h.contains("/reviews") {
                href = Some(h);
                break;
            }
            href.get_or_insert(h);
        }
    }
    let Some(href) = href else {
        return Ok(None);
    };
    let href = clean_detail_href(href);
    let url = absolute_url(href, base_url);
    let source_id = source_id_of(href);

    let district = cell.select(&district_sel).next().map(text_of);
    let cuisine_types = cell
        .select(&cuisine_sel)
        .next()
        .map(|el| {
            text_of(el)
                .split('|')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToOwned::to_owned)
                .collect()
        })
        .unwrap_or_default();
    let price_range = cell.select(&price_sel).next().map(text_of);
    let smile_count = cell
        .select(&smile_sel)
        .next()
        .and_then(|el| digits_of(&text_of(el)));
    let main_image = cell.select(&image_sel).next().and_then(|img| {
        img.value()
            .attr("src")
            .or_else(|| img.value().attr("data-src"))
            .map(ToOwned::to_owned)
    });

    Ok(Some(SearchCandidate {
        name,
        url,
        source_id,
        district,
        cuisine_types,
        price_range,
        smile_count,
        main_image,
    }))
}

fn parse_desktop_sections(
    document: &Html,
    base_url: &str,
) -> Result<Vec<SearchCandidate>, ScrapeError> {
    let section_sel = selector("div.poi-list-cell-desktop-main-section")?;
    let link_sel = selector("a[href*='/r-']")?;
    let name_sel = selector("div.poi-name")?;

    let mut candidates = Vec::new();
    for section in document.select(&section_sel) {
        let Some(link) = section.select(&link_sel).next() else {
            continue;
        };
        let Some(name_el) = section.select(&name_sel).next() else {
            continue;
        };
        let name = text_of(name_el);
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let href = clean_detail_href(href);
        candidates.push(SearchCandidate {
            name,
            url: absolute_url(href, base_url),
            source_id: source_id_of(href),
            district: None,
            cuisine_types: Vec::new(),
            price_range: None,
            smile_count: None,
            main_image: None,
        });
    }
    Ok(candidates)
}

/// Parses a restaurant detail page.
///
/// # Errors
///
/// Returns [`ScrapeError::Parse`] only for selector construction failures;
/// missing fields stay `None`.
pub fn detail_page(html: &str) -> Result<DetailData, ScrapeError> {
    let document = Html::parse_document(html);

    let address_sel = selector("section.address-section span.address")?;
    let phone_sel = selector("a[href^='tel:']")?;
    let rating_sel = selector("div.header-score")?;
    let review_count_sel = selector("span.review-count, a.review-count")?;
    let review_box_sel = selector("div.review-post-trim-desktop.poi-detail-review-trim")?;
    let review_extract_sel = selector("div.review-post-extract")?;

    let address = document.select(&address_sel).next().map(text_of);
    let phone = document.select(&phone_sel).next().map(text_of);
    let rating = document
        .select(&rating_sel)
        .next()
        .and_then(|el| text_of(el).parse::<f64>().ok());
    let review_count = document
        .select(&review_count_sel)
        .next()
        .and_then(|el| digits_of(&text_of(el)));

    let review_texts = document
        .select(&review_box_sel)
        .filter_map(|review_box| {
            review_box
                .select(&review_extract_sel)
                .next()
                .map(text_of)
                .filter(|t| !t.is_empty())
        })
        .collect();

    Ok(DetailData {
        address,
        phone,
        rating,
        review_count,
        review_texts,
    })
}

/// Parses the photo gallery page into at most `cap` images, the first one
/// marked as main.
///
/// # Errors
///
/// Returns [`ScrapeError::Parse`] only for selector construction failures.
pub fn photo_gallery(html: &str, cap: usize) -> Result<Vec<RestaurantImage>, ScrapeError> {
    let document = Html::parse_document(html);

    let media_sel = selector("div.media-item-thumbnail-media")?;
    let image_sel = selector("img.media-item-thumbnail-image")?;

    let mut images = Vec::new();
    for media_item in document.select(&media_sel) {
        let Some(img) = media_item.select(&image_sel).next() else {
            continue;
        };
        let Some(src) = img.value().attr("src") else {
            continue;
        };
        if !src.starts_with("http") {
            continue;
        }
        images.push(RestaurantImage {
            url: src.to_owned(),
            alt: img.value().attr("alt").map(ToOwned::to_owned),
            is_main: images.is_empty(),
        });
        if images.len() >= cap {
            break;
        }
    }
    Ok(images)
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
