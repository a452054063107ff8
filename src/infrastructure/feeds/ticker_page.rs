//! Extraction of price records from the AGMARKNET ticker page.
//!
//! The page carries one arrival-date label and a `DataListTicker` table whose
//! cells each hold four spans. Span ids are generated by ASP.NET
//! (`DataListTicker_ctl03_lblTicker_3` and so on), so spans are matched on the
//! stable part of their id.

use crate::domain::entities::price_record::PriceRecord;
use crate::domain::error::DomainError;
use crate::domain::values::price::Price;
use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

const DATE_LABEL: &str = "#rptrArrdate_lblDate_0";
const TICKER_ITEM: &str = "#DataListTicker td";
const COMMODITY: &str = r#"span[id*="lblTicker_"]"#;
const VARIETY: &str = r#"span[id*="lblTitle_"]"#;
const MAX_PRICE: &str = r#"span[id*="lblMaxprice_"]"#;
const MIN_PRICE: &str = r#"span[id*="lblminprice_"]"#;

/// Layouts tried for the arrival-date label. Numeric dates are month first.
/// `%b` only matches three-letter month names, so full names get `%B` twins.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%d-%b-%Y",
    "%d-%B-%Y",
    "%d %b, %Y",
    "%d %B, %Y",
    "%b %d %Y",
    "%B %d %Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

/// Why a ticker cell did not become a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("commodity is empty")]
    MissingCommodity,
    #[error("variety is empty")]
    MissingVariety,
    #[error("max price is not positive")]
    NonPositiveMaxPrice,
    #[error("min price is not positive")]
    NonPositiveMinPrice,
}

pub struct TickerPageExtractor {
    date_label: Selector,
    item: Selector,
    commodity: Selector,
    variety: Selector,
    max_price: Selector,
    min_price: Selector,
}

impl TickerPageExtractor {
    pub fn new() -> Result<Self, DomainError> {
        Ok(Self {
            date_label: selector(DATE_LABEL)?,
            item: selector(TICKER_ITEM)?,
            commodity: selector(COMMODITY)?,
            variety: selector(VARIETY)?,
            max_price: selector(MAX_PRICE)?,
            min_price: selector(MIN_PRICE)?,
        })
    }

    /// Records found on the page, in document order. Cells that fail
    /// validation are left out.
    pub fn extract(&self, html: &str, fallback_date: NaiveDate) -> Vec<PriceRecord> {
        self.extract_candidates(html, fallback_date)
            .into_iter()
            .filter_map(|candidate| match candidate {
                Ok(record) => Some(record),
                Err(reason) => {
                    tracing::debug!(%reason, "skipping ticker item");
                    None
                }
            })
            .collect()
    }

    /// One result per ticker cell, in document order.
    pub fn extract_candidates(
        &self,
        html: &str,
        fallback_date: NaiveDate,
    ) -> Vec<Result<PriceRecord, SkipReason>> {
        let document = Html::parse_document(html);

        let date_text = document
            .select(&self.date_label)
            .next()
            .map(element_text)
            .unwrap_or_default();
        let date = parse_page_date(&date_text).unwrap_or_else(|| {
            tracing::debug!(label = %date_text, %fallback_date, "unreadable arrival date, using fallback");
            fallback_date
        });

        document
            .select(&self.item)
            .map(|item| self.extract_item(item, date))
            .collect()
    }

    fn extract_item(&self, item: ElementRef, date: NaiveDate) -> Result<PriceRecord, SkipReason> {
        let commodity = self.field(item, &self.commodity);
        if commodity.is_empty() {
            return Err(SkipReason::MissingCommodity);
        }
        let variety = self.field(item, &self.variety);
        if variety.is_empty() {
            return Err(SkipReason::MissingVariety);
        }

        let max_price = Price::parse_lenient(&self.field(item, &self.max_price));
        if !max_price.is_positive() {
            return Err(SkipReason::NonPositiveMaxPrice);
        }
        let min_price = Price::parse_lenient(&self.field(item, &self.min_price));
        if !min_price.is_positive() {
            return Err(SkipReason::NonPositiveMinPrice);
        }

        Ok(PriceRecord::new(commodity, variety, max_price, min_price, date))
    }

    fn field(&self, item: ElementRef, sel: &Selector) -> String {
        item.select(sel).next().map(element_text).unwrap_or_default()
    }
}

fn selector(css: &str) -> Result<Selector, DomainError> {
    Selector::parse(css).map_err(|e| DomainError::Parse(format!("bad selector {css}: {e:?}")))
}

fn element_text(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Reads the arrival-date label, e.g. `04 Jul 2025` or `Price as on : 04/07/2025`.
pub fn parse_page_date(text: &str) -> Option<NaiveDate> {
    let clean = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if clean.is_empty() {
        return None;
    }

    let mut candidates = vec![clean.as_str()];
    if let Some((_, tail)) = clean.rsplit_once(':') {
        candidates.push(tail.trim());
    }

    candidates.into_iter().find_map(|candidate| {
        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(candidate, fmt).ok())
    })
}
