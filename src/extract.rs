//! Field extraction for a single item detail page.
//!
//! The markup shape is fixed: every field is read from a known element, and a
//! page missing any of them is rejected as a whole.

use scraper::{ElementRef, Html, Selector};

use crate::formats::{BookRecord, ProductInfo, Rating};

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("missing element: {0}")]
    MissingElement(&'static str),
    #[error("missing attribute `{attribute}` on {element}")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },
    #[error("rating class has no rating token")]
    MissingRatingToken,
    #[error("unrecognized rating token: {0:?}")]
    UnknownRating(String),
    #[error("product information row {row} has no {cell} cell")]
    IncompleteRow { row: usize, cell: &'static str },
}

const TITLE: &str = "h1";
const PRICE: &str = "p.price_color";
const RATING: &str = "p.star-rating";
const STOCK: &str = "p.instock.availability";
const DESCRIPTION: &str = r#"meta[name="description"]"#;
const INFO_TABLE: &str = "table.table.table-striped";

pub fn extract_html(html: &str) -> Result<BookRecord, ExtractionError> {
    extract(&Html::parse_document(html))
}

pub fn extract(document: &Html) -> Result<BookRecord, ExtractionError> {
    let title = element_text(first(document, TITLE)?);
    let price = element_text(first(document, PRICE)?);
    let rating = rating(first(document, RATING)?)?;
    let stock = element_text(first(document, STOCK)?).trim().to_owned();
    let description = first(document, DESCRIPTION)?
        .value()
        .attr("content")
        .ok_or(ExtractionError::MissingAttribute {
            element: DESCRIPTION,
            attribute: "content",
        })?
        .trim()
        .to_owned();
    let product_info = product_info(first(document, INFO_TABLE)?)?;

    Ok(BookRecord {
        title,
        price,
        rating,
        stock,
        description,
        product_info,
    })
}

fn first<'a>(document: &'a Html, css: &'static str) -> Result<ElementRef<'a>, ExtractionError> {
    document
        .select(&selector(css))
        .next()
        .ok_or(ExtractionError::MissingElement(css))
}

pub(crate) fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("literal selector must parse")
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

fn rating(element: ElementRef<'_>) -> Result<Rating, ExtractionError> {
    let class = element
        .value()
        .attr("class")
        .ok_or(ExtractionError::MissingAttribute {
            element: RATING,
            attribute: "class",
        })?;
    let token = class
        .split_whitespace()
        .nth(1)
        .ok_or(ExtractionError::MissingRatingToken)?;
    token
        .parse::<Rating>()
        .map_err(|_| ExtractionError::UnknownRating(token.to_owned()))
}

fn product_info(table: ElementRef<'_>) -> Result<ProductInfo, ExtractionError> {
    let row_selector = selector("tr");
    let header_selector = selector("th");
    let value_selector = selector("td");

    let mut info = ProductInfo::new();
    for (index, row) in table.select(&row_selector).enumerate() {
        let header = row
            .select(&header_selector)
            .next()
            .ok_or(ExtractionError::IncompleteRow {
                row: index,
                cell: "th",
            })?;
        let value = row
            .select(&value_selector)
            .next()
            .ok_or(ExtractionError::IncompleteRow {
                row: index,
                cell: "td",
            })?;
        info.insert(element_text(header), element_text(value));
    }
    Ok(info)
}
