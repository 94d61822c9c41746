use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::error::PickemError;
use crate::model::{ExtractedPage, Pick, TieConfig};

const ENTRIES_MARKER: &str = "GROUP ENTRIES";
const PICKS_MARKER: &str = "PICKS";
/// Title row plus column header row.
const ENTRY_HEADER_ROWS: usize = 2;
const INDEX_ATTR: &str = "data-idx";
const NO_PICK_CLASS: &str = "noPick";

pub(crate) fn selector(css: &str) -> Result<Selector, PickemError> {
    Selector::parse(css).map_err(|e| PickemError::Config(format!("bad selector '{css}': {e}")))
}

#[derive(Debug)]
struct GridSelectors {
    table: Selector,
    row: Selector,
    entry_name_cell: Selector,
    entry_link: Selector,
    pick_cell: Selector,
    image: Selector,
    link: Selector,
    correct: Selector,
    incorrect: Selector,
}

impl GridSelectors {
    fn new() -> Result<Self, PickemError> {
        Ok(Self {
            table: selector("table")?,
            row: selector("tr")?,
            entry_name_cell: selector(r#"td[class*="GroupPickGrid-column--entryName"]"#)?,
            entry_link: selector("a.GroupPickGrid-entryLink")?,
            pick_cell: selector(r#"td[class*="GroupPickGrid-column--pick"]"#)?,
            image: selector("img")?,
            link: selector("a")?,
            // ESPN has shipped both the named and the hashed class names
            correct: selector(".PickCorrect-checkMark, .css-1skkwww")?,
            incorrect: selector(".PickIncorrect-crossMark, .css-8wf538")?,
        })
    }
}

/// Turns the markup of one results page into entry names and picks for one
/// week.
#[derive(Debug)]
pub struct PageExtractor<'a> {
    selectors: GridSelectors,
    week: u8,
    ties: &'a TieConfig,
}

impl<'a> PageExtractor<'a> {
    /// # Errors
    ///
    /// Will return `Err` if a built-in selector fails to parse.
    pub fn new(week: u8, ties: &'a TieConfig) -> Result<Self, PickemError> {
        Ok(Self {
            selectors: GridSelectors::new()?,
            week,
            ties,
        })
    }

    #[must_use]
    pub fn extract(&self, snapshot: &str) -> ExtractedPage {
        let document = Html::parse_fragment(snapshot);
        let mut entry_tables = Vec::new();
        let mut pick_tables = Vec::new();

        for table in document.select(&self.selectors.table) {
            let text = table.text().collect::<String>().to_uppercase();
            // one table may carry both halves of the grid
            if text.contains(ENTRIES_MARKER) {
                entry_tables.push(table);
            }
            if text.contains(PICKS_MARKER) {
                pick_tables.push(table);
            }
        }

        // indices are only meaningful within this snapshot
        let mut idx_to_name = BTreeMap::new();
        let mut page = ExtractedPage::default();
        for table in entry_tables {
            for (idx, name) in self.read_entries(table) {
                if !page.entries.contains(&name) {
                    page.entries.push(name.clone());
                }
                idx_to_name.insert(idx, name);
            }
        }

        for table in pick_tables {
            self.read_picks(table, &idx_to_name, &mut page);
        }

        debug!(
            week = self.week,
            entries = page.entries.len(),
            picks = page.pick_count(),
            "extracted page"
        );
        page
    }

    fn read_entries(&self, table: ElementRef<'_>) -> Vec<(u32, String)> {
        table
            .select(&self.selectors.row)
            .skip(ENTRY_HEADER_ROWS)
            .filter_map(|row| {
                let Some(idx) = row_index(row) else {
                    warn!(week = self.week, "entry row without a usable {INDEX_ATTR}");
                    return None;
                };
                let name = row
                    .select(&self.selectors.entry_name_cell)
                    .next()?
                    .select(&self.selectors.entry_link)
                    .next()?
                    .text()
                    .collect::<String>()
                    .trim()
                    .to_string();
                (!name.is_empty()).then_some((idx, name))
            })
            .collect()
    }

    fn read_picks(
        &self,
        table: ElementRef<'_>,
        idx_to_name: &BTreeMap<u32, String>,
        page: &mut ExtractedPage,
    ) {
        for row in table.select(&self.selectors.row) {
            if row.value().attr(INDEX_ATTR).is_none() {
                continue;
            }
            let Some(idx) = row_index(row) else {
                warn!(week = self.week, "pick row with unparsable {INDEX_ATTR}");
                continue;
            };
            let Some(name) = idx_to_name.get(&idx) else {
                warn!(week = self.week, idx, "pick row has no matching entry on this page");
                continue;
            };

            let picks: Vec<Pick> = row
                .select(&self.selectors.pick_cell)
                .filter_map(|cell| self.read_pick_cell(cell))
                .collect();
            debug!(week = self.week, idx, name = %name, picks = picks.len(), "read pick row");

            if !picks.is_empty() {
                page.picks.push((name.clone(), picks));
            }
        }
    }

    fn read_pick_cell(&self, cell: ElementRef<'_>) -> Option<Pick> {
        if cell.value().classes().any(|class| class == NO_PICK_CLASS) {
            return None;
        }

        let image = cell.select(&self.selectors.image).next();
        let link = cell.select(&self.selectors.link).next();
        let correct = cell.select(&self.selectors.correct).next().is_some();
        let incorrect = cell.select(&self.selectors.incorrect).next().is_some();
        if image.is_none() && link.is_none() && !correct && !incorrect {
            return None;
        }

        let label = image
            .and_then(|img| img.value().attr("alt"))
            .map(|alt| alt.trim().to_string())
            .filter(|alt| !alt.is_empty())
            .or_else(|| {
                link.map(|a| a.text().collect::<String>().trim().to_string())
                    .filter(|text| !text.is_empty())
            });
        let Some(label) = label else {
            debug!(week = self.week, "pick cell without a team label, skipping");
            return None;
        };

        Some(Pick::from_markers(
            &label, correct, incorrect, self.week, self.ties,
        ))
    }
}

fn row_index(row: ElementRef<'_>) -> Option<u32> {
    row.value().attr(INDEX_ATTR)?.trim().parse().ok()
}

/// Extracts one snapshot for `week`.
///
/// # Errors
///
/// Will return `Err` if a built-in selector fails to parse.
pub fn extract_page(
    snapshot: &str,
    week: u8,
    ties: &TieConfig,
) -> Result<ExtractedPage, PickemError> {
    Ok(PageExtractor::new(week, ties)?.extract(snapshot))
}
