//! Terminal rendering for results, facets, quick view and compare tables.

use std::collections::BTreeSet;
use std::sync::Arc;

use catalog_core::{CatalogSession, CompareSet, RevealPhase, SelectionSet, Wishlist};
use catalog_model::{CatalogItem, CatalogSchema, FacetName, SelectionMode};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::settings::DisplaySettings;

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

/// Visible results with wishlist and compare markers.
pub fn results_table(
    items: &[&Arc<CatalogItem>],
    wishlist: &Wishlist,
    compare: &CompareSet,
    display: &DisplaySettings,
) -> Table {
    let mut header = vec![
        header_cell("#"),
        header_cell("Id"),
        header_cell("Name"),
        header_cell("Brand"),
        header_cell("Price"),
    ];
    if display.notable_limit > 0 {
        header.push(header_cell("Notable"));
    }
    if display.show_tags {
        header.push(header_cell("Tags"));
    }
    header.push(header_cell("Marks"));

    let mut table = Table::new();
    table.set_header(header);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);

    for (index, item) in items.iter().enumerate() {
        let mut row = vec![
            dim_cell(index + 1),
            Cell::new(item.id()),
            name_cell(item),
            Cell::new(item.brand()),
            Cell::new(format_price(item.price(), &display.currency)),
        ];
        if display.notable_limit > 0 {
            row.push(Cell::new(notable_summary(item, display.notable_limit)));
        }
        if display.show_tags {
            row.push(Cell::new(tag_summary(item)));
        }
        row.push(marks_cell(
            wishlist.contains(item.id()),
            compare.contains(item.id()),
        ));
        table.add_row(row);
    }
    table
}

/// One line under the results: counts and whether more can be revealed.
pub fn reveal_footer(visible: usize, total: usize, phase: RevealPhase) -> String {
    match phase {
        RevealPhase::Empty => "No items match the current filters.".to_string(),
        RevealPhase::Partial => {
            format!("Showing {visible} of {total} items ({} more)", total - visible)
        }
        RevealPhase::Complete => format!("Showing all {total} items"),
    }
}

/// Footer for the current state of `session`.
pub fn session_footer(session: &CatalogSession) -> String {
    reveal_footer(
        session.visible_ids().len(),
        session.total(),
        session.reveal_phase(),
    )
}

/// Each schema facet with its tag counts under the current filters.
pub fn facets_table(session: &CatalogSession) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Facet"),
        header_cell("Mode"),
        header_cell("Values"),
        header_cell("Selected"),
    ]);
    apply_table_style(&mut table);

    for facet in &session.schema().facets {
        let counts = session.facet_counts(&facet.name);
        let values = counts
            .iter()
            .map(|(tag, count)| {
                if facet.is_broadening(tag) {
                    format!("{tag} ({count}, matches all)")
                } else {
                    format!("{tag} ({count})")
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        let selected = session.filters().selection(&facet.name).values().join(", ");
        table.add_row(vec![
            Cell::new(facet.display_name()).add_attribute(Attribute::Bold),
            dim_cell(selection_mode_label(facet.selection)),
            Cell::new(values),
            selected_cell(&selected),
        ]);
    }
    for range in &session.schema().ranges {
        let active = session.filters().range(&range.name);
        table.add_row(vec![
            Cell::new(range.display_name()).add_attribute(Attribute::Bold),
            dim_cell("range"),
            Cell::new(format_bounds(range.min, range.max)),
            selected_cell(&if active.is_unbounded() {
                String::new()
            } else {
                format_bounds(active.min, active.max)
            }),
        ]);
    }
    table
}

/// Quick view detail of one item.
pub fn item_detail(item: &CatalogItem, display: &DisplaySettings) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Value")]);
    apply_table_style(&mut table);

    table.add_row(vec![field_cell("Id"), Cell::new(item.id())]);
    table.add_row(vec![field_cell("Name"), name_cell(item)]);
    if !item.brand().is_empty() {
        table.add_row(vec![field_cell("Brand"), Cell::new(item.brand())]);
    }
    table.add_row(vec![
        field_cell("Price"),
        Cell::new(format_price(item.price(), &display.currency)),
    ]);
    if let Some(size) = item.size() {
        table.add_row(vec![field_cell("Size"), Cell::new(format_number(size))]);
    }
    if let Some(date) = item.listed_on() {
        table.add_row(vec![field_cell("Listed"), Cell::new(date)]);
    }
    if !item.notable().is_empty() {
        table.add_row(vec![
            field_cell("Notable"),
            Cell::new(item.notable().join(", ")),
        ]);
    }
    for (facet, tags) in item.categorical() {
        table.add_row(vec![field_cell(facet.as_str()), Cell::new(join_tags(tags))]);
    }
    for (facet, value) in item.numeric() {
        if is_builtin_numeric(facet) {
            continue;
        }
        table.add_row(vec![
            field_cell(facet.as_str()),
            Cell::new(format_number(*value)),
        ]);
    }
    if let Some(description) = item.description() {
        table.add_row(vec![field_cell("Description"), Cell::new(description)]);
    }
    table
}

/// Compared items side by side, one column per item.
pub fn compare_table(
    items: &[&Arc<CatalogItem>],
    schema: &CatalogSchema,
    display: &DisplaySettings,
) -> Table {
    let mut header = vec![header_cell("")];
    header.extend(items.iter().map(|item| header_cell(item.name())));
    let mut table = Table::new();
    table.set_header(header);
    apply_table_style(&mut table);

    let row = |label: &str, value: &dyn Fn(&CatalogItem) -> String| {
        let mut cells = vec![field_cell(label)];
        cells.extend(items.iter().map(|item| Cell::new(value(item))));
        cells
    };

    table.add_row(row("Brand", &|item| item.brand().to_string()));
    table.add_row(row("Price", &|item| {
        format_price(item.price(), &display.currency)
    }));
    table.add_row(row("Size", &|item| {
        item.size().map(format_number).unwrap_or_default()
    }));
    table.add_row(row("Notable", &|item| item.notable().join(", ")));

    let facets: BTreeSet<&FacetName> = items
        .iter()
        .flat_map(|item| item.categorical().keys())
        .collect();
    for facet in facets {
        let label = schema
            .facet(facet)
            .map_or(facet.as_str(), |definition| definition.display_name());
        table.add_row(row(label, &|item| {
            item.tags(facet).map(join_tags).unwrap_or_default()
        }));
    }

    let numeric: BTreeSet<&FacetName> = items
        .iter()
        .flat_map(|item| item.numeric().keys())
        .filter(|facet| !is_builtin_numeric(facet))
        .collect();
    for facet in numeric {
        let label = schema
            .range(facet)
            .map_or(facet.as_str(), |definition| definition.display_name());
        table.add_row(row(label, &|item| {
            item.numeric_value(facet)
                .map(format_number)
                .unwrap_or_default()
        }));
    }
    table
}

/// `$435`, `$12.50`.
pub fn format_price(price: f64, currency: &str) -> String {
    format!("{currency}{}", format_number(price))
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

fn format_bounds(min: Option<f64>, max: Option<f64>) -> String {
    let mut out = String::new();
    if let Some(min) = min {
        out.push_str(&format_number(min));
    }
    out.push_str("..");
    if let Some(max) = max {
        out.push_str(&format_number(max));
    }
    out
}

fn notable_summary(item: &CatalogItem, limit: usize) -> String {
    let notable = item.notable();
    let mut summary = notable
        .iter()
        .take(limit)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if notable.len() > limit {
        summary.push_str(", ...");
    }
    summary
}

fn tag_summary(item: &CatalogItem) -> String {
    item.categorical()
        .iter()
        .map(|(facet, tags)| format!("{facet}: {}", join_tags(tags)))
        .collect::<Vec<_>>()
        .join("; ")
}

fn join_tags(tags: &BTreeSet<String>) -> String {
    tags.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

fn is_builtin_numeric(facet: &FacetName) -> bool {
    matches!(
        facet.as_str(),
        catalog_model::PRICE_FACET | catalog_model::SIZE_FACET
    )
}

fn selection_mode_label(mode: SelectionMode) -> &'static str {
    match mode {
        SelectionMode::Single => "single",
        SelectionMode::Multi => "multi",
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn field_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn name_cell(item: &CatalogItem) -> Cell {
    if item.is_new() {
        Cell::new(format!("{} [new]", item.name())).fg(Color::Green)
    } else {
        Cell::new(item.name())
    }
}

fn marks_cell(wished: bool, compared: bool) -> Cell {
    let marks: Vec<&str> = [(wished, "wish"), (compared, "cmp")]
        .into_iter()
        .filter_map(|(on, mark)| on.then_some(mark))
        .collect();
    if marks.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(marks.join(" ")).fg(Color::Yellow)
    }
}

fn selected_cell(selected: &str) -> Cell {
    if selected.is_empty() {
        dim_cell("any")
    } else {
        Cell::new(selected).fg(Color::Yellow)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> CatalogItem {
        CatalogItem::builder("aventus", "Aventus")
            .brand("Creed")
            .notable("Pineapple")
            .notable("Bergamot")
            .notable("Birch")
            .notable("Musk")
            .tag("gender", "men")
            .numeric("longevity", 8.0)
            .price(435.0)
            .size(100.0)
            .build()
            .unwrap()
    }

    #[test]
    fn prices_drop_zero_cents() {
        assert_eq!(format_price(435.0, "$"), "$435");
        assert_eq!(format_price(12.5, "EUR "), "EUR 12.50");
    }

    #[test]
    fn notable_summary_truncates() {
        assert_eq!(
            notable_summary(&item(), 3),
            "Pineapple, Bergamot, Birch, ..."
        );
    }

    #[test]
    fn bounds_render_open_sides() {
        assert_eq!(format_bounds(Some(0.0), Some(600.0)), "0..600");
        assert_eq!(format_bounds(None, Some(7.5)), "..7.50");
    }

    #[test]
    fn detail_lists_custom_numeric_facets_once() {
        let rendered = item_detail(&item(), &DisplaySettings::default()).to_string();
        assert!(rendered.contains("longevity"));
        assert!(rendered.contains("$435"));
        assert_eq!(rendered.matches("price").count(), 0);
    }

    #[test]
    fn marks_show_both_selections() {
        let wishlist = Wishlist::new();
        let compare = CompareSet::new();
        let item = Arc::new(item());
        wishlist.toggle(item.id());
        compare.toggle(item.id());
        let rendered = results_table(&[&item], &wishlist, &compare, &DisplaySettings::default())
            .to_string();
        assert!(rendered.contains("wish cmp"));
    }
}
