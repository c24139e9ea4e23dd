use ringside::document::{DocumentQuery, HtmlDocument};
use ringside::extract::{
    lenient_count, lenient_float, lenient_int, leading_float, match_rows, period_rows,
    rivalry_rows, search_rows,
};
use ringside::locate::{Facet, Located, candidates, locate, wrestler_id};

const LAYOUT_THEN_MATCHES: &str = r#"
<html><body>
<table id="nav"><tr><td>Home</td><td>Events</td></tr></table>
<table id="matches">
  <tr><th>#</th><th>Date</th><th>Promotion</th><th>Match</th></tr>
  <tr><td>1</td><td>07.04.2024</td><td>WWE</td><td>Cody Rhodes defeats Roman Reigns</td></tr>
  <tr><td>2</td><td>06.04.2024</td><td></td><td>WWE WrestleMania XL: The Rock &amp; Roman Reigns defeat Cody Rhodes &amp; Seth Rollins</td></tr>
  <tr><td>3</td><td>05.04.2024</td><td><img src="aew.gif" alt="AEW"></td><td>Somebody vs. Someone</td></tr>
  <tr><td>4</td><td>04.04.2024</td><td></td><td>House show main event</td></tr>
  <tr><td>short row</td></tr>
</table>
</body></html>
"#;

#[test]
fn builds_tables_with_normalized_header_and_text() {
    let doc = HtmlDocument::parse(LAYOUT_THEN_MATCHES);
    let tables = doc.find_tables();

    assert_eq!(tables.len(), 2);
    assert!(tables[0].order < tables[1].order);
    assert_eq!(tables[1].header, "#datepromotionmatch");
    assert!(tables[1].text.contains("cody rhodes defeats roman reigns"));
    assert_eq!(tables[1].data_rows().len(), 5);
    assert_eq!(doc.rows_of(&tables[1]).len(), 6);
    assert_eq!(doc.cells_of(&tables[1].rows[1]).len(), 4);
}

#[test]
fn header_keywords_skip_unrelated_tables() {
    let doc = HtmlDocument::parse(LAYOUT_THEN_MATCHES);
    let located = locate(&doc, Facet::Matches);

    let table = located.table().expect("matches table");
    assert_eq!(table.header, "#datepromotionmatch");
}

#[test]
fn missing_table_is_not_found_rather_than_error() {
    let doc = HtmlDocument::parse("<html><body><p>Nothing to see</p></body></html>");
    assert_eq!(locate(&doc, Facet::Championships), Located::NotFound);
    assert!(!locate(&doc, Facet::Matches).is_found());
    assert!(candidates(&doc, Facet::Search).is_empty());
}

#[test]
fn match_rows_resolve_promotion_from_cell_logo_or_description() {
    let doc = HtmlDocument::parse(LAYOUT_THEN_MATCHES);
    let table = locate(&doc, Facet::Matches).table().cloned().expect("matches table");
    let promotions = vec!["WWE".to_string(), "AEW".to_string()];

    let rows = match_rows(&table, &promotions);
    let resolved: Vec<&str> = rows.iter().map(|r| r.promotion.as_str()).collect();

    assert_eq!(resolved, ["WWE", "WWE", "AEW", "Unknown"]);
    assert_eq!(rows[0].date, "07.04.2024");
    assert_eq!(rows[0].description, "Cody Rhodes defeats Roman Reigns");
}

#[test]
fn promotion_backfill_uses_configured_names() {
    let doc = HtmlDocument::parse(
        r#"<table>
        <tr><td>#</td><td>Date</td><td>Promotion</td><td>Match</td></tr>
        <tr><td>1</td><td>04.01.2024</td><td></td><td>NJPW Wrestle Kingdom 18: Tetsuya Naito defeats SANADA</td></tr>
        </table>"#,
    );
    let table = locate(&doc, Facet::Matches).table().cloned().expect("matches table");

    let rows = match_rows(&table, &["NJPW".to_string()]);
    assert_eq!(rows[0].promotion, "NJPW");

    let rows = match_rows(&table, &["WWE".to_string()]);
    assert_eq!(rows[0].promotion, "Unknown");
}

#[test]
fn search_rows_parse_leniently_and_skip_short_rows() {
    let doc = HtmlDocument::parse(
        r#"<table>
        <tr><th>#</th><th>Gimmick</th><th>Birthplace</th><th>Rating</th><th>Votes</th></tr>
        <tr><td>1</td><td><a href="?id=2&amp;nr=1234&amp;name=Roman+Reigns">Roman Reigns</a></td><td>Pensacola, Florida, USA</td><td>8.71</td><td>1204</td></tr>
        <tr><td>2</td><td><a href="?id=2&amp;nr=99">Roman Kemp</a></td><td></td><td></td><td>n/a</td></tr>
        <tr><td>3</td><td>No link here</td><td>Nowhere</td><td>1.0</td><td>5</td></tr>
        <tr><td>4</td><td><a href="?id=2&amp;nr=7">Too Short</a></td></tr>
        </table>"#,
    );
    let tables = doc.find_tables();
    let results = search_rows(&tables[0]);

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].id.as_deref(), Some("1234"));
    assert_eq!(results[0].name, "Roman Reigns");
    assert_eq!(results[0].birthplace, "Pensacola, Florida, USA");
    assert_eq!(results[0].rating, "8.71");
    assert_eq!(results[0].votes, 1204);

    assert_eq!(results[1].rating, "0");
    assert_eq!(results[1].votes, 0);
}

#[test]
fn rivalry_rows_accept_pairs_or_bare_counts() {
    let doc = HtmlDocument::parse(
        r#"<table>
        <tr><td>Opponent</td><td>Record</td><td>Notes</td></tr>
        <tr><td>Seth Rollins</td><td>12-8</td><td>Shield brothers</td></tr>
        <tr><td>Brock Lesnar</td><td>9 Matches</td><td></td></tr>
        <tr><td>John Cena</td><td>lots</td><td></td></tr>
        </table>"#,
    );
    let rows = rivalry_rows(&doc.find_tables()[0]);

    assert_eq!(rows[0].matches, 20);
    assert_eq!((rows[0].wins, rows[0].losses), (Some(12), Some(8)));
    assert_eq!(rows[1].matches, 9);
    assert_eq!((rows[1].wins, rows[1].losses), (None, None));
    assert_eq!(rows[2].matches, 0);
}

#[test]
fn period_rows_take_the_larger_of_listed_and_recorded_totals() {
    let doc = HtmlDocument::parse(
        r#"<table>
        <tr><td>Month</td><td>Matches</td><td>Record</td></tr>
        <tr><td>Mar</td><td>4</td><td>3W-1L</td></tr>
        <tr><td>2022</td><td>10</td><td>12-3</td></tr>
        <tr><td>Feb</td><td>none</td><td>-</td></tr>
        </table>"#,
    );
    let rows = period_rows(&doc.find_tables()[0]);

    assert_eq!((rows[0].matches, rows[0].wins, rows[0].losses), (4, 3, 1));
    assert_eq!((rows[1].matches, rows[1].wins, rows[1].losses), (15, 12, 3));
    assert_eq!((rows[2].matches, rows[2].wins, rows[2].losses), (0, 0, 0));
}

#[test]
fn oversized_records_saturate_instead_of_overflowing() {
    let rivalries = HtmlDocument::parse(
        r#"<table>
        <tr><td>Opponent</td><td>Record</td><td>Notes</td></tr>
        <tr><td>Garbled</td><td>4000000000-4000000000</td><td>n</td></tr>
        <tr><td>Inflated</td><td>99999999999 matches</td><td></td></tr>
        </table>"#,
    );
    let rows = rivalry_rows(&rivalries.find_tables()[0]);
    assert_eq!(rows[0].matches, u32::MAX);
    assert_eq!((rows[0].wins, rows[0].losses), (Some(4_000_000_000), Some(4_000_000_000)));
    assert_eq!(rows[1].matches, u32::MAX);

    let periods = HtmlDocument::parse(
        r#"<table>
        <tr><td>Year</td><td>Matches</td><td>Record</td></tr>
        <tr><td>2024</td><td>5</td><td>4000000000W-4000000000L</td></tr>
        </table>"#,
    );
    let rows = period_rows(&periods.find_tables()[0]);
    assert_eq!((rows[0].matches, rows[0].wins), (u32::MAX, 4_000_000_000));
}

#[test]
fn lenient_numbers_default_instead_of_failing() {
    assert_eq!(lenient_int("42abc"), 42);
    assert_eq!(lenient_int("  -7 "), -7);
    assert_eq!(lenient_int("+5"), 5);
    assert_eq!(lenient_int("abc"), 0);
    assert_eq!(lenient_int(""), 0);

    assert_eq!(lenient_count("-3"), 0);
    assert_eq!(lenient_count("12 wins"), 12);
    assert_eq!(lenient_count("9999999999"), u32::MAX);

    assert_eq!(lenient_float("8.71 stars"), 8.71);
    assert_eq!(lenient_float("7."), 7.0);
    assert_eq!(lenient_float("1.2.3"), 1.2);
    assert_eq!(lenient_float(""), 0.0);
    assert_eq!(leading_float("n/a"), None);
}

#[test]
fn info_box_and_links_are_exposed() {
    let doc = HtmlDocument::parse(
        r#"<div class="InformationBoxTable">
          <div class="InformationBoxRow">
            <div class="InformationBoxTitle">Height:</div>
            <div class="InformationBoxContents">6' 3" (191 cm)</div>
          </div>
        </div>
        <a href="?id=2&amp;nr=5">Linked</a><a href="?id=1&amp;nr=9">Event</a>"#,
    );

    assert_eq!(
        doc.info_box(),
        vec![("Height:".to_string(), "6' 3\" (191 cm)".to_string())]
    );
    let links = doc.links_matching(&ringside::locate::WRESTLER_LINK);
    assert_eq!(links.len(), 1);
    assert_eq!(wrestler_id(&links[0].href).as_deref(), Some("5"));
}
