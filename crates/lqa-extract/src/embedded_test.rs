use super::*;

fn bodies(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

// ---------------------------------------------------------------------------
// Gold mine
// ---------------------------------------------------------------------------

#[test]
fn gold_mine_parses_escaped_payload() {
    let script = r#"
        var obj = jQuery.parseJSON('{"mediaAsin":"B000TEST00","title":"ACME 12\" Widget","colorToAsin":{"Red":{"asin":"B000RED000"}}}');
        obj.init();
    "#;
    let data = scan(&bodies(&[script]));
    let gold = data.gold_mine.expect("gold mine present");
    assert_eq!(gold["mediaAsin"], "B000TEST00");
    assert_eq!(gold["title"], "ACME 12\" Widget");
    assert_eq!(gold["colorToAsin"]["Red"]["asin"], "B000RED000");
}

#[test]
fn gold_mine_requires_a_marker_key() {
    // A parseJSON call without either marker key must be ignored.
    let script = r#"var cfg = jQuery.parseJSON('{"theme":"dark"}');"#;
    let data = scan(&bodies(&[script]));
    assert!(data.gold_mine.is_none());
}

#[test]
fn gold_mine_first_parsable_body_wins() {
    let broken = r#"var a = jQuery.parseJSON('{"mediaAsin": nope}');"#;
    let good = r#"var b = jQuery.parseJSON('{"mediaAsin":"B000GOOD00"}');"#;
    let data = scan(&bodies(&[broken, good]));
    assert_eq!(data.gold_mine.unwrap()["mediaAsin"], "B000GOOD00");
}

#[test]
fn gold_mine_absent_yields_none() {
    let data = scan(&bodies(&["console.log('nothing structured here');"]));
    assert!(data.gold_mine.is_none());
    assert!(data.image_block.is_none());
}

// ---------------------------------------------------------------------------
// Image block
// ---------------------------------------------------------------------------

#[test]
fn image_block_extracts_and_cleans_urls() {
    let script = r#"
        var data = { 'colorImages': { 'initial': [
            {"hiRes":"https://m.media.example/I/61abc._AC_SL1500_.jpg",
             "large":"https://m.media.example/I/61abc._AC_SL1000_.jpg",
             "thumb":"https://m.media.example/I/61abc._AC_US40_.jpg",
             "variant":"MAIN"},
            {"hiRes":"https://m.media.example/I/71def._AC_SL1500_.jpg",
             "large":"https://m.media.example/I/71def._AC_SL1000_.jpg",
             "variant":"PT01"}
        ] }, 'other': 1 };
    "#;
    let data = scan(&bodies(&[script]));
    let images = data.image_block.expect("image block present");
    assert_eq!(images.len(), 2);
    assert_eq!(images[0].variant, "MAIN");
    assert_eq!(images[0].hi_res, "https://m.media.example/I/61abc.jpg");
    assert_eq!(
        images[0].thumb.as_deref(),
        Some("https://m.media.example/I/61abc.jpg")
    );
    assert_eq!(images[1].variant, "PT01");
}

#[test]
fn image_block_double_quoted_labels_are_accepted() {
    let script = r#"var data = {"colorImages": {"initial": [{"variant":"MAIN","large":"https://m.media.example/I/a.jpg"}]}};"#;
    let data = scan(&bodies(&[script]));
    let images = data.image_block.unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].hi_res, "none", "missing hiRes takes the sentinel");
}

#[test]
fn truncated_image_array_yields_none() {
    // The array never closes — the balanced scan must give up, not panic.
    let script = r#"
        var data = { 'colorImages': { 'initial': [
            {"hiRes":"https://m.media.example/I/61abc.jpg","variant":"MAIN"},
            {"hiRes":"https://m.media.exam
    "#;
    let data = scan(&bodies(&[script]));
    assert!(data.image_block.is_none());
}

#[test]
fn image_block_defaults_missing_variant_to_main() {
    let script = r#"var data = {'colorImages': {'initial': [{"large":"https://m.media.example/I/a.jpg"}]}};"#;
    let data = scan(&bodies(&[script]));
    assert_eq!(data.image_block.unwrap()[0].variant, "MAIN");
}

// ---------------------------------------------------------------------------
// Slot independence
// ---------------------------------------------------------------------------

#[test]
fn slots_are_filled_from_different_bodies() {
    let gold = r#"var a = jQuery.parseJSON('{"mediaAsin":"B000TEST00"}');"#;
    let imgs = r#"var d = {'colorImages': {'initial': [{"variant":"MAIN","large":"x.jpg"}]}};"#;
    let data = scan(&bodies(&[gold, imgs]));
    assert!(data.gold_mine.is_some());
    assert!(data.image_block.is_some());
}
