use anyhow::Result;
use ringside::config::{Config, load_config};
use ringside::fetch::{ProfilePage, SiteUrls};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn defaults_match_the_site_conventions() -> Result<()> {
    let config = load_config(None)?;

    assert_eq!(config.site.base_url, "https://www.cagematch.net/");
    assert_eq!(config.pagination.page_size, 100);
    assert_eq!(config.pagination.max_pages, 5);
    assert_eq!(config.fetch.timeout(), Duration::from_secs(20));
    assert_eq!(config.fetch.search_timeout(), Duration::from_secs(15));
    assert_eq!(config.fetch.profile_delay(), Duration::from_millis(1_500));
    assert_eq!(config.extract.promotions, ["WWE", "AEW"]);
    assert_eq!(config.limits.rivalries, 6);
    assert!(!config.cache.enabled);
    Ok(())
}

#[test]
fn toml_overrides_merge_with_defaults() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("ringside.toml");
    fs::write(
        &path,
        r#"
[site]
base_url = "http://localhost:8080/"

[pagination]
max_pages = 2
showtypes = []

[extract]
promotions = ["NJPW", "ROH"]

[limits]
featured = 3

[cache]
enabled = true
ttl_secs = 60
"#,
    )?;

    let config = load_config(Some(&path))?;

    assert_eq!(config.site.base_url, "http://localhost:8080/");
    assert_eq!(config.pagination.max_pages, 2);
    assert_eq!(config.pagination.page_size, 100);
    assert_eq!(config.extract.promotions, ["NJPW", "ROH"]);
    assert_eq!(config.limits.featured, 3);
    assert_eq!(config.limits.bio_chars, 500);
    assert!(config.cache.enabled);
    assert_eq!(config.cache.ttl_secs, 60);
    assert_eq!(config.fetch.search_delay_ms, 1_000);
    Ok(())
}

#[test]
fn invalid_values_are_rejected() -> Result<()> {
    let dir = tempdir()?;

    let bad_url = dir.path().join("bad_url.toml");
    fs::write(&bad_url, "[site]\nbase_url = \"not a url\"\n")?;
    let err = load_config(Some(&bad_url)).expect_err("invalid base_url");
    assert!(format!("{err:#}").contains("site.base_url"));

    let zero_pages = dir.path().join("zero_pages.toml");
    fs::write(&zero_pages, "[pagination]\nmax_pages = 0\n")?;
    assert!(load_config(Some(&zero_pages)).is_err());

    let broken = dir.path().join("broken.toml");
    fs::write(&broken, "[pagination\n")?;
    let err = load_config(Some(&broken)).expect_err("broken toml");
    assert!(format!("{err:#}").contains("failed to parse toml"));
    Ok(())
}

#[test]
fn nonexistent_path_is_an_error() {
    let err = load_config(Some(Path::new("/definitely/not/here/ringside.toml")))
        .expect_err("missing config file");
    assert!(err.to_string().contains("does not exist"));
}

#[test]
fn without_delays_zeroes_only_delays() {
    let config = Config::default().without_delays();
    assert_eq!(config.fetch.search_delay(), Duration::ZERO);
    assert_eq!(config.fetch.profile_delay(), Duration::ZERO);
    assert_eq!(config.fetch.page_delay_ms, 0);
    assert_eq!(config.fetch.timeout(), Duration::from_secs(20));
}

#[test]
fn urls_follow_the_site_layout() -> Result<()> {
    let mut config = Config::default();
    config.pagination.showtypes = vec!["TV-Show".to_string(), "Pay Per View".to_string()];
    let urls = SiteUrls::from_config(&config)?;

    assert_eq!(urls.profile("691"), "https://www.cagematch.net/?id=2&nr=691");
    assert_eq!(
        urls.profile_page("691", ProfilePage::Rivalries),
        "https://www.cagematch.net/?id=2&nr=691&page=7"
    );
    assert_eq!(
        urls.matches("691", 200),
        "https://www.cagematch.net/?id=2&nr=691&page=4&showtype=TV-Show%7CPay+Per+View&s=200"
    );
    assert_eq!(
        urls.search("Roman Reigns"),
        "https://www.cagematch.net/?id=666&search=Roman+Reigns"
    );
    assert_eq!(urls.featured(), "https://www.cagematch.net/?id=2");
    Ok(())
}
